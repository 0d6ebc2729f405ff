//! Account routes: the thin JSON-to-command mapping over the ledger service.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use bankledger_core::{LedgerCommand, TransferCommand};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/:user_id/balance", get(get_balance))
        .route("/:user_id/statement", get(get_statement))
        .route("/:user_id/deposit", post(deposit))
        .route("/:user_id/withdraw", post(withdraw))
        .route("/:user_id/transfer", post(transfer))
}

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn get_balance(
    Extension(services): Extension<Arc<AppServices>>,
    Path(user_id): Path<String>,
) -> axum::response::Response {
    let user_id = match errors::parse_user_id(&user_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.balance(user_id).await {
        Ok(projection) => (
            StatusCode::OK,
            Json(dto::BalanceDto {
                amount: projection.amount,
            }),
        )
            .into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn get_statement(
    Extension(services): Extension<Arc<AppServices>>,
    Path(user_id): Path<String>,
) -> axum::response::Response {
    let user_id = match errors::parse_user_id(&user_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.statement(user_id).await {
        Ok(events) => {
            let entries = events
                .iter()
                .map(dto::StatementEntryDto::from)
                .collect::<Vec<_>>();
            (StatusCode::OK, Json(entries)).into_response()
        }
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn deposit(
    Extension(services): Extension<Arc<AppServices>>,
    Path(user_id): Path<String>,
    body: Result<Json<dto::DepositRequest>, JsonRejection>,
) -> axum::response::Response {
    let user_id = match errors::parse_user_id(&user_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let Json(req) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::decode_error_to_response(rejection),
    };

    submit(
        &services,
        LedgerCommand::Deposit {
            user_id,
            amount: req.amount,
            occurred_at: Utc::now(),
        },
    )
    .await
}

pub async fn withdraw(
    Extension(services): Extension<Arc<AppServices>>,
    Path(user_id): Path<String>,
    body: Result<Json<dto::WithdrawRequest>, JsonRejection>,
) -> axum::response::Response {
    let user_id = match errors::parse_user_id(&user_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let Json(req) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::decode_error_to_response(rejection),
    };

    submit(
        &services,
        LedgerCommand::Withdraw {
            user_id,
            amount: req.amount,
            occurred_at: Utc::now(),
        },
    )
    .await
}

pub async fn transfer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(user_id): Path<String>,
    body: Result<Json<dto::TransferRequest>, JsonRejection>,
) -> axum::response::Response {
    let origin = match errors::parse_user_id(&user_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let Json(req) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::decode_error_to_response(rejection),
    };

    submit(
        &services,
        LedgerCommand::Transfer(TransferCommand {
            origin,
            destination: req.user_id,
            amount: req.amount,
            occurred_at: Utc::now(),
        }),
    )
    .await
}

async fn submit(services: &AppServices, command: LedgerCommand) -> axum::response::Response {
    match services.handle(command).await {
        Ok(_) => StatusCode::ACCEPTED.into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
