use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use bankledger_core::UserId;
use bankledger_infra::LedgerError;

pub fn ledger_error_to_response(err: LedgerError) -> axum::response::Response {
    match err {
        LedgerError::Validation(reason) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", reason.to_string())
        }
        LedgerError::Storage(e) => {
            tracing::error!(error = %e, "storage failure");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "storage unavailable",
            )
        }
    }
}

/// Malformed request payload → 406, before the ledger core is invoked.
pub fn decode_error_to_response(rejection: JsonRejection) -> axum::response::Response {
    json_error(
        StatusCode::NOT_ACCEPTABLE,
        "decode_error",
        format!("input message cannot be parsed: {rejection}"),
    )
}

/// Malformed or missing path identifier → 400, before the ledger core is
/// invoked.
pub fn parse_user_id(raw: &str) -> Result<UserId, axum::response::Response> {
    raw.parse::<UserId>().map_err(|_| {
        json_error(
            StatusCode::BAD_REQUEST,
            "invalid_user_id",
            format!("userId must be an integer, got '{raw}'"),
        )
    })
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
