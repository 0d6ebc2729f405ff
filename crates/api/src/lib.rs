//! HTTP API: router, request/response mapping, and service wiring.
//!
//! This layer is a thin JSON-to-command mapping over the ledger service; it
//! owns no business rules beyond translating typed failures into status
//! codes.

pub mod app;
