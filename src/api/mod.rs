//! HTTP API module for the RCTI engine.
//!
//! This module provides the REST API endpoints the host application uses
//! to draft and finalise driver invoices.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{DraftRequest, FinaliseRequest, JobRequest};
pub use response::{ApiError, FinaliseResponse};
pub use state::AppState;
