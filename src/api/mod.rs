//! HTTP API module for the Payroll Engine.
//!
//! This module exposes payslip computation, batch computation and rate table
//! lookup as JSON endpoints, and stamps each payslip with its identifying
//! envelope.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{BatchRequest, EmployeeCompensation, PayslipRequest};
pub use response::{
    ApiError, BatchItem, BatchResponse, ENGINE_VERSION, PayslipResponse, RateTableResponse,
};
pub use state::AppState;
