//! HTTP gateway wrapping the perp venue and social data APIs.
//!
//! Each route validates its JSON body, delegates to the venue or social
//! adapter, and reshapes the result into a stable JSON contract with a
//! uniform `{"success": false, "error": "..."}` failure envelope. The market
//! availability cache is owned by `AppState` and injected into handlers.

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::GatewayConfig;
pub use error::{ApiError, ApiResult};
pub use routes::{create_router, run_server};
pub use state::AppState;
