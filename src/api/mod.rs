//! HTTP API for submitting reports and reading audit outcomes.
//!
//! Routes are nested under `/api/`. Audits are CPU and network bound on
//! blocking clients, so handlers move them onto `spawn_blocking`.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{ApiServer, ServerError};
pub use types::ApiContext;
