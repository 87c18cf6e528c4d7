//! Endpoint handlers, one module per resource.

pub mod audit;
pub mod health;
