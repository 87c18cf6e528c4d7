pub mod audit;
pub mod classify;
pub mod extraction;
pub mod retrieval;
pub mod setup;
