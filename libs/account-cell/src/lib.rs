//! Upstream account selection: which Bull36 token the proxy is acting as.

pub mod handlers;
pub mod models;
pub mod router;

pub use router::account_routes;
