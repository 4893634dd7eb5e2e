//! Booking passthroughs: slot availability and appointment creation.

pub mod handlers;
pub mod models;
pub mod router;

pub use router::appointment_routes;
