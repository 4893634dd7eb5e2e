//! # OTP Cell
//!
//! Phone verification for booking customers. Bull36 generates and delivers the
//! code; this cell remembers it for a short window and checks what the
//! customer types back.
//!
//! ## API Endpoints
//!
//! - `POST /send_otp` - Ask Bull36 to send a code to `phone`
//! - `POST /verify_otp` - Check `otp` for `phone` and return the customer id
//!
//! ## Verification rules
//!
//! A phone has at most one pending code; sending again replaces it. A wrong
//! code leaves the pending record in place so the customer can retry until it
//! expires. Success and expiry both remove it.

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{OtpError, VerifiedOtp};
pub use router::{otp_routes, OtpState};
pub use services::store::OtpStore;
