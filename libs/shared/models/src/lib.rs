pub mod error;
pub mod extract;
pub mod upstream;

pub use error::AppError;
pub use extract::JsonBody;
pub use upstream::{is_success_flag, upstream_message, UpstreamError};
