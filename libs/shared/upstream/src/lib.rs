//! Everything that talks to, or decides how to talk to, the Bull36 API.

pub mod bull36;
pub mod cache;
pub mod registry;
pub mod state;

pub use bull36::Bull36Client;
pub use cache::TemplateCache;
pub use registry::{ActiveUser, CurrentUser, UserRegistry};
pub use state::AppState;
