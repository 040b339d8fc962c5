mod auth;
mod headers;
mod logging;
mod panic;
mod session;

pub use auth::require_authentication;
pub use headers::secure_headers;
pub use logging::log_request;
pub use panic::{install_panic_hook, recover_panic};
pub use session::fixed_lifetime;
