mod auth;
mod body;
mod logging;
mod request_view;

pub use auth::{api_key_auth, AuthenticatedUser, API_KEY_HEADER};
pub use body::{NotifyingBody, ABORTED_CODE};
pub use logging::request_logger;
pub use request_view::HttpRequestView;
