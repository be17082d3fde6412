mod api_error;
pub mod config;
mod http_layers;
pub mod recommendations;
#[allow(clippy::module_inception)]
pub mod server;
mod session;
pub mod state;

pub use api_error::{ApiError, ApiResult};
pub use config::ServerConfig;
pub use http_layers::*;
pub use server::{make_app, run_server};
pub use session::{Session, COOKIE_SESSION_TOKEN_KEY, HEADER_SESSION_TOKEN_KEY};
