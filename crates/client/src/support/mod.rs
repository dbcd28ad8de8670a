#![forbid(unsafe_code)]

mod build_info;
mod logging;
mod runtime;
mod session_log;
pub(crate) mod time;

pub use build_info::{CLIENT_NAME, CLIENT_VERSION, build_fingerprint, version_line};
pub use logging::init_logging;
pub use runtime::ClientConfig;
pub use session_log::SessionLog;
