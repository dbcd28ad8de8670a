#![forbid(unsafe_code)]

//! Client-side replica of a spectral sequence chart, kept in sync with an upstream
//! controller over a JSON message channel.

pub mod dispatch;
pub mod entry;
mod error;
pub mod host;
pub mod protocol;
pub mod renderer;
pub mod session;
pub mod support;
pub mod transport;

pub use dispatch::{Dispatcher, Handler, HandlerTable};
pub use error::{DispatchError, DispatchErrorKind};
pub use host::{HeadlessHost, Host};
pub use protocol::{Inbound, Outbound};
pub use renderer::{DrawCounts, HeadlessRenderer, Renderer, Viewport};
pub use session::Session;
pub use support::{ClientConfig, build_fingerprint, version_line};
pub use transport::Transport;
