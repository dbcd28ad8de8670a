#![forbid(unsafe_code)]

pub(crate) mod framing;
mod stdio;

pub use framing::{TransportMode, detect_mode_from_first_line};
pub use stdio::{StdioTransport, run_stdio, serve};
