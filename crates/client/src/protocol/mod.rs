#![forbid(unsafe_code)]

mod envelope;

pub use envelope::{Inbound, Outbound};
