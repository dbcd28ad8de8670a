#![forbid(unsafe_code)]

/// Outbound half of the connection. Inbound frames are pushed into the session
/// by whoever owns the read side.
pub trait Transport {
    fn send(&mut self, frame: String) -> std::io::Result<()>;
}

impl Transport for Vec<String> {
    fn send(&mut self, frame: String) -> std::io::Result<()> {
        self.push(frame);
        Ok(())
    }
}
