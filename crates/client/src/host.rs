#![forbid(unsafe_code)]

/// User-facing interactions requested by the upstream.
pub trait Host {
    fn alert(&mut self, text: &str);

    /// Returns the user's answer, or `None` when the prompt was dismissed.
    fn prompt(&mut self, text: &str, default: Option<&str>) -> Option<String>;
}

/// Host with no user attached: alerts go to the log and prompts take their default.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeadlessHost;

impl Host for HeadlessHost {
    fn alert(&mut self, text: &str) {
        tracing::warn!(text, "alert");
    }

    fn prompt(&mut self, text: &str, default: Option<&str>) -> Option<String> {
        tracing::info!(text, default, "prompt answered with default");
        default.map(str::to_string)
    }
}
