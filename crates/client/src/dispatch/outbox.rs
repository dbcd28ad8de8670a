#![forbid(unsafe_code)]

use super::Dispatcher;
use crate::DispatchError;
use crate::protocol::Outbound;
use serde_json::{Value, json};

fn dotted(category: &str, kind: &str) -> String {
    if kind.is_empty() {
        category.to_string()
    } else {
        format!("{category}.{kind}")
    }
}

impl Dispatcher {
    /// Queues `{cmd, args: [], kwargs}` for the upstream.
    pub fn send(&mut self, cmd: &str, kwargs: Value) -> Result<(), DispatchError> {
        let message = Outbound::new(cmd, kwargs)?;
        tracing::debug!(cmd, "outbound");
        self.outbox.push(message);
        Ok(())
    }

    pub fn debug(&mut self, kind: &str, text: &str, orig_msg: Value) -> Result<(), DispatchError> {
        self.send(
            &dotted("debug", kind),
            json!({ "type": kind, "text": text, "orig_msg": orig_msg }),
        )
    }

    pub fn info(&mut self, kind: &str, text: &str, orig_msg: Value) -> Result<(), DispatchError> {
        self.send(
            &dotted("info", kind),
            json!({ "type": kind, "text": text, "orig_msg": orig_msg }),
        )
    }

    pub fn warning(
        &mut self,
        kind: &str,
        text: &str,
        orig_msg: Value,
        stack_trace: Option<&str>,
    ) -> Result<(), DispatchError> {
        self.send(
            &dotted("warning", kind),
            json!({
                "type": kind,
                "text": text,
                "orig_msg": orig_msg,
                "stack_trace": stack_trace,
            }),
        )
    }

    pub fn error(&mut self, kind: &str, payload: Value) -> Result<(), DispatchError> {
        self.send(&dotted("error.client", kind), payload)
    }

    /// Logs `err` locally and reports it upstream with the message that caused it.
    /// The text goes into `msg` as well as `message` so it survives any serializer
    /// that only keeps plain data fields.
    pub fn log_exception(&mut self, err: &DispatchError, orig_msg: Value) {
        tracing::error!(kind = err.name(), message = err.message(), "message failed");
        self.last_error = Some(err.clone());
        let payload = json!({
            "exception": {
                "name": err.name(),
                "message": err.message(),
                "msg": err.message(),
            },
            "orig_msg": orig_msg,
        });
        if let Err(send_err) = self.error(err.name(), payload) {
            tracing::error!(error = %send_err, "could not queue error report");
        }
    }
}
