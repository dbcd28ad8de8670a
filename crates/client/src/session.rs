#![forbid(unsafe_code)]

use crate::dispatch::Dispatcher;
use crate::protocol::Outbound;
use crate::transport::Transport;
use crate::{DispatchError, DispatchErrorKind};
use serde_json::{Value, json};
use sseq_core::Uuid;
use std::collections::VecDeque;

/// Connection-level state around a [`Dispatcher`].
///
/// Nothing goes out before the `new_user` handshake, and the handshake itself waits
/// until both the local client and the transport report ready, in either order.
pub struct Session<T: Transport> {
    dispatcher: Dispatcher,
    transport: T,
    client_ready: bool,
    socket_ready: bool,
    handshake_sent: bool,
    queued: VecDeque<Outbound>,
    echo_inbound: bool,
    last_cmd: Option<String>,
}

impl<T: Transport> Session<T> {
    pub fn new(dispatcher: Dispatcher, transport: T) -> Self {
        Self {
            dispatcher,
            transport,
            client_ready: false,
            socket_ready: false,
            handshake_sent: false,
            queued: VecDeque::new(),
            echo_inbound: false,
            last_cmd: None,
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher {
        &mut self.dispatcher
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn handshake_sent(&self) -> bool {
        self.handshake_sent
    }

    pub fn queued_len(&self) -> usize {
        self.queued.len()
    }

    /// First candidate command of the most recent frame that parsed as JSON.
    pub fn last_cmd(&self) -> Option<&str> {
        self.last_cmd.as_deref()
    }

    /// Log every inbound frame at info level instead of debug.
    pub fn set_echo_inbound(&mut self, echo: bool) {
        self.echo_inbound = echo;
    }

    pub fn client_ready(&mut self) -> std::io::Result<()> {
        self.client_ready = true;
        self.flush()
    }

    pub fn socket_ready(&mut self) -> std::io::Result<()> {
        self.socket_ready = true;
        self.flush()
    }

    /// Handles one raw text frame from the transport.
    ///
    /// Message-level failures are reported upstream and do not surface here; only
    /// transport write errors do.
    pub fn handle_frame(&mut self, text: &str) -> std::io::Result<()> {
        if self.echo_inbound {
            tracing::info!(frame = text, "inbound");
        } else {
            tracing::debug!(bytes = text.len(), "inbound");
        }
        match serde_json::from_str::<Value>(text) {
            Ok(raw) => {
                self.last_cmd = primary_cmd(&raw);
                let _ = self.dispatcher.handle_message(raw);
            }
            Err(err) => {
                let err = DispatchError::new(
                    DispatchErrorKind::InvalidCommand,
                    format!("Could not parse message as JSON: {err}"),
                );
                self.dispatcher
                    .log_exception(&err, Value::String(text.to_string()));
            }
        }
        self.flush()
    }

    /// Reports a frame the transport could not decode, then carries on.
    pub fn reject_frame(&mut self, reason: &str, raw: &str) -> std::io::Result<()> {
        let err = DispatchError::new(
            DispatchErrorKind::InvalidCommand,
            format!("Could not read frame: {reason}"),
        );
        self.dispatcher
            .log_exception(&err, Value::String(raw.trim_end().to_string()));
        self.flush()
    }

    /// Forwards a click on the chart. A click on empty space, or on a class that is
    /// no longer in the chart, sends nothing.
    pub fn click(&mut self, class: Option<Uuid>, x: f64, y: f64) -> std::io::Result<()> {
        let Some(snapshot) = class
            .and_then(|uuid| self.dispatcher.chart()?.class(uuid))
            .map(|c| c.to_json())
        else {
            return Ok(());
        };
        if let Err(err) = self
            .dispatcher
            .send("click", json!({ "chart_class": snapshot, "x": x, "y": y }))
        {
            tracing::error!(error = %err, "click not sent");
        }
        self.flush()
    }

    /// Moves everything the dispatcher produced to the transport, or holds it until
    /// the handshake has gone out.
    pub fn flush(&mut self) -> std::io::Result<()> {
        self.queued.extend(self.dispatcher.take_outbound());
        if !self.handshake_sent {
            if !(self.client_ready && self.socket_ready) {
                return Ok(());
            }
            let hello = Outbound::new("new_user", json!({}))
                .map_err(|err| std::io::Error::other(err.to_string()))?;
            self.transport.send(hello.to_json_string())?;
            self.handshake_sent = true;
            tracing::info!(queued = self.queued.len(), "handshake sent");
        }
        while let Some(message) = self.queued.pop_front() {
            self.transport.send(message.to_json_string())?;
        }
        Ok(())
    }
}

fn primary_cmd(raw: &Value) -> Option<String> {
    match raw.get("cmd")? {
        Value::String(cmd) => Some(cmd.clone()),
        Value::Array(cmds) => cmds.first()?.as_str().map(str::to_string),
        _ => None,
    }
}

impl<T: Transport> std::fmt::Debug for Session<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("client_ready", &self.client_ready)
            .field("socket_ready", &self.socket_ready)
            .field("handshake_sent", &self.handshake_sent)
            .field("queued", &self.queued.len())
            .finish()
    }
}
