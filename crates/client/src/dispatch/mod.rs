#![forbid(unsafe_code)]

mod handlers;
mod outbox;
mod table;

pub use table::{Handler, HandlerTable};

use crate::host::Host;
use crate::protocol::{Inbound, Outbound};
use crate::renderer::Renderer;
use crate::{DispatchError, DispatchErrorKind};
use serde_json::Value;
use sseq_core::SpectralSequenceChart;

#[derive(Debug, Default)]
pub enum ChartState {
    #[default]
    Uninitialized,
    Active(SpectralSequenceChart),
}

/// Routes inbound messages to handlers and collects outbound messages.
///
/// Every failure is turned into an `error.client.<Kind>` report here; nothing a
/// single message does can stop the next one from being processed.
pub struct Dispatcher {
    state: ChartState,
    renderer: Box<dyn Renderer>,
    host: Box<dyn Host>,
    handlers: HandlerTable,
    outbox: Vec<Outbound>,
    batch_depth: usize,
    last_error: Option<DispatchError>,
}

impl Dispatcher {
    pub fn new(renderer: Box<dyn Renderer>, host: Box<dyn Host>) -> Self {
        Self {
            state: ChartState::Uninitialized,
            renderer,
            host,
            handlers: handlers::default_handlers(),
            outbox: Vec::new(),
            batch_depth: 0,
            last_error: None,
        }
    }

    pub fn add_message_handler(&mut self, name: &'static str, handler: Handler) {
        if self.handlers.insert(name, handler).is_some() {
            tracing::debug!(cmd = name, "message handler replaced");
        }
    }

    pub fn handlers(&self) -> &HandlerTable {
        &self.handlers
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.state, ChartState::Active(_))
    }

    pub fn chart(&self) -> Option<&SpectralSequenceChart> {
        match &self.state {
            ChartState::Active(chart) => Some(chart),
            ChartState::Uninitialized => None,
        }
    }

    /// Mutable access for local observers; mutations made here do not redraw.
    pub fn chart_mut(&mut self) -> Option<&mut SpectralSequenceChart> {
        match &mut self.state {
            ChartState::Active(chart) => Some(chart),
            ChartState::Uninitialized => None,
        }
    }

    pub fn last_error(&self) -> Option<&DispatchError> {
        self.last_error.as_ref()
    }

    /// Hands out the most recent reported error once, leaving none behind.
    pub fn take_last_error(&mut self) -> Option<DispatchError> {
        self.last_error.take()
    }

    pub fn take_outbound(&mut self) -> Vec<Outbound> {
        std::mem::take(&mut self.outbox)
    }

    /// Top-level entry for one decoded message. Errors are reported upstream before
    /// being returned, so callers only use them for bookkeeping.
    pub fn handle_message(&mut self, raw: Value) -> Result<(), DispatchError> {
        let result = Inbound::from_value(raw.clone()).and_then(|msg| self.dispatch(&msg));
        if let Err(err) = &result {
            self.log_exception(err, raw);
        }
        result
    }

    /// Resolves the first candidate command with a handler and runs it.
    pub fn dispatch(&mut self, msg: &Inbound) -> Result<(), DispatchError> {
        let Some((name, handler)) = self.handlers.resolve(&msg.cmd) else {
            return Err(DispatchError::unknown_command(format!(
                "Console sent unknown command \"{}\".",
                msg.primary_cmd()
            )));
        };
        tracing::debug!(cmd = ?msg.cmd, handler = name, "dispatch");
        handler(self, msg)
    }

    pub(crate) fn active_chart_mut(
        &mut self,
        msg: &Inbound,
    ) -> Result<&mut SpectralSequenceChart, DispatchError> {
        match &mut self.state {
            ChartState::Active(chart) => Ok(chart),
            ChartState::Uninitialized => Err(not_initialized(msg)),
        }
    }

    pub(crate) fn active_chart(&self, msg: &Inbound) -> Result<&SpectralSequenceChart, DispatchError> {
        self.chart().ok_or_else(|| not_initialized(msg))
    }

    /// Replaces the chart wholesale and hands it to the renderer.
    pub(crate) fn install_chart(&mut self, mut chart: SpectralSequenceChart) {
        chart
            .events_mut()
            .subscribe_all(|event| tracing::trace!(event = event.name(), "chart event"));
        self.renderer.set_sseq(&chart);
        self.state = ChartState::Active(chart);
    }

    pub(crate) fn renderer_mut(&mut self) -> &mut dyn Renderer {
        self.renderer.as_mut()
    }

    pub(crate) fn host_mut(&mut self) -> &mut dyn Host {
        self.host.as_mut()
    }

    /// Redraw now, or once at the end of the enclosing batch.
    pub(crate) fn request_update(&mut self) -> Result<(), DispatchError> {
        if self.batch_depth > 0 {
            return Ok(());
        }
        self.refresh()
    }

    fn refresh(&mut self) -> Result<(), DispatchError> {
        let ChartState::Active(chart) = &self.state else {
            return Ok(());
        };
        if let Err(err) = self.renderer.update(chart) {
            tracing::error!(error = %err, "redraw failed");
            return Err(DispatchError::new(DispatchErrorKind::Reference, err.to_string()));
        }
        Ok(())
    }

    /// Runs every sub-message in order, then redraws exactly once.
    pub(crate) fn run_batch(&mut self, batch: &[Value]) -> Result<(), DispatchError> {
        self.batch_depth += 1;
        for sub in batch {
            let _ = self.handle_message(sub.clone());
        }
        self.batch_depth -= 1;
        if self.batch_depth > 0 {
            return Ok(());
        }
        self.refresh()
    }
}

fn not_initialized(msg: &Inbound) -> DispatchError {
    DispatchError::invalid_command(format!(
        "Command \"{}\" received before initialize.chart.state.",
        msg.primary_cmd()
    ))
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("initialized", &self.is_initialized())
            .field("handlers", &self.handlers)
            .field("outbox", &self.outbox.len())
            .field("batch_depth", &self.batch_depth)
            .finish()
    }
}
