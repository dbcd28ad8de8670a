#![forbid(unsafe_code)]

use super::framing::{
    TransportMode, detect_mode_from_first_line, read_content_length_frame, write_frame,
};
use crate::dispatch::Dispatcher;
use crate::host::HeadlessHost;
use crate::renderer::HeadlessRenderer;
use crate::session::Session;
use crate::support::{ClientConfig, SessionLog};
use crate::transport::Transport;
use std::io::{BufRead, BufReader, Write};

/// Writes outbound frames in whichever framing the connection settled on.
pub struct StdioTransport<W: Write> {
    writer: W,
    mode: Option<TransportMode>,
}

impl<W: Write> StdioTransport<W> {
    pub fn new(writer: W, mode: Option<TransportMode>) -> Self {
        Self { writer, mode }
    }

    pub fn mode(&self) -> Option<TransportMode> {
        self.mode
    }

    pub fn set_mode(&mut self, mode: TransportMode) {
        self.mode = Some(mode);
    }
}

impl<W: Write> Transport for StdioTransport<W> {
    fn send(&mut self, frame: String) -> std::io::Result<()> {
        let mode = self.mode.unwrap_or(TransportMode::NewlineJson);
        write_frame(&mut self.writer, mode, &frame)
    }
}

pub fn run_stdio(config: &ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    let stdin = std::io::stdin();
    let reader = BufReader::new(stdin.lock());
    let stdout = std::io::stdout().lock();
    serve(reader, stdout, config)
}

/// Serves one connection until EOF. The `new_user` handshake goes out as soon as the
/// framing is known: immediately when configured, otherwise after the first line.
pub fn serve<R: BufRead, W: Write>(
    mut reader: R,
    writer: W,
    config: &ClientConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let renderer = HeadlessRenderer::new(config.page, config.viewport);
    let dispatcher = Dispatcher::new(Box::new(renderer), Box::new(HeadlessHost));
    let mut session = Session::new(dispatcher, StdioTransport::new(writer, config.framing));
    session.set_echo_inbound(config.echo_inbound);
    let mut log = config.session_log.as_deref().map(SessionLog::new);

    session.client_ready()?;
    if let Some(mode) = config.framing {
        if let Some(log) = log.as_mut() {
            log.note_mode(mode.as_str(), "");
        }
        session.socket_ready()?;
    }

    let result = read_loop(&mut reader, &mut session, log.as_mut());
    if let Some(log) = log.as_mut() {
        match &result {
            Ok(()) => log.note_exit("eof"),
            Err(err) => log.note_exit(&format!("error: {err}")),
        }
    }
    result
}

fn read_loop<R: BufRead, W: Write>(
    reader: &mut R,
    session: &mut Session<StdioTransport<W>>,
    mut log: Option<&mut SessionLog>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        let mut bytes = Vec::new();
        if reader.read_until(b'\n', &mut bytes)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&bytes).into_owned();
        if line.trim().is_empty() {
            continue;
        }

        let mode = match session.transport().mode() {
            Some(mode) => mode,
            None => {
                let Some(detected) = detect_mode_from_first_line(&line) else {
                    tracing::warn!("skipping line before framing is known");
                    continue;
                };
                tracing::info!(mode = detected.as_str(), "framing detected");
                session.transport_mut().set_mode(detected);
                if let Some(log) = log.as_deref_mut() {
                    log.note_mode(detected.as_str(), &line);
                }
                session.socket_ready()?;
                detected
            }
        };

        let frame = match mode {
            TransportMode::NewlineJson => line.trim().to_string(),
            TransportMode::ContentLength => {
                match read_content_length_frame(reader, Some(line.clone())) {
                    Ok(Some(body)) => String::from_utf8_lossy(&body).into_owned(),
                    Ok(None) => break,
                    Err(err) if err.kind() == std::io::ErrorKind::InvalidData => {
                        tracing::warn!(error = %err, "dropping malformed frame");
                        session.reject_frame(&err.to_string(), &line)?;
                        note_outcome(session, log.as_deref_mut());
                        continue;
                    }
                    Err(err) => return Err(err.into()),
                }
            }
        };

        session.handle_frame(&frame)?;
        note_outcome(session, log.as_deref_mut());
    }
    Ok(())
}

fn note_outcome<W: Write>(
    session: &mut Session<StdioTransport<W>>,
    log: Option<&mut SessionLog>,
) {
    let error = session.dispatcher_mut().take_last_error();
    if let Some(log) = log {
        log.note_frame(session.last_cmd());
        if let Some(err) = error {
            log.note_error(&err.to_string());
        }
    }
}
