#![forbid(unsafe_code)]
#![allow(dead_code)]

use serde_json::{Value, json};
use sseq_client::{Dispatcher, Host, Renderer};
use sseq_core::{ChartError, SpectralSequenceChart};
use std::cell::RefCell;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::rc::Rc;

pub(crate) fn msg(cmd: &str, kwargs: Value) -> Value {
    json!({ "cmd": [cmd], "args": [], "kwargs": kwargs })
}

/// Classes in (0,0), (1,0) and (0,1), a structline and a page-2 differential.
/// Class 2 switches to the square node from page 4 on.
pub(crate) fn sample_state() -> Value {
    json!({
        "type": "SpectralSequenceChart",
        "nodes": [{ "shape": "circle" }, { "shape": "square" }],
        "classes": {
            "0": { "x": 0, "y": 0, "node_list": [0] },
            "1": { "x": 1, "y": 0, "node_list": [0] },
            "2": { "x": 0, "y": 1, "node_list": [0, 1], "transition_pages": [3] }
        },
        "edges": {
            "3": { "type": "structline", "source": 0, "target": 1 },
            "4": { "type": "differential", "source": 1, "target": 2, "page": 2 }
        },
        "x_range": [0, 4],
        "y_range": [0, 4],
        "initial_x_range": [0, 4],
        "initial_y_range": [0, 4],
        "page_list": [[2, 10000]]
    })
}

pub(crate) fn init_msg(state: Value) -> Value {
    msg("initialize.chart.state", json!({ "state": state }))
}

#[derive(Debug, Default)]
pub(crate) struct RenderLog {
    pub(crate) set_sseq: usize,
    pub(crate) updates: usize,
    pub(crate) background: Option<String>,
}

/// Records what the dispatcher asked of the renderer.
pub(crate) struct RecordingRenderer(pub(crate) Rc<RefCell<RenderLog>>);

impl Renderer for RecordingRenderer {
    fn set_sseq(&mut self, _chart: &SpectralSequenceChart) {
        self.0.borrow_mut().set_sseq += 1;
    }

    fn update(&mut self, chart: &SpectralSequenceChart) -> Result<(), ChartError> {
        chart.elements_to_draw(2, 0.0, 10.0, 0.0, 10.0)?;
        self.0.borrow_mut().updates += 1;
        Ok(())
    }

    fn set_background_color(&mut self, color: &str) {
        self.0.borrow_mut().background = Some(color.to_string());
    }
}

/// Answers prompts from a fixed script and remembers alerts.
#[derive(Default)]
pub(crate) struct ScriptedHost {
    pub(crate) answers: Vec<Option<String>>,
    pub(crate) alerts: Rc<RefCell<Vec<String>>>,
}

impl Host for ScriptedHost {
    fn alert(&mut self, text: &str) {
        self.alerts.borrow_mut().push(text.to_string());
    }

    fn prompt(&mut self, _text: &str, default: Option<&str>) -> Option<String> {
        if self.answers.is_empty() {
            return default.map(str::to_string);
        }
        self.answers.remove(0)
    }
}

pub(crate) fn recording_dispatcher() -> (Dispatcher, Rc<RefCell<RenderLog>>) {
    let log = Rc::new(RefCell::new(RenderLog::default()));
    let dispatcher = Dispatcher::new(
        Box::new(RecordingRenderer(log.clone())),
        Box::new(ScriptedHost::default()),
    );
    (dispatcher, log)
}

pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::INFO)
        .try_init();
}

/// `sseq_client` running as a child process over newline-delimited JSON.
pub(crate) struct Client {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl Client {
    pub(crate) fn start(extra_args: &[&str]) -> Self {
        let mut child = Command::new(env!("CARGO_BIN_EXE_sseq_client"))
            .args(extra_args)
            .env("SSEQ_LOG", "off")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .expect("spawn sseq_client");

        let stdin = child.stdin.take().expect("stdin");
        let stdout = BufReader::new(child.stdout.take().expect("stdout"));
        Self {
            child,
            stdin,
            stdout,
        }
    }

    pub(crate) fn send(&mut self, message: Value) {
        writeln!(self.stdin, "{message}").expect("write message");
        self.stdin.flush().expect("flush message");
    }

    pub(crate) fn send_raw(&mut self, bytes: &str) {
        self.stdin.write_all(bytes.as_bytes()).expect("write bytes");
        self.stdin.flush().expect("flush bytes");
    }

    pub(crate) fn recv(&mut self) -> Value {
        let mut line = String::new();
        self.stdout.read_line(&mut line).expect("read message");
        assert!(!line.trim().is_empty(), "empty message line");
        serde_json::from_str(&line).expect("parse message json")
    }

    /// Reads one Content-Length framed message.
    pub(crate) fn recv_framed(&mut self) -> Value {
        let mut len = None;
        loop {
            let mut header = String::new();
            self.stdout.read_line(&mut header).expect("read header");
            let header = header.trim();
            if header.is_empty() {
                break;
            }
            if let Some((key, value)) = header.split_once(':')
                && key.eq_ignore_ascii_case("content-length")
            {
                len = value.trim().parse::<usize>().ok();
            }
        }
        let mut body = vec![0u8; len.expect("content-length header")];
        std::io::Read::read_exact(&mut self.stdout, &mut body).expect("read body");
        serde_json::from_slice(&body).expect("parse body json")
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

pub(crate) fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let dir = base.join(format!("sseq_client_{test_name}_{pid}_{nonce}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}
