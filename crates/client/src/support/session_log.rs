#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};

/// Small key=value record of the current session, rewritten on every change.
///
/// Holds only the framing mode, counters, the last command and the last error; no
/// message bodies.
#[derive(Clone, Debug)]
pub struct SessionLog {
    path: PathBuf,
    start_rfc3339: String,
    pid: u32,
    build: String,
    mode: Option<String>,
    first_line: Option<String>,
    frames: u64,
    last_cmd: Option<String>,
    last_error: Option<String>,
    exit: Option<String>,
}

impl SessionLog {
    pub fn new(path: &Path) -> Self {
        let this = Self {
            path: path.to_path_buf(),
            start_rfc3339: crate::support::time::now_rfc3339(),
            pid: std::process::id(),
            build: crate::build_fingerprint(),
            mode: None,
            first_line: None,
            frames: 0,
            last_cmd: None,
            last_error: None,
            exit: None,
        };
        this.flush();
        this
    }

    pub fn note_mode(&mut self, mode: &str, first_line: &str) {
        self.mode = Some(mode.to_string());
        self.first_line = Some(truncate(first_line.trim_end(), 240));
        self.flush();
    }

    pub fn note_frame(&mut self, cmd: Option<&str>) {
        self.frames += 1;
        if let Some(cmd) = cmd.map(str::trim).filter(|c| !c.is_empty()) {
            self.last_cmd = Some(truncate(cmd, 96));
        }
        self.flush();
    }

    pub fn note_error(&mut self, error: &str) {
        let error = error.trim();
        if error.is_empty() {
            return;
        }
        self.last_error = Some(truncate(error, 300));
        self.flush();
    }

    pub fn note_exit(&mut self, reason: &str) {
        self.exit = Some(truncate(reason.trim(), 120));
        self.flush();
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        push_kv(&mut out, "ts_start", &self.start_rfc3339);
        push_kv(&mut out, "pid", &self.pid.to_string());
        push_kv(&mut out, "build", &self.build);
        if let Some(mode) = &self.mode {
            push_kv(&mut out, "mode", mode);
        }
        if let Some(line) = &self.first_line {
            push_kv(&mut out, "first_line", line);
        }
        push_kv(&mut out, "frames", &self.frames.to_string());
        if let Some(cmd) = &self.last_cmd {
            push_kv(&mut out, "last_cmd", cmd);
        }
        if let Some(err) = &self.last_error {
            push_kv(&mut out, "last_error", err);
        }
        if let Some(exit) = &self.exit {
            push_kv(&mut out, "exit", exit);
        }
        out
    }

    fn flush(&self) {
        if let Some(dir) = self.path.parent() {
            let _ = std::fs::create_dir_all(dir);
        }
        if let Err(err) = std::fs::write(&self.path, self.render()) {
            tracing::debug!(path = %self.path.display(), error = %err, "session log not written");
        }
    }
}

fn push_kv(out: &mut String, key: &str, value: &str) {
    use std::fmt::Write as _;
    let _ = writeln!(out, "{key}={}", value.replace('\n', " "));
}

fn truncate(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}
