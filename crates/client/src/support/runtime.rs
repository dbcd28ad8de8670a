#![forbid(unsafe_code)]

use crate::entry::TransportMode;
use crate::renderer::Viewport;
use sseq_core::PageQuery;
use std::path::PathBuf;

const DEFAULT_LOG_LEVEL: &str = "warn";
const DEFAULT_PAGE: i64 = 2;

/// Process configuration from flags, then `SSEQ_*` environment variables, then defaults.
///
/// Unparseable values fall back to the default rather than aborting startup.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    pub log_level: String,
    /// `None` means detect from the first inbound line.
    pub framing: Option<TransportMode>,
    pub session_log: Option<PathBuf>,
    pub page: PageQuery,
    pub viewport: Option<Viewport>,
    pub echo_inbound: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            framing: None,
            session_log: None,
            page: PageQuery::Page(DEFAULT_PAGE),
            viewport: None,
            echo_inbound: false,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let args = std::env::args().skip(1).collect::<Vec<_>>();
        Self::parse(&args, |key| std::env::var(key).ok())
    }

    pub fn parse(args: &[String], env: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let log_level = flag_value(args, "--log-level")
            .or_else(|| env("SSEQ_LOG"))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.log_level);
        let framing = flag_value(args, "--framing")
            .or_else(|| env("SSEQ_FRAMING"))
            .and_then(|v| TransportMode::parse(v.trim()));
        let session_log = flag_value(args, "--session-log")
            .or_else(|| env("SSEQ_SESSION_LOG"))
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        let page = flag_value(args, "--page")
            .and_then(|v| parse_page(&v))
            .unwrap_or(defaults.page);
        let viewport = flag_value(args, "--viewport").and_then(|v| parse_viewport(&v));
        let echo_inbound = args.iter().any(|arg| arg == "--verbose")
            || env("SSEQ_VERBOSE").is_some_and(|v| parse_bool(&v));
        Self {
            log_level,
            framing,
            session_log,
            page,
            viewport,
            echo_inbound,
        }
    }
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == flag
            && let Some(value) = iter.next()
        {
            return Some(value.clone());
        }
        if let Some(value) = arg
            .strip_prefix(flag)
            .and_then(|rest| rest.strip_prefix('='))
        {
            return Some(value.to_string());
        }
    }
    None
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// `N` for a single page, `A,B` for a page range.
fn parse_page(value: &str) -> Option<PageQuery> {
    match value.split_once(',') {
        Some((first, last)) => Some(PageQuery::Range(
            first.trim().parse().ok()?,
            last.trim().parse().ok()?,
        )),
        None => value.trim().parse().ok().map(PageQuery::Page),
    }
}

/// `xmin,xmax,ymin,ymax`.
fn parse_viewport(value: &str) -> Option<Viewport> {
    let parts = value
        .split(',')
        .map(|p| p.trim().parse::<f64>().ok().filter(|n| n.is_finite()))
        .collect::<Option<Vec<_>>>()?;
    match parts.as_slice() {
        [xmin, xmax, ymin, ymax] => Some(Viewport {
            xmin: *xmin,
            xmax: *xmax,
            ymin: *ymin,
            ymax: *ymax,
        }),
        _ => None,
    }
}
