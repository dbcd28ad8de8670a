#![forbid(unsafe_code)]

use sseq_client::entry::run_stdio;
use sseq_client::support::init_logging;
use sseq_client::{ClientConfig, version_line};

fn usage() -> &'static str {
    "sseq_client - spectral sequence chart client (stdio transport)\n\n\
USAGE:\n\
  sseq_client [--framing newline|content-length] [--log-level LEVEL]\n\
        [--session-log PATH] [--page N|A,B] [--viewport XMIN,XMAX,YMIN,YMAX]\n\
        [--verbose]\n\
\n\
FLAGS:\n\
  -h, --help       Print this help and exit\n\
  -V, --version    Print version/build and exit\n\
\n\
ENV:\n\
  SSEQ_LOG, SSEQ_FRAMING, SSEQ_SESSION_LOG, SSEQ_VERBOSE\n\
  Framing is detected from the first inbound line when not set.\n"
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = std::env::args().collect::<Vec<_>>();
    if args
        .iter()
        .any(|arg| matches!(arg.as_str(), "-h" | "--help"))
    {
        print!("{}", usage());
        return Ok(());
    }
    if args
        .iter()
        .any(|arg| matches!(arg.as_str(), "-V" | "--version"))
    {
        println!("{}", version_line());
        return Ok(());
    }

    let config = ClientConfig::from_env();
    init_logging(&config.log_level);
    tracing::info!(build = %sseq_client::build_fingerprint(), "starting");
    run_stdio(&config)
}
