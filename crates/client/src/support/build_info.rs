#![forbid(unsafe_code)]

pub const CLIENT_NAME: &str = "sseq_client";
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

fn build_profile_label() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}

fn build_git_sha() -> Option<&'static str> {
    option_env!("SSEQ_GIT_SHA").and_then(|v| {
        let v = v.trim();
        if v.is_empty() { None } else { Some(v) }
    })
}

/// `<version>+git.<sha>.<profile>`, or `<version>+<profile>` outside a checkout.
pub fn build_fingerprint() -> String {
    match build_git_sha() {
        Some(sha) => format!("{CLIENT_VERSION}+git.{sha}.{}", build_profile_label()),
        None => format!("{CLIENT_VERSION}+{}", build_profile_label()),
    }
}

pub fn version_line() -> String {
    format!("{CLIENT_NAME} {CLIENT_VERSION} build={}", build_fingerprint())
}
