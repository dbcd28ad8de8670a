#![forbid(unsafe_code)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".into()));
    let Some(git_dir) = find_git_dir(&manifest_dir) else {
        return;
    };
    let head_path = git_dir.join("HEAD");
    println!("cargo:rerun-if-changed={}", head_path.display());

    let Ok(head) = fs::read_to_string(&head_path) else {
        return;
    };
    let head = head.trim();
    let sha = match head.strip_prefix("ref:") {
        Some(reference) => fs::read_to_string(git_dir.join(reference.trim())).ok(),
        None => Some(head.to_string()),
    };
    let Some(sha) = sha.map(|s| s.trim().chars().take(12).collect::<String>()) else {
        return;
    };
    if !sha.is_empty() {
        println!("cargo:rustc-env=SSEQ_GIT_SHA={sha}");
    }
}

fn find_git_dir(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(".git"))
        .find(|candidate| candidate.is_dir())
}
