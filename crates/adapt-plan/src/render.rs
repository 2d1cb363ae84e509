//! Text that planned actions write to disk: sources.list entries, APT
//! preference files, and the file names derived from directive values.

use crate::config::PlanConfig;
use adapt_aptfile::{PinDirective, PinTarget, RepoDirective};
use std::path::{Path, PathBuf};

const MAX_FILENAME_LEN: usize = 50;

/// Reduce `s` to a lowercase `[a-z0-9_-]` file stem of at most 50 characters.
///
/// Every run of other characters collapses to a single `_`, and leading or
/// trailing underscores are dropped.
pub fn sanitize_filename(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_run = false;
    for ch in s.chars() {
        if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
            out.push(ch);
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }
    let mut stem: String = out.trim_matches('_').to_owned();
    stem.truncate(MAX_FILENAME_LEN);
    stem.to_ascii_lowercase()
}

pub fn keyring_path(config: &PlanConfig, repo: &RepoDirective) -> PathBuf {
    config
        .keyring_dir
        .join(format!("{}.gpg", sanitize_filename(&repo.url)))
}

pub fn list_file_path(config: &PlanConfig, repo: &RepoDirective) -> PathBuf {
    config
        .sources_dir
        .join(format!("{}.list", sanitize_filename(&repo.url)))
}

/// One-line sources.list entry, e.g.
/// `deb [arch=amd64 signed-by=/usr/share/keyrings/x.gpg] https://x jammy main`.
pub fn source_line(repo: &RepoDirective, keyring: Option<&Path>) -> String {
    let mut parts = vec![if repo.is_source { "deb-src" } else { "deb" }.to_owned()];

    let mut options = Vec::new();
    if let Some(arch) = &repo.arch {
        options.push(format!("arch={arch}"));
    }
    if let Some(keyring) = keyring {
        options.push(format!("signed-by={}", keyring.display()));
    }
    if !options.is_empty() {
        parts.push(format!("[{}]", options.join(" ")));
    }

    parts.push(repo.url.clone());
    parts.extend(
        [&repo.suite, &repo.component]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .cloned(),
    );
    parts.join(" ")
}

/// The value of the `Pin:` field, e.g. `version 5.3*`.
pub fn pin_value(pin: &PinDirective) -> String {
    match &pin.target {
        Some(PinTarget::Version(v)) => format!("version {v}"),
        Some(PinTarget::Release(r)) => format!("release {r}"),
        Some(PinTarget::Origin(o)) => format!("origin {o}"),
        None => String::new(),
    }
}

pub fn pin_file_path(config: &PlanConfig, pin: &PinDirective) -> PathBuf {
    let mut stem = sanitize_filename(&pin.package_name);
    if stem.is_empty() {
        stem = sanitize_filename(&pin_value(pin));
    }
    config.preferences_dir.join(format!("{stem}.pin"))
}

/// Contents of an apt_preferences(5) stanza for `pin`.
pub fn pin_contents(pin: &PinDirective) -> String {
    format!(
        "Package: {}\nPin-Priority: {}\nPin: {}\n",
        pin.package_name,
        pin.priority,
        pin_value(pin)
    )
}
