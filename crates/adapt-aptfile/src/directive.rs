//! Typed Aptfile directives and the per-command validators that build them.
//!
//! Each validator receives the command name, its positional arguments and its
//! `key: "value"` options, checks arity and option vocabulary, and returns one
//! concrete directive. Validators know nothing about source positions; the
//! grammar layer anchors their errors to the command token.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectiveError {
    #[error("unexpected directive \"{0}\"")]
    UnknownDirective(String),
    #[error("{command}: expected {expected}, got {args:?}")]
    ArgumentCount {
        command: String,
        expected: &'static str,
        args: Vec<String>,
    },
    #[error("{command}: unknown option \"{key}\"")]
    UnknownOption { command: String, key: String },
    #[error("{command}: unexpected options {keys:?}")]
    UnexpectedOptions { command: String, keys: Vec<String> },
    #[error("{command}: invalid priority \"{value}\": {source}")]
    InvalidPriority {
        command: String,
        value: String,
        source: ParseIntError,
    },
}

/// `key: "value"` options in order of first appearance.
///
/// Inserting a key that is already present replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    entries: Vec<(String, String)>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One parsed Aptfile line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Directive {
    Package(PackageDirective),
    Pin(PinDirective),
    Ppa(PpaDirective),
    Repo(RepoDirective),
    Deb(DebFileDirective),
    Hold(HoldDirective),
}

impl Directive {
    /// The command keyword this directive is written with.
    pub fn command(&self) -> &'static str {
        match self {
            Self::Package(_) => "package",
            Self::Pin(_) => "pin",
            Self::Ppa(_) => "ppa",
            Self::Repo(r) if r.is_source => "repo-src",
            Self::Repo(_) => "repo",
            Self::Deb(_) => "deb",
            Self::Hold(_) => "hold",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageSelector {
    Version(String),
    Release(String),
}

/// `package curl`, `package "curl=5.3"`, `package curl, release: "jammy-backports"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDirective {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<PackageSelector>,
}

impl PackageDirective {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            selector: None,
        }
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.selector = Some(PackageSelector::Version(version.into()));
        self
    }

    #[must_use]
    pub fn with_release(mut self, release: impl Into<String>) -> Self {
        self.selector = Some(PackageSelector::Release(release.into()));
        self
    }

    pub fn version(&self) -> Option<&str> {
        match &self.selector {
            Some(PackageSelector::Version(v)) => Some(v),
            _ => None,
        }
    }

    pub fn release(&self) -> Option<&str> {
        match &self.selector {
            Some(PackageSelector::Release(r)) => Some(r),
            _ => None,
        }
    }
}

/// Formats as the argument apt-get understands: `name`, `name=version` or
/// `name/release`.
impl fmt::Display for PackageDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.selector {
            None => f.write_str(&self.name),
            Some(PackageSelector::Version(v)) => write!(f, "{}={v}", self.name),
            Some(PackageSelector::Release(r)) => write!(f, "{}/{r}", self.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinTarget {
    /// A version or version pattern.
    Version(String),
    /// An origin host or pattern; the empty string means the local origin.
    Origin(String),
    /// Release specifiers such as `a=Debian l=Nvidia`.
    Release(String),
}

/// `pin "curl" 333, version: "5.3"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinDirective {
    pub package_name: String,
    pub priority: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<PinTarget>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PpaDirective {
    pub name: String,
}

/// `repo "https://example.com/ubuntu" jammy main, arch: "amd64", signed-by: "https://example.com/key.gpg"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoDirective {
    pub is_source: bool,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suite: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebFileDirective {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldDirective {
    pub package_name: String,
}

type Validator = fn(&str, &[String], &Options) -> Result<Directive, DirectiveError>;

const VALIDATORS: &[(&str, Validator)] = &[
    ("package", |c, a, o| parse_package(c, a, o).map(Directive::Package)),
    ("pin", |c, a, o| parse_pin(c, a, o).map(Directive::Pin)),
    ("ppa", |c, a, o| parse_ppa(c, a, o).map(Directive::Ppa)),
    ("repo", |c, a, o| parse_repo(c, a, o).map(Directive::Repo)),
    ("repo-src", |c, a, o| parse_repo(c, a, o).map(Directive::Repo)),
    ("deb", |c, a, o| parse_deb_file(c, a, o).map(Directive::Deb)),
    ("hold", |c, a, o| parse_hold(c, a, o).map(Directive::Hold)),
];

/// Select the validator for `command` and run it.
pub fn build_directive(
    command: &str,
    args: &[String],
    options: &Options,
) -> Result<Directive, DirectiveError> {
    let (_, validate) = VALIDATORS
        .iter()
        .find(|(name, _)| *name == command)
        .ok_or_else(|| DirectiveError::UnknownDirective(command.to_owned()))?;
    validate(command, args, options)
}

/// All command keywords the parser accepts.
pub fn known_commands() -> impl Iterator<Item = &'static str> {
    VALIDATORS.iter().map(|(name, _)| *name)
}

fn arity_error(command: &str, expected: &'static str, args: &[String]) -> DirectiveError {
    DirectiveError::ArgumentCount {
        command: command.to_owned(),
        expected,
        args: args.to_vec(),
    }
}

fn expect_single_arg<'a>(command: &str, args: &'a [String]) -> Result<&'a str, DirectiveError> {
    match args {
        [only] => Ok(only),
        _ => Err(arity_error(command, "exactly one argument", args)),
    }
}

fn reject_options(command: &str, options: &Options) -> Result<(), DirectiveError> {
    if options.is_empty() {
        return Ok(());
    }
    Err(DirectiveError::UnexpectedOptions {
        command: command.to_owned(),
        keys: options.keys().map(str::to_owned).collect(),
    })
}

fn check_option_keys(
    command: &str,
    options: &Options,
    allowed: &[&str],
) -> Result<(), DirectiveError> {
    match options.keys().find(|k| !allowed.contains(k)) {
        Some(key) => Err(DirectiveError::UnknownOption {
            command: command.to_owned(),
            key: key.to_owned(),
        }),
        None => Ok(()),
    }
}

/// `package <name>[=<version>|/<release>] [, version: "..."] [, release: "..."]`
pub fn parse_package(
    command: &str,
    args: &[String],
    options: &Options,
) -> Result<PackageDirective, DirectiveError> {
    let name = expect_single_arg(command, args)?;
    check_option_keys(command, options, &["version", "release"])?;

    if let Some((key, value)) = options.iter().next() {
        let directive = PackageDirective::new(name);
        return Ok(if key == "version" {
            directive.with_version(value)
        } else {
            directive.with_release(value)
        });
    }

    if let Some((name, version)) = name.split_once('=') {
        return Ok(PackageDirective::new(name).with_version(version));
    }
    if let Some((name, release)) = name.split_once('/') {
        return Ok(PackageDirective::new(name).with_release(release));
    }
    Ok(PackageDirective::new(name))
}

/// `pin <package> <priority> [, version|origin|release: "..."]`
pub fn parse_pin(
    command: &str,
    args: &[String],
    options: &Options,
) -> Result<PinDirective, DirectiveError> {
    let [package_name, priority] = args else {
        return Err(arity_error(command, "two positional arguments", args));
    };
    let priority = priority
        .parse::<i32>()
        .map_err(|source| DirectiveError::InvalidPriority {
            command: command.to_owned(),
            value: priority.clone(),
            source,
        })?;
    check_option_keys(command, options, &["version", "origin", "release"])?;

    let target = options.iter().next().map(|(key, value)| match key {
        "version" => PinTarget::Version(value.to_owned()),
        "origin" => PinTarget::Origin(value.to_owned()),
        _ => PinTarget::Release(value.to_owned()),
    });
    Ok(PinDirective {
        package_name: package_name.clone(),
        priority,
        target,
    })
}

/// `ppa <owner/name>`
pub fn parse_ppa(
    command: &str,
    args: &[String],
    options: &Options,
) -> Result<PpaDirective, DirectiveError> {
    let name = expect_single_arg(command, args)?;
    reject_options(command, options)?;
    Ok(PpaDirective {
        name: name.to_owned(),
    })
}

/// `repo|repo-src <url> [<suite> [<component>]] [, arch: "..."] [, signed-by: "..."]`
pub fn parse_repo(
    command: &str,
    args: &[String],
    options: &Options,
) -> Result<RepoDirective, DirectiveError> {
    let Some((url, rest)) = args.split_first() else {
        return Err(arity_error(command, "at least one argument", args));
    };
    if rest.len() > 2 {
        tracing::warn!("{command}: ignoring extra arguments {:?}", &rest[2..]);
    }
    check_option_keys(command, options, &["arch", "signed-by"])?;

    Ok(RepoDirective {
        is_source: command == "repo-src",
        url: url.clone(),
        suite: rest.first().cloned(),
        component: rest.get(1).cloned(),
        arch: options.get("arch").map(str::to_owned),
        signed_by: options.get("signed-by").map(str::to_owned),
    })
}

/// `deb <path-or-url>`
pub fn parse_deb_file(
    command: &str,
    args: &[String],
    options: &Options,
) -> Result<DebFileDirective, DirectiveError> {
    let path = expect_single_arg(command, args)?;
    reject_options(command, options)?;
    Ok(DebFileDirective {
        path: path.to_owned(),
    })
}

/// `hold <package>`
pub fn parse_hold(
    command: &str,
    args: &[String],
    options: &Options,
) -> Result<HoldDirective, DirectiveError> {
    let package_name = expect_single_arg(command, args)?;
    reject_options(command, options)?;
    Ok(HoldDirective {
        package_name: package_name.to_owned(),
    })
}
