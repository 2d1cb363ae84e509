//! Aptfile parsing for adapt.
//!
//! An Aptfile lists packages, repositories, PPAs, pins, holds and `.deb` files
//! one directive per line:
//!
//! ```text
//! repo "https://example.com/ubuntu" jammy main, signed-by: "https://example.com/key.gpg"
//! package "curl=8.5.0"
//! pin curl 1001, version: "8.5.0"
//! ```
//!
//! This crate turns each line into tokens (`lexer`), groups them into command,
//! arguments and options (`grammar`), validates them into a typed [`Directive`]
//! (`directive`) and drives that over a whole file (`manifest`). Every lexical
//! or grammar error carries a [`Coordinate`] and renders as a caret annotation
//! of the offending line.

pub mod coord;
pub mod directive;
pub mod grammar;
pub mod lexer;
pub mod manifest;

pub use coord::Coordinate;
pub use directive::{
    build_directive, known_commands, DebFileDirective, Directive, DirectiveError, HoldDirective,
    Options, PackageDirective, PackageSelector, PinDirective, PinTarget, PpaDirective,
    RepoDirective,
};
pub use grammar::{parse_line, parse_tokens, DirectiveLine, ParseError};
pub use lexer::{tokenize, SyntaxError, Token, TokenKind};
pub use manifest::{parse_file, parse_reader, parse_str, ManifestError};
