use crate::coord::Coordinate;
use crate::directive::{build_directive, Directive, DirectiveError, Options};
use crate::lexer::{tokenize, SyntaxError, Token, TokenKind};
use thiserror::Error;

/// Why a single Aptfile line could not be turned into a directive.
///
/// Both variants display as a caret annotation of the offending line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    /// The line is well-formed but its command rejected the arguments. The
    /// coordinate points at the command token.
    #[error("{}", .coord.annotate(.source))]
    Directive {
        source: DirectiveError,
        coord: Coordinate,
    },
}

impl ParseError {
    pub fn coord(&self) -> &Coordinate {
        match self {
            Self::Syntax(e) => &e.coord,
            Self::Directive { coord, .. } => coord,
        }
    }

    /// The error message without the source annotation.
    pub fn message(&self) -> String {
        match self {
            Self::Syntax(e) => e.message.clone(),
            Self::Directive { source, .. } => source.to_string(),
        }
    }
}

/// A tokenized line split into command, positional arguments and options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveLine {
    pub command: String,
    pub command_coord: Coordinate,
    pub args: Vec<String>,
    pub options: Options,
}

/// Group tokens as `<command> [<arg> ...] [, <key>: <value>]*`.
///
/// Returns `Ok(None)` for an empty token stream.
pub fn parse_tokens(
    line: &Coordinate,
    tokens: &[Token],
) -> Result<Option<DirectiveLine>, SyntaxError> {
    let Some((first, rest)) = tokens.split_first() else {
        return Ok(None);
    };
    if first.kind != TokenKind::String {
        return Err(SyntaxError::new(
            "expected string value",
            first.coord.clone(),
        ));
    }

    let mut args = Vec::new();
    let mut options = Options::new();
    let mut remaining = rest;

    // Positional phase.
    while let Some((token, tail)) = remaining.split_first() {
        match token.kind {
            TokenKind::String => {
                args.push(token.text().to_owned());
                remaining = tail;
            }
            TokenKind::Colon => {
                return Err(SyntaxError::new("unexpected colon", token.coord.clone()));
            }
            TokenKind::Comma => break,
        }
    }

    // Options phase: each option is exactly `, key : value`.
    while !remaining.is_empty() {
        match remaining {
            [comma, key, colon, value, tail @ ..] => {
                let well_formed = comma.kind == TokenKind::Comma
                    && key.kind == TokenKind::String
                    && colon.kind == TokenKind::Colon
                    && value.kind == TokenKind::String;
                if !well_formed {
                    return Err(SyntaxError::new(
                        "expected key-value pair",
                        line.span(comma.coord.start(), value.coord.end()),
                    ));
                }
                options.insert(key.text(), value.text());
                remaining = tail;
            }
            _ => {
                let start = remaining.first().map_or(0, |t| t.coord.start());
                let end = remaining.last().map_or(start, |t| t.coord.end());
                return Err(SyntaxError::new(
                    "expected option, got end of line",
                    line.span(start, end),
                ));
            }
        }
    }

    Ok(Some(DirectiveLine {
        command: first.text().to_owned(),
        command_coord: first.coord.clone(),
        args,
        options,
    }))
}

/// Parse one Aptfile line.
///
/// Blank and comment-only lines yield `Ok(None)`; they are not errors.
pub fn parse_line(line_number: usize, text: &str) -> Result<Option<Directive>, ParseError> {
    let line = Coordinate::whole_line(line_number, text);
    let tokens = tokenize(&line)?;
    let Some(parsed) = parse_tokens(&line, &tokens)? else {
        return Ok(None);
    };
    build_directive(&parsed.command, &parsed.args, &parsed.options)
        .map(Some)
        .map_err(|source| ParseError::Directive {
            source,
            coord: parsed.command_coord,
        })
}
