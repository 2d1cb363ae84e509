use crate::coord::Coordinate;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    String,
    Comma,
    Colon,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub coord: Coordinate,
}

impl Token {
    pub fn text(&self) -> &str {
        self.coord.text()
    }
}

/// A lexical or grammar error anchored to a span of the offending line.
///
/// Displays as the two-line caret annotation produced by
/// [`Coordinate::annotate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .coord.annotate(.message))]
pub struct SyntaxError {
    pub message: String,
    pub coord: Coordinate,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, coord: Coordinate) -> Self {
        Self {
            message: message.into(),
            coord,
        }
    }
}

struct Scanner<'a> {
    line: &'a Coordinate,
    tokens: Vec<Token>,
    pending: Option<usize>,
}

impl Scanner<'_> {
    fn emit(&mut self, kind: TokenKind, start: usize, end: usize) {
        self.tokens.push(Token {
            kind,
            coord: self.line.span(start, end),
        });
    }

    /// Emit the pending unquoted run, if any, ending at `end`.
    fn flush(&mut self, end: usize) {
        if let Some(start) = self.pending.take() {
            if end > start {
                self.emit(TokenKind::String, start, end);
            }
        }
    }

    fn started(&self) -> bool {
        !self.tokens.is_empty() || self.pending.is_some()
    }
}

/// Split one Aptfile line into tokens.
///
/// Whitespace separates tokens, `,` and `:` are tokens of their own, `#` starts
/// a comment and double quotes group anything (including an empty string) into
/// a single string token. The command at the start of the line may not be
/// quoted.
pub fn tokenize(line: &Coordinate) -> Result<Vec<Token>, SyntaxError> {
    let text = line.line();
    let mut scanner = Scanner {
        line,
        tokens: Vec::new(),
        pending: None,
    };
    // Content start of the open quote, if any.
    let mut quoted: Option<usize> = None;
    let mut eol = text.len();

    for (i, ch) in text.char_indices() {
        if let Some(start) = quoted {
            if ch == '"' {
                scanner.emit(TokenKind::String, start, i);
                quoted = None;
            }
            continue;
        }
        match ch {
            '"' => {
                if !scanner.started() {
                    return Err(SyntaxError::new(
                        "cannot quote directive command",
                        line.span(i, i + 1),
                    ));
                }
                scanner.flush(i);
                quoted = Some(i + 1);
            }
            '#' => {
                eol = i;
                break;
            }
            ',' | ':' => {
                scanner.flush(i);
                let kind = if ch == ',' {
                    TokenKind::Comma
                } else {
                    TokenKind::Colon
                };
                scanner.emit(kind, i, i + 1);
            }
            c if c.is_whitespace() => scanner.flush(i),
            _ => {
                scanner.pending.get_or_insert(i);
            }
        }
    }

    if let Some(start) = quoted {
        return Err(SyntaxError::new("unclosed quotes", line.span(start, eol)));
    }
    scanner.flush(eol);
    tracing::trace!(
        "line {}: {} token(s)",
        line.line_number(),
        scanner.tokens.len()
    );
    Ok(scanner.tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(text: &str) -> Result<Vec<Token>, SyntaxError> {
        tokenize(&Coordinate::whole_line(1, text))
    }

    fn kinds_and_text(text: &str) -> Vec<(TokenKind, String)> {
        lex(text)
            .unwrap()
            .into_iter()
            .map(|t| (t.kind, t.text().to_owned()))
            .collect()
    }

    #[test]
    fn splits_on_whitespace() {
        let toks = kinds_and_text("package   curl\tgit");
        assert_eq!(
            toks,
            vec![
                (TokenKind::String, "package".to_owned()),
                (TokenKind::String, "curl".to_owned()),
                (TokenKind::String, "git".to_owned()),
            ]
        );
    }

    #[test]
    fn delimiters_are_their_own_tokens() {
        let toks = kinds_and_text("package curl,version:5.3");
        let kinds: Vec<TokenKind> = toks.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::String,
                TokenKind::String,
                TokenKind::Comma,
                TokenKind::String,
                TokenKind::Colon,
                TokenKind::String,
            ]
        );
        assert_eq!(toks[3].1, "version");
        assert_eq!(toks[5].1, "5.3");
    }

    #[test]
    fn quoted_text_keeps_delimiters_literal() {
        let toks = kinds_and_text(r#"repo "https://x.org/a b#c, d""#);
        assert_eq!(toks.len(), 2);
        assert_eq!(toks[1], (TokenKind::String, "https://x.org/a b#c, d".to_owned()));
    }

    #[test]
    fn quoted_delimiter_is_a_string_token() {
        let toks = kinds_and_text(r#"ppa ",""#);
        assert_eq!(toks[1], (TokenKind::String, ",".to_owned()));
        let toks = kinds_and_text(r#"ppa ":""#);
        assert_eq!(toks[1], (TokenKind::String, ":".to_owned()));
    }

    #[test]
    fn empty_quotes_produce_empty_token() {
        let toks = lex(r#"ppa """#).unwrap();
        assert_eq!(toks.len(), 2);
        assert_eq!(toks[1].kind, TokenKind::String);
        assert_eq!(toks[1].text(), "");
        assert_eq!(toks[1].coord.start(), 5);
        assert_eq!(toks[1].coord.end(), 5);
    }

    #[test]
    fn quote_flushes_adjacent_unquoted_run() {
        let toks = kinds_and_text(r#"hold abc"def"ghi"#);
        let texts: Vec<&str> = toks.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(texts, vec!["hold", "abc", "def", "ghi"]);
    }

    #[test]
    fn comment_truncates_line() {
        let toks = kinds_and_text("hold curl # keep it, please: \"really");
        let texts: Vec<&str> = toks.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(texts, vec!["hold", "curl"]);
    }

    #[test]
    fn comment_directly_after_token() {
        let toks = kinds_and_text("hold curl#comment");
        let texts: Vec<&str> = toks.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(texts, vec!["hold", "curl"]);
    }

    #[test]
    fn blank_and_comment_lines_have_no_tokens() {
        assert!(lex("").unwrap().is_empty());
        assert!(lex("   \t ").unwrap().is_empty());
        assert!(lex("# just a comment").unwrap().is_empty());
        assert!(lex("    # indented comment \"unbalanced").unwrap().is_empty());
    }

    #[test]
    fn token_columns_match_source() {
        let toks = lex("pin  curl 333").unwrap();
        let spans: Vec<(usize, usize)> = toks
            .iter()
            .map(|t| (t.coord.start(), t.coord.end()))
            .collect();
        assert_eq!(spans, vec![(0, 3), (5, 9), (10, 13)]);
    }

    #[test]
    fn rejects_quoted_command() {
        let err = lex(r#""package" curl"#).unwrap_err();
        assert_eq!(err.message, "cannot quote directive command");
        assert_eq!((err.coord.start(), err.coord.end()), (0, 1));
    }

    #[test]
    fn rejects_quoted_command_after_indentation() {
        let err = lex(r#"  "package" curl"#).unwrap_err();
        assert_eq!(err.message, "cannot quote directive command");
        assert_eq!((err.coord.start(), err.coord.end()), (2, 3));
    }

    #[test]
    fn unclosed_quote_spans_to_end_of_line() {
        let line = r#"ppa "deadsnakes/ppa # not a comment"#;
        let err = lex(line).unwrap_err();
        assert_eq!(err.message, "unclosed quotes");
        assert_eq!(err.coord.start(), 5);
        assert_eq!(err.coord.end(), line.len());
    }

    #[test]
    fn unclosed_quote_annotation() {
        let err = lex(r#"hold "curl"#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "1 | hold \"curl\n          ^^^^ unclosed quotes"
        );
    }

    #[test]
    fn non_ascii_content_is_preserved() {
        let toks = kinds_and_text("hold \"pâté\" naïve");
        assert_eq!(toks[1].1, "pâté");
        assert_eq!(toks[2].1, "naïve");
    }
}
