//! Buffer change notifications consumed by the line window reconciler.
//!
//! Every event is expressed in 1-based, inclusive line numbers taken from the
//! coordinate system *before* the edit was applied. Producers (the text
//! buffer model) are trusted to emit well-formed ranges; the textual notation
//! below is the only place where malformed input is rejected.
//!
//! Textual notation (one event per line, used by replay scripts and logs):
//!
//! ```text
//! delete 3 6        LinesDeleted  { from: 3, to: 6 }
//! insert 7 9        LinesInserted { from: 7, to: 9 }
//! change 8 1        LinesChanged  { from: 8, count: 1 }
//! tokens 5-10 12    TokensChanged { ranges: [5-10, 12-12] }
//! flush             Flushed
//! ```

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Largest line number or count the textual notation accepts. Keeps window
/// arithmetic (`start + count`, `from + count - 1`) far from `usize` overflow.
pub const MAX_LINE_NUMBER: usize = u32::MAX as usize;

/// Inclusive line range whose token/highlight metadata changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenRange {
    pub from: usize,
    pub to: usize,
}

impl TokenRange {
    pub const fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }
}

/// A single buffer mutation notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    /// Lines `from..=to` were removed from the buffer.
    LinesDeleted { from: usize, to: usize },
    /// Lines `from..=to` were inserted; `from` names the first new line.
    LinesInserted { from: usize, to: usize },
    /// Content of `count` lines starting at `from` changed in place.
    LinesChanged { from: usize, count: usize },
    /// Token metadata changed for each range.
    TokensChanged { ranges: Vec<TokenRange> },
    /// Whole buffer replaced; every cached line is stale.
    Flushed,
}

impl ChangeEvent {
    /// Stable short name used as a structured logging field.
    pub fn kind(&self) -> &'static str {
        match self {
            ChangeEvent::LinesDeleted { .. } => "lines_deleted",
            ChangeEvent::LinesInserted { .. } => "lines_inserted",
            ChangeEvent::LinesChanged { .. } => "lines_changed",
            ChangeEvent::TokensChanged { .. } => "tokens_changed",
            ChangeEvent::Flushed => "flushed",
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Textual notation
// -------------------------------------------------------------------------------------------------

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseEventError {
    #[error("empty event")]
    Empty,
    #[error("unknown event `{0}`")]
    UnknownVerb(String),
    #[error("`{verb}` expects {expected}, got {got} argument(s)")]
    Arity {
        verb: &'static str,
        expected: &'static str,
        got: usize,
    },
    #[error("invalid line number `{0}`")]
    InvalidNumber(String),
    #[error("line numbers are 1-based; got 0")]
    ZeroLine,
    #[error("`{0}` exceeds the largest supported line number {max}", max = MAX_LINE_NUMBER)]
    OutOfRange(usize),
    #[error("reversed range {from}-{to}")]
    ReversedRange { from: usize, to: usize },
}

/// Parse failure annotated with the 1-based script line it came from.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("script line {line}: {source}")]
pub struct ScriptError {
    pub line: usize,
    #[source]
    pub source: ParseEventError,
}

fn parse_line_number(raw: &str) -> Result<usize, ParseEventError> {
    let n = parse_count(raw)?;
    if n == 0 {
        return Err(ParseEventError::ZeroLine);
    }
    Ok(n)
}

fn parse_count(raw: &str) -> Result<usize, ParseEventError> {
    let n: usize = raw
        .parse()
        .map_err(|_| ParseEventError::InvalidNumber(raw.to_string()))?;
    if n > MAX_LINE_NUMBER {
        return Err(ParseEventError::OutOfRange(n));
    }
    Ok(n)
}

fn ordered(from: usize, to: usize) -> Result<(usize, usize), ParseEventError> {
    if from > to {
        return Err(ParseEventError::ReversedRange { from, to });
    }
    Ok((from, to))
}

fn two_args<'a>(
    verb: &'static str,
    args: &[&'a str],
) -> Result<(&'a str, &'a str), ParseEventError> {
    match args {
        [a, b] => Ok((*a, *b)),
        _ => Err(ParseEventError::Arity {
            verb,
            expected: "2",
            got: args.len(),
        }),
    }
}

impl FromStr for TokenRange {
    type Err = ParseEventError;

    /// Accepts `a-b` or a bare `a` (shorthand for `a-a`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (from, to) = match s.split_once('-') {
            Some((a, b)) => (parse_line_number(a)?, parse_line_number(b)?),
            None => {
                let n = parse_line_number(s)?;
                (n, n)
            }
        };
        let (from, to) = ordered(from, to)?;
        Ok(TokenRange { from, to })
    }
}

impl fmt::Display for TokenRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

impl FromStr for ChangeEvent {
    type Err = ParseEventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let verb = parts.next().ok_or(ParseEventError::Empty)?;
        let args: Vec<&str> = parts.collect();
        let pair = |verb| two_args(verb, &args);
        match verb {
            "delete" => {
                let (a, b) = pair("delete")?;
                let (from, to) = ordered(parse_line_number(a)?, parse_line_number(b)?)?;
                Ok(ChangeEvent::LinesDeleted { from, to })
            }
            "insert" => {
                let (a, b) = pair("insert")?;
                let (from, to) = ordered(parse_line_number(a)?, parse_line_number(b)?)?;
                Ok(ChangeEvent::LinesInserted { from, to })
            }
            "change" => {
                let (a, b) = pair("change")?;
                Ok(ChangeEvent::LinesChanged {
                    from: parse_line_number(a)?,
                    count: parse_count(b)?,
                })
            }
            "tokens" => {
                if args.is_empty() {
                    return Err(ParseEventError::Arity {
                        verb: "tokens",
                        expected: "at least 1",
                        got: 0,
                    });
                }
                let ranges = args
                    .iter()
                    .map(|r| r.parse())
                    .collect::<Result<Vec<TokenRange>, _>>()?;
                Ok(ChangeEvent::TokensChanged { ranges })
            }
            "flush" => {
                if !args.is_empty() {
                    return Err(ParseEventError::Arity {
                        verb: "flush",
                        expected: "0",
                        got: args.len(),
                    });
                }
                Ok(ChangeEvent::Flushed)
            }
            other => Err(ParseEventError::UnknownVerb(other.to_string())),
        }
    }
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeEvent::LinesDeleted { from, to } => write!(f, "delete {from} {to}"),
            ChangeEvent::LinesInserted { from, to } => write!(f, "insert {from} {to}"),
            ChangeEvent::LinesChanged { from, count } => write!(f, "change {from} {count}"),
            ChangeEvent::TokensChanged { ranges } => {
                f.write_str("tokens")?;
                for r in ranges {
                    write!(f, " {r}")?;
                }
                Ok(())
            }
            ChangeEvent::Flushed => f.write_str("flush"),
        }
    }
}

/// Parse a replay script: one event per line, blank lines and `#` comments
/// (whole-line or trailing) ignored.
pub fn parse_script(src: &str) -> Result<Vec<ChangeEvent>, ScriptError> {
    let mut events = Vec::new();
    for (idx, raw) in src.lines().enumerate() {
        let content = raw.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }
        let event = content.parse().map_err(|source| ScriptError {
            line: idx + 1,
            source,
        })?;
        events.push(event);
    }
    Ok(events)
}
