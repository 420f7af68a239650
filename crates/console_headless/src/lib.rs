//! Headless console line parser for browser-hosted sessions.
//!
//! This crate intentionally implements only the subset needed by the playground console:
//! line tokenization with quoted spans, argument-vector construction, and basic session state.
//! There is no escape syntax; quoting is the only metacharacter mechanism, so tokenization is
//! infallible. An unterminated quote silently closes at end of input.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use serde::{Deserialize, Serialize};

/// Mutable console parser state tracked by the headless evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ConsoleLineState {
    /// Most recent argv parsed by the evaluator.
    pub last_argv: Vec<String>,
}

/// Parsed console line result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineEval {
    /// Parsed argv tokens.
    pub argv: Vec<String>,
    /// Whether the line held no arguments at all.
    pub is_empty: bool,
}

/// Parses `line` and updates `state`.
pub fn eval_line(state: &mut ConsoleLineState, line: &str) -> LineEval {
    let argv = split_line(line);
    state.last_argv = argv.clone();
    LineEval {
        is_empty: argv.is_empty(),
        argv,
    }
}

/// Splits a raw line into arguments, honoring single- and double-quoted spans.
///
/// Whitespace outside quotes separates arguments and is never emitted. Within a quoted span
/// every character, including whitespace and the opposite quote, is literal; the delimiting
/// quotes themselves are never emitted. Adjacent quoted and unquoted segments with no
/// separating whitespace concatenate into one argument, so `a"b c"d` parses as `abcd`. An
/// explicitly quoted empty span still contributes an (empty) argument.
pub fn split_line(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    // Set once a quote opens within the current argument, so `""` emits an empty token.
    let mut quoted = false;
    let mut quote = None::<char>;

    for ch in line.chars() {
        match quote {
            Some(active) if ch == active => quote = None,
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => {
                quote = Some(ch);
                quoted = true;
            }
            None if ch.is_whitespace() => {
                if !current.is_empty() || quoted {
                    tokens.push(std::mem::take(&mut current));
                }
                quoted = false;
            }
            None => current.push(ch),
        }
    }

    if !current.is_empty() || quoted {
        tokens.push(current);
    }

    tokens
}

/// Splits argv into a command name and its arguments.
pub fn split_command(argv: &[String]) -> Option<(&str, &[String])> {
    let (name, args) = argv.split_first()?;
    Some((name.as_str(), args))
}
