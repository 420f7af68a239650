//! Shared playground contracts used by the analysis pipeline, console engine, and UI.
//!
//! This crate is intentionally runtime-agnostic. It defines the serializable token and
//! validation shapes exchanged with the remote analysis service, the pipeline status machine,
//! and the console command/error contracts, without depending on Leptos or browser APIs.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use serde::{Deserialize, Serialize};

/// One lexical unit returned by the remote `/lex` call.
///
/// Field names mirror the service wire format (`tokenType` in JSON).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRow {
    /// Raw source lexeme.
    pub lexeme: String,
    /// Display name of the token.
    pub token: String,
    /// Normalized token kind.
    #[serde(rename = "tokenType")]
    pub token_type: String,
}

/// Source position of the token a validation failure points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TokenPosition {
    /// Raw lexeme at the failure point, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lexeme: Option<String>,
    /// Token kind at the failure point, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// One-based line number, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// One-based column number, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

/// Structured pass/fail result of the most recent validate call.
///
/// At most one outcome is live at a time; a newer result replaces the previous one wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    /// Whether validation passed.
    pub ok: bool,
    /// Human-readable result message.
    pub message: String,
    /// Stable service error code such as `ERR_SYNTAX`, when provided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Position of the failing token, when provided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<TokenPosition>,
    /// Token kinds the service expected at the failure point, in service order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expected: Vec<String>,
}

impl ValidationOutcome {
    /// Builds a positive outcome with the given message.
    pub fn passed(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
            code: None,
            token: None,
            expected: Vec::new(),
        }
    }

    /// Builds a negative outcome with the given message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            code: None,
            token: None,
            expected: Vec::new(),
        }
    }

    /// Fixed negative outcome synthesized for blank source text without a network call.
    pub fn empty_source() -> Self {
        Self::failed("source is empty")
    }
}

/// Four-state summary of the most recent lex attempt.
///
/// `Idle` iff the current source is blank; `Errored` iff the last lex call failed; `Ready` iff
/// the last lex call succeeded. Validation failure is carried by [`ValidationOutcome`], never by
/// this status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PipelineStatus {
    /// No source text to analyze.
    #[default]
    Idle,
    /// A lex call is in flight.
    Lexing,
    /// The most recent lex call succeeded.
    Ready,
    /// The most recent lex call failed.
    Errored,
}

impl PipelineStatus {
    /// Returns a stable string token for diagnostics and status chips.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Lexing => "lexing",
            Self::Ready => "ready",
            Self::Errored => "errored",
        }
    }
}

/// Request body for both `/lex` and `/validate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// Raw source text to analyze.
    pub source: String,
}

/// Success body of the `/lex` call.
///
/// A missing or malformed `rows` field decodes as an empty row list. An `error` present on a
/// 2xx response is a non-fatal lex warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LexResponse {
    /// Token rows for the submitted source.
    #[serde(default)]
    pub rows: Vec<TokenRow>,
    /// First lex warning/error reported by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// All lex warnings/errors reported by the service.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// Body of the `/validate` call, success or failure.
///
/// Any shape where `ok` is not `true` is a failure envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ValidateResponse {
    /// Whether validation passed; absent counts as failure.
    #[serde(default)]
    pub ok: bool,
    /// Human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Alternate message field used by failure envelopes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Stable service error code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Failing token position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<TokenPosition>,
    /// Expected token kinds at the failure point.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expected: Vec<String>,
}

/// Help metadata for one registered console command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDescriptor {
    /// Flat command name typed at the prompt.
    pub name: String,
    /// Summary sentence shown by `help`.
    pub summary: String,
    /// Usage string shown by `help`.
    pub usage: String,
}

impl CommandDescriptor {
    /// Creates a descriptor from trusted caller input.
    pub fn new(
        name: impl Into<String>,
        summary: impl Into<String>,
        usage: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            summary: summary.into(),
            usage: usage.into(),
        }
    }
}

/// Structured console error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConsoleErrorCode {
    /// User input violated command usage.
    Usage,
    /// The command was not found.
    NotFound,
    /// The command's backing service is unavailable in this host context.
    Unavailable,
    /// Internal command failure.
    Internal,
}

/// Error emitted by console parsing, lookup, or handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleError {
    /// Error category.
    pub code: ConsoleErrorCode,
    /// Human-readable message.
    pub message: String,
}

impl ConsoleError {
    /// Creates a new console error.
    pub fn new(code: ConsoleErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Internal-failure convenience constructor.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ConsoleErrorCode::Internal, message)
    }
}

impl std::fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ConsoleError {}

/// Classification of one console log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConsoleLineKind {
    /// Echo of a submitted command line.
    Prompt,
    /// Normal command output.
    Output,
    /// Surfaced command failure.
    Error,
    /// Session-level notice.
    System,
}

/// One line of the console output log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleLine {
    /// Line classification.
    pub kind: ConsoleLineKind,
    /// Line text.
    pub text: String,
}

impl ConsoleLine {
    /// Creates a prompt echo line.
    pub fn prompt(text: impl Into<String>) -> Self {
        Self {
            kind: ConsoleLineKind::Prompt,
            text: text.into(),
        }
    }

    /// Creates a normal output line.
    pub fn output(text: impl Into<String>) -> Self {
        Self {
            kind: ConsoleLineKind::Output,
            text: text.into(),
        }
    }

    /// Creates an error line with the conventional `error: ` prefix.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ConsoleLineKind::Error,
            text: format!("error: {}", message.into()),
        }
    }

    /// Creates a session notice line.
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            kind: ConsoleLineKind::System,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_row_uses_wire_field_names() {
        let row = TokenRow {
            lexeme: "love".to_string(),
            token: "love".to_string(),
            token_type: "KEYWORD".to_string(),
        };
        let json = serde_json::to_value(&row).expect("serialize");
        assert_eq!(json["tokenType"], "KEYWORD");
    }

    #[test]
    fn lex_response_tolerates_missing_rows() {
        let decoded: LexResponse = serde_json::from_str(r#"{"error":"boom"}"#).expect("decode");
        assert!(decoded.rows.is_empty());
        assert_eq!(decoded.error.as_deref(), Some("boom"));
    }

    #[test]
    fn validate_response_defaults_ok_to_false() {
        let decoded: ValidateResponse =
            serde_json::from_str(r#"{"message":"nope"}"#).expect("decode");
        assert!(!decoded.ok);
    }

    #[test]
    fn validate_failure_envelope_decodes_position() {
        let decoded: ValidateResponse = serde_json::from_str(
            r#"{"ok":false,"code":"ERR_SYNTAX","message":"Unexpected token","token":{"lexeme":";","kind":"SEMICOLON","line":2,"column":14},"expected":["IDENTIFIER"]}"#,
        )
        .expect("decode");
        let token = decoded.token.expect("token position");
        assert_eq!(token.line, Some(2));
        assert_eq!(decoded.expected, vec!["IDENTIFIER".to_string()]);
    }
}
