//! Typed client for the two-stage lex/validate analysis service.

use std::rc::Rc;

use playground_contract::{AnalyzeRequest, LexResponse, TokenRow, ValidateResponse, ValidationOutcome};

use crate::{AnalysisEndpoints, AnalysisTransport, HttpReply};

/// Result of a successful lex call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LexSuccess {
    /// Token rows for the submitted source.
    pub rows: Vec<TokenRow>,
    /// Non-fatal lex warning carried by a 2xx response.
    pub warning: Option<String>,
}

/// Client for the remote analysis service.
#[derive(Clone)]
pub struct AnalysisClient {
    transport: Rc<dyn AnalysisTransport>,
    endpoints: AnalysisEndpoints,
}

impl AnalysisClient {
    /// Creates a client over the given transport and endpoints.
    pub fn new(transport: Rc<dyn AnalysisTransport>, endpoints: AnalysisEndpoints) -> Self {
        Self { transport, endpoints }
    }

    /// Posts `source` to the lex endpoint.
    ///
    /// Non-2xx statuses, transport failures, and malformed bodies are all failures; the error
    /// text follows the extraction chain of [`extract_message`]. A 2xx body with an `error`
    /// field is a success carrying a non-fatal warning.
    pub async fn lex(&self, source: &str) -> Result<LexSuccess, String> {
        let body = encode_request(source)?;
        let reply = self
            .transport
            .post_json(&self.endpoints.lex_url, body)
            .await?;
        if !reply.is_success() {
            return Err(extract_message(&reply));
        }
        let decoded: LexResponse =
            serde_json::from_str(&reply.body).map_err(|_| extract_message(&reply))?;
        let warning = decoded
            .error
            .clone()
            .or_else(|| decoded.errors.first().cloned());
        Ok(LexSuccess {
            rows: decoded.rows,
            warning,
        })
    }

    /// Posts `source` to the validate endpoint and folds every reply shape into an outcome.
    ///
    /// This call never fails: transport errors and failure envelopes become negative outcomes.
    /// Blank source short-circuits with the fixed `source is empty` outcome and no network
    /// call.
    pub async fn validate(&self, source: &str) -> ValidationOutcome {
        if source.trim().is_empty() {
            return ValidationOutcome::empty_source();
        }
        let body = match encode_request(source) {
            Ok(body) => body,
            Err(err) => return ValidationOutcome::failed(err),
        };
        let reply = match self
            .transport
            .post_json(&self.endpoints.validate_url, body)
            .await
        {
            Ok(reply) => reply,
            Err(err) => return ValidationOutcome::failed(err),
        };
        let Ok(decoded) = serde_json::from_str::<ValidateResponse>(&reply.body) else {
            return ValidationOutcome::failed(extract_message(&reply));
        };

        if reply.is_success() && decoded.ok {
            return ValidationOutcome {
                ok: true,
                message: decoded.message.unwrap_or_else(|| "Syntax OK".to_string()),
                code: decoded.code,
                token: None,
                expected: Vec::new(),
            };
        }

        ValidationOutcome {
            ok: false,
            message: decoded
                .message
                .or(decoded.error)
                .unwrap_or_else(|| format!("request failed (status {})", reply.status)),
            code: decoded.code,
            token: decoded.token,
            expected: decoded.expected,
        }
    }
}

fn encode_request(source: &str) -> Result<String, String> {
    serde_json::to_string(&AnalyzeRequest {
        source: source.to_string(),
    })
    .map_err(|e| e.to_string())
}

/// Extracts the most useful message from a failed reply.
///
/// Preference order: a structured `error`/`message` field, then the raw body text, then a
/// generic status-coded message.
fn extract_message(reply: &HttpReply) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(&reply.body) {
        for key in ["error", "message"] {
            if let Some(text) = value.get(key).and_then(|field| field.as_str()) {
                if !text.is_empty() {
                    return text.to_string();
                }
            }
        }
    }
    let raw = reply.body.trim();
    if !raw.is_empty() {
        return raw.to_string();
    }
    format!("request failed (status {})", reply.status)
}
