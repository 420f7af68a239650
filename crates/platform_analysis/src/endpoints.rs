//! Analysis service endpoint configuration.

use serde::{Deserialize, Serialize};

/// Resolved URLs for the two analysis calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisEndpoints {
    /// URL the lex call posts to.
    pub lex_url: String,
    /// URL the validate call posts to.
    pub validate_url: String,
}

impl Default for AnalysisEndpoints {
    fn default() -> Self {
        Self {
            lex_url: "/lex".to_string(),
            validate_url: "/validate".to_string(),
        }
    }
}

impl AnalysisEndpoints {
    /// Builds endpoints under `base`, for example `http://localhost:5000`.
    pub fn from_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            lex_url: format!("{base}/lex"),
            validate_url: format!("{base}/validate"),
        }
    }
}
