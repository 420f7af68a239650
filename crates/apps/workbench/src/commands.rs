//! Domain command registrations for the playground console.

use std::rc::Rc;

use analysis_pipeline::AnalysisPipeline;
use console_shell::HostCommand;
use playground_contract::{CommandDescriptor, ConsoleError, ValidationOutcome};

/// Builds the host command set installed into the console registry.
pub fn registrations(pipeline: AnalysisPipeline) -> Vec<HostCommand> {
    vec![
        lex_registration(pipeline.clone()),
        validate_registration(pipeline),
    ]
}

fn lex_registration(pipeline: AnalysisPipeline) -> HostCommand {
    HostCommand {
        descriptor: CommandDescriptor::new(
            "lex",
            "Lex the current editor source and report the token count.",
            "lex",
        ),
        handler: Rc::new(move |_| {
            let pipeline = pipeline.clone();
            Box::pin(async move {
                let count = pipeline
                    .lex_now()
                    .await
                    .map_err(ConsoleError::internal)?;
                Ok(Some(format!("lexed {count} token(s)")))
            })
        }),
    }
}

fn validate_registration(pipeline: AnalysisPipeline) -> HostCommand {
    HostCommand {
        descriptor: CommandDescriptor::new(
            "validate",
            "Validate the current editor source against the language grammar.",
            "validate",
        ),
        handler: Rc::new(move |_| {
            let pipeline = pipeline.clone();
            Box::pin(async move {
                let outcome = pipeline.validate_now().await;
                if outcome.ok {
                    Ok(Some(outcome.message))
                } else {
                    Err(ConsoleError::internal(format_failure(&outcome)))
                }
            })
        }),
    }
}

/// Formats a negative outcome the way the service's own CLI reports it.
pub(crate) fn format_failure(outcome: &ValidationOutcome) -> String {
    let mut parts = vec![format!("validation error: {}", outcome.message)];
    if let Some(code) = &outcome.code {
        parts.push(format!("code: {code}"));
    }
    if let Some(token) = &outcome.token {
        parts.push(format!(
            "at line {}, column {}: found `{}` ({})",
            token.line.unwrap_or(0),
            token.column.unwrap_or(0),
            token.lexeme.as_deref().unwrap_or("?"),
            token.kind.as_deref().unwrap_or("?"),
        ));
    }
    if !outcome.expected.is_empty() {
        parts.push(format!("expected one of: {}", outcome.expected.join(", ")));
    }
    parts.join("\n")
}
