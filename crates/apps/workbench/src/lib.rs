//! Playground workbench UI: source editor pane, token inspector, validation banner, and the
//! interactive console, wired to the live analysis pipeline.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod commands;

use std::rc::Rc;

use analysis_pipeline::{AnalysisPipeline, PipelineOptions};
use console_shell::{ConsoleEngine, ConsoleSessionHandle};
use leptos::ev::KeyboardEvent;
use leptos::*;
use platform_analysis::{AnalysisClient, AnalysisEndpoints, BrowserTimerService, FetchTransport};
use playground_contract::{ConsoleLine, ConsoleLineKind, TokenRow, ValidationOutcome};

/// Sample program loaded into the editor on first mount.
const SAMPLE_SOURCE: &str = "love main() {\n  express << \"hello, lover\";\n}\n";

fn console_line_class(kind: ConsoleLineKind) -> &'static str {
    match kind {
        ConsoleLineKind::Prompt => "console-line console-prompt",
        ConsoleLineKind::Output => "console-line console-output",
        ConsoleLineKind::Error => "console-line console-error",
        ConsoleLineKind::System => "console-line console-system",
    }
}

// Keys carry the rendered content, not just the position: rows and the log are replaced
// wholesale, and a keyed item view is never rebuilt while its key is unchanged.
fn row_key(idx: usize, row: &TokenRow) -> (usize, String, String, String) {
    (
        idx,
        row.lexeme.clone(),
        row.token.clone(),
        row.token_type.clone(),
    )
}

fn line_key(idx: usize, line: &ConsoleLine) -> (usize, &'static str, String) {
    (idx, console_line_class(line.kind), line.text.clone())
}

fn outcome_detail(outcome: &ValidationOutcome) -> String {
    if outcome.ok {
        outcome.message.clone()
    } else {
        commands::format_failure(outcome)
    }
}

/// Builds the pipeline over the browser fetch transport.
fn browser_pipeline() -> AnalysisPipeline {
    AnalysisPipeline::new(
        AnalysisClient::new(Rc::new(FetchTransport), AnalysisEndpoints::default()),
        Rc::new(BrowserTimerService),
        PipelineOptions::default(),
    )
}

fn console_keydown(session: &ConsoleSessionHandle, ev: &KeyboardEvent) {
    if ev.ctrl_key() && ev.key() == "l" {
        ev.prevent_default();
        session.clear_log();
        return;
    }
    match ev.key().as_str() {
        "Enter" => {
            let line = session.input().get_untracked();
            session.submit(line);
        }
        "ArrowUp" => {
            ev.prevent_default();
            session.history_up();
        }
        "ArrowDown" => {
            ev.prevent_default();
            session.history_down();
        }
        "Escape" => session.interrupt(),
        _ => {}
    }
}

#[component]
/// Playground window contents.
///
/// Edits to the editor pane feed the debounced analysis pipeline; the console session carries
/// the built-in commands plus the `lex`/`validate` domain commands over the same pipeline.
pub fn WorkbenchApp() -> impl IntoView {
    let pipeline = browser_pipeline();
    let engine = ConsoleEngine::new();
    engine.install_host_commands(commands::registrations(pipeline.clone()));
    let session = engine.new_session();

    pipeline.set_source(SAMPLE_SOURCE);

    let status = pipeline.status();
    let rows = pipeline.rows();
    let outcome = pipeline.outcome();
    let lex_warning = pipeline.lex_warning();
    let last_error = pipeline.last_error();
    let log = session.log();
    let input = session.input();

    let editor_pipeline = pipeline.clone();
    let keydown_session = session.clone();
    let input_session = session.clone();
    let run_session = session.clone();
    let help_session = session.clone();
    let clear_session = session.clone();

    let indexed_rows = move || rows.get().into_iter().enumerate().collect::<Vec<_>>();
    let indexed_log = move || log.get().into_iter().enumerate().collect::<Vec<_>>();

    view! {
        <div class="app-shell app-workbench">
            <div class="workbench-editor">
                <label class="workbench-pane-title" for="workbench-source">"Source"</label>
                <textarea
                    id="workbench-source"
                    class="workbench-source app-field"
                    spellcheck="false"
                    on:input=move |ev| editor_pipeline.set_source(event_target_value(&ev))
                >
                    {SAMPLE_SOURCE}
                </textarea>
            </div>

            <Show when=move || last_error.get().is_some() fallback=|| ()>
                <div class="workbench-strip workbench-error" role="alert">
                    {move || last_error.get().unwrap_or_default()}
                </div>
            </Show>

            <Show when=move || lex_warning.get().is_some() fallback=|| ()>
                <div class="workbench-strip workbench-warning">
                    {move || lex_warning.get().unwrap_or_default()}
                </div>
            </Show>

            <div class="workbench-tokens">
                <span class="workbench-pane-title">"Tokens"</span>
                <table class="token-table">
                    <thead>
                        <tr>
                            <th>"Lexeme"</th>
                            <th>"Token"</th>
                            <th>"Type"</th>
                        </tr>
                    </thead>
                    <tbody>
                        <For each=indexed_rows key=|(idx, row)| row_key(*idx, row) let:row>
                            <tr>
                                <td>{row.1.lexeme}</td>
                                <td>{row.1.token}</td>
                                <td>{row.1.token_type}</td>
                            </tr>
                        </For>
                    </tbody>
                </table>
            </div>

            <Show when=move || outcome.get().is_some() fallback=|| ()>
                <div class=move || {
                    if outcome.get().map(|o| o.ok).unwrap_or(false) {
                        "workbench-banner workbench-ok"
                    } else {
                        "workbench-banner workbench-fail"
                    }
                }>
                    <pre class="validation-detail">
                        {move || outcome.get().map(|o| outcome_detail(&o)).unwrap_or_default()}
                    </pre>
                </div>
            </Show>

            <div class="workbench-console">
                <div class="console-toolbar">
                    <button type="button" class="app-action" on:click=move |_| help_session.submit("help")>"Help"</button>
                    <button type="button" class="app-action" on:click=move |_| clear_session.clear_log()>"Clear"</button>
                </div>
                <div class="console-screen" role="log" aria-live="polite">
                    <For each=indexed_log key=|(idx, entry)| line_key(*idx, entry) let:entry>
                        <div class=console_line_class(entry.1.kind)>{entry.1.text}</div>
                    </For>
                </div>
                <div class="console-input-row">
                    <label class="console-prompt-label" for="workbench-console-input">">"</label>
                    <input
                        id="workbench-console-input"
                        class="console-input app-field"
                        type="text"
                        value=move || input.get()
                        on:input=move |ev| input_session.set_input(event_target_value(&ev))
                        on:keydown=move |ev: KeyboardEvent| console_keydown(&keydown_session, &ev)
                        placeholder="Try: lex"
                        autocomplete="off"
                        spellcheck="false"
                    />
                    <button
                        type="button"
                        class="console-run app-action"
                        on:click=move |_| {
                            let line = run_session.input().get_untracked();
                            run_session.submit(line);
                        }
                    >
                        "Run"
                    </button>
                </div>
            </div>

            <div class="app-statusbar">
                <span>{move || format!("pipeline: {}", status.get().as_str())}</span>
                <span>{move || format!("{} token(s)", rows.get().len())}</span>
                <span>
                    {move || match outcome.get() {
                        Some(outcome) if outcome.ok => "syntax ok".to_string(),
                        Some(_) => "syntax error".to_string(),
                        None => "not validated".to_string(),
                    }}
                </span>
            </div>
        </div>
    }
}
