//! Host transport for the remote LOVE analysis service.
//!
//! Exposes the `/lex` and `/validate` calls behind an [`AnalysisTransport`] trait so the
//! pipeline and tests can swap the browser fetch adapter for stubs, plus the timer service the
//! debounce runs on.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod client;
mod endpoints;
mod timer;
mod transport;

pub use client::{AnalysisClient, LexSuccess};
pub use endpoints::AnalysisEndpoints;
pub use timer::{BrowserTimerService, TimerService};
pub use transport::{AnalysisTransport, FetchTransport, HttpReply};
