//! Resolution diagnostics: deprecated document shapes and missing seed data.
//!
//! The resolver reports through an injected [`DiagnosticSink`] rather than a
//! process-wide logger, so hosts can capture diagnostics and tests can assert
//! on them. [`LogSink`] is the operator-facing default.

use tracing::warn;

/// A single diagnostic produced while resolving a dial document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A deprecated leaf property was used instead of its typed replacement.
    DeprecatedProperty {
        deprecated: String,
        replacement: String,
    },
    /// A deprecated flat child list was used instead of the container form.
    DeprecatedChild {
        deprecated: String,
        container: String,
    },
    /// No tabular data was available to seed the dial value.
    NoData,
}

pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to the `tracing` logger.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic {
            Diagnostic::DeprecatedProperty {
                deprecated,
                replacement,
            } => {
                warn!("property '{deprecated}' is deprecated, use '{replacement}' instead");
                warn!("property '{deprecated}' will not validate against the schema");
            }
            Diagnostic::DeprecatedChild {
                deprecated,
                container,
            } => {
                warn!("child '{deprecated}' is deprecated, nest it under '{container}' instead");
                warn!("child '{deprecated}' will not validate against the schema");
            }
            Diagnostic::NoData => warn!("no data available to seed the dial value"),
        }
    }
}

/// Records diagnostics for later inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink for RecordingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}
