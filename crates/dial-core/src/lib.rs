//! Dial widget definitions: resolve an XML dial document into a
//! renderer-ready configuration.
//!
//! A dial definition holds the value displayed by the needle, the display
//! bounds, a list of painted intervals, and presentation attributes (paints,
//! fonts, shape, opacity). This crate does not generate an image of the
//! dial; it only builds the [`DialConfiguration`] that a rendering engine
//! consumes. The document format carries several historical revisions of the
//! same concepts, and the resolver prefers the current shapes while
//! accepting — and reporting — the deprecated ones.

pub mod data;
pub mod diag;
pub mod dial;
pub mod paint;
pub mod range;

pub use dial_xml::{parse_document, Element, XmlError};

pub use data::{to_numbers, Cell, DataGrid, NumberFormat};
pub use diag::{Diagnostic, DiagnosticSink, LogSink, RecordingSink};
pub use dial::{DialConfiguration, DialResolver, DialShape};
pub use paint::{Color, FontSpec, GradientPaint, Paint, RenderContext, TexturePaint};
pub use range::{Interval, Range, RangeModel};

use thiserror::Error;

/// Error type produced when a dial definition fails to construct.
///
/// A fatal error means the whole definition is rejected; no partially
/// populated configuration is ever returned.
#[derive(Debug, Error)]
pub enum DialError {
    /// The document itself could not be parsed.
    #[error(transparent)]
    Xml(#[from] dial_xml::XmlError),
    /// The document contains no `dial` element.
    #[error("document has no <dial> element")]
    MissingDial,
    /// A required child element is absent.
    #[error("missing required element <{element}> in <{parent}>")]
    MissingElement { parent: String, element: String },
    /// Numeric text failed to parse where a number is mandated.
    #[error("invalid number in <{element}>: '{text}'")]
    InvalidNumber { element: String, text: String },
    /// Numeric text parsed to NaN or an infinity.
    #[error("non-finite value in <{element}>: '{text}'")]
    NonFinite { element: String, text: String },
    /// A required color could not be resolved.
    #[error("unknown color in <{element}>: '{text}'")]
    InvalidColor { element: String, text: String },
    /// An interval's minimum exceeds its maximum.
    #[error("interval '{label}' has minimum {lower} above maximum {upper}")]
    InvertedRange { label: String, lower: f64, upper: f64 },
    /// A data row supplied explicit bounds in the wrong order.
    #[error("data row bounds are inverted: minimum {minimum} above maximum {maximum}")]
    InvertedBounds { minimum: f64, maximum: f64 },
    /// The seed data row holds no numeric cells at all.
    #[error("data row contains no numeric cells")]
    NoNumericData,
    /// The seed data row declares bounds but too few cells are numeric.
    #[error("data row declares bounds but holds fewer than three numeric cells")]
    MissingBounds,
}
