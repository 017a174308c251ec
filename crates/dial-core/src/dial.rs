//! The dial configuration object and the document resolver that populates it.
//!
//! A dial definition holds the value shown by the needle, the display bounds,
//! the painted intervals, and the presentation attributes of the widget. The
//! resolver walks one `<dial>` subtree and fills a [`DialConfiguration`],
//! preferring current document shapes over deprecated ones and reporting a
//! diagnostic whenever a deprecated shape is used.

use dial_xml::{parse_document, Element};
use tracing::debug;

use crate::data::{to_numbers, Cell, DataGrid, NumberFormat};
use crate::diag::{Diagnostic, DiagnosticSink};
use crate::paint::{
    gradient_paint, resolve_font, texture_paint, Color, FontSpec, Paint, RenderContext,
};
use crate::range::{Interval, Range, RangeModel};
use crate::DialError;

/// Shape of the dial face outside the needle sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialShape {
    Circle,
    #[default]
    Chord,
    Pie,
}

impl DialShape {
    fn parse(text: &str) -> Option<DialShape> {
        match text.trim().to_ascii_lowercase().as_str() {
            "circle" => Some(DialShape::Circle),
            "chord" => Some(DialShape::Chord),
            "pie" => Some(DialShape::Pie),
            _ => None,
        }
    }
}

/// Fully resolved dial definition, handed to the rendering engine.
///
/// Immutable by convention once the resolver returns it.
#[derive(Debug, Clone, PartialEq)]
pub struct DialConfiguration {
    pub range: RangeModel,
    pub chart_background: Paint,
    pub plot_background: Paint,
    pub needle_paint: Paint,
    pub tick_paint: Paint,
    pub tick_size: i32,
    pub value_paint: Paint,
    pub units: Option<String>,
    pub title_font: Option<FontSpec>,
    pub value_font: Option<FontSpec>,
    pub legend_font: Option<FontSpec>,
    pub legend_border_visible: bool,
    pub dial_shape: DialShape,
    pub subtitles: Vec<String>,
    pub background_alpha: Option<f32>,
    pub foreground_alpha: Option<f32>,
}

impl DialConfiguration {
    fn new(range: RangeModel) -> Self {
        DialConfiguration {
            range,
            chart_background: Paint::Solid(Color::WHITE),
            plot_background: Paint::Solid(Color::GRAY),
            needle_paint: Paint::Solid(Color::BLUE),
            tick_paint: Paint::Solid(Color::BLUE),
            tick_size: 5,
            value_paint: Paint::Solid(Color::BLUE),
            units: None,
            title_font: None,
            value_font: None,
            legend_font: None,
            legend_border_visible: true,
            dial_shape: DialShape::Chord,
            subtitles: Vec::new(),
            background_alpha: None,
            foreground_alpha: None,
        }
    }

    /// Title font, falling back to the stock plain sans-serif when the
    /// document does not name one.
    pub fn title_font_or_default(&self) -> FontSpec {
        self.title_font.clone().unwrap_or(FontSpec {
            family: "sans-serif".to_string(),
            size: 14,
            bold: false,
            italic: false,
        })
    }
}

/// One-shot resolver turning a dial document into a [`DialConfiguration`].
///
/// `width`/`height` and the render context are only forwarded to texture and
/// gradient paint construction. Diagnostics about deprecated document shapes
/// go to the injected sink.
pub struct DialResolver<'a, S: DiagnosticSink> {
    width: i32,
    height: i32,
    context: &'a RenderContext,
    sink: &'a mut S,
    number_format: NumberFormat,
}

impl<'a, S: DiagnosticSink> DialResolver<'a, S> {
    pub fn new(width: i32, height: i32, context: &'a RenderContext, sink: &'a mut S) -> Self {
        DialResolver {
            width,
            height,
            context,
            sink,
            number_format: NumberFormat::default(),
        }
    }

    /// Number format used when seeding the value from tabular data.
    pub fn with_number_format(mut self, number_format: NumberFormat) -> Self {
        self.number_format = number_format;
        self
    }

    /// Parse an XML string and resolve the dial definition inside it.
    pub fn resolve_str(&mut self, xml: &str, value: f64) -> Result<DialConfiguration, DialError> {
        let root = parse_document(xml)?;
        self.resolve_document(&root, value)
    }

    /// Resolve a document whose `<dial>` element may sit anywhere in the
    /// tree, seeding the model with a caller-supplied value. Bounds are
    /// auto-ranged from the value unless the document opts out via
    /// `<range-limited>false</range-limited>`.
    pub fn resolve_document(
        &mut self,
        root: &Element,
        value: f64,
    ) -> Result<DialConfiguration, DialError> {
        let dial = root.descendant("dial").ok_or(DialError::MissingDial)?;
        let mut model = RangeModel::unbounded(value);
        model.set_range_limited(range_limited_flag(dial));
        model.derive_min_max(value);
        self.resolve_dial(dial, model)
    }

    /// Resolve a dial node, seeding value and bounds from tabular data.
    ///
    /// `by_row = false` pivots the grid first. The first row's numeric cells
    /// supply the value (cell 0) and, when the raw row has at least three
    /// cells, explicit bounds (cells 1 and 2); shorter rows auto-range from
    /// the value alone. Absent or empty data leaves the model at its
    /// defaults and reports a no-data diagnostic.
    pub fn resolve_with_data(
        &mut self,
        dial: &Element,
        data: Option<&DataGrid>,
        by_row: bool,
    ) -> Result<DialConfiguration, DialError> {
        let mut model = RangeModel::unbounded(0.0);
        let pivoted;
        let grid = match (data, by_row) {
            (Some(grid), true) => Some(grid),
            (Some(grid), false) => {
                pivoted = grid.pivot();
                Some(&pivoted)
            }
            (None, _) => None,
        };
        match grid.and_then(DataGrid::first_row) {
            Some(row) => self.seed_from_row(dial, row, &mut model)?,
            None => self.sink.report(Diagnostic::NoData),
        }
        self.resolve_dial(dial, model)
    }

    fn seed_from_row(
        &mut self,
        dial: &Element,
        row: &[Cell],
        model: &mut RangeModel,
    ) -> Result<(), DialError> {
        let numbers = to_numbers(row, &self.number_format);
        let value = *numbers.first().ok_or(DialError::NoNumericData)?;
        if row.len() >= 3 {
            let minimum = numbers.get(1).copied().ok_or(DialError::MissingBounds)?;
            let maximum = numbers.get(2).copied().ok_or(DialError::MissingBounds)?;
            if minimum > maximum {
                return Err(DialError::InvertedBounds { minimum, maximum });
            }
            model.set_bounds(minimum, maximum);
        } else {
            model.set_range_limited(range_limited_flag(dial));
            model.derive_min_max(value);
        }
        model.set_value(value);
        Ok(())
    }

    fn resolve_dial(
        &mut self,
        dial: &Element,
        model: RangeModel,
    ) -> Result<DialConfiguration, DialError> {
        let mut config = DialConfiguration::new(model);

        if let Some(units) = dial.child_text("units") {
            config.units = Some(units.to_string());
        }

        if let Some(paint) = self.resolve_background(dial, "background-color", "chart-background")
        {
            config.chart_background = paint;
        }
        if let Some(paint) =
            self.resolve_background(dial, "plot-background-color", "plot-background")
        {
            config.plot_background = paint;
        }

        if let Some(color) = solid_color(dial, "needle-color") {
            config.needle_paint = Paint::Solid(color);
        }
        if let Some(color) = solid_color(dial, "tick-color") {
            config.tick_paint = Paint::Solid(color);
        }
        if let Some(text) = dial.child_text("tick-interval") {
            config.tick_size = parse_i32("tick-interval", text)?;
        }
        if let Some(color) = solid_color(dial, "value-color") {
            config.value_paint = Paint::Solid(color);
        }
        if let Some(shape) = dial.child_text("dial-shape").and_then(DialShape::parse) {
            config.dial_shape = shape;
        }

        config.title_font = resolve_category_font(dial.child("title-font"))?;
        config.value_font = resolve_category_font(dial.child("domain-tick-font"))?;
        if let Some(node) = dial.child("legend-font") {
            config.legend_font = resolve_font(node);
        }
        if let Some(text) = dial.child_text("display-legend-border") {
            config.legend_border_visible = text.eq_ignore_ascii_case("true");
        }
        config.background_alpha = optional_f32(dial, "background-alpha")?;
        config.foreground_alpha = optional_f32(dial, "foreground-alpha")?;

        self.resolve_intervals(dial, &mut config.range)?;
        self.resolve_subtitles(dial, &mut config.subtitles);

        debug!(
            minimum = config.range.minimum(),
            maximum = config.range.maximum(),
            intervals = config.range.intervals().len(),
            "resolved dial definition"
        );
        Ok(config)
    }

    /// Background precedence shared by the chart, plot, and interval call
    /// sites: a direct color leaf wins when present and non-empty (with a
    /// deprecation diagnostic), else a typed descriptor node is consulted,
    /// else no paint resolves and the built-in default stands.
    fn resolve_background(
        &mut self,
        node: &Element,
        color_name: &str,
        descriptor_name: &str,
    ) -> Option<Paint> {
        if let Some(text) = node.child_text(color_name) {
            if !text.is_empty() {
                self.sink.report(Diagnostic::DeprecatedProperty {
                    deprecated: color_name.to_string(),
                    replacement: descriptor_name.to_string(),
                });
                return Color::parse(text).map(Paint::Solid);
            }
        }
        let descriptor = node.child(descriptor_name)?;
        match descriptor.attribute("type") {
            Some("texture") => texture_paint(descriptor, self.width, self.height, self.context),
            Some("gradient") => gradient_paint(descriptor, self.width, self.height),
            _ => None,
        }
    }

    /// Flat `<interval>` children win over an `<intervals>` container; the
    /// flat form is deprecated and reported. Intervals reach the model in
    /// document order, since the first one seeds the bounds in clamped mode.
    fn resolve_intervals(
        &mut self,
        dial: &Element,
        model: &mut RangeModel,
    ) -> Result<(), DialError> {
        let flat: Vec<&Element> = dial.children("interval").collect();
        let nodes = if flat.is_empty() {
            match dial.child("intervals") {
                Some(container) => container.children("interval").collect(),
                None => Vec::new(),
            }
        } else {
            self.sink.report(Diagnostic::DeprecatedChild {
                deprecated: "interval".to_string(),
                container: "intervals".to_string(),
            });
            flat
        };
        for node in nodes {
            let interval = self.resolve_interval(node)?;
            model.add_interval(interval);
        }
        Ok(())
    }

    fn resolve_interval(&mut self, node: &Element) -> Result<Interval, DialError> {
        let label = required_text(node, "label")?.to_string();
        let lower = required_f64(node, "minimum")?;
        let upper = required_f64(node, "maximum")?;
        if lower > upper {
            return Err(DialError::InvertedRange {
                label,
                lower,
                upper,
            });
        }
        let fill = self.resolve_background(node, "color", "interval-background");
        let outline_text = required_text(node, "text-color")?;
        let outline = Color::parse(outline_text).ok_or_else(|| DialError::InvalidColor {
            element: "text-color".to_string(),
            text: outline_text.to_string(),
        })?;
        let outline_width = match node.child_text("stroke-width") {
            Some(text) => finite_f32("stroke-width", text)?,
            None => 1.0,
        };
        Ok(Interval {
            label,
            range: Range::new(lower, upper),
            outline,
            outline_width,
            fill,
        })
    }

    /// Same list-vs-container precedence as intervals, for `<subtitle>`.
    fn resolve_subtitles(&mut self, dial: &Element, subtitles: &mut Vec<String>) {
        let flat: Vec<&Element> = dial.children("subtitle").collect();
        let nodes = if flat.is_empty() {
            match dial.child("subtitles") {
                Some(container) => container.children("subtitle").collect(),
                None => Vec::new(),
            }
        } else {
            self.sink.report(Diagnostic::DeprecatedChild {
                deprecated: "subtitle".to_string(),
                container: "subtitles".to_string(),
            });
            flat
        };
        for node in nodes {
            subtitles.push(node.text().to_string());
        }
    }
}

/// `range-limited` node: absent or `"true"` (case-insensitive) means
/// clamped mode; any other text opts into auto-expand mode.
fn range_limited_flag(dial: &Element) -> bool {
    dial.child("range-limited")
        .map(|node| node.text().eq_ignore_ascii_case("true"))
        .unwrap_or(true)
}

fn solid_color(dial: &Element, name: &str) -> Option<Color> {
    dial.child_text(name).and_then(Color::parse)
}

/// Category font (`title-font` / `domain-tick-font`): resolves only if the
/// `font` leaf is present and non-blank; `size` defaults to 12; always bold.
fn resolve_category_font(category: Option<&Element>) -> Result<Option<FontSpec>, DialError> {
    let Some(category) = category else {
        return Ok(None);
    };
    let Some(family) = category.child_text("font") else {
        return Ok(None);
    };
    let family = family.trim();
    if family.is_empty() {
        return Ok(None);
    }
    let size = match category.child_text("size") {
        Some(text) => parse_i32("size", text)?,
        None => 12,
    };
    Ok(Some(FontSpec {
        family: family.to_string(),
        size,
        bold: true,
        italic: false,
    }))
}

fn required_text<'a>(node: &'a Element, name: &str) -> Result<&'a str, DialError> {
    node.child_text(name).ok_or_else(|| DialError::MissingElement {
        parent: node.name().to_string(),
        element: name.to_string(),
    })
}

fn required_f64(node: &Element, name: &str) -> Result<f64, DialError> {
    let text = required_text(node, name)?;
    let value: f64 = text
        .trim()
        .parse()
        .map_err(|_| DialError::InvalidNumber {
            element: name.to_string(),
            text: text.to_string(),
        })?;
    ensure_finite(value, name, text)?;
    Ok(value)
}

fn finite_f32(name: &str, text: &str) -> Result<f32, DialError> {
    let value: f32 = text
        .trim()
        .parse()
        .map_err(|_| DialError::InvalidNumber {
            element: name.to_string(),
            text: text.to_string(),
        })?;
    ensure_finite(f64::from(value), name, text)?;
    Ok(value)
}

fn optional_f32(dial: &Element, name: &str) -> Result<Option<f32>, DialError> {
    match dial.child_text(name) {
        Some(text) => finite_f32(name, text).map(Some),
        None => Ok(None),
    }
}

fn parse_i32(name: &str, text: &str) -> Result<i32, DialError> {
    text.trim().parse().map_err(|_| DialError::InvalidNumber {
        element: name.to_string(),
        text: text.to_string(),
    })
}

fn ensure_finite(value: f64, name: &str, text: &str) -> Result<(), DialError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(DialError::NonFinite {
            element: name.to_string(),
            text: text.to_string(),
        })
    }
}
