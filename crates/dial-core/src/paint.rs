//! Toolkit-agnostic paint and font descriptors, plus the textual resolvers
//! that build them from document nodes.
//!
//! The rendering engine owns the conversion of these descriptors into
//! whatever its toolkit needs; nothing here touches a drawing surface.

use std::path::PathBuf;

use dial_xml::Element;

/// Plain RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::from_rgb(0x000000);
    pub const BLUE: Color = Color::from_rgb(0x0000FF);
    pub const GRAY: Color = Color::from_rgb(0x808080);
    pub const WHITE: Color = Color::from_rgb(0xFFFFFF);

    pub const fn from_rgb(rgb: u32) -> Color {
        Color {
            r: ((rgb >> 16) & 0xFF) as u8,
            g: ((rgb >> 8) & 0xFF) as u8,
            b: (rgb & 0xFF) as u8,
        }
    }

    /// Resolve a textual color: `#RRGGBB`, `0xRRGGBB`, a decimal RGB value,
    /// or one of the classic named colors. Unknown text resolves to nothing.
    pub fn parse(text: &str) -> Option<Color> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Some(hex) = trimmed.strip_prefix('#').or_else(|| {
            trimmed
                .strip_prefix("0x")
                .or_else(|| trimmed.strip_prefix("0X"))
        }) {
            return u32::from_str_radix(hex, 16).ok().map(Color::from_rgb);
        }
        if trimmed.chars().all(|c| c.is_ascii_digit()) {
            return trimmed.parse::<u32>().ok().map(Color::from_rgb);
        }
        named_color(trimmed)
    }
}

fn named_color(name: &str) -> Option<Color> {
    let rgb = match name.to_ascii_lowercase().as_str() {
        "black" => 0x000000,
        "blue" => 0x0000FF,
        "cyan" => 0x00FFFF,
        "darkgray" => 0x404040,
        "gray" => 0x808080,
        "green" => 0x00FF00,
        "lightgray" => 0xC0C0C0,
        "magenta" => 0xFF00FF,
        "orange" => 0xFFC800,
        "pink" => 0xFFAFAF,
        "red" => 0xFF0000,
        "white" => 0xFFFFFF,
        "yellow" => 0xFFFF00,
        _ => return None,
    };
    Some(Color::from_rgb(rgb))
}

/// Fill description consumed by the rendering engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    Texture(TexturePaint),
    Gradient(GradientPaint),
}

/// Image fill tiled over the widget area.
#[derive(Debug, Clone, PartialEq)]
pub struct TexturePaint {
    /// Image reference, qualified against the render context when possible.
    pub image: PathBuf,
    pub width: i32,
    pub height: i32,
}

/// Two-color linear gradient spanning `(0,0)..(width,height)`.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientPaint {
    pub start: Color,
    pub end: Color,
    pub width: i32,
    pub height: i32,
}

/// Ambient parameters forwarded to texture construction. Opaque to the
/// resolver; only the paint builders look inside.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    /// Root directory that relative image references are resolved against.
    pub solution_root: Option<PathBuf>,
}

/// Build a texture paint from a `type="texture"` background descriptor node.
pub fn texture_paint(
    node: &Element,
    width: i32,
    height: i32,
    context: &RenderContext,
) -> Option<Paint> {
    let reference = node.child_text("texture-image")?.trim();
    if reference.is_empty() {
        return None;
    }
    let image = match &context.solution_root {
        Some(root) => root.join(reference),
        None => PathBuf::from(reference),
    };
    Some(Paint::Texture(TexturePaint {
        image,
        width,
        height,
    }))
}

/// Build a gradient paint from a `type="gradient"` background descriptor
/// node carrying `color1`/`color2` leaves.
pub fn gradient_paint(node: &Element, width: i32, height: i32) -> Option<Paint> {
    let start = Color::parse(node.child_text("color1")?)?;
    let end = Color::parse(node.child_text("color2")?)?;
    Some(Paint::Gradient(GradientPaint {
        start,
        end,
        width,
        height,
    }))
}

/// Font description handed to the rendering engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSpec {
    pub family: String,
    pub size: i32,
    pub bold: bool,
    pub italic: bool,
}

/// Resolve a free-standing font node (`font-family`, `size`, `is-bold`,
/// `is-italic` leaves). Total: a missing or blank family resolves to
/// nothing, an unparseable size falls back to 12.
pub fn resolve_font(node: &Element) -> Option<FontSpec> {
    let family = node.child_text("font-family")?.trim();
    if family.is_empty() {
        return None;
    }
    let size = node
        .child_text("size")
        .and_then(|text| text.trim().parse::<i32>().ok())
        .unwrap_or(12);
    let flag = |name: &str| {
        node.child_text(name)
            .map(|text| text.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    };
    Some(FontSpec {
        family: family.to_string(),
        size,
        bold: flag("is-bold"),
        italic: flag("is-italic"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dial_xml::parse_document;

    #[test]
    fn parse_color_forms() {
        assert_eq!(Color::parse("#FF0000"), Some(Color::from_rgb(0xFF0000)));
        assert_eq!(Color::parse("0x00ff00"), Some(Color::from_rgb(0x00FF00)));
        assert_eq!(Color::parse("255"), Some(Color::from_rgb(0x0000FF)));
        assert_eq!(Color::parse("  blue "), Some(Color::BLUE));
        assert_eq!(Color::parse("lightGray"), Some(Color::from_rgb(0xC0C0C0)));
        assert_eq!(Color::parse(""), None);
        assert_eq!(Color::parse("no-such-color"), None);
        assert_eq!(Color::parse("#GGHHII"), None);
    }

    #[test]
    fn gradient_from_descriptor_node() {
        let xml = "<chart-background type=\"gradient\">\
                   <color1>red</color1><color2>#000080</color2>\
                   </chart-background>";
        let node = parse_document(xml).expect("parse");
        let paint = gradient_paint(&node, 400, 300).expect("gradient");
        match paint {
            Paint::Gradient(gradient) => {
                assert_eq!(gradient.start, Color::from_rgb(0xFF0000));
                assert_eq!(gradient.end, Color::from_rgb(0x000080));
                assert_eq!((gradient.width, gradient.height), (400, 300));
            }
            other => panic!("unexpected paint: {other:?}"),
        }
    }

    #[test]
    fn gradient_requires_both_colors() {
        let xml = "<chart-background type=\"gradient\"><color1>red</color1></chart-background>";
        let node = parse_document(xml).expect("parse");
        assert!(gradient_paint(&node, 10, 10).is_none());
    }

    #[test]
    fn texture_joins_context_root() {
        let xml = "<plot-background type=\"texture\">\
                   <texture-image>steel.png</texture-image>\
                   </plot-background>";
        let node = parse_document(xml).expect("parse");
        let context = RenderContext {
            solution_root: Some(PathBuf::from("/srv/solutions")),
        };
        match texture_paint(&node, 200, 200, &context).expect("texture") {
            Paint::Texture(texture) => {
                assert_eq!(texture.image, PathBuf::from("/srv/solutions/steel.png"));
            }
            other => panic!("unexpected paint: {other:?}"),
        }
    }

    #[test]
    fn font_resolution_is_total() {
        let node = parse_document(
            "<legend-font><font-family>Serif</font-family><size>oops</size>\
             <is-bold>TRUE</is-bold></legend-font>",
        )
        .expect("parse");
        let font = resolve_font(&node).expect("font");
        assert_eq!(font.family, "Serif");
        assert_eq!(font.size, 12);
        assert!(font.bold);
        assert!(!font.italic);

        let blank = parse_document("<legend-font><font-family/></legend-font>").expect("parse");
        assert!(resolve_font(&blank).is_none());
    }
}
