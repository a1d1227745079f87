//! Minimal SVG document builder used by figure export.

use base64::Engine;

use crate::style::{svg_color, svg_opacity, Rgba};

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

impl TextAnchor {
    fn as_str(&self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

/// Text appearance; `size` is in pixels, `rotate` in degrees clockwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f64,
    pub anchor: TextAnchor,
    pub color: Rgba,
    pub rotate: f64,
}

impl TextStyle {
    pub fn new(size: f64) -> Self {
        Self {
            size,
            anchor: TextAnchor::Start,
            color: [0, 0, 0, 255],
            rotate: 0.0,
        }
    }

    pub fn anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    pub fn rotate(mut self, degrees: f64) -> Self {
        self.rotate = degrees;
        self
    }
}

/// Escape text for use in SVG character data and attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Rough advance width of `text` at `size` px, for background boxes and
/// margin estimates.
pub fn text_width(text: &str, size: f64) -> f64 {
    text.chars().count() as f64 * size * 0.6
}

pub struct SvgDocument {
    width: u32,
    height: u32,
    font_family: String,
    body: String,
}

impl SvgDocument {
    pub fn new(width: u32, height: u32, font_family: &str) -> Self {
        Self {
            width,
            height,
            font_family: font_family.to_string(),
            body: String::new(),
        }
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: Option<Rgba>, stroke: Option<(Rgba, f64)>) {
        self.body.push_str(&format!(
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}"{}{}/>"#,
            x,
            y,
            w.max(0.0),
            h.max(0.0),
            fill_attrs(fill),
            stroke_attrs(stroke)
        ));
        self.body.push('\n');
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: Rgba, width: f64) {
        self.body.push_str(&format!(
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}"{}/>"#,
            x1,
            y1,
            x2,
            y2,
            stroke_attrs(Some((color, width)))
        ));
        self.body.push('\n');
    }

    /// Open or closed polyline without fill.
    pub fn polyline(&mut self, points: &[(f64, f64)], color: Rgba, width: f64, closed: bool) {
        if points.len() < 2 {
            return;
        }
        let coords: Vec<String> = points
            .iter()
            .map(|(x, y)| format!("{:.2},{:.2}", x, y))
            .collect();
        let tag = if closed { "polygon" } else { "polyline" };
        self.body.push_str(&format!(
            r#"<{} points="{}" fill="none"{} stroke-linejoin="round" stroke-linecap="round"/>"#,
            tag,
            coords.join(" "),
            stroke_attrs(Some((color, width)))
        ));
        self.body.push('\n');
    }

    pub fn circle(&mut self, cx: f64, cy: f64, r: f64, fill: Rgba, stroke: Option<(Rgba, f64)>) {
        self.body.push_str(&format!(
            r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}"{}{}/>"#,
            cx,
            cy,
            r,
            fill_attrs(Some(fill)),
            stroke_attrs(stroke)
        ));
        self.body.push('\n');
    }

    /// Text with its baseline at `y`.
    pub fn text(&mut self, x: f64, y: f64, text: &str, style: TextStyle) {
        if text.is_empty() {
            return;
        }
        let transform = if style.rotate != 0.0 {
            format!(r#" transform="rotate({:.2} {:.2} {:.2})""#, style.rotate, x, y)
        } else {
            String::new()
        };
        self.body.push_str(&format!(
            r#"<text x="{:.2}" y="{:.2}" font-size="{:.2}" text-anchor="{}"{}{}>{}</text>"#,
            x,
            y,
            style.size,
            style.anchor.as_str(),
            fill_attrs(Some(style.color)),
            transform,
            escape(text)
        ));
        self.body.push('\n');
    }

    /// Text centred on (`x`, `y`), rotated by `angle` degrees, over a white box.
    pub fn boxed_label(&mut self, x: f64, y: f64, angle: f64, text: &str, size: f64, color: Rgba) {
        let pad = size * 0.2;
        let w = text_width(text, size) + pad * 2.0;
        let h = size + pad * 2.0;
        self.body.push_str(&format!(
            r##"<g transform="translate({:.2} {:.2}) rotate({:.2})"><rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="#ffffff" fill-opacity="0.86"/>"##,
            x,
            y,
            angle,
            -w / 2.0,
            -h / 2.0,
            w,
            h
        ));
        self.body.push_str(&format!(
            r#"<text x="0" y="{:.2}" font-size="{:.2}" text-anchor="middle"{}>{}</text></g>"#,
            size * 0.35,
            size,
            fill_attrs(Some(color)),
            escape(text)
        ));
        self.body.push('\n');
    }

    /// Embed a PNG stretched over the given rectangle.
    pub fn png_image(&mut self, x: f64, y: f64, w: f64, h: f64, png: &[u8]) {
        let encoded = base64::engine::general_purpose::STANDARD.encode(png);
        self.body.push_str(&format!(
            r#"<image x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" preserveAspectRatio="none" xlink:href="data:image/png;base64,{}"/>"#,
            x, y, w, h, encoded
        ));
        self.body.push('\n');
    }

    /// Start a group clipped to a rectangle; close it with [`SvgDocument::end_group`].
    pub fn begin_clip(&mut self, id: &str, x: f64, y: f64, w: f64, h: f64) {
        self.body.push_str(&format!(
            r#"<clipPath id="{}"><rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}"/></clipPath>"#,
            id, x, y, w, h
        ));
        self.body.push_str(&format!(r#"<g clip-path="url(#{})">"#, id));
        self.body.push('\n');
    }

    pub fn end_group(&mut self) {
        self.body.push_str("</g>\n");
    }

    pub fn finish(self) -> String {
        format!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{font}">
<rect x="0" y="0" width="{w}" height="{h}" fill="#ffffff"/>
{body}</svg>
"##,
            w = self.width,
            h = self.height,
            font = escape(&self.font_family),
            body = self.body
        )
    }
}

fn fill_attrs(fill: Option<Rgba>) -> String {
    match fill {
        Some(c) if c[3] == 255 => format!(r#" fill="{}""#, svg_color(c)),
        Some(c) => format!(r#" fill="{}" fill-opacity="{:.3}""#, svg_color(c), svg_opacity(c)),
        None => r#" fill="none""#.to_string(),
    }
}

fn stroke_attrs(stroke: Option<(Rgba, f64)>) -> String {
    match stroke {
        Some((c, width)) if c[3] == 255 => {
            format!(r#" stroke="{}" stroke-width="{:.2}""#, svg_color(c), width)
        }
        Some((c, width)) => format!(
            r#" stroke="{}" stroke-opacity="{:.3}" stroke-width="{:.2}""#,
            svg_color(c),
            svg_opacity(c),
            width
        ),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
    }

    #[test]
    fn test_document_structure() {
        let mut doc = SvgDocument::new(100, 50, "sans-serif");
        doc.text(10.0, 20.0, "Start", TextStyle::new(12.0));
        doc.polyline(&[(0.0, 0.0), (10.0, 10.0)], [0, 0, 0, 255], 1.0, false);
        let svg = doc.finish();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"viewBox="0 0 100 50""#));
        assert!(svg.contains(">Start</text>"));
        assert!(svg.contains("<polyline"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_white_background_and_label_box() {
        let mut doc = SvgDocument::new(80, 40, "sans-serif");
        doc.boxed_label(40.0, 20.0, 15.0, "250", 10.0, [0, 0, 0, 255]);
        let svg = doc.finish();
        assert_eq!(svg.matches(r##"fill="#ffffff""##).count(), 2);
        assert!(svg.contains(r#"fill-opacity="0.86""#));
        assert!(svg.contains(r#"rotate(15.00)"#));
        assert!(svg.contains(">250</text></g>"));
    }
}
