use std::fmt::Write as _;
use std::path::Path;

use tracing::debug;

use crate::error::{ChartError, ChartResult};
use crate::render::{Color, FrameCounts, RenderFrame, Renderer, TextHAlign};

/// Renders frames into standalone SVG documents.
///
/// The last document is kept in memory; `write_to` saves it to disk.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    document: String,
    last_counts: FrameCounts,
}

impl SvgRenderer {
    #[must_use]
    pub fn document(&self) -> &str {
        &self.document
    }

    #[must_use]
    pub fn into_document(self) -> String {
        self.document
    }

    #[must_use]
    pub fn last_counts(&self) -> FrameCounts {
        self.last_counts
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> ChartResult<()> {
        if self.document.is_empty() {
            return Err(ChartError::InvalidData(
                "no frame has been rendered yet".to_owned(),
            ));
        }
        std::fs::write(path, &self.document)?;
        Ok(())
    }

    fn write_frame(frame: &RenderFrame) -> Result<String, std::fmt::Error> {
        let width = frame.viewport.width;
        let height = frame.viewport.height;
        let mut out = String::with_capacity(4096);
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        )?;
        writeln!(
            out,
            r#"<rect x="0" y="0" width="{width}" height="{height}" {}/>"#,
            fill_attrs(frame.background)
        )?;

        for layer in &frame.layers {
            if layer.is_empty() {
                continue;
            }
            writeln!(out, r#"<g data-layer="{:?}">"#, layer.kind)?;
            for rect in &layer.rects {
                write!(
                    out,
                    r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" {}"#,
                    rect.x,
                    rect.y,
                    rect.width,
                    rect.height,
                    fill_attrs(rect.fill_color)
                )?;
                if rect.border_width > 0.0 {
                    write!(out, " {}", stroke_attrs(rect.border_color, rect.border_width))?;
                }
                writeln!(out, "/>")?;
            }
            for polygon in &layer.polygons {
                out.push_str(r#"<polygon points=""#);
                for (index, point) in polygon.points.iter().enumerate() {
                    if index > 0 {
                        out.push(' ');
                    }
                    write!(out, "{:.2},{:.2}", point.x, point.y)?;
                }
                write!(out, r#"" {}"#, fill_attrs(polygon.fill_color))?;
                if polygon.border_width > 0.0 {
                    write!(
                        out,
                        " {}",
                        stroke_attrs(polygon.border_color, polygon.border_width)
                    )?;
                }
                writeln!(out, "/>")?;
            }
            for line in &layer.lines {
                writeln!(
                    out,
                    r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" {} stroke-linecap="round"/>"#,
                    line.x1,
                    line.y1,
                    line.x2,
                    line.y2,
                    stroke_attrs(line.color, line.stroke_width)
                )?;
            }
            for circle in &layer.circles {
                writeln!(
                    out,
                    r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" {}/>"#,
                    circle.cx,
                    circle.cy,
                    circle.radius,
                    fill_attrs(circle.fill_color)
                )?;
            }
            for text in &layer.texts {
                let anchor = match text.h_align {
                    TextHAlign::Left => "start",
                    TextHAlign::Center => "middle",
                    TextHAlign::Right => "end",
                };
                writeln!(
                    out,
                    r#"<text x="{:.2}" y="{:.2}" font-family="sans-serif" font-size="{:.1}" text-anchor="{anchor}" dominant-baseline="middle" {}>{}</text>"#,
                    text.x,
                    text.y,
                    text.font_size_px,
                    fill_attrs(text.color),
                    escape_xml(&text.text)
                )?;
            }
            writeln!(out, "</g>")?;
        }
        writeln!(out, "</svg>")?;
        Ok(out)
    }
}

impl Renderer for SvgRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.document = Self::write_frame(frame)
            .map_err(|err| ChartError::InvalidData(format!("failed to write svg: {err}")))?;
        self.last_counts = frame.counts();
        debug!(bytes = self.document.len(), "rendered svg document");
        Ok(())
    }
}

fn fill_attrs(color: Color) -> String {
    if color.alpha < 1.0 {
        format!(
            r#"fill="{}" fill-opacity="{:.3}""#,
            color.to_hex(),
            color.alpha
        )
    } else {
        format!(r#"fill="{}""#, color.to_hex())
    }
}

fn stroke_attrs(color: Color, width: f64) -> String {
    if color.alpha < 1.0 {
        format!(
            r#"stroke="{}" stroke-opacity="{:.3}" stroke-width="{width:.2}""#,
            color.to_hex(),
            color.alpha
        )
    } else {
        format!(r#"stroke="{}" stroke-width="{width:.2}""#, color.to_hex())
    }
}

/// Escapes the five XML special characters.
#[must_use]
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::escape_xml;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(escape_xml("a<b & 'c'"), "a&lt;b &amp; &apos;c&apos;");
    }
}
