//! SVG page renderer.
//!
//! One A4 page in points. Fonts are referenced by family name only; the viewer resolves
//! them. A logo file, if configured and readable, is embedded as a data URI so the
//! document stays self-contained.

use std::path::{Path, PathBuf};

use base64::Engine as _;
use svg::node::element::{Image, Rectangle, Text};
use svg::Document;
use tracing::{debug, warn};

use crate::layout::font_metrics::{FontFace, FontSpec};
use crate::render::{DocumentSpec, ReceiptRenderer, RenderError};

/// Resources handed to the renderer at startup.
#[derive(Debug, Clone)]
pub struct SvgRenderConfig {
    pub font_family: String,
    pub logo_path: Option<PathBuf>,
}

impl Default for SvgRenderConfig {
    fn default() -> Self {
        Self {
            font_family: "Arial, Helvetica, sans-serif".to_string(),
            logo_path: None,
        }
    }
}

pub struct SvgReceiptRenderer {
    config: SvgRenderConfig,
}

#[derive(Clone, Copy)]
enum Anchor {
    Start,
    Middle,
    End,
}

impl SvgReceiptRenderer {
    pub fn new(config: SvgRenderConfig) -> Self {
        Self { config }
    }

    /// Builds the SVG document without touching the filesystem (except to read the logo).
    pub fn build(&self, document: &DocumentSpec) -> Document {
        let page = &document.page;
        let mut doc = Document::new()
            .set("width", format!("{}pt", page.width_pt))
            .set("height", format!("{}pt", page.height_pt))
            .set("viewBox", (0.0, 0.0, page.width_pt, page.height_pt))
            .add(
                Rectangle::new()
                    .set("width", "100%")
                    .set("height", "100%")
                    .set("fill", "white"),
            );

        // Header
        doc = match self.logo_data_uri() {
            Some(uri) => doc.add(
                Image::new()
                    .set("x", page.logo_x_pt)
                    .set("y", page.logo_y_pt)
                    .set("width", page.logo_width_pt)
                    .set("preserveAspectRatio", "xMinYMin meet")
                    .set("href", uri),
            ),
            None => doc.add(self.text(
                &document.header.logo_placeholder,
                page.logo_x_pt,
                page.contact_top_pt,
                page.contact_font,
                Anchor::Start,
            )),
        };
        for (i, line) in document.header.contact_lines.iter().enumerate() {
            doc = doc.add(self.text(
                line,
                page.width_pt - page.contact_right_margin_pt,
                page.contact_top_pt + i as f32 * page.contact_line_gap_pt,
                page.contact_font,
                Anchor::End,
            ));
        }
        doc = doc.add(self.text(
            &document.header.title,
            page.width_pt / 2.0,
            page.title_y_pt,
            page.title_font,
            Anchor::Middle,
        ));

        // Body rows
        for line in &document.plan.lines {
            let y = page.row_y(line.row_index);
            doc = doc.add(self.text(&line.label, page.label_x_pt, y, page.label_font, Anchor::Start));
            for (i, text) in line.value.lines().into_iter().enumerate() {
                doc = doc.add(self.text(
                    text,
                    page.value_x_pt,
                    y + i as f32 * page.wrapped_line_gap(),
                    page.value_font,
                    Anchor::Start,
                ));
            }
        }

        // Signature
        let signature = &document.plan.signature;
        let signature_x = page.width_pt - page.signature_right_margin_pt;
        doc = doc
            .add(self.text(
                &signature.caption,
                signature_x,
                signature.caption_y_pt,
                page.signature_font,
                Anchor::End,
            ))
            .add(self.text(
                &signature.name,
                signature_x,
                signature.name_y_pt,
                page.signature_font,
                Anchor::End,
            ));

        // Notes
        if let Some(notes) = &document.plan.notes {
            doc = doc.add(self.text(
                &notes.label,
                page.label_x_pt,
                notes.label_y_pt,
                page.notes_label_font,
                Anchor::Start,
            ));
            for (i, line) in notes.lines.iter().enumerate() {
                doc = doc.add(self.text(
                    line,
                    page.label_x_pt + page.notes_indent_pt,
                    notes.first_line_y_pt + i as f32 * notes.line_height_pt,
                    page.notes_font,
                    Anchor::Start,
                ));
            }
        }

        doc
    }

    fn text(&self, content: &str, x: f32, y: f32, font: FontSpec, anchor: Anchor) -> Text {
        let weight = match font.face {
            FontFace::Regular => "normal",
            FontFace::Bold => "bold",
        };
        let anchor = match anchor {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        };
        Text::new()
            .set("x", x)
            .set("y", y)
            .set("font-family", self.config.font_family.as_str())
            .set("font-size", font.size_pt)
            .set("font-weight", weight)
            .set("text-anchor", anchor)
            .add(svg::node::Text::new(escape_xml(content)))
    }

    /// Logo as a data URI, or `None` to fall back to the placeholder text.
    fn logo_data_uri(&self) -> Option<String> {
        let path = self.config.logo_path.as_ref()?;
        let mime = match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("svg") => "image/svg+xml",
            _ => {
                warn!(path = %path.display(), "Unsupported logo format, using placeholder");
                return None;
            }
        };
        match std::fs::read(path) {
            Ok(bytes) => Some(format!(
                "data:{mime};base64,{}",
                base64::engine::general_purpose::STANDARD.encode(bytes)
            )),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Logo unavailable, using placeholder");
                None
            }
        }
    }
}

impl ReceiptRenderer for SvgReceiptRenderer {
    fn extension(&self) -> &'static str {
        "svg"
    }

    fn render(&self, document: &DocumentSpec, path: &Path) -> Result<(), RenderError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| RenderError::OutputDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        svg::save(path, &self.build(document)).map_err(|source| RenderError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}
