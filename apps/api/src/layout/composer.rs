//! Row layout for the receipt body.
//!
//! # Row accounting
//! - A single-line field consumes exactly one row.
//! - A wrap-eligible field consumes `1 + extra_rows`, `extra_rows = wrapped_lines - 1`.
//! - Each field starts at the cumulative row count of the fields before it, so placement is
//!   strictly top-to-bottom and never overlaps.
//! - Inactive (conditional) fields are dropped before counting; they leave no gap.
//!
//! The signature block sits a fixed distance below the first free row, and the notes block
//! (only when notes are non-empty) a fixed distance below the signature.

use serde::{Deserialize, Serialize};

use crate::layout::font_metrics::{PageConfig, TextMeasure};
use crate::layout::wrap::wrap_text;

// ────────────────────────────────────────────────────────────────────────────
// Input types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    SingleLine,
    Wrapped { max_width_pt: f32 },
}

/// One labelled field, in the order it should appear on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub label: String,
    pub value: String,
    pub kind: FieldKind,
    /// Conditional fields carry their predicate here; inactive ones are omitted entirely.
    pub active: bool,
}

impl FieldSpec {
    pub fn single(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            kind: FieldKind::SingleLine,
            active: true,
        }
    }

    pub fn wrapped(label: impl Into<String>, value: impl Into<String>, max_width_pt: f32) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            kind: FieldKind::Wrapped { max_width_pt },
            active: true,
        }
    }

    pub fn only_if(mut self, predicate: bool) -> Self {
        self.active = predicate;
        self
    }
}

/// Text of the blocks that follow the fields.
#[derive(Debug, Clone, Copy)]
pub struct TrailerText<'a> {
    pub signature_caption: &'a str,
    pub signatory: &'a str,
    pub notes_label: &'a str,
    pub notes: &'a str,
}

// ────────────────────────────────────────────────────────────────────────────
// Output types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum LineValue {
    Single(String),
    Wrapped(Vec<String>),
}

impl LineValue {
    /// Visual lines of the value, in order.
    pub fn lines(&self) -> Vec<&str> {
        match self {
            LineValue::Single(text) => vec![text.as_str()],
            LineValue::Wrapped(lines) => lines.iter().map(String::as_str).collect(),
        }
    }
}

/// A positioned field. `row_index` is the first row it occupies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutLine {
    pub label: String,
    pub value: LineValue,
    pub row_index: u32,
    pub extra_rows: u32,
}

impl LayoutLine {
    pub fn rows_consumed(&self) -> u32 {
        1 + self.extra_rows
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureBlock {
    pub caption: String,
    pub caption_y_pt: f32,
    pub name: String,
    pub name_y_pt: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotesBlock {
    pub label: String,
    pub label_y_pt: f32,
    pub lines: Vec<String>,
    pub first_line_y_pt: f32,
    pub line_height_pt: f32,
}

/// Everything the renderer needs below the header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutPlan {
    pub lines: Vec<LayoutLine>,
    pub rows_used: u32,
    pub signature: SignatureBlock,
    pub notes: Option<NotesBlock>,
}

// ────────────────────────────────────────────────────────────────────────────
// Composer
// ────────────────────────────────────────────────────────────────────────────

/// Stateless: holds only borrowed geometry and the width capability.
pub struct PageLayoutComposer<'a, M: ?Sized> {
    config: &'a PageConfig,
    measure: &'a M,
}

impl<'a, M> PageLayoutComposer<'a, M>
where
    M: TextMeasure + ?Sized,
{
    pub fn new(config: &'a PageConfig, measure: &'a M) -> Self {
        Self { config, measure }
    }

    /// Places the active fields starting at `start_row`.
    ///
    /// Returns the lines and the first free row after them.
    pub fn place_fields(&self, fields: &[FieldSpec], start_row: u32) -> (Vec<LayoutLine>, u32) {
        fields
            .iter()
            .filter(|field| field.active)
            .fold((Vec::new(), start_row), |(mut lines, row), field| {
                let line = self.place_field(field, row);
                let next_row = row + line.rows_consumed();
                lines.push(line);
                (lines, next_row)
            })
    }

    fn place_field(&self, field: &FieldSpec, row_index: u32) -> LayoutLine {
        let (value, extra_rows) = match field.kind {
            FieldKind::SingleLine => (LineValue::Single(field.value.clone()), 0),
            FieldKind::Wrapped { max_width_pt } => {
                let lines = wrap_text(
                    &field.value,
                    max_width_pt,
                    self.measure,
                    self.config.value_font,
                );
                let extra = lines.len().saturating_sub(1) as u32;
                (LineValue::Wrapped(lines), extra)
            }
        };
        LayoutLine {
            label: field.label.clone(),
            value,
            row_index,
            extra_rows,
        }
    }

    /// Full body plan: fields from row 0, then signature, then optional notes.
    pub fn compose(&self, fields: &[FieldSpec], trailer: TrailerText<'_>) -> LayoutPlan {
        let (lines, rows_used) = self.place_fields(fields, 0);
        let config = self.config;

        let name_y_pt = config.row_y(rows_used) + config.signature_gap_pt;
        let signature = SignatureBlock {
            caption: trailer.signature_caption.to_string(),
            caption_y_pt: name_y_pt - config.signature_caption_rise_pt,
            name: trailer.signatory.to_string(),
            name_y_pt,
        };

        let notes = if trailer.notes.trim().is_empty() {
            None
        } else {
            let label_y_pt = name_y_pt + config.notes_gap_pt;
            Some(NotesBlock {
                label: trailer.notes_label.to_string(),
                label_y_pt,
                lines: wrap_text(
                    trailer.notes,
                    config.notes_wrap_width_pt,
                    self.measure,
                    config.notes_font,
                ),
                first_line_y_pt: label_y_pt + config.notes_first_line_gap_pt,
                line_height_pt: config.notes_line_height_pt,
            })
        };

        LayoutPlan {
            lines,
            rows_used,
            signature,
            notes,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
