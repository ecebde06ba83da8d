//! Serializers for rendered grids
//!
//! Plain text is one line per row. HTML follows the two layouts of the
//! renderer: monochrome rows become `<pre>` blocks, coloured rows become
//! `<text>` blocks holding one coloured `<span>` per cell.

use crate::ascii::OutputGrid;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Styling for HTML output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HtmlStyle {
    pub line_height: f32,
    /// Font size in pixels
    pub font_size: f32,
    /// CSS colour of the page background, colour layout only
    pub background: String,
}

impl HtmlStyle {
    /// Defaults for monochrome pages
    pub fn monochrome() -> Self {
        Self {
            line_height: 0.2,
            font_size: 5.0,
            background: "white".to_string(),
        }
    }

    /// Defaults for colour pages
    pub fn colour() -> Self {
        Self {
            line_height: 1.0,
            font_size: 5.0,
            background: "white".to_string(),
        }
    }

    fn row_style(&self) -> String {
        format!(
            "white-space:PRE;line-height:{};font-size:{}px",
            self.line_height, self.font_size
        )
    }
}

/// Rows of symbols, each followed by a newline
pub fn to_text(grid: &OutputGrid) -> String {
    let mut out = String::with_capacity((grid.width() + 1) * grid.height());
    for row in grid.rows() {
        for cell in row {
            out.push_str(&cell.symbol);
        }
        out.push('\n');
    }
    out
}

/// HTML page for `grid`, using the colour layout if any cell carries a colour
pub fn to_html(grid: &OutputGrid, style: &HtmlStyle) -> String {
    let coloured = grid.rows().flatten().any(|c| c.color.is_some());
    if coloured {
        colour_html(grid, style)
    } else {
        monochrome_html(grid, style)
    }
}

fn monochrome_html(grid: &OutputGrid, style: &HtmlStyle) -> String {
    let row_style = style.row_style();
    let mut out = String::new();
    for row in grid.rows() {
        let _ = write!(out, "<pre color=\"#000000\" style=\"{}\">", row_style);
        for cell in row {
            escape_into(&mut out, &cell.symbol);
        }
        out.push_str("</pre>");
    }
    out
}

fn colour_html(grid: &OutputGrid, style: &HtmlStyle) -> String {
    let row_style = style.row_style();
    let mut out = String::new();
    out.push_str("<body style=\"background-color:");
    escape_into(&mut out, &style.background);
    out.push_str("\">");

    for row in grid.rows() {
        let _ = write!(out, "<text style=\"{}\">", row_style);
        for cell in row {
            let [r, g, b] = cell.color.unwrap_or([0, 0, 0]);
            let _ = write!(out, "<span style=\"color:rgb({}, {}, {})\">", r, g, b);
            escape_into(&mut out, &cell.symbol);
            out.push_str("</span>");
        }
        out.push_str("</text><br />");
    }

    out.push_str("</body>");
    out
}

fn escape_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}
