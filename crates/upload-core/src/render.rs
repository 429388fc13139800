use std::fmt::Write;

use crate::client::Feedback;
use crate::format::{format_bytes, format_upload_time};
use crate::registry::FileRegistry;

const HEADERS: [&str; 3] = ["Filename", "Size", "Upload Time"];

pub fn render_feedback(feedback: &Feedback) -> Option<String> {
    match feedback {
        Feedback::None => None,
        Feedback::Success(text) => Some(format!("✓ {}", text)),
        Feedback::Error(text) => Some(format!("✗ {}", text)),
    }
}

/// File table with a count header, in registry order
pub fn render_registry(registry: &FileRegistry) -> String {
    let mut out = format!("Uploaded Files ({})\n", registry.len());
    if registry.is_empty() {
        out.push_str("No files uploaded yet\n");
        return out;
    }

    let rows: Vec<[String; 3]> = registry
        .files()
        .iter()
        .map(|f| {
            [
                f.filename.clone(),
                format_bytes(f.filesize),
                format_upload_time(f),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    write_row(&mut out, &HEADERS.map(str::to_string), &widths);
    write_row(&mut out, &widths.map(|w| "-".repeat(w)), &widths);
    for row in &rows {
        write_row(&mut out, row, &widths);
    }
    out
}

fn write_row(out: &mut String, cells: &[String; 3], widths: &[usize; 3]) {
    let _ = writeln!(
        out,
        "{:<w0$}  {:>w1$}  {}",
        cells[0],
        cells[1],
        cells[2],
        w0 = widths[0],
        w1 = widths[1],
    );
}

/// Whole view: feedback line (if any), then the table
pub fn render_view(registry: &FileRegistry, feedback: &Feedback) -> String {
    let mut out = String::new();
    if let Some(line) = render_feedback(feedback) {
        out.push_str(&line);
        out.push_str("\n\n");
    }
    out.push_str(&render_registry(registry));
    out
}
