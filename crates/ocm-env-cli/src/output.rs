use ocm_env_core::ProgressEvent;
use serde::Serialize;

/// Pretty-printed JSON for one-shot command results.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One compact JSON object per line, for streams a caller can tail.
pub fn print_json_line<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

/// Renders progress events as `[ NN%] message`, accumulating increments.
pub struct ProgressPrinter {
    total: u32,
    json: bool,
}

impl ProgressPrinter {
    pub fn new(json: bool) -> Self {
        Self { total: 0, json }
    }

    pub fn report(&mut self, event: &ProgressEvent) {
        self.total = (self.total + u32::from(event.increment)).min(100);
        if !self.json {
            println!("{}", self.line(event));
        } else if let Err(e) = print_json_line(event) {
            tracing::warn!(error = %e, "failed to encode progress event");
        }
    }

    fn line(&self, event: &ProgressEvent) -> String {
        format!("[{:>3}%] {}", self.total, event.message)
    }
}

pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    print!("{}", render_table(headers, &rows));
}

/// Left-aligned columns separated by two spaces, with a dashed rule under
/// the header. Cells beyond the header count are dropped.
fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .map(String::len)
                .fold(header.len(), usize::max)
        })
        .collect();

    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    let mut out = render_row(headers.iter().copied(), &widths);
    out.push_str(&render_row(rule.iter().map(String::as_str), &widths));
    for row in rows {
        out.push_str(&render_row(row.iter().map(String::as_str), &widths));
    }
    out
}

fn render_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let line = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    format!("{}\n", line.trim_end())
}
