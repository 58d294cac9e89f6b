use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Left-aligned columns separated by two spaces, with a dashed rule under the header.
pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    println!("{}", pad_row(headers.iter().copied(), &widths));
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    println!("{}", rule.join("  "));
    for row in &rows {
        println!("{}", pad_row(row.iter().map(String::as_str), &widths));
    }
}

fn pad_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, &w)| format!("{cell:w$}"))
        .collect();
    padded.join("  ").trim_end().to_string()
}

/// Indented bullet list under a heading; prints nothing for an empty list.
pub fn print_section<T: std::fmt::Display>(heading: &str, items: &[T]) {
    if items.is_empty() {
        return;
    }
    println!("{heading}:");
    for item in items {
        println!("  - {item}");
    }
}
