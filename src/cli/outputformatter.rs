use serde_json::Value;
use terminal_size::{terminal_size, Width};

// Render backend list responses (arrays of records) as an ASCII table.
// Returns None when the value has no tabular shape; callers then fall back to pretty JSON.
pub fn render_table(val: &Value) -> Option<String> {
    let (cols, rows) = table_shape(val)?;
    if rows.is_empty() { return None; }

    // Cap each column so a wide record still fits the terminal
    let max_col_width = (terminal_width() / cols.len().max(1)).clamp(8, 40);
    let mut widths: Vec<usize> = cols.iter().map(|s| visible_len(s).min(max_col_width)).collect();
    for r in &rows {
        for (i, cell) in r.iter().enumerate().take(cols.len()) {
            let w = visible_len(cell);
            if w > widths[i] { widths[i] = w.min(max_col_width); }
        }
    }

    let sep = build_separator(&widths);
    let mut out = Vec::with_capacity(rows.len() + 5);
    out.push(sep.clone());
    out.push(build_row(&cols, &widths));
    out.push(sep.clone());
    for r in &rows {
        out.push(build_row(r, &widths));
    }
    out.push(sep);
    out.push(format!("rows: {}", rows.len()));
    Some(out.join("\n"))
}

pub fn print_value(val: &Value) {
    match render_table(val) {
        Some(table) => println!("{}", table),
        None => println!("{}", serde_json::to_string_pretty(val).unwrap_or_else(|_| val.to_string())),
    }
}

// Arrays of objects use the union of keys across rows, in first-seen order
// (serde_json is built with preserve_order, so this is the backend's field order);
// arrays of scalars become a single "value" column.
fn table_shape(val: &Value) -> Option<(Vec<String>, Vec<Vec<String>>)> {
    let Value::Array(arr) = val else { return None; };
    if arr.is_empty() { return None; }
    if arr.iter().all(|el| el.is_object()) {
        let mut keys: Vec<String> = Vec::new();
        for el in arr {
            if let Value::Object(map) = el {
                for k in map.keys() { if !keys.contains(k) { keys.push(k.clone()); } }
            }
        }
        if keys.is_empty() { return None; }
        let rows = arr
            .iter()
            .map(|el| keys.iter().map(|k| el.get(k).map(to_cell_string).unwrap_or_default()).collect())
            .collect();
        Some((keys, rows))
    } else {
        let rows = arr.iter().map(|el| vec![to_cell_string(el)]).collect();
        Some((vec!["value".to_string()], rows))
    }
}

fn to_cell_string(v: &Value) -> String {
    match v {
        Value::Null => String::from("NULL"),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        // keep objects/arrays compact
        other => other.to_string(),
    }
}

fn build_separator(widths: &[usize]) -> String {
    let mut s = String::new();
    s.push('+');
    for w in widths {
        s.push_str(&"-".repeat(*w + 2));
        s.push('+');
    }
    s
}

fn build_row(cells: &[String], widths: &[usize]) -> String {
    let mut s = String::new();
    s.push('|');
    for (i, w) in widths.iter().enumerate() {
        let cell = cells.get(i).cloned().unwrap_or_default();
        let (text, align_right) = (truncate(&cell, *w), is_numeric_like(&cell));
        let pad = w.saturating_sub(visible_len(&text));
        s.push(' ');
        if align_right {
            s.push_str(&" ".repeat(pad));
            s.push_str(&text);
        } else {
            s.push_str(&text);
            s.push_str(&" ".repeat(pad));
        }
        s.push(' ');
        s.push('|');
    }
    s
}

fn truncate(s: &str, max: usize) -> String {
    let len = s.chars().count();
    if len <= max { return s.to_string(); }
    if max <= 1 { return "…".to_string(); }
    s.chars().take(max - 1).collect::<String>() + "…"
}

fn is_numeric_like(s: &str) -> bool {
    // crude detection for aligning numbers to right
    let st = s.trim();
    if st.is_empty() { return false; }
    let mut has_digit = false;
    for ch in st.chars() {
        if ch.is_ascii_digit() { has_digit = true; continue; }
        if ".-+eE,_".contains(ch) { continue; }
        return false;
    }
    has_digit
}

fn visible_len(s: &str) -> usize { s.chars().count() }

fn terminal_width() -> usize {
    match terminal_size() {
        Some((Width(w), _)) => (w as usize).saturating_sub(4).max(40),
        None => 120,
    }
}
