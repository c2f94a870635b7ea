use serde_json::Value;

use crate::view::{result_view::PageView, tables::TablesPanel, ResultView, ViewPhase};

/// Pixels per character cell when drawing column widths as text.
const PX_PER_CELL: u32 = 8;

pub fn render(view: &ResultView) -> String {
    let mut out = String::new();
    match view.phase() {
        ViewPhase::Idle => {}
        ViewPhase::Loading => out.push_str("running query...\n"),
        ViewPhase::Displaying => out.push_str(&render_page(&view.page())),
        ViewPhase::Error(e) => {
            out.push_str(&format!("error: {}\n", e.message()));
            let page = view.page();
            if page.total_records > 0 {
                out.push_str(&render_page(&page));
            }
        }
    }
    out
}

pub fn render_page(page: &PageView<'_>) -> String {
    if page.total_records == 0 {
        return format!("(no rows)\n{} | page {}\n", page.record_info, page.page_info);
    }

    let cells: Vec<usize> = page
        .columns
        .iter()
        .map(|c| (c.width / PX_PER_CELL).max(2) as usize)
        .collect();

    let mut out = String::new();
    let header: Vec<String> = page
        .columns
        .iter()
        .zip(&cells)
        .map(|(c, w)| fit(c.name, *w))
        .collect();
    out.push_str(&header.join(" | "));
    out.push('\n');
    let rule: Vec<String> = cells.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("-+-"));
    out.push('\n');

    for row in page.rows {
        let line: Vec<String> = page
            .columns
            .iter()
            .zip(&cells)
            .map(|(c, w)| fit(&cell_text(row.get(c.name)), *w))
            .collect();
        out.push_str(&line.join(" | "));
        out.push('\n');
    }

    let prev = if page.can_previous { "<" } else { " " };
    let next = if page.can_next { ">" } else { " " };
    out.push_str(&format!(
        "{} | page {} | {} per page {prev}{next}\n",
        page.record_info, page.page_info, page.page_size
    ));
    out
}

pub fn render_tables(panel: &TablesPanel) -> String {
    match panel {
        TablesPanel::Idle => String::new(),
        TablesPanel::Loading => "loading tables...\n".to_string(),
        TablesPanel::Error(e) => format!("table list error: {e}\n"),
        TablesPanel::Loaded(t) if t.is_empty() => "(no tables)\n".to_string(),
        TablesPanel::Loaded(t) => t.iter().map(|name| format!("  {name}\n")).collect(),
    }
}

fn cell_text(v: Option<&Value>) -> String {
    match v {
        None | Some(Value::Null) => "NULL".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Pads or cuts `s` to exactly `width` characters.
fn fit(s: &str, width: usize) -> String {
    let s: String = s.chars().map(|c| if c.is_control() { ' ' } else { c }).collect();
    let len = s.chars().count();
    if len <= width {
        format!("{s:<width$}")
    } else {
        let mut cut: String = s.chars().take(width.saturating_sub(1)).collect();
        cut.push('~');
        cut
    }
}
