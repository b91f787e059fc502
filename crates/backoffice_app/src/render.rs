use std::fmt::Write;

use backoffice_core::{BulkPhase, PageViewModel, RowView};

/// Renders the page as plain text, one line per row.
pub fn render(view: &PageViewModel) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "== {} == page {}/{} | {} shown of {} | {} selected",
        view.resource,
        view.current_page,
        view.total_pages,
        view.filtered_count,
        view.total_items,
        view.selected_count
    );
    if view.list_loading {
        out.push_str("(loading...)\n");
    }
    if view.bulk_phase == BulkPhase::Running {
        out.push_str("(bulk action running...)\n");
    }
    if let Some(error) = &view.error {
        let _ = writeln!(out, "! {error}");
    }
    if let Some(notice) = &view.notice {
        let _ = writeln!(out, "* {notice}");
    }

    if view.rows.is_empty() {
        out.push_str("   (no items)\n");
    } else {
        let marker = if view.all_visible_selected { "[x]" } else { "[ ]" };
        let _ = writeln!(out, "{marker} page");
    }
    for row in &view.rows {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    if !view.statuses.is_empty() {
        let _ = writeln!(out, "statuses: {}", view.statuses.join(", "));
    }
    out
}

fn render_row(row: &RowView) -> String {
    let mut line = format!(
        "{} {:<12} {:<32} {:<9} {:<10}",
        if row.selected { "[x]" } else { "[ ]" },
        row.id,
        truncate(&row.title, 32),
        row.item_type,
        row.status
    );
    if let Some(owner) = &row.owner_name {
        let _ = write!(line, " {owner}");
        if row.owner_is_professional {
            line.push_str(" (pro)");
        }
    }
    if let Some(category) = &row.category {
        let _ = write!(line, " #{category}");
    }
    if let Some(price) = row.price {
        let _ = write!(line, " {price:.2} x{}", row.quantity);
    }
    if let Some(created_at) = row.created_at {
        let _ = write!(line, " {}", created_at.format("%Y-%m-%d"));
    }
    if row.busy {
        line.push_str(" …");
    }
    line.trim_end().to_string()
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_core::{update, Msg, PageState, Resource};
    use serde_json::json;

    fn loaded_view() -> PageViewModel {
        let state = PageState::new(Resource::Dons).with_page_size(2);
        let (state, _) = update(state, Msg::RefreshRequested);
        let generation = state.generation();
        let (state, _) = update(
            state,
            Msg::ListLoaded {
                generation,
                records: vec![
                    json!({"uuid": "d-1", "titre": "Chaise", "statut": "published",
                           "utilisateur": {"nom": "Awa"}, "created_at": "2024-03-01"}),
                    json!({"uuid": "d-2", "titre": "Table", "prix": 12.5}),
                    json!({"uuid": "d-3", "titre": "Lampe"}),
                ],
            },
        );
        let (state, _) = update(state, Msg::RowToggled("d-1".to_string()));
        state.view()
    }

    #[test]
    fn header_and_rows() {
        let text = render(&loaded_view());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "== dons == page 1/2 | 3 shown of 3 | 1 selected");
        assert_eq!(lines[1], "[ ] page");
        assert!(lines[2].starts_with("[x] d-1"), "{}", lines[2]);
        assert!(lines[2].contains("Chaise"));
        assert!(lines[2].ends_with("2024-03-01"), "{}", lines[2]);
        assert!(lines[3].starts_with("[ ] d-2"));
        assert!(lines[3].contains("12.50 x1"));
        assert!(text.contains("statuses: "));
    }

    #[test]
    fn empty_page_and_messages() {
        let view = PageViewModel {
            error: Some("Could not reach the server".to_string()),
            notice: Some("2 of 2 deleted".to_string()),
            list_loading: true,
            ..PageViewModel::default()
        };
        let text = render(&view);

        assert!(text.contains("(loading...)"));
        assert!(text.contains("! Could not reach the server"));
        assert!(text.contains("* 2 of 2 deleted"));
        assert!(text.contains("(no items)"));
    }

    #[test]
    fn long_titles_are_cut() {
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
