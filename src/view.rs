//! Plain-text projection of a `SearchView`
//!
//! Used by the CLI to print the dropdown state after each change.

use crate::suggest::SearchView;

/// Render `view` as lines of text, without a trailing newline.
pub fn render_view(view: &SearchView) -> String {
    let mut lines = vec![format!("Query: {:?}", view.query)];

    let status = if view.is_loading {
        "Status: loading".to_string()
    } else if let Some(error) = &view.error {
        format!("Status: error: {}", error)
    } else if view.is_open {
        format!("Status: open ({} suggestions)", view.suggestions.len())
    } else {
        "Status: closed".to_string()
    };
    lines.push(status);

    if view.is_open {
        if view.suggestions.is_empty() {
            lines.push("Suggestions: none".to_string());
        } else {
            lines.push("Suggestions:".to_string());
            for (index, item) in view.suggestions.iter().enumerate() {
                let marker = if view.selected_index == Some(index) {
                    ">"
                } else {
                    " "
                };
                lines.push(format!("  {} {} [{}]", marker, item.name, item.id));
            }
        }
    }

    if view.recent_searches.is_empty() {
        lines.push("Recent: none".to_string());
    } else {
        lines.push(format!("Recent: {}", view.recent_searches.join(", ")));
    }

    lines.join("\n")
}
