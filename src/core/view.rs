use crate::domain::model::{LoadStatus, SidebarRow, Store};

pub const EMPTY_STATE_LOADING: &str = "Loading stores…";
pub const EMPTY_STATE_NO_STORES: &str = "No stores to show.";

/// HTML placed into the shared info window for one store.
pub fn info_window_html(store: &Store) -> String {
    format!(
        concat!(
            "<div class=\"info-window m-2\">",
            "<h3 class=\"font-bold text-lg\">{}</h3>",
            "<p class=\"italic mb-2\">{}</p>",
            "<p class=\"font-medium\">{}</p>",
            "</div>"
        ),
        escape_html(&store.name),
        escape_html(&store.description),
        escape_html(&store.timing),
    )
}

/// Feed text is untrusted; it ends up inside provider-rendered HTML.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Message shown in place of the list, if any.
pub fn empty_state(status: &LoadStatus, row_count: usize) -> Option<String> {
    match status {
        LoadStatus::Pending => Some(EMPTY_STATE_LOADING.to_string()),
        LoadStatus::Failed { message } => Some(message.clone()),
        LoadStatus::Ready(_) if row_count == 0 => Some(EMPTY_STATE_NO_STORES.to_string()),
        LoadStatus::Ready(_) => None,
    }
}

pub fn render_sidebar_row(position: usize, row: &SidebarRow) -> String {
    let marker = if row.active { ">" } else { " " };
    if row.timing.is_empty() {
        format!("{} {:>3}. {}", marker, position, row.name)
    } else {
        format!("{} {:>3}. {} (Timing: {})", marker, position, row.name, row.timing)
    }
}

/// Plain-text rendition of the info window, used by the console.
pub fn render_store_details(store: &Store) -> String {
    let mut lines = vec![store.name.clone()];
    if !store.description.is_empty() {
        lines.push(format!("  {}", store.description));
    }
    if !store.timing.is_empty() {
        lines.push(format!("  Timing: {}", store.timing));
    }
    lines.push(format!("  Location: {}", store.location));
    lines.join("\n")
}
