//! The read-only HTML view at `GET /`.

use axum::extract::State;
use axum::response::{Html, Response};
use std::sync::Arc;

use crate::app::AppState;
use crate::http::engine_error;

static INDEX_HTML: &str = include_str!("../../static/index.html");
const ROWS_MARKER: &str = "<!-- rows -->";

/// Serve the schedule as a plain HTML table.
pub async fn index_handler(State(state): State<Arc<AppState>>) -> Result<Html<String>, Response> {
    let view = state
        .engine
        .get_schedule()
        .map_err(|e| engine_error("index", e))?;

    let mut rows = String::new();
    for (user, date) in view.users.iter().zip(&view.dates) {
        rows.push_str(&format!(
            "      <tr><td>{}</td><td>{}</td></tr>\n",
            escape(&user.name),
            date.format("%a, %b %-d, %Y"),
        ));
    }

    Ok(Html(INDEX_HTML.replacen(ROWS_MARKER, rows.trim_end(), 1)))
}

/// Minimal HTML escaping for presenter names.
fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_neutralizes_markup() {
        assert_eq!(escape("a<b>&\"c\""), "a&lt;b&gt;&amp;&quot;c&quot;");
    }

    #[test]
    fn template_has_rows_marker() {
        assert!(INDEX_HTML.contains(ROWS_MARKER));
    }
}
