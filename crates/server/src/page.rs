//! # Search Page
//!
//! Server-rendered search form. `GET /?term=...` runs the lookup and renders
//! the result cards below the form.

use axum::{
    extract::{Query, State},
    response::Html,
};
use serde::Deserialize;
use techlookup_core::lookup::EMPTY_TERM_MESSAGE;
use techlookup_core::render::{escape_html, render_html};
use techlookup_core::LookupError;

use crate::SharedState;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    term: Option<String>,
}

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 960px; margin: 2rem auto; padding: 0 1rem; }
form { display: flex; gap: .5rem; margin-bottom: 1.5rem; }
input[type=text] { flex: 1; padding: .5rem; }
.card-container { display: grid; grid-template-columns: repeat(auto-fill, minmax(260px, 1fr)); gap: 1rem; }
.card { border: 1px solid #ddd; border-radius: 8px; padding: 1rem; }
.card-logo { max-height: 48px; }
.ai-badge { font-size: .7em; color: #7a4cc2; }
.error-message { color: #b00020; }
"#;

pub async fn search_page(
    State(state): State<SharedState>,
    Query(query): Query<PageQuery>,
) -> Html<String> {
    let (term, results) = match query.term {
        None => (String::new(), String::new()),
        Some(term) => {
            let results = match state.lookup.lookup(&term).await {
                Ok(outcome) => render_html(&outcome),
                Err(e) => {
                    tracing::error!("Search page lookup failed: {}", e);
                    format!("<p class=\"error-message\">{}</p>", failure_message(&e))
                }
            };
            (term, results)
        }
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Techlookup</title>
<style>{style}</style>
</head>
<body>
<h1>Techlookup</h1>
<form method="get" action="/">
  <input type="text" name="term" value="{term}" placeholder="{placeholder} (* lists everything)" autofocus>
  <button type="submit">Search</button>
</form>
<section class="card-container">
{results}</section>
</body>
</html>
"#,
        style = STYLE,
        term = escape_html(&term),
        placeholder = EMPTY_TERM_MESSAGE,
        results = results,
    ))
}

fn failure_message(err: &LookupError) -> &'static str {
    match err {
        LookupError::CatalogUnavailable(_) => "Could not load the data. Try again later.",
        LookupError::AiService(_) | LookupError::AiFormat { .. } => {
            "The AI search failed. Try again later."
        }
    }
}
