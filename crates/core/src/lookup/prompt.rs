//! Prompt template bundled at compile time.

/// Technology lookup prompt; `{term}` is replaced by the search term
pub const TECHNOLOGY_LOOKUP: &str = include_str!("defaults/technology_lookup.md");

/// Render the lookup prompt for `term`
pub fn technology_prompt(term: &str) -> String {
    // Quotes would end the quoted term early.
    let term = term.replace('"', "'");
    TECHNOLOGY_LOOKUP.trim_end().replace("{term}", &term)
}
