use serde::{Deserialize, Serialize};

/// A single technology entry in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnologyRecord {
    /// Display name, never empty
    pub name: String,
    /// Year the technology was created
    #[serde(
        default,
        rename = "year",
        alias = "yearCreated",
        skip_serializing_if = "Option::is_none"
    )]
    pub year_created: Option<i64>,
    /// Short description (a few sentences)
    #[serde(default)]
    pub description: String,
    /// Official website
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Logo image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl TechnologyRecord {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            year_created: None,
            description: description.into(),
            link: None,
            logo: None,
        }
    }

    pub fn with_year(mut self, year: i64) -> Self {
        self.year_created = Some(year);
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn with_logo(mut self, logo: impl Into<String>) -> Self {
        self.logo = Some(logo.into());
        self
    }

    /// Case-insensitive substring match against the name.
    /// `needle` must already be lowercased.
    pub fn name_contains(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
    }
}
