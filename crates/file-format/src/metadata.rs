use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Project metadata stored alongside the parametric glider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    pub name: String,
    pub author: String,
    #[serde(default)]
    pub description: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl ProjectMetadata {
    pub fn new(name: impl Into<String>, author: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            author: author.into(),
            description: String::new(),
            created: now,
            modified: now,
        }
    }

    /// Bump the modification timestamp, e.g. right before saving.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }
}
