//! Prepared resume content loaded from JSON, used to fill a form without a page.
//!
//! ```json
//! {
//!   "fields": { "fullName": "Ada Lovelace", "summary": "..." },
//!   "education": [ { "school": "...", "degree": "...", "year": "1835" } ],
//!   "experience": [],
//!   "projects": [ { "title": "Analytical Engine notes" } ]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use super::{EntryFields, SectionKind};

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ResumeDraft {
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
    #[serde(default)]
    pub education: Vec<EntryFields>,
    #[serde(default)]
    pub experience: Vec<EntryFields>,
    #[serde(default)]
    pub projects: Vec<EntryFields>,
}

impl ResumeDraft {
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read draft {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Draft {} is not a valid resume draft", path.display()))
    }

    pub fn entries(&self, kind: SectionKind) -> &[EntryFields] {
        match kind {
            SectionKind::Education => &self.education,
            SectionKind::Experience => &self.experience,
            SectionKind::Projects => &self.projects,
        }
    }
}
