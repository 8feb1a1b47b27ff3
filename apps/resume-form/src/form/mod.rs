//! Resume form model.
//!
//! The form is explicit state: a map of flat fields plus one `SectionState` per
//! repeatable section present on the page. Section transitions are pure functions
//! over `SectionState` so they can be tested without a controller.

use std::collections::BTreeMap;

use crate::errors::FormError;

pub mod draft;
pub mod fields;
pub mod payload;

pub use draft::ResumeDraft;
pub use fields::{field_name, parse_field_name};
pub use payload::SubmissionPayload;

/// Non-empty, trimmed values of one collected section block, keyed by field name.
pub type EntryFields = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SectionKind {
    Education,
    Experience,
    Projects,
}

impl SectionKind {
    pub const ALL: [SectionKind; 3] = [
        SectionKind::Education,
        SectionKind::Experience,
        SectionKind::Projects,
    ];

    /// Name used in the payload and in indexed field names.
    pub fn key(self) -> &'static str {
        match self {
            SectionKind::Education => "education",
            SectionKind::Experience => "experience",
            SectionKind::Projects => "projects",
        }
    }

    pub fn container_id(self) -> &'static str {
        match self {
            SectionKind::Education => "educationFields",
            SectionKind::Experience => "experienceFields",
            SectionKind::Projects => "projectsFields",
        }
    }

    /// Template fields, in display order.
    pub fn field_names(self) -> &'static [&'static str] {
        match self {
            SectionKind::Education => &["school", "degree", "year"],
            SectionKind::Experience => &["company", "role", "duration"],
            SectionKind::Projects => &["title", "description"],
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.key() == key)
    }

    pub fn from_container_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.container_id() == id)
    }
}

/// One block of a repeatable section. `index` is the counter value the block was
/// created with; the seed block and the first added block both carry 0.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionEntry {
    pub index: usize,
    values: BTreeMap<String, String>,
}

impl SectionEntry {
    fn blank(kind: SectionKind, index: usize) -> Self {
        Self {
            index,
            values: kind
                .field_names()
                .iter()
                .map(|f| (f.to_string(), String::new()))
                .collect(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    fn set(&mut self, kind: SectionKind, field: &str, value: &str) -> Result<(), FormError> {
        match self.values.get_mut(field) {
            Some(slot) => {
                *slot = value.to_string();
                Ok(())
            }
            None => Err(FormError::UnknownSectionField {
                section: kind.key().to_string(),
                field: field.to_string(),
            }),
        }
    }

    /// Trimmed non-empty values of `field_names`, or `None` when all are blank.
    fn non_blank(&self, field_names: &[&str]) -> Option<EntryFields> {
        let collected: EntryFields = field_names
            .iter()
            .filter_map(|name| {
                let value = self.values.get(*name)?.trim();
                (!value.is_empty()).then(|| (name.to_string(), value.to_string()))
            })
            .collect();
        (!collected.is_empty()).then_some(collected)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionState {
    pub kind: SectionKind,
    /// Index the next added block receives. Only `reset_section` lowers it.
    pub counter: usize,
    pub entries: Vec<SectionEntry>,
}

impl SectionState {
    /// A section as first rendered: one blank seed block, counter at 0.
    pub fn new(kind: SectionKind) -> Self {
        Self {
            kind,
            counter: 0,
            entries: vec![SectionEntry::blank(kind, 0)],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Appends a blank block indexed with the running counter, then advances it.
pub fn add_entry(mut state: SectionState) -> SectionState {
    state
        .entries
        .push(SectionEntry::blank(state.kind, state.counter));
    state.counter += 1;
    state
}

/// Back to a single blank block with the counter at 0.
pub fn reset_section(state: SectionState) -> SectionState {
    SectionState::new(state.kind)
}

/// Collected blocks in block order. Blocks with no non-empty tracked field are
/// skipped. The iterator is `Clone`, so it can be restarted.
pub fn collect_section<'a>(
    state: &'a SectionState,
    field_names: &'a [&'a str],
) -> impl Iterator<Item = EntryFields> + Clone + 'a {
    state
        .entries
        .iter()
        .filter_map(move |entry| entry.non_blank(field_names))
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResumeForm {
    fields: BTreeMap<String, String>,
    defaults: BTreeMap<String, String>,
    sections: BTreeMap<SectionKind, SectionState>,
}

impl Default for ResumeForm {
    fn default() -> Self {
        Self::with_sections(&SectionKind::ALL)
    }
}

impl ResumeForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// A form whose page only carries the given section containers.
    pub fn with_sections(kinds: &[SectionKind]) -> Self {
        Self {
            fields: BTreeMap::new(),
            defaults: BTreeMap::new(),
            sections: kinds
                .iter()
                .map(|&kind| (kind, SectionState::new(kind)))
                .collect(),
        }
    }

    /// Sets a flat field's value and the value `reset` restores it to.
    pub fn set_default(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        check_flat_name(name)?;
        self.defaults.insert(name.to_string(), value.to_string());
        self.fields.insert(name.to_string(), value.to_string());
        Ok(())
    }

    /// Sets a flat field, or a section field when `name` is indexed. The index of an
    /// indexed name is the block's position within its section.
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        if let Some(indexed) = parse_field_name(name) {
            let state = self
                .sections
                .get_mut(&indexed.kind)
                .ok_or_else(|| FormError::MissingContainer(indexed.kind.container_id().to_string()))?;
            let entry = state
                .entries
                .get_mut(indexed.index)
                .ok_or_else(|| FormError::MissingBlock {
                    section: indexed.kind.key().to_string(),
                    position: indexed.index,
                })?;
            return entry.set(indexed.kind, indexed.field, value);
        }

        check_flat_name(name)?;
        self.fields.insert(name.to_string(), value.to_string());
        Ok(())
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn section(&self, kind: SectionKind) -> Option<&SectionState> {
        self.sections.get(&kind)
    }

    /// Adds a block to `kind` and returns its position.
    pub fn add_entry(&mut self, kind: SectionKind) -> Result<usize, FormError> {
        let state = self
            .sections
            .remove(&kind)
            .ok_or_else(|| FormError::MissingContainer(kind.container_id().to_string()))?;
        let state = add_entry(state);
        let position = state.len() - 1;
        self.sections.insert(kind, state);
        Ok(position)
    }

    /// Collects the section rendered in `container_id`. An unknown or absent
    /// container yields nothing.
    pub fn collect_section<'a>(
        &'a self,
        container_id: &str,
        field_names: &'a [&'a str],
    ) -> impl Iterator<Item = EntryFields> + Clone + 'a {
        SectionKind::from_container_id(container_id)
            .and_then(|kind| self.sections.get(&kind))
            .into_iter()
            .flat_map(move |state| collect_section(state, field_names))
    }

    pub fn to_payload(&self) -> SubmissionPayload {
        let collect = |kind: SectionKind| -> Vec<EntryFields> {
            self.collect_section(kind.container_id(), kind.field_names())
                .collect()
        };

        SubmissionPayload {
            fields: self.fields.clone(),
            education: collect(SectionKind::Education),
            experience: collect(SectionKind::Experience),
            projects: collect(SectionKind::Projects),
        }
    }

    /// Flat fields back to their defaults; each section back to one blank block.
    pub fn reset(&mut self) {
        self.fields = self.defaults.clone();
        self.sections = std::mem::take(&mut self.sections)
            .into_iter()
            .map(|(kind, state)| (kind, reset_section(state)))
            .collect();
    }

    /// Fills the form from a draft, adding blocks where the draft has more
    /// entries than the form. A rejected draft leaves the form untouched.
    pub fn apply_draft(&mut self, draft: &ResumeDraft) -> Result<(), FormError> {
        let mut staged = self.clone();
        staged.fill_from(draft)?;
        *self = staged;
        Ok(())
    }

    fn fill_from(&mut self, draft: &ResumeDraft) -> Result<(), FormError> {
        for (name, value) in &draft.fields {
            self.set_field(name, value)?;
        }

        for kind in SectionKind::ALL {
            let entries = draft.entries(kind);
            if entries.is_empty() {
                continue;
            }
            let present = self
                .section(kind)
                .map(SectionState::len)
                .ok_or_else(|| FormError::MissingContainer(kind.container_id().to_string()))?;
            for _ in present..entries.len() {
                self.add_entry(kind)?;
            }
            for (position, entry) in entries.iter().enumerate() {
                for (field, value) in entry {
                    self.set_field(&field_name(kind, position, field), value)?;
                }
            }
        }
        Ok(())
    }
}

fn check_flat_name(name: &str) -> Result<(), FormError> {
    if SectionKind::from_key(name).is_some() {
        return Err(FormError::ReservedField(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(form: &mut ResumeForm, name: &str, value: &str) {
        form.set_field(name, value).unwrap();
    }

    #[test]
    fn test_new_section_has_seed_block_and_zero_counter() {
        let state = SectionState::new(SectionKind::Education);
        assert_eq!(state.counter, 0);
        assert_eq!(state.len(), 1);
        assert_eq!(state.entries[0].index, 0);
    }

    #[test]
    fn test_add_entry_uses_running_counter() {
        let state = SectionState::new(SectionKind::Experience);
        let state = add_entry(add_entry(add_entry(state)));

        assert_eq!(state.counter, 3);
        let indices: Vec<usize> = state.entries.iter().map(|e| e.index).collect();
        assert_eq!(indices, vec![0, 0, 1, 2]);
    }

    #[test]
    fn test_counters_are_independent() {
        let mut form = ResumeForm::new();
        form.add_entry(SectionKind::Education).unwrap();
        form.add_entry(SectionKind::Education).unwrap();
        form.add_entry(SectionKind::Projects).unwrap();

        assert_eq!(form.section(SectionKind::Education).unwrap().counter, 2);
        assert_eq!(form.section(SectionKind::Experience).unwrap().counter, 0);
        assert_eq!(form.section(SectionKind::Projects).unwrap().counter, 1);
    }

    #[test]
    fn test_add_entry_missing_container() {
        let mut form = ResumeForm::with_sections(&[SectionKind::Education]);
        assert_eq!(
            form.add_entry(SectionKind::Projects),
            Err(FormError::MissingContainer("projectsFields".to_string()))
        );
        assert!(form.section(SectionKind::Projects).is_none());
    }

    #[test]
    fn test_collect_drops_blank_entries_and_trims() {
        let mut form = ResumeForm::new();
        form.add_entry(SectionKind::Education).unwrap();
        form.add_entry(SectionKind::Education).unwrap();
        fill(&mut form, "education[0][school]", "  A  ");
        fill(&mut form, "education[1][school]", "   ");
        fill(&mut form, "education[1][degree]", "\t");
        fill(&mut form, "education[2][year]", "2023");

        let collected: Vec<EntryFields> = form
            .collect_section("educationFields", SectionKind::Education.field_names())
            .collect();

        assert_eq!(collected.len(), 2);
        assert_eq!(collected[0].get("school").map(String::as_str), Some("A"));
        assert_eq!(collected[0].len(), 1);
        assert_eq!(collected[1].get("year").map(String::as_str), Some("2023"));
    }

    #[test]
    fn test_collect_only_reads_listed_fields() {
        let mut form = ResumeForm::new();
        fill(&mut form, "projects[0][title]", "Compiler");
        fill(&mut form, "projects[0][description]", "A toy compiler");

        let collected: Vec<EntryFields> = form.collect_section("projectsFields", &["title"]).collect();

        assert_eq!(collected.len(), 1);
        assert!(!collected[0].contains_key("description"));
    }

    #[test]
    fn test_collect_is_restartable() {
        let mut form = ResumeForm::new();
        fill(&mut form, "experience[0][company]", "Acme");

        let iter = form.collect_section("experienceFields", SectionKind::Experience.field_names());
        let first: Vec<EntryFields> = iter.clone().collect();
        let second: Vec<EntryFields> = iter.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_collect_unknown_container_is_empty() {
        let form = ResumeForm::new();
        assert_eq!(form.collect_section("awardsFields", &["title"]).count(), 0);
    }

    #[test]
    fn test_first_k_of_n_filled_entries() {
        for kind in SectionKind::ALL {
            let mut form = ResumeForm::new();
            // seed block + 4 added = 5 blocks; fill the first 3
            for _ in 0..4 {
                form.add_entry(kind).unwrap();
            }
            let field = kind.field_names()[0];
            for position in 0..3 {
                fill(
                    &mut form,
                    &field_name(kind, position, field),
                    &format!("value-{position}"),
                );
            }

            let collected: Vec<EntryFields> = form
                .collect_section(kind.container_id(), kind.field_names())
                .collect();
            let values: Vec<&str> = collected.iter().map(|e| e[field].as_str()).collect();
            assert_eq!(values, vec!["value-0", "value-1", "value-2"], "{kind:?}");
        }
    }

    #[test]
    fn test_set_field_rejections() {
        let mut form = ResumeForm::new();
        assert_eq!(
            form.set_field("education", "x"),
            Err(FormError::ReservedField("education".to_string()))
        );
        assert!(matches!(
            form.set_field("education[0][gpa]", "4.0"),
            Err(FormError::UnknownSectionField { .. })
        ));
        assert!(matches!(
            form.set_field("education[3][school]", "A"),
            Err(FormError::MissingBlock { position: 3, .. })
        ));
    }

    #[test]
    fn test_reset_restores_defaults_and_single_blocks() {
        let mut form = ResumeForm::new();
        form.set_default("email", "ada@example.com").unwrap();
        fill(&mut form, "email", "other@example.com");
        fill(&mut form, "fullName", "Ada");
        for kind in SectionKind::ALL {
            form.add_entry(kind).unwrap();
            form.add_entry(kind).unwrap();
        }
        fill(&mut form, "education[0][school]", "A");

        form.reset();

        assert_eq!(form.field("email"), Some("ada@example.com"));
        assert_eq!(form.field("fullName"), None);
        for kind in SectionKind::ALL {
            let section = form.section(kind).unwrap();
            assert_eq!(section.counter, 0);
            assert_eq!(section.len(), 1);
        }
        assert_eq!(
            form.section(SectionKind::Education).unwrap().entries[0].get("school"),
            Some("")
        );
    }

    #[test]
    fn test_apply_draft_adds_blocks_as_needed() {
        let draft: ResumeDraft = serde_json::from_str(
            r#"{
                "fields": {"fullName": "Ada Lovelace"},
                "education": [{"school": "A"}, {"school": "B", "year": "1835"}],
                "projects": [{"title": "Engine"}]
            }"#,
        )
        .unwrap();
        let mut form = ResumeForm::new();

        form.apply_draft(&draft).unwrap();

        assert_eq!(form.field("fullName"), Some("Ada Lovelace"));
        assert_eq!(form.section(SectionKind::Education).unwrap().len(), 2);
        assert_eq!(form.section(SectionKind::Experience).unwrap().len(), 1);
        let payload = form.to_payload();
        assert_eq!(payload.education.len(), 2);
        assert_eq!(payload.education[1]["year"], "1835");
        assert_eq!(payload.projects[0]["title"], "Engine");
        assert!(payload.experience.is_empty());
    }

    #[test]
    fn test_rejected_draft_leaves_form_untouched() {
        let draft: ResumeDraft = serde_json::from_str(
            r#"{
                "fields": {"fullName": "Ada Lovelace"},
                "education": [{"school": "A"}, {"school": "B", "gpa": "4.0"}]
            }"#,
        )
        .unwrap();
        let mut form = ResumeForm::new();
        form.set_field("summary", "kept").unwrap();
        let before = form.clone();

        let err = form.apply_draft(&draft).unwrap_err();

        assert_eq!(
            err,
            FormError::UnknownSectionField {
                section: "education".to_string(),
                field: "gpa".to_string(),
            }
        );
        assert_eq!(form, before);
        assert_eq!(form.field("fullName"), None);
        assert_eq!(form.section(SectionKind::Education).unwrap().len(), 1);
    }
}
