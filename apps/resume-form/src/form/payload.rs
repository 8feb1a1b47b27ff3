use std::collections::BTreeMap;

use serde::Serialize;

use super::EntryFields;

/// JSON body posted to the resume service: flat fields side by side with the
/// three section arrays. Built fresh on every submit.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubmissionPayload {
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
    pub education: Vec<EntryFields>,
    pub experience: Vec<EntryFields>,
    pub projects: Vec<EntryFields>,
}
