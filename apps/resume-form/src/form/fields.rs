//! Indexed field names: `<section>[<index>][<field>]`.

use super::SectionKind;

/// A parsed indexed field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedField<'a> {
    pub kind: SectionKind,
    pub index: usize,
    pub field: &'a str,
}

pub fn field_name(kind: SectionKind, index: usize, field: &str) -> String {
    format!("{}[{}][{}]", kind.key(), index, field)
}

/// Returns `None` for anything that is not exactly `<known section>[<digits>][<name>]`.
pub fn parse_field_name(name: &str) -> Option<IndexedField<'_>> {
    let (section, rest) = name.split_once('[')?;
    let kind = SectionKind::from_key(section)?;

    let (index, rest) = rest.split_once("][")?;
    if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let index = index.parse().ok()?;

    let field = rest.strip_suffix(']')?;
    if field.is_empty() || field.contains('[') || field.contains(']') {
        return None;
    }

    Some(IndexedField { kind, index, field })
}
