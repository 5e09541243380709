//! The "fancy" representation: identity (`id`, `name`) and type specific
//! payload are separated.

use serde_json::Value;

use super::{Record, SelectOption};


/// A record split into identity and payload.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FancyRecord {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) ty: Payload,
}

/// Everything of a record except `id` and `name`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Payload {
    pub(crate) value: Value,
    pub(crate) values: Option<Vec<SelectOption>>,
}

impl From<&Record> for FancyRecord {
    fn from(record: &Record) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            ty: Payload {
                value: record.value.clone(),
                values: record.values.clone(),
            },
        }
    }
}

/// Derives the fancy representation of all given records. Order and number
/// of records are preserved.
pub(crate) fn project(records: &[Record]) -> Vec<FancyRecord> {
    records.iter().map(FancyRecord::from).collect()
}
