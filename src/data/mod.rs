//! The sample data served by the API.
//!
//! Records are stored *untagged*: `value` is a plain JSON value and there is
//! no field saying which kind of form field a record is. The kind is derived
//! from the shape of the record by the functions in [`resolve`]. The fancy
//! representation of the same data is derived by [`projection`].

use std::{fs, path::{Path, PathBuf}};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::prelude::*;

pub(crate) mod projection;
pub(crate) mod resolve;

pub(crate) use self::projection::{project, FancyRecord, Payload};


/// Where the sample data comes from.
#[derive(Debug, confique::Config)]
pub(crate) struct DataConfig {
    /// Path to a YAML (or JSON) file containing a list of field records. If
    /// not set, the built-in sample set is used. Each record needs an `id`
    /// and a `name`, plus a `value` and optionally `values`. Example:
    ///
    ///    - id: "1"
    ///      name: "Color"
    ///      value: "red"
    ///      values:
    ///        - { label: "Red", value: "red" }
    ///        - { label: "Blue", value: "blue" }
    pub(crate) fixture: Option<PathBuf>,
}

/// A form field as stored, without explicit type tag.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct Record {
    pub(crate) id: String,
    pub(crate) name: String,

    /// Either a string or a number for all valid records. Anything else
    /// cannot be resolved to a field type.
    #[serde(default)]
    pub(crate) value: Value,

    /// Only present for select fields.
    #[serde(default)]
    pub(crate) values: Option<Vec<SelectOption>>,
}

/// One option of a select field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct SelectOption {
    pub(crate) label: String,
    pub(crate) value: String,
}

/// All data the API serves. Created once at startup and never modified
/// afterwards.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SampleData {
    records: Vec<Record>,
    fancy: Vec<FancyRecord>,
}

impl SampleData {
    /// Creates the data store from the given records. The fancy
    /// representation is derived right away.
    pub(crate) fn new(records: Vec<Record>) -> Self {
        let fancy = project(&records);
        Self { records, fancy }
    }

    /// The three built-in example records: one text, one number and one
    /// select field.
    pub(crate) fn builtin() -> Self {
        let select_options = [("Label 1", "1"), ("Label 2", "2"), ("Label 3", "3")]
            .into_iter()
            .map(|(label, value)| SelectOption { label: label.into(), value: value.into() })
            .collect();

        Self::new(vec![
            Record {
                id: "1".into(),
                name: "TextField Example".into(),
                value: json!("Some value"),
                values: None,
            },
            Record {
                id: "2".into(),
                name: "NumberField Example".into(),
                value: json!(2),
                values: None,
            },
            Record {
                id: "3".into(),
                name: "SelectField Example".into(),
                value: json!("3"),
                values: Some(select_options),
            },
        ])
    }

    /// Loads records from a YAML file. As JSON is a subset of YAML, JSON files
    /// work as well.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read data fixture '{}'", path.display()))?;
        let records: Vec<Record> = serde_yaml::from_str(&raw)
            .with_context(|| format!("failed to parse data fixture '{}'", path.display()))?;

        // Unresolvable records are accepted here, the API reports them when
        // they are queried.
        for record in &records {
            if resolve::resolve_field_type(record).is_none() {
                warn!(
                    "Record '{}' in '{}' has a value of unsupported type, it cannot be \
                        resolved to any field type: {}",
                    record.id,
                    path.display(),
                    record.value,
                );
            }
        }

        records.pipe(Self::new).pipe(Ok)
    }

    /// Loads the fixture configured in `config` or falls back to the built-in
    /// sample set.
    pub(crate) fn from_config(config: &DataConfig) -> Result<Self> {
        match &config.fixture {
            Some(path) => {
                let data = Self::load(path)?;
                info!("Loaded {} records from '{}'", data.records.len(), path.display());
                Ok(data)
            }
            None => {
                debug!("No data fixture configured, using built-in sample data");
                Ok(Self::builtin())
            }
        }
    }

    pub(crate) fn records(&self) -> &[Record] {
        &self.records
    }

    pub(crate) fn fancy_records(&self) -> &[FancyRecord] {
        &self.fancy
    }
}


#[cfg(test)]
mod tests {
    use std::fs;
    use serde_json::json;

    use super::{SampleData, SelectOption};

    #[test]
    fn builtin_has_three_records_in_order() {
        let data = SampleData::builtin();
        let ids: Vec<_> = data.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3"]);
        assert_eq!(data.fancy_records().len(), 3);
    }

    #[test]
    fn builtin_select_options() {
        let data = SampleData::builtin();
        let select = &data.records()[2];
        assert_eq!(select.name, "SelectField Example");
        assert_eq!(select.value, json!("3"));
        assert_eq!(select.values.as_deref(), Some(&[
            SelectOption { label: "Label 1".into(), value: "1".into() },
            SelectOption { label: "Label 2".into(), value: "2".into() },
            SelectOption { label: "Label 3".into(), value: "3".into() },
        ][..]));
    }

    #[test]
    fn load_yaml_fixture() {
        let path = std::env::temp_dir()
            .join(format!("fieldql-fixture-{}.yaml", std::process::id()));
        let yaml = "\
- id: \"a\"
  name: \"Age\"
  value: 33
- id: \"b\"
  name: \"Flag\"
  value: true
- id: \"c\"
  name: \"Missing value\"
";
        fs::write(&path, yaml).unwrap();

        let data = SampleData::load(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(data.records().len(), 3);
        assert_eq!(data.records()[0].value, json!(33));
        assert_eq!(data.records()[1].value, json!(true));
        assert!(data.records()[2].value.is_null());
        assert!(data.records()[2].values.is_none());
    }

    #[test]
    fn load_json_fixture() {
        let path = std::env::temp_dir()
            .join(format!("fieldql-fixture-{}.json", std::process::id()));
        fs::write(&path, r#"[
            { "id": "x", "name": "Pick", "value": "b", "values": [{ "label": "B", "value": "b" }] }
        ]"#).unwrap();

        let data = SampleData::load(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(data.records()[0].values.as_ref().map(Vec::len), Some(1));
        assert_eq!(data.fancy_records()[0].id, "x");
    }

    #[test]
    fn load_missing_file_fails() {
        let path = std::env::temp_dir().join("fieldql-does-not-exist.yaml");
        assert!(SampleData::load(&path).is_err());
    }
}
