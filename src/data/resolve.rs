//! Figuring out which kind of field a record represents.
//!
//! Records carry no explicit type tag, so the kind is inferred from the shape:
//! the JSON type of `value` and whether `values` is present. The rules are the
//! same for plain records and fancy payloads:
//!
//! - string `value` with `values` present: select
//! - string `value` otherwise: text
//! - numeric `value` (integer or float): number
//! - anything else (bool, null, object, array): unresolvable
//!
//! The `values` check comes first, so a text record that accidentally carries
//! `values` is treated as a select field.

use serde_json::Value;

use super::{Payload, Record, SelectOption};


/// The three kinds of form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Variant {
    Text,
    Number,
    Select,
}

impl Variant {
    /// Name of the GraphQL object type implementing `Field` for this variant.
    pub(crate) fn field_type_name(self) -> &'static str {
        match self {
            Self::Text => "TextField",
            Self::Number => "NumberField",
            Self::Select => "SelectField",
        }
    }

    /// Name of the GraphQL member type of `FancyFieldTypeUnion` for this variant.
    pub(crate) fn fancy_type_name(self) -> &'static str {
        match self {
            Self::Text => "FancyFieldTextType",
            Self::Number => "FancyFieldNumberType",
            Self::Select => "FancyFieldSelectType",
        }
    }
}

/// Something with the shape of a form field payload.
pub(crate) trait Shape {
    fn value(&self) -> &Value;
    fn values(&self) -> Option<&[SelectOption]>;
}

impl Shape for Record {
    fn value(&self) -> &Value {
        &self.value
    }

    fn values(&self) -> Option<&[SelectOption]> {
        self.values.as_deref()
    }
}

impl Shape for Payload {
    fn value(&self) -> &Value {
        &self.value
    }

    fn values(&self) -> Option<&[SelectOption]> {
        self.values.as_deref()
    }
}

/// Determines the variant of `candidate` from its shape. Returns `None` if
/// `value` has a type none of the variants can hold.
pub(crate) fn classify(candidate: &impl Shape) -> Option<Variant> {
    match candidate.value() {
        Value::String(_) if candidate.values().is_some() => Some(Variant::Select),
        Value::String(_) => Some(Variant::Text),
        Value::Number(_) => Some(Variant::Number),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Returns the name of the `Field` implementor `record` represents.
pub(crate) fn resolve_field_type(record: &Record) -> Option<&'static str> {
    classify(record).map(Variant::field_type_name)
}

/// Returns the name of the `FancyFieldTypeUnion` member `payload` represents.
pub(crate) fn resolve_fancy_type(payload: &Payload) -> Option<&'static str> {
    classify(payload).map(Variant::fancy_type_name)
}


#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use crate::data::{Payload, Record, SampleData, SelectOption};
    use super::{classify, resolve_fancy_type, resolve_field_type, Variant};

    fn record(value: Value, values: Option<Vec<SelectOption>>) -> Record {
        Record { id: "x".into(), name: "Test".into(), value, values }
    }

    fn payload(value: Value) -> Payload {
        Payload { value, values: None }
    }

    #[test]
    fn builtin_records() {
        let data = SampleData::builtin();
        let names: Vec<_> = data.records().iter().map(resolve_field_type).collect();
        assert_eq!(names, [Some("TextField"), Some("NumberField"), Some("SelectField")]);

        let names: Vec<_> = data.fancy_records().iter().map(|f| resolve_fancy_type(&f.ty)).collect();
        assert_eq!(names, [
            Some("FancyFieldTextType"),
            Some("FancyFieldNumberType"),
            Some("FancyFieldSelectType"),
        ]);
    }

    #[test]
    fn select_scenario() {
        let options = (1..=3)
            .map(|i| SelectOption { label: format!("Label {i}"), value: i.to_string() })
            .collect();
        let select = Record {
            id: "3".into(),
            name: "SelectField Example".into(),
            value: json!("3"),
            values: Some(options),
        };
        assert_eq!(resolve_field_type(&select), Some("SelectField"));
    }

    #[test]
    fn number_scenario() {
        let number = Record {
            id: "2".into(),
            name: "NumberField Example".into(),
            value: json!(2),
            values: None,
        };
        assert_eq!(resolve_field_type(&number), Some("NumberField"));
        assert_eq!(resolve_fancy_type(&payload(json!(2))), Some("FancyFieldNumberType"));
    }

    #[test]
    fn floats_are_numbers() {
        assert_eq!(classify(&payload(json!(2.5))), Some(Variant::Number));
        assert_eq!(classify(&payload(json!(-7))), Some(Variant::Number));
    }

    #[test]
    fn unsupported_values_do_not_resolve() {
        for value in [json!(true), json!(false), Value::Null, json!({ "a": 1 }), json!(["a"])] {
            assert_eq!(resolve_field_type(&record(value.clone(), None)), None);
            assert_eq!(resolve_fancy_type(&payload(value)), None);
        }
    }

    #[test]
    fn values_without_string_value_do_not_resolve() {
        assert_eq!(resolve_field_type(&record(Value::Null, Some(vec![]))), None);
    }

    #[test]
    fn values_presence_takes_precedence() {
        // Even an empty list of options makes a string-valued record a select field.
        assert_eq!(resolve_field_type(&record(json!("text"), Some(vec![]))), Some("SelectField"));

        // Numbers ignore `values`.
        assert_eq!(resolve_field_type(&record(json!(1), Some(vec![]))), Some("NumberField"));
    }
}
