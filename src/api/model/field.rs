//! Form fields modeled as interface `Field` with three implementors. The same
//! implementors are also the members of the union `FieldUnion`.

use juniper::{graphql_interface, graphql_object, GraphQLUnion};
use serde_json::Value;

use crate::{
    api::Context,
    data::{Record, SelectOption, resolve::{classify, Variant}},
};


/// A form field. The concrete type is determined by the kind of value it
/// holds.
#[graphql_interface(Context = Context, for = [TextField, NumberField, SelectField])]
pub(crate) trait Field {
    // All shared data is stored in `SharedData` and only `shared` needs to
    // be implemented.
    #[graphql(skip)]
    fn shared(&self) -> &SharedData;

    fn id(&self) -> Option<&str>;
    fn name(&self) -> Option<&str>;
}

/// The same three field types as `Field`, but as union.
#[derive(Debug, Clone, GraphQLUnion)]
#[graphql(context = Context)]
pub(crate) enum FieldUnion {
    TextField(TextField),
    NumberField(NumberField),
    SelectField(SelectField),
}

impl FieldUnion {
    /// Converts a stored record into the matching field type. Returns `None`
    /// if the record's shape does not match any field type.
    pub(crate) fn from_record(record: &Record) -> Option<Self> {
        let shared = SharedData {
            id: record.id.clone(),
            name: record.name.clone(),
        };

        let out = match classify(record)? {
            Variant::Text => Self::TextField(TextField {
                shared,
                value: record.value.as_str()?.to_owned(),
            }),
            Variant::Number => Self::NumberField(NumberField {
                shared,
                value: int_value(&record.value),
            }),
            Variant::Select => Self::SelectField(SelectField {
                shared,
                value: record.value.as_str()?.to_owned(),
                values: record.values.clone().unwrap_or_default(),
            }),
        };

        Some(out)
    }
}

impl From<FieldUnion> for FieldValue {
    fn from(field: FieldUnion) -> Self {
        match field {
            FieldUnion::TextField(f) => f.into(),
            FieldUnion::NumberField(f) => f.into(),
            FieldUnion::SelectField(f) => f.into(),
        }
    }
}

/// Converts a JSON number to a GraphQL `Int`, if it is representable as one.
/// Fractional numbers and numbers outside of the `i32` range are not.
pub(crate) fn int_value(value: &Value) -> Option<i32> {
    if let Some(i) = value.as_i64() {
        return i32::try_from(i).ok();
    }

    value.as_f64()
        .filter(|f| f.fract() == 0.0 && *f >= i32::MIN as f64 && *f <= i32::MAX as f64)
        .map(|f| f as i32)
}


/// Data shared by all fields.
#[derive(Debug, Clone)]
pub(crate) struct SharedData {
    pub(crate) id: String,
    pub(crate) name: String,
}

#[derive(Debug, Clone)]
pub(crate) struct TextField {
    pub(crate) shared: SharedData,
    pub(crate) value: String,
}

impl Field for TextField {
    fn shared(&self) -> &SharedData {
        &self.shared
    }
    fn id(&self) -> Option<&str> {
        Some(&self.shared().id)
    }
    fn name(&self) -> Option<&str> {
        Some(&self.shared().name)
    }
}

/// A field holding free text.
#[graphql_object(Context = Context, impl = FieldValue)]
impl TextField {
    fn id(&self) -> Option<&str> {
        Some(&self.shared.id)
    }

    fn name(&self) -> Option<&str> {
        Some(&self.shared.name)
    }

    fn value(&self) -> Option<&str> {
        Some(&self.value)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct NumberField {
    pub(crate) shared: SharedData,

    /// `None` if the stored number does not fit into a GraphQL `Int`.
    pub(crate) value: Option<i32>,
}

impl Field for NumberField {
    fn shared(&self) -> &SharedData {
        &self.shared
    }
    fn id(&self) -> Option<&str> {
        Some(&self.shared().id)
    }
    fn name(&self) -> Option<&str> {
        Some(&self.shared().name)
    }
}

/// A field holding an integer.
#[graphql_object(Context = Context, impl = FieldValue)]
impl NumberField {
    fn id(&self) -> Option<&str> {
        Some(&self.shared.id)
    }

    fn name(&self) -> Option<&str> {
        Some(&self.shared.name)
    }

    fn value(&self) -> Option<i32> {
        self.value
    }
}

#[derive(Debug, Clone)]
pub(crate) struct SelectField {
    pub(crate) shared: SharedData,
    pub(crate) value: String,
    pub(crate) values: Vec<SelectOption>,
}

impl Field for SelectField {
    fn shared(&self) -> &SharedData {
        &self.shared
    }
    fn id(&self) -> Option<&str> {
        Some(&self.shared().id)
    }
    fn name(&self) -> Option<&str> {
        Some(&self.shared().name)
    }
}

/// A field where one of several options is selected. `value` is the value of
/// the selected option.
#[graphql_object(Context = Context, impl = FieldValue)]
impl SelectField {
    fn id(&self) -> Option<&str> {
        Some(&self.shared.id)
    }

    fn name(&self) -> Option<&str> {
        Some(&self.shared.name)
    }

    fn value(&self) -> Option<&str> {
        Some(&self.value)
    }

    /// All options that can be selected.
    fn values(&self) -> Option<Vec<Option<&SelectOption>>> {
        Some(self.values.iter().map(Some).collect())
    }
}

/// One option of a select field.
#[graphql_object(Context = Context, name = "SelectFieldValue")]
impl SelectOption {
    /// Human readable label.
    fn label(&self) -> Option<&str> {
        Some(&self.label)
    }

    fn value(&self) -> Option<&str> {
        Some(&self.value)
    }
}
