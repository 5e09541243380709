//! The "fancy" composition: a single `FancyField` type with the type specific
//! part nested in a union.

use juniper::{graphql_object, GraphQLUnion};

use crate::{
    api::Context,
    data::{FancyRecord, Payload, SelectOption, resolve::{classify, Variant}},
};
use super::field::int_value;


pub(crate) struct FancyField {
    pub(crate) id: String,
    pub(crate) name: String,

    /// `None` if the payload has a shape none of the union members match.
    pub(crate) ty: Option<FancyFieldTypeUnion>,
}

impl From<&FancyRecord> for FancyField {
    fn from(record: &FancyRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            ty: FancyFieldTypeUnion::from_payload(&record.ty),
        }
    }
}

/// A form field with the type dependent data in `type`.
#[graphql_object(Context = Context)]
impl FancyField {
    fn id(&self) -> Option<&str> {
        Some(&self.id)
    }

    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    #[graphql(name = "type")]
    fn ty(&self) -> Option<&FancyFieldTypeUnion> {
        self.ty.as_ref()
    }
}

#[derive(Debug, Clone, GraphQLUnion)]
#[graphql(context = Context)]
pub(crate) enum FancyFieldTypeUnion {
    Text(FancyFieldTextType),
    Number(FancyFieldNumberType),
    Select(FancyFieldSelectType),
}

impl FancyFieldTypeUnion {
    pub(crate) fn from_payload(payload: &Payload) -> Option<Self> {
        let out = match classify(payload)? {
            Variant::Text => Self::Text(FancyFieldTextType {
                value: payload.value.as_str()?.to_owned(),
            }),
            Variant::Number => Self::Number(FancyFieldNumberType {
                value: int_value(&payload.value),
            }),
            Variant::Select => Self::Select(FancyFieldSelectType {
                value: payload.value.as_str()?.to_owned(),
                values: payload.values.clone().unwrap_or_default(),
            }),
        };

        Some(out)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct FancyFieldTextType {
    pub(crate) value: String,
}

#[graphql_object(Context = Context)]
impl FancyFieldTextType {
    fn value(&self) -> Option<&str> {
        Some(&self.value)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct FancyFieldNumberType {
    pub(crate) value: Option<i32>,
}

#[graphql_object(Context = Context)]
impl FancyFieldNumberType {
    fn value(&self) -> Option<i32> {
        self.value
    }
}

#[derive(Debug, Clone)]
pub(crate) struct FancyFieldSelectType {
    pub(crate) value: String,
    pub(crate) values: Vec<SelectOption>,
}

#[graphql_object(Context = Context)]
impl FancyFieldSelectType {
    fn value(&self) -> Option<&str> {
        Some(&self.value)
    }

    fn values(&self) -> Option<Vec<Option<&SelectOption>>> {
        Some(self.values.iter().map(Some).collect())
    }
}
