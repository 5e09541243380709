use juniper::graphql_object;

use crate::prelude::*;
use super::{
    Context,
    err::{self, ApiResult},
    model::{
        fancy::FancyField,
        field::{FieldUnion, FieldValue},
    },
};


/// The root query object.
pub(crate) struct Query;

#[graphql_object(Context = Context)]
impl Query {
    /// Returns all fields via the `Field` interface.
    fn fields(context: &Context) -> ApiResult<Vec<FieldValue>> {
        let fields = resolve_all(context)?;
        Ok(fields.into_iter().map(FieldValue::from).collect())
    }

    /// Returns the same fields as `fields`, but typed as union.
    fn fields_with_union(context: &Context) -> ApiResult<Vec<FieldUnion>> {
        resolve_all(context)
    }

    /// Returns all fields in the fancy representation, where the type
    /// specific data is nested under `type`.
    fn fancy_fields(context: &Context) -> Vec<FancyField> {
        context.data.fancy_records().iter().map(FancyField::from).collect()
    }
}

/// Converts all stored records into their field types. Fails if any record
/// cannot be resolved to a field type, since the list items are non-null.
///
/// The error is attached to the whole list, so its path does not contain the
/// index of the failing record. The message names it instead.
fn resolve_all(context: &Context) -> ApiResult<Vec<FieldUnion>> {
    context.data.records()
        .iter()
        .enumerate()
        .map(|(index, record)| {
            FieldUnion::from_record(record).ok_or_else(|| {
                warn!("Record '{}' cannot be resolved to any field type", record.id);
                err::unresolved_type!(
                    key = "field.unresolved-type",
                    "record at index {} ('{}', '{}') has a value of unsupported type: {}",
                    index,
                    record.id,
                    record.name,
                    record.value,
                )
            })
        })
        .collect()
}
