//! API error handling.
//!
//! We define our own error to use for all resolvers. The error contains a
//! coarse "error kind" and an optional "key", both of which end up in the
//! `extensions` of the GraphQL error so that clients can react to them.

use juniper::{FieldError, IntoFieldError, ScalarValue, graphql_value};


pub(crate) type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub(crate) struct ApiError {
    pub(crate) msg: String,
    pub(crate) kind: ApiErrorKind,
    pub(crate) key: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    /// A record's shape does not match any of the schema's variants.
    UnresolvedType,
}

impl ApiErrorKind {
    pub(crate) fn kind_str(&self) -> &'static str {
        match self {
            Self::UnresolvedType => "UNRESOLVED_TYPE",
        }
    }

    fn message_prefix(&self) -> &'static str {
        match self {
            Self::UnresolvedType => "Unresolved type",
        }
    }
}

impl<S: ScalarValue> IntoFieldError<S> for ApiError {
    fn into_field_error(self) -> FieldError<S> {
        let msg = format!("{}: {}", self.kind.message_prefix(), self.msg);
        let ext = if let Some(key) = self.key {
            graphql_value!({
                "kind": (self.kind.kind_str()),
                "key": key,
            })
        } else {
            graphql_value!({
                "kind": (self.kind.kind_str()),
            })
        };

        FieldError::new(msg, ext)
    }
}


// ===== Helper macros to easily create errors ==================================================

/// Creates an `ApiError` with a `format!` like syntax.
macro_rules! api_err {
    ($kind:ident, key = $key:literal, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::api::err::ApiError {
            msg: format!($fmt $(, $arg)*),
            kind: $crate::api::err::ApiErrorKind::$kind,
            key: Some($key),
        }
    };
    ($kind:ident, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::api::err::ApiError {
            msg: format!($fmt $(, $arg)*),
            kind: $crate::api::err::ApiErrorKind::$kind,
            key: None,
        }
    };
}

macro_rules! unresolved_type {
    ($($t:tt)+) => { $crate::api::err::api_err!(UnresolvedType, $($t)*) };
}

pub(crate) use api_err;
pub(crate) use unresolved_type;
