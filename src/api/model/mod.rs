pub(crate) mod fancy;
pub(crate) mod field;
