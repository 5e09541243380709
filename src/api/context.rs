use std::sync::Arc;

use crate::data::SampleData;


/// The context that is accessible to every resolver in our API.
pub(crate) struct Context {
    pub(crate) data: Arc<SampleData>,
}

impl juniper::Context for Context {}

impl Context {
    pub(crate) fn new(data: Arc<SampleData>) -> Self {
        Self { data }
    }
}
