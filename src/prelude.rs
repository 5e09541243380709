//! Our own prelude that is wildcard imported in every other module. That way,
//! commonly used symbols are easily available.

pub(crate) use anyhow::{anyhow, bail, Context as _, Result};
pub(crate) use tap::Pipe;
pub(crate) use tracing::{debug, error, info, trace, warn};
