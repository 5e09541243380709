use std::{fs, io::{self, Write}, path::PathBuf};

use crate::{api, prelude::*};


/// Writes the GraphQL schema of our API in SDL to `target` or stdout.
pub(crate) fn run(target: Option<&PathBuf>) -> Result<()> {
    let schema = api::root_node().as_sdl();

    match target {
        Some(path) => fs::write(path, schema)
            .with_context(|| format!("failed to write schema to '{}'", path.display()))?,
        None => io::stdout().write_all(schema.as_bytes())?,
    }

    Ok(())
}
