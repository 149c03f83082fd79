//! Checkpoint loading

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::state::ModelState;
use crate::{Error, Result};

/// Load a parameter state previously written by [`super::save_state`]
///
/// # Example
///
/// ```no_run
/// use ajustar::io::load_state;
///
/// let state = load_state("checkpoint.json").unwrap();
/// println!("loaded {} parameters", state.parameters.len());
/// ```
pub fn load_state(path: impl AsRef<Path>) -> Result<ModelState> {
    let mut file = File::open(path.as_ref())?;
    let mut content = String::new();
    file.read_to_string(&mut content)?;

    serde_json::from_str(&content)
        .map_err(|e| Error::Serialization(format!("JSON deserialization failed: {e}")))
}
