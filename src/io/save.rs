//! Checkpoint saving

use std::fs::File;
use std::io::Write;
use std::path::Path;

use super::state::ModelState;
use crate::{Error, Result};

/// Save a parameter state as pretty-printed JSON
///
/// An existing file at `path` is overwritten.
///
/// # Example
///
/// ```no_run
/// use ajustar::io::{save_state, ModelMetadata, ModelState};
/// use ndarray::array;
///
/// let mut state = ModelState::new(ModelMetadata::new("demo", "feedforward"));
/// state.push("w", &array![[1.0f32, 2.0]]);
/// save_state(&state, "checkpoint.json").unwrap();
/// ```
pub fn save_state(state: &ModelState, path: impl AsRef<Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(state)
        .map_err(|e| Error::Serialization(format!("JSON serialization failed: {e}")))?;

    let mut file = File::create(path.as_ref())?;
    file.write_all(json.as_bytes())?;
    Ok(())
}
