//! Serializable parameter state

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Checkpoint metadata identifying the model that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Model name/identifier
    pub name: String,
    /// Architecture family (e.g. "feedforward")
    pub architecture: String,
    /// Crate version that wrote the state
    pub version: String,
}

impl ModelMetadata {
    /// Create metadata stamped with the current crate version
    pub fn new(name: impl Into<String>, architecture: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            architecture: architecture.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Name and shape of one parameter in the flat data buffer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterInfo {
    /// Parameter name (e.g. "fc1.weight")
    pub name: String,
    /// Parameter shape
    pub shape: Vec<usize>,
}

/// Serializable model state: metadata, per-parameter shapes, and the
/// flattened row-major parameter data in declaration order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelState {
    /// Checkpoint metadata
    pub metadata: ModelMetadata,
    /// Parameter layout
    pub parameters: Vec<ParameterInfo>,
    /// Flattened parameter data
    pub data: Vec<f32>,
}

impl ModelState {
    /// Empty state carrying only metadata
    pub fn new(metadata: ModelMetadata) -> Self {
        Self {
            metadata,
            parameters: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Append one parameter, flattening it row-major
    pub fn push(&mut self, name: impl Into<String>, value: &Array2<f32>) {
        self.parameters.push(ParameterInfo {
            name: name.into(),
            shape: value.shape().to_vec(),
        });
        self.data.extend(value.iter());
    }

    /// Total number of scalar values the declared shapes require
    pub fn total_len(&self) -> usize {
        self.parameters
            .iter()
            .map(|p| p.shape.iter().product::<usize>())
            .sum()
    }

    /// Walk the flat buffer parameter by parameter
    ///
    /// Fails when the buffer length disagrees with the declared shapes.
    pub fn param_slices(&self) -> Result<Vec<(&ParameterInfo, &[f32])>> {
        let total = self.total_len();
        if total != self.data.len() {
            return Err(Error::Serialization(format!(
                "state holds {} values but declared shapes require {total}",
                self.data.len()
            )));
        }

        let mut out = Vec::with_capacity(self.parameters.len());
        let mut offset = 0;
        for info in &self.parameters {
            let len = info.shape.iter().product::<usize>();
            out.push((info, &self.data[offset..offset + len]));
            offset += len;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_push_and_slices() {
        let mut state = ModelState::new(ModelMetadata::new("test", "feedforward"));
        state.push("w", &array![[1.0f32, 2.0], [3.0, 4.0]]);
        state.push("b", &array![[5.0f32, 6.0]]);

        assert_eq!(state.total_len(), 6);
        assert_eq!(state.data, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

        let slices = state.param_slices().unwrap();
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].0.name, "w");
        assert_eq!(slices[0].1, &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(slices[1].0.shape, vec![1, 2]);
        assert_eq!(slices[1].1, &[5.0, 6.0]);
    }

    #[test]
    fn test_param_slices_rejects_truncated_data() {
        let mut state = ModelState::new(ModelMetadata::new("test", "feedforward"));
        state.push("w", &array![[1.0f32, 2.0]]);
        state.data.pop();
        assert!(state.param_slices().is_err());
    }

    #[test]
    fn test_metadata_version_stamp() {
        let meta = ModelMetadata::new("m", "feedforward");
        assert_eq!(meta.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_json_round_trip() {
        let mut state = ModelState::new(ModelMetadata::new("m", "feedforward"));
        state.push("w", &array![[0.5f32, -0.5]]);

        let json = serde_json::to_string(&state).unwrap();
        let back: ModelState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
