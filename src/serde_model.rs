//! Weight-matrix serialization (feature: `serde`).
//!
//! A versioned JSON format for `Weights`. The internal struct is not serialized
//! directly so the file format can stay stable if the representation changes.
//! Loading re-checks the format version, the shape invariant and finiteness.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result, Weights};

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedWeights {
    pub format_version: u32,
    pub input_dim: usize,
    pub biased: bool,
    /// `layer -> neuron -> incoming weights` (bias last when `biased`).
    pub layers: Vec<Vec<Vec<f64>>>,
}

impl From<&Weights> for SerializedWeights {
    fn from(weights: &Weights) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            input_dim: weights.input_dim(),
            biased: weights.is_biased(),
            layers: weights.layers().to_vec(),
        }
    }
}

impl TryFrom<SerializedWeights> for Weights {
    type Error = Error;

    fn try_from(value: SerializedWeights) -> std::result::Result<Self, Self::Error> {
        if value.format_version != FORMAT_VERSION {
            return Err(Error::InvalidData(format!(
                "unsupported weights format_version {}; expected {FORMAT_VERSION}",
                value.format_version
            )));
        }

        let weights = Weights::from_literal(value.layers, value.biased)
            .map_err(|e| Error::InvalidData(format!("invalid weights: {e}")))?;
        if weights.input_dim() != value.input_dim {
            return Err(Error::InvalidData(format!(
                "declared input_dim {} does not match first layer fan-in {}",
                value.input_dim,
                weights.input_dim()
            )));
        }
        Ok(weights)
    }
}

impl Weights {
    pub fn to_json_string_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(&SerializedWeights::from(self))
            .map_err(|e| Error::InvalidData(format!("failed to serialize weights: {e}")))
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string(&SerializedWeights::from(self))
            .map_err(|e| Error::InvalidData(format!("failed to serialize weights: {e}")))
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let ser: SerializedWeights = serde_json::from_str(s)
            .map_err(|e| Error::InvalidData(format!("failed to parse weights json: {e}")))?;
        ser.try_into()
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let s = self.to_json_string_pretty()?;
        let p = path.as_ref();
        std::fs::write(p, s)
            .map_err(|e| Error::InvalidData(format!("failed to write {}: {e}", p.display())))
    }

    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let p = path.as_ref();
        let s = std::fs::read_to_string(p)
            .map_err(|e| Error::InvalidData(format!("failed to read {}: {e}", p.display())))?;
        Self::from_json_str(&s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeds;

    #[test]
    fn json_roundtrips_seed_weights() {
        let w = seeds::xor_biased();
        let json = w.to_json_string().unwrap();
        assert!(json.contains("\"format_version\":1"));
        assert!(json.contains("\"biased\":true"));

        assert_eq!(Weights::from_json_str(&json).unwrap(), w);
    }

    #[test]
    fn rejects_unknown_version() {
        let bad = r#"{"format_version":999,"input_dim":2,"biased":false,"layers":[]}"#;
        let err = Weights::from_json_str(bad).unwrap_err();
        assert!(format!("{err}").contains("format_version"));
    }

    #[test]
    fn rejects_shape_violations() {
        let ragged = r#"{"format_version":1,"input_dim":2,"biased":false,
            "layers":[[[0.1,0.2],[0.3,0.4]],[[0.5]]]}"#;
        assert!(Weights::from_json_str(ragged).is_err());

        let wrong_dim = r#"{"format_version":1,"input_dim":3,"biased":false,
            "layers":[[[0.1,0.2]],[[0.5]]]}"#;
        assert!(Weights::from_json_str(wrong_dim).is_err());
    }
}
