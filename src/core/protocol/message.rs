//! Wire shapes of the request/response protocol.
//!
//! ```text
//! { "type": "CALCULATE", "payload": { "niter": 1000 } }
//! { "type": "CALCULATE", "payload": { "niter": { "min": 0, "max": 10, "step": 5 } } }
//! { "type": "RESULT", "payload": { "pi": 3.14 } }
//! { "type": "RESULT", "payload": { "pis": [ { "niter": 0, "pi": 0.0, "duration": 0.01 } ] } }
//! { "type": "ERROR", "payload": { "kind": "TIMEOUT", "message": "..." } }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Number;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "SCREAMING_SNAKE_CASE",
    deny_unknown_fields
)]
pub enum WireMessage {
    Calculate(CalculatePayload),
    Result(ResultPayload),
    Error(ErrorPayload),
}

impl WireMessage {
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Calculate(_) => "CALCULATE",
            Self::Result(_) => "RESULT",
            Self::Error(_) => "ERROR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalculatePayload {
    pub niter: NiterPayload,
}

/// Numbers stay untyped until validation so that `1.5` or `-3` can be
/// reported precisely instead of failing as a shape mismatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NiterPayload {
    Scalar(Number),
    Range(RangePayload),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RangePayload {
    pub min: Number,
    pub max: Number,
    pub step: Number,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultPayload {
    Single(SingleResultPayload),
    Sweep(SweepResultPayload),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SingleResultPayload {
    pub pi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SweepResultPayload {
    pub pis: Vec<WirePoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WirePoint {
    pub niter: u64,
    pub pi: f64,
    /// Milliseconds.
    pub duration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ErrorPayload {
    pub kind: String,
    pub message: String,
}
