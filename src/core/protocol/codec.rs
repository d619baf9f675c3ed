use serde_json::Number;

use crate::core::data::compute_request::ComputeRequest;
use crate::core::data::compute_response::ComputeResponse;
use crate::core::data::niter::{NiterError, integral_value};
use crate::core::data::sweep_point::SweepPoint;
use crate::core::data::sweep_range::{RangeError, SweepRange};
use crate::core::data::sweep_series::SweepSeries;
use crate::core::protocol::errors::ProtocolError;
use crate::core::protocol::message::{
    CalculatePayload, ErrorPayload, NiterPayload, RangePayload, ResultPayload,
    SingleResultPayload, SweepResultPayload, WireMessage, WirePoint,
};

/// Either the integer a number holds, or its float value for error reporting.
fn number_to_integer(number: &Number) -> Result<i64, f64> {
    if let Some(value) = number.as_i64() {
        return Ok(value);
    }

    let value = number.as_f64().unwrap_or(f64::NAN);
    integral_value(value).ok_or(value)
}

fn range_bound(number: &Number, field: &'static str) -> Result<i64, RangeError> {
    number_to_integer(number).map_err(|value| RangeError::NotInteger { field, value })
}

fn request_from_payload(payload: CalculatePayload) -> Result<ComputeRequest, ProtocolError> {
    match payload.niter {
        NiterPayload::Scalar(number) => {
            let niter = number_to_integer(&number)
                .map_err(|value| NiterError::NotInteger { value })?;

            Ok(ComputeRequest::single(niter)?)
        }
        NiterPayload::Range(RangePayload { min, max, step }) => {
            let range = SweepRange::new(
                range_bound(&min, "min")?,
                range_bound(&max, "max")?,
                range_bound(&step, "step")?,
            )?;

            Ok(ComputeRequest::Sweep { range })
        }
    }
}

pub fn decode_request(text: &str) -> Result<ComputeRequest, ProtocolError> {
    match serde_json::from_str::<WireMessage>(text)? {
        WireMessage::Calculate(payload) => request_from_payload(payload),
        other => Err(ProtocolError::UnexpectedType {
            expected: "CALCULATE",
            got: other.type_name(),
        }),
    }
}

pub fn encode_request(request: &ComputeRequest) -> Result<String, ProtocolError> {
    let niter = match request {
        ComputeRequest::Single { niter } => NiterPayload::Scalar(Number::from(*niter)),
        ComputeRequest::Sweep { range } => NiterPayload::Range(RangePayload {
            min: Number::from(range.min()),
            max: Number::from(range.max()),
            step: Number::from(range.step()),
        }),
    };

    Ok(serde_json::to_string(&WireMessage::Calculate(
        CalculatePayload { niter },
    ))?)
}

pub fn encode_response(response: &ComputeResponse) -> Result<String, ProtocolError> {
    let payload = match response {
        ComputeResponse::Single { pi } => ResultPayload::Single(SingleResultPayload { pi: *pi }),
        ComputeResponse::Sweep { series } => ResultPayload::Sweep(SweepResultPayload {
            pis: series
                .iter()
                .map(|point| WirePoint {
                    niter: point.niter,
                    pi: point.pi,
                    duration: point.duration_ms,
                })
                .collect(),
        }),
    };

    Ok(serde_json::to_string(&WireMessage::Result(payload))?)
}

/// Decodes a `RESULT` message. An `ERROR` message becomes
/// [`ProtocolError::Remote`].
///
/// The wire format carries durations only, so decoded points get
/// back-to-back timing windows starting at zero.
pub fn decode_response(text: &str) -> Result<ComputeResponse, ProtocolError> {
    match serde_json::from_str::<WireMessage>(text)? {
        WireMessage::Result(ResultPayload::Single(SingleResultPayload { pi })) => {
            Ok(ComputeResponse::Single { pi })
        }
        WireMessage::Result(ResultPayload::Sweep(SweepResultPayload { pis })) => {
            let mut series = SweepSeries::with_capacity(pis.len());
            let mut offset_ms = 0.0;

            for WirePoint { niter, pi, duration } in pis {
                let duration_ms = duration.max(0.0);
                series.push(SweepPoint {
                    niter,
                    pi,
                    duration_ms,
                    started_ms: offset_ms,
                    finished_ms: offset_ms + duration_ms,
                })?;
                offset_ms += duration_ms;
            }

            Ok(ComputeResponse::Sweep { series })
        }
        WireMessage::Error(ErrorPayload { kind, message }) => {
            Err(ProtocolError::Remote { kind, message })
        }
        other => Err(ProtocolError::UnexpectedType {
            expected: "RESULT",
            got: other.type_name(),
        }),
    }
}

pub fn encode_error(kind: &str, message: &str) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(&WireMessage::Error(ErrorPayload {
        kind: kind.to_string(),
        message: message.to_string(),
    }))?)
}
