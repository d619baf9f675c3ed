use std::io::{self, Write};

use crate::controllers::ports::presenter::{PresenterPort, ResultView};
use crate::core::data::compute_response::ComputeResponse;
use crate::core::protocol::codec::{encode_error, encode_response};

/// Writes results as wire-format messages, one per line. Views without a
/// result produce no output.
#[derive(Debug, Default)]
pub struct JsonPresenter {}

impl JsonPresenter {
    pub fn new() -> Self {
        Self {}
    }
}

impl PresenterPort for JsonPresenter {
    fn present(&self, view: &ResultView, out: &mut dyn Write) -> io::Result<()> {
        let message = match view {
            ResultView::NotSubmitted | ResultView::InProgress { .. } => return Ok(()),
            ResultView::Failed { kind, reason } => encode_error(kind, reason),
            ResultView::Pi { pi, .. } => encode_response(&ComputeResponse::Single { pi: *pi }),
            ResultView::Series(series) => encode_response(&ComputeResponse::Sweep {
                series: series.clone(),
            }),
        }
        .map_err(io::Error::other)?;

        writeln!(out, "{}", message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::data::sweep_point::SweepPoint;
    use crate::core::data::sweep_series::SweepSeries;
    use serde_json::{Value, json};

    fn render(view: &ResultView) -> String {
        let mut out = Vec::new();
        JsonPresenter::new().present(view, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_pi_is_a_result_message() {
        let text = render(&ResultView::Pi { niter: 8, pi: 3.5 });
        let value: Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value, json!({"type": "RESULT", "payload": {"pi": 3.5}}));
    }

    #[test]
    fn test_series_is_a_result_message_with_pis() {
        let series = SweepSeries::try_from(vec![SweepPoint {
            niter: 10,
            pi: 3.0,
            duration_ms: 2.0,
            started_ms: 0.0,
            finished_ms: 2.0,
        }])
        .unwrap();

        let text = render(&ResultView::Series(series));
        let value: Value = serde_json::from_str(&text).unwrap();

        assert_eq!(
            value,
            json!({"type": "RESULT", "payload": {"pis": [{"niter": 10, "pi": 3.0, "duration": 2.0}]}})
        );
    }

    #[test]
    fn test_failure_is_an_error_message() {
        let text = render(&ResultView::Failed {
            kind: "CANCELLED",
            reason: "operation cancelled".to_string(),
        });
        let value: Value = serde_json::from_str(&text).unwrap();

        assert_eq!(
            value,
            json!({"type": "ERROR", "payload": {"kind": "CANCELLED", "message": "operation cancelled"}})
        );
    }

    #[test]
    fn test_views_without_result_write_nothing() {
        assert_eq!(render(&ResultView::NotSubmitted), "");
        assert_eq!(
            render(&ResultView::InProgress {
                description: "pi".to_string()
            }),
            ""
        );
    }
}
