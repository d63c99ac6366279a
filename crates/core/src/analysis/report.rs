//! Defensive extraction from analyzer result payloads.
//!
//! The result JSON is produced by an external script and treated as
//! untyped data: only a handful of fields are read, and every missing or
//! malformed field degrades to a sentinel instead of failing the workflow.

use std::path::Path;

use serde_json::Value;

/// Sentinel prediction code when the analyzer produced none.
pub const PRED_UNKNOWN: i32 = -1;

/// Classification fields pulled out of a result payload.
#[derive(Debug, Clone, Copy)]
pub struct Classification {
    pub pred: i32,
    pub prob_true: f64,
    pub prob_false: f64,
}

impl Classification {
    pub fn label(&self) -> &'static str {
        label_for(self.pred)
    }
}

/// Map a prediction code to its human-readable label.
pub fn label_for(pred: i32) -> &'static str {
    match pred {
        1 => "Good",
        0 => "Bad",
        _ => "unknown",
    }
}

/// Detect an analyzer-side failure in the payload.
///
/// Either a top-level `error` key or `status == "error"` marks the run as
/// failed; the surfaced message prefers `error`, then `traceback`.
pub fn error_message(result: &Value) -> Option<String> {
    let errored = result.get("error").is_some()
        || result.get("status").and_then(Value::as_str) == Some("error");
    if !errored {
        return None;
    }
    let message = result
        .get("error")
        .and_then(Value::as_str)
        .or_else(|| result.get("traceback").and_then(Value::as_str))
        .unwrap_or("unknown analyzer error");
    Some(message.to_string())
}

/// Extract `mlp_result.{pred,prob_true,prob_false}`.
///
/// Missing or null fields become `-1` / NaN; nothing here can panic on
/// malformed input.
pub fn classification(result: &Value) -> Classification {
    let mlp = result.get("mlp_result");
    let pred = mlp
        .and_then(|m| m.get("pred"))
        .and_then(Value::as_i64)
        .map(|p| p as i32)
        .unwrap_or(PRED_UNKNOWN);
    let prob_true = mlp
        .and_then(|m| m.get("prob_true"))
        .and_then(Value::as_f64)
        .unwrap_or(f64::NAN);
    let prob_false = mlp
        .and_then(|m| m.get("prob_false"))
        .and_then(Value::as_f64)
        .unwrap_or(f64::NAN);
    Classification {
        pred,
        prob_true,
        prob_false,
    }
}

/// Basename of the skeleton video referenced by the payload, if any.
/// The analyzer writes an absolute path; only the filename is exposed.
pub fn skeleton_video_basename(result: &Value) -> Option<String> {
    let full = result.get("openpose_skeleton_video_h264")?.as_str()?;
    Path::new(full)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
}

/// Parse the classifier's verdict from its captured stdout.
///
/// The classifier prints its result on the final non-empty line, either
/// bare (`1`) or embedded (`RESULT: 1`). Anything else maps to the
/// unknown sentinel.
pub fn stdout_verdict(stdout: &str) -> i32 {
    let Some(line) = stdout.lines().rev().map(str::trim).find(|l| !l.is_empty()) else {
        return PRED_UNKNOWN;
    };
    let digits = line.strip_prefix("RESULT:").map(str::trim).unwrap_or(line);
    digits.parse::<i32>().unwrap_or(PRED_UNKNOWN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn label_mapping() {
        assert_eq!(label_for(1), "Good");
        assert_eq!(label_for(0), "Bad");
        assert_eq!(label_for(-1), "unknown");
        assert_eq!(label_for(7), "unknown");
    }

    #[test]
    fn full_payload_extracts_cleanly() {
        let result = json!({
            "mlp_result": {"pred": 1, "prob_true": 0.9, "prob_false": 0.1},
            "openpose_skeleton_video_h264": "/data/out/skeleton_42_swing.mp4",
            "status": "success",
        });
        let class = classification(&result);
        assert_eq!(class.pred, 1);
        assert_eq!(class.prob_true, 0.9);
        assert_eq!(class.prob_false, 0.1);
        assert_eq!(class.label(), "Good");
        assert_eq!(
            skeleton_video_basename(&result).as_deref(),
            Some("skeleton_42_swing.mp4")
        );
        assert!(error_message(&result).is_none());
    }

    #[test]
    fn missing_fields_degrade_to_sentinels() {
        let class = classification(&json!({}));
        assert_eq!(class.pred, PRED_UNKNOWN);
        assert!(class.prob_true.is_nan());
        assert!(class.prob_false.is_nan());
        assert_eq!(class.label(), "unknown");
    }

    #[test]
    fn null_fields_degrade_to_sentinels() {
        let result = json!({
            "mlp_result": {"pred": null, "prob_true": null, "prob_false": "bogus"}
        });
        let class = classification(&result);
        assert_eq!(class.pred, PRED_UNKNOWN);
        assert!(class.prob_true.is_nan());
        assert!(class.prob_false.is_nan());
    }

    #[test]
    fn error_key_marks_failure() {
        let result = json!({"error": "openpose crashed"});
        assert_eq!(error_message(&result).as_deref(), Some("openpose crashed"));
    }

    #[test]
    fn error_status_falls_back_to_traceback() {
        let result = json!({"status": "error", "traceback": "Traceback (most recent call last)..."});
        assert!(error_message(&result)
            .unwrap()
            .starts_with("Traceback"));
    }

    #[test]
    fn error_status_without_detail() {
        let result = json!({"status": "error"});
        assert_eq!(
            error_message(&result).as_deref(),
            Some("unknown analyzer error")
        );
    }

    #[test]
    fn missing_skeleton_path_is_none() {
        assert!(skeleton_video_basename(&json!({})).is_none());
        assert!(skeleton_video_basename(&json!({"openpose_skeleton_video_h264": null})).is_none());
    }

    #[test]
    fn stdout_verdict_bare_digit() {
        assert_eq!(stdout_verdict("loading model\n1\n"), 1);
        assert_eq!(stdout_verdict("0"), 0);
    }

    #[test]
    fn stdout_verdict_embedded() {
        assert_eq!(stdout_verdict("loading model\nRESULT: 1\n"), 1);
        assert_eq!(stdout_verdict("RESULT:0"), 0);
    }

    #[test]
    fn stdout_verdict_garbage_is_unknown() {
        assert_eq!(stdout_verdict(""), PRED_UNKNOWN);
        assert_eq!(stdout_verdict("done\n"), PRED_UNKNOWN);
        assert_eq!(stdout_verdict("RESULT: maybe"), PRED_UNKNOWN);
    }

    #[test]
    fn stdout_verdict_skips_trailing_blank_lines() {
        assert_eq!(stdout_verdict("RESULT: 1\n\n  \n"), 1);
    }
}
