//! End-to-end pipeline tests against stub shell analyzers.
//!
//! The stubs stand in for the Python scripts: they read the same argument
//! list, write (or refuse to write) a result artifact, and exit with
//! whatever code the scenario needs.

use std::path::{Path, PathBuf};
use std::time::Duration;

use swinglab_core::analysis::pipeline::{self, PipelineConfig, PipelineVariant};
use swinglab_core::error::AnalysisError;

/// Build a config whose directories all live under `root` and whose
/// "python" is `/bin/sh` running the given stub script.
fn config(root: &Path, script: &Path, variant: PipelineVariant) -> PipelineConfig {
    let cfg = PipelineConfig {
        python_bin: "/bin/sh".into(),
        analyze_script: script.to_path_buf(),
        skeleton_script: script.to_path_buf(),
        classify_script: script.to_path_buf(),
        upload_dir: root.join("uploaded-videos"),
        result_dir: root.join("result"),
        log_dir: root.join("result/logs"),
        landmark_dir: root.join("uploaded-videos/landmarkFiles"),
        timeout: Duration::from_secs(10),
        variant,
    };
    for dir in [
        &cfg.upload_dir,
        &cfg.result_dir,
        &cfg.log_dir,
        &cfg.landmark_dir,
    ] {
        std::fs::create_dir_all(dir).unwrap();
    }
    cfg
}

fn write_script(root: &Path, body: &str) -> PathBuf {
    let path = root.join("stub.sh");
    std::fs::write(&path, body).unwrap();
    path
}

fn save_video(cfg: &PipelineConfig, name: &str) -> PathBuf {
    let path = cfg.upload_dir.join(name);
    std::fs::write(&path, b"not really a video").unwrap();
    path
}

// Combined variant: argv is
//   stub.sh --video <path> --out <result> --user <id>
// so inside the stub $2 is the video path and $4 the result path.

#[tokio::test]
async fn combined_success_produces_good_outcome() {
    let root = tempfile::tempdir().unwrap();
    let script = write_script(
        root.path(),
        r#"echo "analyzing $2"
cat > "$4" <<'EOF'
{"mlp_result":{"pred":1,"prob_true":0.9,"prob_false":0.1},
 "openpose_skeleton_video_h264":"/abs/path/skeleton_42_swing.mp4",
 "status":"success"}
EOF
"#,
    );
    let cfg = config(root.path(), &script, PipelineVariant::Combined);
    let video = save_video(&cfg, "42_swing.mp4");

    let outcome = pipeline::run(&cfg, &video, "42_swing.mp4", "42")
        .await
        .unwrap();

    assert_eq!(outcome.result_json.as_deref(), Some("result_42_swing.mp4.json"));
    assert_eq!(
        outcome.skeleton_video.as_deref(),
        Some("skeleton_42_swing.mp4")
    );
    assert_eq!(outcome.pred, 1);
    assert_eq!(outcome.prob_true, 0.9);
    assert_eq!(outcome.prob_false, 0.1);
    assert_eq!(outcome.label(), "Good");
}

#[tokio::test]
async fn combined_nonzero_exit_aborts_with_preview() {
    let root = tempfile::tempdir().unwrap();
    let script = write_script(
        root.path(),
        "echo 'openpose exploded' 1>&2\nexit 7\n",
    );
    let cfg = config(root.path(), &script, PipelineVariant::Combined);
    let video = save_video(&cfg, "42_swing.mp4");

    let err = pipeline::run(&cfg, &video, "42_swing.mp4", "42")
        .await
        .unwrap_err();
    match err {
        AnalysisError::ProcessFailed { exit_code, preview } => {
            assert_eq!(exit_code, 7);
            assert!(preview.contains("openpose exploded"));
        }
        other => panic!("expected ProcessFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn combined_error_payload_aborts_with_message() {
    let root = tempfile::tempdir().unwrap();
    let script = write_script(
        root.path(),
        r#"cat > "$4" <<'EOF'
{"status":"error","error":"no person detected"}
EOF
"#,
    );
    let cfg = config(root.path(), &script, PipelineVariant::Combined);
    let video = save_video(&cfg, "42_swing.mp4");

    let err = pipeline::run(&cfg, &video, "42_swing.mp4", "42")
        .await
        .unwrap_err();
    match err {
        AnalysisError::ResultInvalid(message) => {
            assert_eq!(message, "no person detected");
        }
        other => panic!("expected ResultInvalid, got {other:?}"),
    }
}

#[tokio::test]
async fn combined_missing_result_is_fatal() {
    let root = tempfile::tempdir().unwrap();
    // Exits 0 but never writes the result file.
    let script = write_script(root.path(), "echo done\n");
    let cfg = config(root.path(), &script, PipelineVariant::Combined);
    let video = save_video(&cfg, "42_swing.mp4");

    let err = pipeline::run(&cfg, &video, "42_swing.mp4", "42")
        .await
        .unwrap_err();
    assert!(matches!(err, AnalysisError::ResultNotFound(_)));
}

#[tokio::test]
async fn combined_fuzzy_fallback_finds_renamed_result() {
    let root = tempfile::tempdir().unwrap();
    // Writes the result under a legacy name that still contains the stem.
    let script = write_script(
        root.path(),
        r#"out_dir=$(dirname "$4")
cat > "$out_dir/42_swing_legacy.json" <<'EOF'
{"mlp_result":{"pred":0,"prob_true":0.2,"prob_false":0.8}}
EOF
"#,
    );
    let cfg = config(root.path(), &script, PipelineVariant::Combined);
    let video = save_video(&cfg, "42_swing.mp4");

    let outcome = pipeline::run(&cfg, &video, "42_swing.mp4", "42")
        .await
        .unwrap();
    assert_eq!(outcome.pred, 0);
    assert_eq!(outcome.label(), "Bad");
}

#[tokio::test]
async fn combined_timeout_references_log_file() {
    let root = tempfile::tempdir().unwrap();
    let script = write_script(root.path(), "echo 'frame 1 done'\nsleep 30\n");
    let mut cfg = config(root.path(), &script, PipelineVariant::Combined);
    cfg.timeout = Duration::from_millis(300);
    let video = save_video(&cfg, "42_swing.mp4");

    let err = pipeline::run(&cfg, &video, "42_swing.mp4", "42")
        .await
        .unwrap_err();
    match err {
        AnalysisError::TimedOut { log_path } => {
            // Output streamed before the kill is already on disk.
            let logged = std::fs::read_to_string(&log_path).unwrap();
            assert!(logged.contains("frame 1 done"));
        }
        other => panic!("expected TimedOut, got {other:?}"),
    }
}

#[tokio::test]
async fn two_stage_reads_verdict_from_stdout() {
    let root = tempfile::tempdir().unwrap();
    // First invocation (skeleton): $2 is the skeleton output path -- create
    // it. Second invocation (classify): $2 is empty, print the verdict.
    let script = write_script(
        root.path(),
        r#"if [ -n "$2" ]; then
    touch "$2"
else
    echo "loading model"
    echo "RESULT: 1"
fi
"#,
    );
    let cfg = config(root.path(), &script, PipelineVariant::TwoStage);
    let video = save_video(&cfg, "42_swing.mp4");

    let outcome = pipeline::run(&cfg, &video, "42_swing.mp4", "42")
        .await
        .unwrap();
    assert_eq!(outcome.pred, 1);
    assert_eq!(outcome.label(), "Good");
    assert_eq!(
        outcome.skeleton_video.as_deref(),
        Some("skeleton_42_swing.mp4")
    );
    assert!(outcome.result_json.is_none());
    assert!(outcome.prob_true.is_nan());
}

#[tokio::test]
async fn two_stage_garbage_stdout_degrades_to_unknown() {
    let root = tempfile::tempdir().unwrap();
    let script = write_script(
        root.path(),
        r#"if [ -n "$2" ]; then touch "$2"; else echo "all done"; fi
"#,
    );
    let cfg = config(root.path(), &script, PipelineVariant::TwoStage);
    let video = save_video(&cfg, "42_swing.mp4");

    let outcome = pipeline::run(&cfg, &video, "42_swing.mp4", "42")
        .await
        .unwrap();
    assert_eq!(outcome.pred, -1);
    assert_eq!(outcome.label(), "unknown");
}

#[tokio::test]
async fn two_stage_skeleton_failure_skips_classification() {
    let root = tempfile::tempdir().unwrap();
    // The skeleton stage (invoked with args) fails; the classify stage
    // would succeed, but must never run.
    let script = write_script(
        root.path(),
        r#"if [ -n "$2" ]; then
    echo "pose model missing" 1>&2
    exit 1
else
    echo "RESULT: 1"
fi
"#,
    );
    let cfg = config(root.path(), &script, PipelineVariant::TwoStage);
    let video = save_video(&cfg, "42_swing.mp4");

    let err = pipeline::run(&cfg, &video, "42_swing.mp4", "42")
        .await
        .unwrap_err();
    match err {
        AnalysisError::ProcessFailed { exit_code, preview } => {
            assert_eq!(exit_code, 1);
            assert!(preview.contains("pose model missing"));
        }
        other => panic!("expected ProcessFailed, got {other:?}"),
    }
}
