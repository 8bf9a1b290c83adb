//! Runs the `retouch` binary on scripted sessions.

#![allow(clippy::unwrap_used)]

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

fn write_input(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("input.png");
    let image = image::RgbaImage::from_fn(20, 10, |x, _| {
        if x < 10 {
            image::Rgba([40, 80, 120, 255])
        } else {
            image::Rgba([200, 180, 160, 255])
        }
    });
    image.save(&path).unwrap();
    path
}

fn retouch(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_retouch"))
        .args(args)
        .env("RUST_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn edits_and_saves_from_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());
    let saved = dir.path().join("out.png");

    let script = format!(
        "# rotate and shrink\nrotate 90\nresize 50\nbrightness 20\napply\nsave {}\n",
        saved.display(),
    );
    let output = retouch(&[input.to_str().unwrap()], &script);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let text = stdout(&output);
    assert!(text.contains("rotate 90°: 10x20 [history 2/2]"), "got {text}");
    assert!(text.contains("resize 50%: 5x10 [history 3/3]"), "got {text}");
    assert!(text.contains("apply adjustments: 5x10 [history 4/4]"), "got {text}");

    let written = image::open(&saved).unwrap();
    assert_eq!((written.width(), written.height()), (5, 10));
}

#[test]
fn undo_before_save_writes_earlier_state() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());
    let saved = dir.path().join("out.bmp");

    let script = format!("flip horizontal\nrotate 90\nundo\nsave {}\n", saved.display());
    let output = retouch(&[input.to_str().unwrap()], &script);
    assert!(output.status.success());

    let written = image::open(&saved).unwrap().into_rgba8();
    assert_eq!(written.dimensions(), (20, 10));
    // Flipped: the light half is now on the left.
    assert_eq!(written.get_pixel(0, 0).0, [200, 180, 160, 255]);
}

#[test]
fn script_file_in_strict_mode_fails_on_bad_line() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());
    let script = dir.path().join("edits.txt");
    std::fs::write(&script, "grayscale\nrotate 45\nsharpen\n").unwrap();

    let output = retouch(
        &[input.to_str().unwrap(), "--script", script.to_str().unwrap(), "--strict"],
        "",
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("line 2"), "got {stderr}");
    assert!(!stdout(&output).contains("sharpen"));
}

#[test]
fn lenient_mode_reports_and_continues() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());

    let output = retouch(&[input.to_str().unwrap()], "frobnicate\ngrayscale\nstatus\n");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown command"));
    assert!(stdout(&output).contains("history 2/2 (capacity 20)"));
}

#[test]
fn max_history_flag_bounds_history() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());

    let output = retouch(
        &[input.to_str().unwrap(), "--max-history", "2"],
        "sharpen\nsharpen\nsharpen\nundo\nundo\nstatus\n",
    );
    let text = stdout(&output);
    assert!(text.contains("nothing to undo"), "got {text}");
    assert!(text.contains("history 1/2 (capacity 2)"), "got {text}");
}

#[test]
fn invalid_config_fails_at_startup() {
    let output = retouch(&["--config-json", r#"{"max_history": 0}"#], "");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid configuration"));
}

#[test]
fn missing_image_fails_at_startup() {
    let dir = tempfile::tempdir().unwrap();
    let output = retouch(&[dir.path().join("nope.png").to_str().unwrap()], "");
    assert!(!output.status.success());
}
