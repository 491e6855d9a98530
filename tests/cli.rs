use assert_cmd::Command;
use image::{ImageFormat, Rgba, RgbaImage};
use predicates::prelude::*;
use tempfile::TempDir;

fn annotator_cmd(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("photo-annotator").expect("binary exists");
    cmd.env("XDG_CONFIG_HOME", config_home.path().join("config"))
        .env("XDG_DATA_HOME", config_home.path().join("data"))
        .env("HOME", config_home.path());
    cmd
}

fn write_photo(dir: &TempDir, width: u32, height: u32) -> std::path::PathBuf {
    let path = dir.path().join("photo.png");
    RgbaImage::from_pixel(width, height, Rgba([30, 60, 90, 255]))
        .save_with_format(&path, ImageFormat::Png)
        .unwrap();
    path
}

#[test]
fn help_prints_usage() {
    let temp = TempDir::new().unwrap();
    annotator_cmd(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Photo annotation editor with freehand ink and text overlays",
        ));
}

#[test]
fn render_requires_image_argument() {
    let temp = TempDir::new().unwrap();
    annotator_cmd(&temp)
        .arg("render")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "required arguments were not provided",
        ));
}

#[test]
fn render_reports_missing_image() {
    let temp = TempDir::new().unwrap();
    annotator_cmd(&temp)
        .args(["render", "--image"])
        .arg(temp.path().join("absent.png"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not read image"));
}

#[test]
fn render_rejects_non_image_file() {
    let temp = TempDir::new().unwrap();
    let bogus = temp.path().join("notes.txt");
    std::fs::write(&bogus, "not a photo").unwrap();

    annotator_cmd(&temp)
        .args(["render", "--image"])
        .arg(&bogus)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unable to load the selected image"));
}

#[test]
fn render_rejects_bad_canvas() {
    let temp = TempDir::new().unwrap();
    let photo = write_photo(&temp, 8, 8);
    annotator_cmd(&temp)
        .args(["render", "--canvas", "0x10", "--image"])
        .arg(&photo)
        .assert()
        .failure()
        .stderr(predicate::str::contains("non-zero"));
}

#[test]
fn render_replays_script_and_writes_png() {
    let temp = TempDir::new().unwrap();
    let photo = write_photo(&temp, 64, 48);
    let script = temp.path().join("edit.toml");
    std::fs::write(
        &script,
        r#"
        [[step]]
        action = "stroke"
        points = [[4, 4], [60, 40]]
        color = "red"
        thickness = 4.0

        [[step]]
        action = "add-text"
        text = "Hi"
        bold = true
        at = [10.0, 10.0]
        "#,
    )
    .unwrap();
    let output = temp.path().join("out").join("annotated.png");

    annotator_cmd(&temp)
        .args(["render", "--canvas", "64x48", "--image"])
        .arg(&photo)
        .arg("--script")
        .arg(&script)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved annotated image to"));

    let rendered = image::open(&output).unwrap().to_rgba8();
    assert_eq!(rendered.dimensions(), (64, 48));
    assert_eq!(rendered.get_pixel(0, 47).0, [30, 60, 90, 255]);
}

#[test]
fn render_reports_bad_script_step() {
    let temp = TempDir::new().unwrap();
    let photo = write_photo(&temp, 16, 16);
    let script = temp.path().join("edit.toml");
    std::fs::write(&script, "[[step]]\naction = \"drag\"\nindex = 4\ndx = 1.0\ndy = 1.0\n").unwrap();

    annotator_cmd(&temp)
        .args(["render", "--image"])
        .arg(&photo)
        .arg("--script")
        .arg(&script)
        .arg("--output")
        .arg(temp.path().join("never.png"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Step 0"));
}

#[test]
fn init_config_writes_example_once() {
    let temp = TempDir::new().unwrap();
    annotator_cmd(&temp)
        .arg("init-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote default config"));
    assert!(
        temp.path()
            .join("config")
            .join("photo-annotator")
            .join("config.toml")
            .exists()
    );

    annotator_cmd(&temp)
        .arg("init-config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn session_reports_and_clears() {
    let temp = TempDir::new().unwrap();
    annotator_cmd(&temp)
        .arg("session")
        .assert()
        .success()
        .stdout(predicate::str::contains("signed out"));

    let session_dir = temp.path().join("data").join("photo-annotator");
    std::fs::create_dir_all(&session_dir).unwrap();
    std::fs::write(
        session_dir.join("session.json"),
        r#"{"version":1,"last_modified":"2026-01-01T00:00:00Z","signed_in":true}"#,
    )
    .unwrap();

    annotator_cmd(&temp)
        .arg("session")
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed in: yes"));

    annotator_cmd(&temp)
        .args(["session", "--clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared session data"));
    assert!(!session_dir.join("session.json").exists());
}
