use std::path::{Path, PathBuf};
use std::process::Command;

use teestudio::{Color, Project, ShirtModel, ShirtSelection, ShirtSize};

fn exe() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_teestudio")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "teestudio.exe"
            } else {
                "teestudio"
            });
            p
        })
}

fn write_project(dir: &Path) -> PathBuf {
    let path = dir.join("project.json");
    let project = Project {
        shirt: ShirtSelection {
            model: ShirtModel::Oversized,
            color: Color::rgb(0x1e, 0x3a, 0x8a),
            size: ShirtSize::L,
        },
        ..Project::default()
    };
    project.save(&path).unwrap();
    path
}

fn run(args: &[&str]) -> std::process::Output {
    Command::new(exe())
        .args(args)
        .env("TEESTUDIO_CHECKOUT_DELAY_MS", "0")
        .output()
        .unwrap()
}

#[test]
fn shape_writes_png_and_appends_to_project() {
    let dir = tempfile::tempdir().unwrap();
    let project = write_project(dir.path());
    let out = dir.path().join("star.png");

    let o = run(&[
        "shape",
        "--kind",
        "star",
        "--color",
        "#ec4899",
        "--out",
        out.to_str().unwrap(),
        "--add-to",
        project.to_str().unwrap(),
    ]);
    assert!(o.status.success(), "{}", String::from_utf8_lossy(&o.stderr));

    let img = image::open(&out).unwrap();
    assert_eq!((img.width(), img.height()), (100, 100));
    assert_eq!(Project::load(&project).unwrap().designs.len(), 1);
}

#[test]
fn quote_prints_breakdown() {
    let dir = tempfile::tempdir().unwrap();
    let project = write_project(dir.path());

    let o = run(&["quote", "--in", project.to_str().unwrap()]);
    assert!(o.status.success());
    let stdout = String::from_utf8_lossy(&o.stdout);
    assert!(stdout.contains("Subtotal: $30.00"), "{stdout}");
    assert!(stdout.contains("Envío: $8.00"), "{stdout}");
    assert!(stdout.contains("Total: $41.00"), "{stdout}");
}

#[test]
fn preview_writes_svg_and_png() {
    let dir = tempfile::tempdir().unwrap();
    let project = write_project(dir.path());
    let svg = dir.path().join("preview.svg");
    let png = dir.path().join("preview.png");

    let o = run(&[
        "preview",
        "--in",
        project.to_str().unwrap(),
        "--out",
        svg.to_str().unwrap(),
        "--view",
        "back",
        "--svg",
    ]);
    assert!(o.status.success());
    let text = std::fs::read_to_string(&svg).unwrap();
    assert!(text.starts_with("<svg"));
    assert!(text.contains("M100 30 L100 210"));

    let o = run(&[
        "preview",
        "--in",
        project.to_str().unwrap(),
        "--out",
        png.to_str().unwrap(),
    ]);
    assert!(o.status.success());
    let img = image::open(&png).unwrap();
    assert_eq!((img.width(), img.height()), (512, 512));
}

#[test]
fn checkout_with_incomplete_customer_fails() {
    let dir = tempfile::tempdir().unwrap();
    let project = write_project(dir.path());

    let o = run(&["checkout", "--in", project.to_str().unwrap(), "--seed", "1"]);
    assert!(!o.status.success());
    let stderr = String::from_utf8_lossy(&o.stderr);
    assert!(stderr.contains("Nombre es requerido"), "{stderr}");
}

#[test]
fn add_upload_rejects_non_images() {
    let dir = tempfile::tempdir().unwrap();
    let project = write_project(dir.path());
    let notes = dir.path().join("notes.txt");
    std::fs::write(&notes, b"hello").unwrap();

    let o = run(&[
        "add-upload",
        "--in",
        project.to_str().unwrap(),
        "--file",
        notes.to_str().unwrap(),
    ]);
    assert!(!o.status.success());
    let stderr = String::from_utf8_lossy(&o.stderr);
    assert!(stderr.contains("Por favor selecciona un archivo de imagen válido"));
    assert!(Project::load(&project).unwrap().designs.is_empty());
}
