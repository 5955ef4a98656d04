use std::path::{Path, PathBuf};

fn write_test_png(path: &Path, width: u32, height: u32, rgba: [u8; 4]) {
    let pixels: Vec<u8> = rgba.repeat((width * height) as usize);
    let img = image::RgbaImage::from_raw(width, height, pixels).unwrap();
    img.save(path).unwrap();
}

fn framery_exe() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_framery")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "framery.exe"
            } else {
                "framery"
            });
            p
        })
}

#[test]
fn cli_export_writes_a_png() {
    let dir = PathBuf::from("target").join("cli_smoke");
    let frames_dir = dir.join("frames");
    std::fs::create_dir_all(&frames_dir).unwrap();

    let photo_path = dir.join("photo.png");
    let out_path = dir.join("out.png");
    let _ = std::fs::remove_file(&out_path);

    write_test_png(&photo_path, 64, 48, [180, 40, 40, 255]);
    // Builtin frame1 artwork resolves to <frames-dir>/frames/frame1.png.
    write_test_png(&frames_dir.join("frame1.png"), 32, 32, [20, 90, 20, 255]);

    let status = std::process::Command::new(framery_exe())
        .args([
            "export",
            "--image",
            photo_path.to_str().unwrap(),
            "--frame",
            "frame1",
            "--frames-dir",
            dir.to_str().unwrap(),
            "--zoom",
            "120",
            "--out",
            out_path.to_str().unwrap(),
        ])
        .status()
        .unwrap();

    assert!(status.success());
    let decoded = image::open(&out_path).unwrap();
    assert_eq!(decoded.width(), 1080);
    assert_eq!(decoded.height(), 1920);
}

#[test]
fn cli_preview_without_frame_writes_a_png() {
    let dir = PathBuf::from("target").join("cli_smoke_preview");
    std::fs::create_dir_all(&dir).unwrap();

    let photo_path = dir.join("photo.png");
    let out_path = dir.join("preview.png");
    let _ = std::fs::remove_file(&out_path);
    write_test_png(&photo_path, 30, 20, [5, 5, 200, 255]);

    let status = std::process::Command::new(framery_exe())
        .args([
            "preview",
            "--image",
            photo_path.to_str().unwrap(),
            "--width",
            "90",
            "--height",
            "160",
            "--out",
            out_path.to_str().unwrap(),
        ])
        .status()
        .unwrap();

    assert!(status.success());
    let decoded = image::open(&out_path).unwrap();
    assert_eq!(decoded.width(), 90);
    assert_eq!(decoded.height(), 160);
}

#[test]
fn cli_export_fails_for_an_unknown_frame() {
    let dir = PathBuf::from("target").join("cli_smoke_unknown");
    std::fs::create_dir_all(&dir).unwrap();
    let photo_path = dir.join("photo.png");
    write_test_png(&photo_path, 8, 8, [1, 1, 1, 255]);

    let status = std::process::Command::new(framery_exe())
        .args([
            "export",
            "--image",
            photo_path.to_str().unwrap(),
            "--frame",
            "no_such_frame",
            "--out",
            dir.join("out.png").to_str().unwrap(),
        ])
        .status()
        .unwrap();
    assert!(!status.success());
}
