use std::path::PathBuf;

fn exe() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_walkmint")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "walkmint.exe"
            } else {
                "walkmint"
            });
            p
        })
}

fn out_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("cli_smoke").join(name);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn cli_still_writes_png_and_metadata() {
    let dir = out_dir("still");
    let png = dir.join("walk.png");
    let meta = dir.join("walk.json");
    let _ = std::fs::remove_file(&png);
    let _ = std::fs::remove_file(&meta);

    let status = std::process::Command::new(exe())
        .args(["--seed", "7", "still", "--out"])
        .arg(&png)
        .arg("--metadata")
        .arg(&meta)
        .status()
        .unwrap();
    assert!(status.success());

    let img = image::open(&png).unwrap();
    assert_eq!((img.width(), img.height()), (400, 400));

    let md: serde_json::Value =
        serde_json::from_reader(std::fs::File::open(&meta).unwrap()).unwrap();
    assert_eq!(md["name"], "Random Walk NFT");
    assert_eq!(md["image"], "walk.png");
}

#[test]
fn cli_frame_honors_config_file() {
    let dir = out_dir("frame");
    let cfg_path = dir.join("cfg.json");
    let png = dir.join("frame.png");
    let _ = std::fs::remove_file(&png);

    std::fs::write(
        &cfg_path,
        r#"{"canvas": {"width": 64, "height": 48}, "steps": 100, "seed": 3}"#,
    )
    .unwrap();

    let status = std::process::Command::new(exe())
        .arg("--config")
        .arg(&cfg_path)
        .args(["frame", "--frame", "2", "--out"])
        .arg(&png)
        .status()
        .unwrap();
    assert!(status.success());

    let img = image::open(&png).unwrap();
    assert_eq!((img.width(), img.height()), (64, 48));
}

#[test]
fn cli_path_dumps_points() {
    let dir = out_dir("path");
    let out = dir.join("points.json");

    let status = std::process::Command::new(exe())
        .args(["--seed", "1", "path", "--out"])
        .arg(&out)
        .status()
        .unwrap();
    assert!(status.success());

    let points: Vec<walkmint::Point> =
        serde_json::from_reader(std::fs::File::open(&out).unwrap()).unwrap();
    assert_eq!(points.len(), walkmint::DEFAULT_STEPS);
}

#[test]
fn cli_rejects_invalid_config() {
    let dir = out_dir("invalid");
    let cfg_path = dir.join("bad.json");
    std::fs::write(&cfg_path, r#"{"steps": 0}"#).unwrap();

    let status = std::process::Command::new(exe())
        .arg("--config")
        .arg(&cfg_path)
        .args(["path", "--out"])
        .arg(dir.join("never.json"))
        .status()
        .unwrap();
    assert!(!status.success());
}
