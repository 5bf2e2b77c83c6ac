use assert_cmd::{cargo::cargo_bin_cmd, Command};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Reference pack used across the CLI tests.
///
/// 04-05-2024 shift 1 is Easy, shift 2 is Hard.
pub const FIXTURE_PACK: &str = r#"{
    "marks": [
        {"percentile": 50.0, "easy": 150, "medium": 120, "hard": 100},
        {"percentile": 90.0, "easy": 250, "medium": 200, "hard": 180},
        {"percentile": 99.0, "easy": 290, "medium": 260, "hard": 240}
    ],
    "math": [
        {"percentile": 50.0, "easy": 60, "medium": 50, "hard": 40},
        {"percentile": 90.0, "easy": 90, "medium": 80, "hard": 70}
    ],
    "physics_chemistry": [
        {"percentile": 40.0, "easy": 50, "medium": 40, "hard": 30},
        {"percentile": 85.0, "easy": 80, "medium": 70, "hard": 60}
    ],
    "difficulty": [
        {"date": "04-05-2024", "shifts": {"1": "Easy", "2": "Hard"}}
    ]
}"#;

/// Get a Command for marksrank running in `dir`, isolated from user config
pub fn marksrank(dir: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("marksrank");
    cmd.current_dir(dir)
        .env("MARKSRANK_CONFIG_DIR", dir.join("config"))
        .env_remove("MARKSRANK_DB")
        .env_remove("MARKSRANK_LOG")
        .env_remove("RUST_LOG");
    cmd
}

/// Write the fixture pack into `dir`
pub fn write_pack(dir: &Path) -> PathBuf {
    let path = dir.join("pack.json");
    fs::write(&path, FIXTURE_PACK).unwrap();
    path
}

/// Temp directory with `marksrank.db` initialized and the fixture loaded
pub fn setup_loaded_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    let pack = write_pack(dir.path());
    marksrank(dir.path())
        .arg("load")
        .arg(&pack)
        .assert()
        .success();
    dir
}

/// Value following `label` on a human output line, parsed as f64
#[allow(dead_code)]
pub fn line_value(stdout: &[u8], label: &str) -> f64 {
    String::from_utf8_lossy(stdout)
        .lines()
        .find_map(|line| line.strip_prefix(label))
        .map(|rest| rest.trim().parse().unwrap())
        .unwrap_or_else(|| panic!("no line starting with {label:?}"))
}
