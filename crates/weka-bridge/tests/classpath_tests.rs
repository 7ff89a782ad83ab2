//! Integration tests for classpath assembly.
//!
//! These tests only touch the filesystem; no JVM is created.

use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use weka_bridge::JvmConfig;
use weka_bridge::jvm::classpath;

// ============================================================================
// Helper Functions
// ============================================================================

fn touch(path: &Path) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    fs::write(path, b"").expect("Failed to create file");
    path.to_path_buf()
}

/// A bundled lib directory and a Weka home with two packages.
struct Layout {
    _root: TempDir,
    user_jar: PathBuf,
    bundled_dir: PathBuf,
    weka_home: PathBuf,
}

fn layout() -> Layout {
    let root = TempDir::new().expect("Failed to create temp dir");
    let user_jar = touch(&root.path().join("user/extra.jar"));

    let bundled_dir = root.path().join("lib");
    touch(&bundled_dir.join("weka.jar"));
    touch(&bundled_dir.join("mtj.jar"));
    touch(&bundled_dir.join("weka-src.jar"));
    touch(&bundled_dir.join("README.md"));

    let weka_home = root.path().join("wekafiles");
    let packages = weka_home.join("packages");
    touch(&packages.join("LibSVM/LibSVM.jar"));
    touch(&packages.join("LibSVM/lib/libsvm.jar"));
    touch(&packages.join("alternatingModelTrees/alternatingModelTrees.jar"));

    Layout {
        user_jar,
        bundled_dir,
        weka_home,
        _root: root,
    }
}

fn names(entries: &[PathBuf]) -> Vec<String> {
    entries
        .iter()
        .map(|e| e.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

// ============================================================================
// Precedence
// ============================================================================

#[test]
fn test_user_then_bundled_then_packages() {
    let layout = layout();
    let config = JvmConfig::builder()
        .class_path(&layout.user_jar)
        .bundled_dir(&layout.bundled_dir)
        .weka_home(&layout.weka_home)
        .packages(true)
        .build()
        .unwrap();

    let cp = classpath::assemble(&config);

    assert_eq!(
        names(cp.entries()),
        vec![
            "extra.jar",
            "mtj.jar",
            "weka.jar",
            "LibSVM.jar",
            "libsvm.jar",
            "alternatingModelTrees.jar",
        ]
    );
    assert_eq!(cp.position(&layout.user_jar), Some(0));
}

#[test]
fn test_bundled_disabled() {
    let layout = layout();
    let config = JvmConfig::builder()
        .class_path(&layout.user_jar)
        .bundled(false)
        .bundled_dir(&layout.bundled_dir)
        .build()
        .unwrap();

    let cp = classpath::assemble(&config);

    assert_eq!(cp.entries(), &[layout.user_jar.clone()]);
}

#[test]
fn test_missing_user_entry_is_kept() {
    let layout = layout();
    let missing = layout.weka_home.join("does-not-exist.jar");
    let config = JvmConfig::builder()
        .class_path(&missing)
        .bundled_dir(&layout.bundled_dir)
        .build()
        .unwrap();

    let cp = classpath::assemble(&config);

    assert_eq!(cp.position(&missing), Some(0));
    assert_eq!(cp.len(), 3);
}

#[test]
fn test_weka_home_alone_adds_packages() {
    let layout = layout();
    let json = serde_json::json!({
        "bundled": false,
        "weka_home": layout.weka_home,
    });
    let path = layout.weka_home.join("config.json");
    fs::write(&path, json.to_string()).unwrap();

    let config = JvmConfig::from_json_file(&path).unwrap();
    assert!(!config.packages);

    let cp = classpath::assemble(&config);

    assert_eq!(
        names(cp.entries()),
        vec!["LibSVM.jar", "libsvm.jar", "alternatingModelTrees.jar"]
    );
}

// ============================================================================
// Missing directories
// ============================================================================

#[test]
fn test_missing_package_root_is_skipped() {
    let layout = layout();
    let empty_home = TempDir::new().unwrap();
    let config = JvmConfig::builder()
        .bundled_dir(&layout.bundled_dir)
        .weka_home(empty_home.path())
        .packages(true)
        .build()
        .unwrap();

    let cp = classpath::assemble(&config);

    assert_eq!(names(cp.entries()), vec!["mtj.jar", "weka.jar"]);
}

#[test]
fn test_missing_bundled_dir_is_skipped() {
    let layout = layout();
    let config = JvmConfig::builder()
        .class_path(&layout.user_jar)
        .bundled_dir(layout.weka_home.join("no-lib"))
        .build()
        .unwrap();

    let cp = classpath::assemble(&config);

    assert_eq!(cp.entries(), &[layout.user_jar.clone()]);
}

#[test]
fn test_option_value_matches_entries() {
    let layout = layout();
    let config = JvmConfig::builder()
        .bundled_dir(&layout.bundled_dir)
        .build()
        .unwrap();

    let cp = classpath::assemble(&config);
    let value = cp.to_option_value();

    assert_eq!(classpath::split_classpath(&value), cp.entries().to_vec());
}
