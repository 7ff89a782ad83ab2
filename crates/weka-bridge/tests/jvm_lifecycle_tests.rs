//! Start/stop lifecycle against a real JVM.
//!
//! This binary stops its runtime, so it lives apart from `jvm_tests` and
//! holds a single test. Run it with:
//!
//! ```text
//! WEKA_JAR=/path/to/weka.jar cargo test -p weka-bridge --test jvm_lifecycle_tests -- --ignored
//! ```

use std::path::PathBuf;
use weka_bridge::{Classifier, JavaWrapper, JvmConfig, OptionHandler, WekaError, utils};

fn weka_jar() -> PathBuf {
    PathBuf::from(std::env::var("WEKA_JAR").expect("WEKA_JAR must point at weka.jar"))
}

#[test]
#[ignore = "requires a JVM and WEKA_JAR"]
fn test_start_with_missing_packages_then_stop() {
    let home = tempfile::TempDir::new().unwrap();
    let config = JvmConfig::builder()
        .class_path(weka_jar())
        .bundled(false)
        .weka_home(home.path().join("no-such-home"))
        .build()
        .unwrap();

    // a missing package root is skipped, not fatal
    let runtime = weka_bridge::start(&config).unwrap();
    assert!(weka_bridge::is_running());
    assert_eq!(runtime.classpath().entries(), &[weka_jar()]);
    assert!(utils::version(&runtime).is_ok());

    let classifier = Classifier::new(&runtime, "weka.classifiers.trees.J48").unwrap();
    let handler = OptionHandler::of(classifier.java_object().clone()).unwrap();

    weka_bridge::stop();
    assert!(!weka_bridge::is_running());
    assert!(runtime.is_stopped());

    assert!(matches!(
        classifier.option_handler().options(),
        Err(WekaError::RuntimeStopped)
    ));
    assert!(matches!(handler.global_info(), Err(WekaError::RuntimeStopped)));
    assert!(matches!(
        utils::version(&runtime),
        Err(WekaError::RuntimeStopped)
    ));

    // stopping again is a no-op
    weka_bridge::stop();
    runtime.stop();
    assert!(!weka_bridge::is_running());
}
