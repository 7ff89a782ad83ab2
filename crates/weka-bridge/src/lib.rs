//! weka-bridge: Rust bindings for the Weka machine learning toolkit.
//!
//! This crate embeds a JVM through JNI and exposes Weka's classifiers,
//! clusterers, filters and helper classes as typed Rust proxies. Every proxy
//! holds a global reference to the Java object it wraps; operations delegate
//! to the Java side and results come back as plain Rust values.
//!
//! # Features
//!
//! - **Runtime bootstrap**: classpath assembly from user entries, bundled jars,
//!   installed Weka packages and `CLASSPATH`, then a single process-wide JVM
//! - **Typed proxies**: one [`JavaWrapper`] per capability family, with a type
//!   guard on construction and cached method IDs for hot calls
//! - **Option handling**: `weka.core.Utils`-compatible option splitting and
//!   joining, plus command-line strings (`classname -opt value ...`)
//! - **Class registry**: construct known classes by name with the family
//!   checked up front
//! - **Serialization**: model files, byte buffers and deep copies
//! - **Containers**: keyed result bundles (model + header, predictions,
//!   attribute selection outcomes)
//! - **More schemes**: attribute selection, associators, data generators and
//!   capability queries
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use weka_bridge::{ClassIndex, Classifier, Evaluation, JavaWrapper, JvmConfig};
//!
//! // Start the JVM (call once at startup)
//! let runtime = weka_bridge::start(&JvmConfig::default())?;
//!
//! let data = weka_bridge::converters::load_any_file(&runtime, "iris.arff", Some(ClassIndex::Last))?
//!     .expect("arff is supported");
//!
//! let classifier: Classifier =
//!     weka_bridge::from_commandline(&runtime, "weka.classifiers.trees.J48 -C 0.25 -M 2")?;
//! classifier.build_classifier(&data)?;
//!
//! let evaluation = Evaluation::new(&data)?;
//! evaluation.crossvalidate_model(&classifier, &data, 10, 1)?;
//! println!("{}", evaluation.summary()?);
//!
//! weka_bridge::stop();
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Rust Application                         │
//! │                                                                 │
//! │  JvmConfig ──► Runtime ──► JavaWrapper proxies ──► Rust values  │
//! │                                                                 │
//! └───────────────────────────┬─────────────────────────────────────┘
//!                             │ JNI
//!                             ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Embedded JVM                             │
//! │                                                                 │
//! │  weka.jar (bundled or user-supplied)                            │
//! │  ├── classifiers, clusterers, filters                           │
//! │  └── installed packages (~/.wekafiles/packages)                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Initialization
//!
//! The JVM must be started before any proxy is created:
//!
//! ```rust,ignore
//! let runtime = weka_bridge::start(&JvmConfig::default())?;
//!
//! // Safe to call again, returns the same runtime
//! let same = weka_bridge::start(&JvmConfig::default())?;
//! assert!(weka_bridge::is_running());
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T>`]. Java exceptions raised by a
//! delegated call are cleared and surface as [`WekaError::Java`]; see
//! [`WekaError`] for the complete list.
//!
//! # Thread Safety
//!
//! [`Runtime`] and every proxy are `Send + Sync`. Each call attaches the
//! current thread to the VM on first use. Weka objects themselves are not
//! thread-safe; concurrent calls on the same object must be serialized by
//! the caller.
//!
//! # Modules
//!
//! - [`jvm`] - JVM lifecycle, classpath assembly and JNI helpers
//! - [`classes`] - object proxies, option handling and the class registry
//! - [`typeconv`] - conversions between Rust and Java values

pub mod associations;
pub mod attribute_selection;
pub mod capabilities;
pub mod classes;
pub mod classifiers;
pub mod clusterers;
mod config;
pub mod container;
pub mod converters;
pub mod datagenerators;
pub mod dataset;
pub mod distances;
mod error;
pub mod filters;
pub mod jvm;
pub mod serialization;
pub mod stemmers;
pub mod stopwords;
pub mod tokenizers;
pub mod typeconv;
pub mod utils;

// Re-export public API
//
// Configuration types
pub use config::{ConfigValidationError, JvmConfig, JvmConfigBuilder};
// Error types
pub use error::{Result, ResultExt, WekaError};
// Runtime
pub use jvm::{Classpath, Runtime};
// Proxy layer
pub use classes::{
    ClassRegistry, CommandLine, Family, Guarded, JavaObject, JavaWrapper, OptionHandler, OptionInfo,
    from_commandline, to_commandline,
};
// Capability families
pub use associations::{AssociationRule, Associator};
pub use attribute_selection::{ASEvaluation, ASSearch, AttributeSelection, RankedAttribute};
pub use capabilities::{Capabilities, Capability};
pub use classifiers::{Classifier, Evaluation};
pub use clusterers::Clusterer;
pub use datagenerators::DataGenerator;
pub use distances::DistanceFunction;
pub use filters::Filter;
pub use stemmers::Stemmer;
pub use stopwords::Stopwords;
pub use tokenizers::Tokenizer;
// Data
pub use container::{Container, ContainerKind, ContainerValue};
pub use converters::{Loader, Saver};
pub use dataset::{Attribute, AttributeType, ClassIndex, Instance, Instances};

/// Start the JVM, or return the runtime that is already active.
///
/// On first use this:
///
/// 1. Validates the configuration
/// 2. Assembles the classpath (user entries, bundled jars, packages, `CLASSPATH`)
/// 3. Creates the VM with `-Djava.class.path`, headless AWT and the max heap size
///
/// # Idempotence
///
/// Subsequent calls log at info level and return a clone of the active
/// runtime; the new configuration is ignored.
///
/// # Errors
///
/// Returns [`WekaError::InvalidConfig`] for an invalid configuration and
/// [`WekaError::RuntimeStart`] when the VM cannot be created.
#[must_use = "start errors should be handled"]
pub fn start(config: &JvmConfig) -> Result<Runtime> {
    Runtime::start(config)
}

/// Stop the active runtime, if any.
///
/// See [`Runtime::stop`].
pub fn stop() {
    Runtime::stop_active()
}

/// Check if a runtime is currently active.
pub fn is_running() -> bool {
    Runtime::is_running()
}
