//! The embedded JVM: classpath assembly, runtime lifecycle and JNI helpers.
//!
//! - [`classpath`] collects the entries the VM is started with
//! - [`runtime`] owns the VM and hands out thread-attached JNI environments
//! - [`bridge`] holds naming conversions and small call wrappers

pub mod bridge;
pub mod classpath;
pub mod runtime;

pub use classpath::Classpath;
pub use runtime::Runtime;
