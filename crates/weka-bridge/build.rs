//! Build script for weka-bridge.
//!
//! Exports the location of the crate's bundled jar directory so the runtime
//! can fall back to it when no other location is configured.
//!
//! # Cargo Directives
//!
//! - `cargo:rustc-env`: `WEKA_BRIDGE_BUNDLED_DIR` for use by the crate at runtime
//! - `cargo:rerun-if-changed`: Rebuild triggers

use std::env;
use std::path::PathBuf;

fn main() {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let lib_dir = PathBuf::from(&manifest_dir).join("lib");

    println!(
        "cargo:rustc-env=WEKA_BRIDGE_BUNDLED_DIR={}",
        lib_dir.display()
    );

    println!("cargo:rerun-if-changed=lib");
    println!("cargo:rerun-if-changed=build.rs");
}
