//! Classpath assembly for the embedded JVM.
//!
//! The JVM reads its classpath exactly once, when it is created, so every
//! entry has to be collected up front. [`assemble()`] collects them in a
//! fixed precedence order:
//!
//! 1. User-supplied entries ([`JvmConfig::class_path`])
//! 2. Bundled jars (the bundled library directory)
//! 3. Jars of installed Weka packages
//! 4. The system `CLASSPATH`
//!
//! # Bundled Jar Location
//!
//! The bundled library directory is searched for in this order:
//!
//! 1. [`JvmConfig::bundled_dir`]
//! 2. `WEKA_BRIDGE_LIB_DIR` environment variable
//! 3. `{exe_dir}/lib/`
//! 4. Compile-time path from `build.rs` (the crate's `lib/` directory)
//!
//! # Package Layout
//!
//! ```text
//! {weka_home}/packages/
//! ├── packageA/
//! │   ├── packageA.jar        <- added
//! │   └── lib/
//! │       └── dependency.jar  <- added
//! └── packageB/
//!     └── packageB.jar        <- added
//! ```
//!
//! Missing directories are logged and skipped; assembly itself never fails.

use crate::config::JvmConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

/// Environment variable overriding the Weka home directory.
pub const WEKA_HOME_ENV: &str = "WEKA_HOME";

/// Environment variable overriding the bundled library directory.
pub const LIB_DIR_ENV: &str = "WEKA_BRIDGE_LIB_DIR";

/// Default Weka home, relative to the user's home directory.
const DEFAULT_WEKA_HOME: &str = ".wekafiles";

/// Name of the directory below the Weka home that holds the packages.
const PACKAGES_DIR: &str = "packages";

/// Name of a package's nested library directory.
const PACKAGE_LIB_DIR: &str = "lib";

#[cfg(windows)]
const SEPARATOR: char = ';';
#[cfg(not(windows))]
const SEPARATOR: char = ':';

/// An ordered list of classpath entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classpath {
    entries: Vec<PathBuf>,
}

impl Classpath {
    /// Create an empty classpath.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn push(&mut self, entry: impl Into<PathBuf>) {
        self.entries.push(entry.into());
    }

    /// Append several entries, keeping their order.
    pub fn extend<I: IntoIterator<Item = PathBuf>>(&mut self, entries: I) {
        self.entries.extend(entries);
    }

    /// The entries in precedence order.
    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position of the first entry equal to `entry`.
    pub fn position(&self, entry: impl AsRef<Path>) -> Option<usize> {
        let entry = entry.as_ref();
        self.entries.iter().position(|e| e == entry)
    }

    /// The entries joined with the platform path separator.
    pub fn to_option_value(&self) -> String {
        let parts: Vec<String> = self
            .entries
            .iter()
            .map(|e| e.to_string_lossy().into_owned())
            .collect();
        parts.join(&SEPARATOR.to_string())
    }
}

/// Assembles the classpath for `config` in precedence order.
///
/// This function reads the filesystem and environment but never fails:
/// missing directories and entries are logged and skipped.
pub fn assemble(config: &JvmConfig) -> Classpath {
    let mut classpath = Classpath::new();

    // user-defined entries first
    for entry in &config.class_path {
        debug!("Adding user-supplied classpath={}", entry.display());
        if !entry.exists() {
            warn!("User-supplied classpath entry not found: {}", entry.display());
        }
        classpath.push(entry.clone());
    }

    if config.bundled {
        debug!("Adding bundled jars");
        match resolve_bundled_dir(config.bundled_dir.as_deref()) {
            Some(dir) => classpath.extend(bundled_jars(&dir)),
            None => warn!("No bundled library directory found"),
        }
    }

    if config.packages_enabled() {
        match packages_dir(config.weka_home.as_deref()) {
            Some(dir) => {
                debug!("Adding Weka packages, using: {}", dir.display());
                classpath.extend(package_jars(&dir));
            }
            None => error!("Cannot determine Weka home directory, skipping packages"),
        }
    }

    if config.system_classpath {
        debug!("Adding system classpath");
        classpath.extend(system_classpath());
    }

    debug!("Classpath={}", classpath.to_option_value());
    classpath
}

/// Lists the jars directly inside the bundled library directory.
///
/// Source jars (names containing `-src.`) are skipped. The result is sorted
/// by file name. A missing directory yields an empty list.
pub fn bundled_jars(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        warn!("Bundled library directory not found: {}", dir.display());
        return Vec::new();
    }

    list_jars(dir)
        .into_iter()
        .filter(|jar| {
            let name = file_name_lowercase(jar);
            !name.contains("-src.")
        })
        .collect()
}

/// Collects the jars of all packages below `package_dir`.
///
/// For each package directory (in name order) the jars directly inside it
/// come first, followed by the jars in its `lib/` subdirectory. A missing
/// `package_dir` is logged at error level and yields an empty list.
pub fn package_jars(package_dir: &Path) -> Vec<PathBuf> {
    if !package_dir.is_dir() {
        error!("package_dir not found: {}", package_dir.display());
        return Vec::new();
    }
    debug!("package_dir={}", package_dir.display());

    let mut packages = match fs::read_dir(package_dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect::<Vec<_>>(),
        Err(e) => {
            error!("Failed to list {}: {}", package_dir.display(), e);
            return Vec::new();
        }
    };
    packages.sort();

    let mut jars = Vec::new();
    for directory in packages {
        debug!("  directory={}", directory.display());
        jars.extend(list_jars(&directory));
        let lib = directory.join(PACKAGE_LIB_DIR);
        if lib.is_dir() {
            jars.extend(list_jars(&lib));
        }
    }
    jars
}

/// The entries of the `CLASSPATH` environment variable.
pub fn system_classpath() -> Vec<PathBuf> {
    match env::var("CLASSPATH") {
        Ok(value) => split_classpath(&value),
        Err(_) => {
            debug!("CLASSPATH not set");
            Vec::new()
        }
    }
}

/// Splits a classpath string on the platform separator, dropping empty parts.
pub fn split_classpath(value: &str) -> Vec<PathBuf> {
    value
        .split(SEPARATOR)
        .filter(|part| !part.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// The Weka home directory: `home_override`, else `WEKA_HOME`, else `~/.wekafiles`.
///
/// Returns `None` only when no override is given and the user's home
/// directory cannot be determined.
pub fn weka_home(home_override: Option<&Path>) -> Option<PathBuf> {
    if let Some(home) = home_override {
        return Some(expand_home(home));
    }
    if let Ok(home) = env::var(WEKA_HOME_ENV) {
        if !home.is_empty() {
            return Some(expand_home(Path::new(&home)));
        }
    }
    user_home().map(|home| home.join(DEFAULT_WEKA_HOME))
}

/// The package root: `{weka_home}/packages`.
pub fn packages_dir(home_override: Option<&Path>) -> Option<PathBuf> {
    weka_home(home_override).map(|home| home.join(PACKAGES_DIR))
}

/// Resolves the bundled library directory (see module docs for search order).
pub fn resolve_bundled_dir(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(dir) = explicit {
        return Some(dir.to_path_buf());
    }

    if let Ok(dir) = env::var(LIB_DIR_ENV) {
        let path = PathBuf::from(dir);
        if path.is_dir() {
            return Some(path);
        }
    }

    if let Ok(exe_path) = env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let lib = exe_dir.join("lib");
            if lib.is_dir() {
                return Some(lib);
            }
        }
    }

    let compile_time_dir = PathBuf::from(env!("WEKA_BRIDGE_BUNDLED_DIR"));
    if compile_time_dir.is_dir() {
        return Some(compile_time_dir);
    }

    None
}

fn list_jars(dir: &Path) -> Vec<PathBuf> {
    let mut jars = match fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && file_name_lowercase(p).ends_with(".jar"))
            .collect::<Vec<_>>(),
        Err(e) => {
            warn!("Failed to list {}: {}", dir.display(), e);
            Vec::new()
        }
    };
    jars.sort();
    jars
}

fn file_name_lowercase(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

fn user_home() -> Option<PathBuf> {
    #[cfg(windows)]
    let var = "USERPROFILE";
    #[cfg(not(windows))]
    let var = "HOME";

    env::var(var).ok().filter(|h| !h.is_empty()).map(PathBuf::from)
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match user_home() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_bundled_jars_skips_sources_and_other_files() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("weka.jar"));
        touch(&dir.path().join("mtj.JAR"));
        touch(&dir.path().join("weka-src.jar"));
        touch(&dir.path().join("notes.txt"));

        let jars = bundled_jars(dir.path());
        assert_eq!(
            jars,
            vec![dir.path().join("mtj.JAR"), dir.path().join("weka.jar")]
        );
    }

    #[test]
    fn test_bundled_jars_missing_dir() {
        let dir = TempDir::new().unwrap();
        assert!(bundled_jars(&dir.path().join("nope")).is_empty());
    }

    #[test]
    fn test_package_jars_layout() {
        let root = TempDir::new().unwrap();
        touch(&root.path().join("beta/beta.jar"));
        touch(&root.path().join("alpha/alpha.jar"));
        touch(&root.path().join("alpha/lib/dep.jar"));
        touch(&root.path().join("alpha/lib/README"));
        touch(&root.path().join("alpha/doc/ignored.jar"));
        touch(&root.path().join("stray.jar"));

        let jars = package_jars(root.path());
        assert_eq!(
            jars,
            vec![
                root.path().join("alpha/alpha.jar"),
                root.path().join("alpha/lib/dep.jar"),
                root.path().join("beta/beta.jar"),
            ]
        );
    }

    #[test]
    fn test_package_jars_missing_root() {
        let root = TempDir::new().unwrap();
        assert!(package_jars(&root.path().join("packages")).is_empty());
    }

    #[test]
    fn test_split_classpath() {
        let value = format!("a.jar{0}{0}b/classes{0}", SEPARATOR);
        assert_eq!(
            split_classpath(&value),
            vec![PathBuf::from("a.jar"), PathBuf::from("b/classes")]
        );
        assert!(split_classpath("").is_empty());
    }

    #[test]
    fn test_packages_dir_with_override() {
        let dir = packages_dir(Some(Path::new("/opt/weka-home"))).unwrap();
        assert_eq!(dir, PathBuf::from("/opt/weka-home/packages"));
    }

    #[test]
    fn test_option_value_uses_separator() {
        let mut classpath = Classpath::new();
        classpath.push("a.jar");
        classpath.push("b.jar");
        assert_eq!(classpath.to_option_value(), format!("a.jar{}b.jar", SEPARATOR));
        assert_eq!(classpath.position("b.jar"), Some(1));
        assert_eq!(classpath.position("c.jar"), None);
    }

    #[test]
    fn test_explicit_bundled_dir_wins() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            resolve_bundled_dir(Some(dir.path())),
            Some(dir.path().to_path_buf())
        );
    }
}
