//! Object proxies and their configuration.
//!
//! - [`JavaObject`]: a handle into the VM
//! - [`JavaWrapper`]: the contract of typed proxies (type guard + member cache)
//! - [`OptionHandler`]: option arrays and command-line strings of live objects
//! - [`options`]: pure parsing and formatting of command-line strings
//! - [`ClassRegistry`]: construction restricted to known class names

pub mod object;
pub mod option_handler;
pub mod options;
pub mod registry;

pub(crate) use object::CachedMethod;
pub use object::{Guarded, JavaObject, JavaWrapper};
pub use option_handler::{OptionHandler, OptionInfo, from_commandline, to_commandline};
pub use options::CommandLine;
pub use registry::{ClassRegistry, Family};
