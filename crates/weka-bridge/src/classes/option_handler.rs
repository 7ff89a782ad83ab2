//! Objects configured through option arrays (`weka.core.OptionHandler`).

use crate::classes::object::{CachedMethod, Guarded, JavaObject, JavaWrapper};
use crate::classes::options::CommandLine;
use crate::classes::registry::Family;
use crate::error::{Result, WekaError};
use crate::jvm::Runtime;
use crate::jvm::bridge;
use crate::typeconv;
use jni::objects::{JObject, JValue};
use serde::Serialize;
use tracing::debug;

const OPTION_HANDLER: &str = "weka.core.OptionHandler";

#[derive(Debug, Clone, Copy)]
struct OptionMethods {
    get_options: CachedMethod,
    set_options: CachedMethod,
}

/// Proxy for objects that expose `getOptions`/`setOptions`.
///
/// Wrapping an object that is not a `weka.core.OptionHandler` is allowed:
/// such an object reports no options and ignores new ones. Capability
/// proxies build on this type.
#[derive(Debug, Clone)]
pub struct OptionHandler {
    object: JavaObject,
    methods: Option<OptionMethods>,
}

impl JavaWrapper for OptionHandler {
    const REQUIRED_TYPE: &'static str = OPTION_HANDLER;
    const FAMILY: Family = Family::Other;

    fn wrap(object: Guarded<Self>) -> Result<Self> {
        Self::of(object.into_inner())
    }

    fn java_object(&self) -> &JavaObject {
        &self.object
    }
}

impl OptionHandler {
    /// Wraps any object; option methods are resolved only when it is a
    /// `weka.core.OptionHandler`.
    pub fn of(object: JavaObject) -> Result<Self> {
        let methods = object.with_env(|env, obj| {
            if !bridge::is_instance_of(env, obj, OPTION_HANDLER)? {
                return Ok(None);
            }
            Ok(Some(OptionMethods {
                get_options: CachedMethod::resolve(
                    env,
                    OPTION_HANDLER,
                    "getOptions",
                    "()[Ljava/lang/String;",
                )?,
                set_options: CachedMethod::resolve(
                    env,
                    OPTION_HANDLER,
                    "setOptions",
                    "([Ljava/lang/String;)V",
                )?,
            }))
        })?;
        Ok(Self { object, methods })
    }

    /// Whether the wrapped object implements `weka.core.OptionHandler`.
    pub fn is_option_handler(&self) -> bool {
        self.methods.is_some()
    }

    /// The currently set options.
    pub fn options(&self) -> Result<Vec<String>> {
        let Some(methods) = self.methods else {
            return Ok(Vec::new());
        };
        self.object.with_env(|env, obj| {
            let array = methods.get_options.call(env, obj, &[])?.l()?;
            typeconv::jstring_array_to_list(env, &array)
        })
    }

    /// Sets the options.
    pub fn set_options<S: AsRef<str>>(&self, options: &[S]) -> Result<()> {
        let Some(methods) = self.methods else {
            debug!("Ignoring options for an object without option handling");
            return Ok(());
        };
        self.object.with_env(|env, obj| {
            let array = typeconv::string_list_to_jarray(env, options)?;
            methods
                .set_options
                .call(env, obj, &[JValue::from(&array)])?
                .v()?;
            Ok(())
        })
    }

    /// The command-line string as produced by `weka.core.Utils.toCommandLine`.
    pub fn to_commandline(&self) -> Result<String> {
        self.object.with_env(|env, obj| {
            let value = env
                .call_static_method(
                    "weka/core/Utils",
                    "toCommandLine",
                    "(Ljava/lang/Object;)Ljava/lang/String;",
                    &[JValue::from(obj)],
                )?
                .l()?;
            Ok(bridge::jstring_to_string(env, value)?.unwrap_or_default())
        })
    }

    /// Class name and current options.
    pub fn commandline(&self) -> Result<CommandLine> {
        Ok(CommandLine::new(self.object.classname()?, self.options()?))
    }

    /// The `globalInfo()` text, `None` when the class provides none.
    ///
    /// Only a Java-side failure (no such method, or the method threw) maps
    /// to `None`. Bridge failures such as a stopped runtime are returned.
    pub fn global_info(&self) -> Result<Option<String>> {
        match self
            .object
            .with_env(|env, obj| bridge::call_string_method(env, obj, "globalInfo"))
        {
            Err(WekaError::Java { .. })
            | Err(WekaError::Jni(jni::errors::Error::MethodNotFound { .. })) => Ok(None),
            other => other,
        }
    }

    /// The options the class understands, from `listOptions()`.
    pub fn list_options(&self) -> Result<Vec<OptionInfo>> {
        if !self.is_option_handler() {
            return Ok(Vec::new());
        }
        self.object.with_env(|env, obj| {
            let enumeration = env
                .call_method(obj, "listOptions", "()Ljava/util/Enumeration;", &[])?
                .l()?;
            let mut result = Vec::new();
            for option in typeconv::jenumeration_to_list(env, &enumeration)? {
                result.push(OptionInfo::from_option(env, &option)?);
                env.delete_local_ref(option)?;
            }
            Ok(result)
        })
    }

    /// A help text with the class name, its global info and its options.
    pub fn to_help(&self) -> Result<String> {
        let classname = self.object.classname()?;
        let mut lines = vec![
            classname.clone(),
            "=".repeat(classname.chars().count()),
            String::new(),
            "DESCRIPTION".to_string(),
            String::new(),
            self.global_info()?.unwrap_or_default(),
            String::new(),
            "OPTIONS".to_string(),
            String::new(),
        ];
        for option in self.list_options()? {
            lines.push(option.synopsis);
            lines.push(option.description);
            lines.push(String::new());
        }
        Ok(lines.join("\n"))
    }
}

/// Description of one option (`weka.core.Option`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionInfo {
    pub name: String,
    pub description: String,
    pub synopsis: String,
    pub num_arguments: i32,
}

impl OptionInfo {
    fn from_option(env: &mut jni::JNIEnv, option: &JObject) -> Result<Self> {
        Ok(Self {
            name: bridge::call_string_method(env, option, "name")?.unwrap_or_default(),
            description: bridge::call_string_method(env, option, "description")?
                .unwrap_or_default(),
            synopsis: bridge::call_string_method(env, option, "synopsis")?.unwrap_or_default(),
            num_arguments: env.call_method(option, "numArguments", "()I", &[])?.i()?,
        })
    }
}

/// Instantiates the class named in `cmdline`, applies its options and wraps
/// the result as `W`.
///
/// ```rust,ignore
/// let j48: Classifier = from_commandline(&runtime, "weka.classifiers.trees.J48 -C 0.3")?;
/// ```
pub fn from_commandline<W: JavaWrapper>(runtime: &Runtime, cmdline: &str) -> Result<W> {
    let cmdline: CommandLine = cmdline.parse()?;
    W::with_options(runtime, &cmdline.classname, &cmdline.options)
}

/// The command-line string of any proxy.
pub fn to_commandline<W: JavaWrapper>(wrapper: &W) -> Result<String> {
    OptionHandler::of(wrapper.java_object().clone())?.to_commandline()
}
