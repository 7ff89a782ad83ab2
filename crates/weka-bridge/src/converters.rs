//! Loading and saving datasets through the toolkit's file converters.

use crate::classes::registry::Family;
use crate::classes::{Guarded, JavaObject, JavaWrapper, OptionHandler};
use crate::dataset::{ClassIndex, Instances};
use crate::error::{Result, WekaError};
use crate::jvm::Runtime;
use jni::JNIEnv;
use jni::objects::{JObject, JValue};
use std::path::Path;
use tracing::debug;

fn path_str(path: &Path) -> Result<&str> {
    path.to_str()
        .ok_or_else(|| WekaError::InvalidConfig(format!("Path is not valid UTF-8: {}", path.display())))
}

fn new_file<'local>(env: &mut JNIEnv<'local>, path: &str) -> Result<JObject<'local>> {
    let jpath = env.new_string(path)?;
    Ok(env.new_object("java/io/File", "(Ljava/lang/String;)V", &[JValue::from(&jpath)])?)
}

/// A file loader (`weka.core.converters.Loader`).
#[derive(Debug, Clone)]
pub struct Loader {
    handler: OptionHandler,
}

impl JavaWrapper for Loader {
    const REQUIRED_TYPE: &'static str = "weka.core.converters.Loader";
    const FAMILY: Family = Family::Loader;

    fn wrap(object: Guarded<Self>) -> Result<Self> {
        Ok(Self {
            handler: OptionHandler::of(object.into_inner())?,
        })
    }

    fn java_object(&self) -> &JavaObject {
        self.handler.java_object()
    }
}

impl Loader {
    pub fn option_handler(&self) -> &OptionHandler {
        &self.handler
    }

    /// Loads the whole file and optionally sets the class attribute.
    pub fn load_file(&self, path: impl AsRef<Path>, class_index: Option<ClassIndex>) -> Result<Instances> {
        let path = path_str(path.as_ref())?;
        let object = self.java_object();
        let data = object.with_env(|env, obj| {
            let file = new_file(env, path)?;
            env.call_method(obj, "setFile", "(Ljava/io/File;)V", &[JValue::from(&file)])?
                .v()?;
            let data = env
                .call_method(obj, "getDataSet", "()Lweka/core/Instances;", &[])?
                .l()?;
            JavaObject::from_local_non_null(object.runtime(), env, &data, "getDataSet")
        })?;
        let data = Instances::from_object(data)?;
        if let Some(class_index) = class_index {
            data.set_class(class_index)?;
        }
        Ok(data)
    }
}

/// A file saver (`weka.core.converters.Saver`).
#[derive(Debug, Clone)]
pub struct Saver {
    handler: OptionHandler,
}

impl JavaWrapper for Saver {
    const REQUIRED_TYPE: &'static str = "weka.core.converters.Saver";
    const FAMILY: Family = Family::Saver;

    fn wrap(object: Guarded<Self>) -> Result<Self> {
        Ok(Self {
            handler: OptionHandler::of(object.into_inner())?,
        })
    }

    fn java_object(&self) -> &JavaObject {
        self.handler.java_object()
    }
}

impl Saver {
    pub fn option_handler(&self) -> &OptionHandler {
        &self.handler
    }

    /// Writes the whole dataset to `path`.
    pub fn save_file(&self, data: &Instances, path: impl AsRef<Path>) -> Result<()> {
        let path = path_str(path.as_ref())?;
        self.java_object().with_env(|env, obj| {
            env.call_method(
                obj,
                "setInstances",
                "(Lweka/core/Instances;)V",
                &[JValue::from(data.java_object().as_obj())],
            )?
            .v()?;
            let file = new_file(env, path)?;
            env.call_method(obj, "setFile", "(Ljava/io/File;)V", &[JValue::from(&file)])?
                .v()?;
            env.call_method(obj, "writeBatch", "()V", &[])?.v()?;
            Ok(())
        })
    }
}

/// The loader matching the file extension, if any.
pub fn loader_for_file(runtime: &Runtime, path: impl AsRef<Path>) -> Result<Option<Loader>> {
    let object = converter_for_file(
        runtime,
        path.as_ref(),
        "getLoaderForFile",
        "(Ljava/lang/String;)Lweka/core/converters/AbstractFileLoader;",
    )?;
    object.map(Loader::from_object).transpose()
}

/// The saver matching the file extension, if any.
pub fn saver_for_file(runtime: &Runtime, path: impl AsRef<Path>) -> Result<Option<Saver>> {
    let object = converter_for_file(
        runtime,
        path.as_ref(),
        "getSaverForFile",
        "(Ljava/lang/String;)Lweka/core/converters/AbstractFileSaver;",
    )?;
    object.map(Saver::from_object).transpose()
}

fn converter_for_file(
    runtime: &Runtime,
    path: &Path,
    method: &str,
    signature: &str,
) -> Result<Option<JavaObject>> {
    let path = path_str(path)?;
    runtime.with_env(|env| {
        let jpath = env.new_string(path)?;
        let converter = env
            .call_static_method(
                "weka/core/converters/ConverterUtils",
                method,
                signature,
                &[JValue::from(&jpath)],
            )?
            .l()?;
        JavaObject::from_local(runtime, env, &converter)
    })
}

/// Loads a dataset with the loader matching the file extension.
///
/// Returns `None` when no loader handles the extension.
pub fn load_any_file(
    runtime: &Runtime,
    path: impl AsRef<Path>,
    class_index: Option<ClassIndex>,
) -> Result<Option<Instances>> {
    let path = path.as_ref();
    match loader_for_file(runtime, path)? {
        Some(loader) => loader.load_file(path, class_index).map(Some),
        None => {
            debug!("No loader for {}", path.display());
            Ok(None)
        }
    }
}

/// Saves a dataset with the saver matching the file extension.
///
/// Returns `false` when no saver handles the extension.
pub fn save_any_file(data: &Instances, path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    match saver_for_file(data.java_object().runtime(), path)? {
        Some(saver) => {
            saver.save_file(data, path)?;
            Ok(true)
        }
        None => {
            debug!("No saver for {}", path.display());
            Ok(false)
        }
    }
}
