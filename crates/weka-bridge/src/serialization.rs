//! Java object serialization through `weka.core.SerializationHelper`.
//!
//! Proxies are written through their handle. Reads return raw
//! [`JavaObject`]s; wrap them with [`JavaWrapper::from_object`].

use crate::classes::{JavaObject, JavaWrapper};
use crate::error::{Result, WekaError};
use crate::jvm::Runtime;
use crate::typeconv;
use jni::objects::{JByteArray, JValue};
use std::path::Path;
use tracing::error;

const HELPER: &str = "weka/core/SerializationHelper";

fn path_str(path: &Path) -> Result<&str> {
    path.to_str()
        .ok_or_else(|| WekaError::InvalidConfig(format!("Path is not valid UTF-8: {}", path.display())))
}

/// Writes one object to `path`.
pub fn write<W: JavaWrapper>(path: impl AsRef<Path>, object: &W) -> Result<()> {
    let path = path_str(path.as_ref())?;
    object.java_object().with_env(|env, obj| {
        let jpath = env.new_string(path)?;
        env.call_static_method(
            HELPER,
            "write",
            "(Ljava/lang/String;Ljava/lang/Object;)V",
            &[JValue::from(&jpath), JValue::from(obj)],
        )?
        .v()?;
        Ok(())
    })
}

/// Writes several objects to `path`, in order.
pub fn write_all(runtime: &Runtime, path: impl AsRef<Path>, objects: &[&JavaObject]) -> Result<()> {
    let path = path_str(path.as_ref())?;
    runtime.with_env(|env| {
        let jpath = env.new_string(path)?;
        let array = typeconv::to_jobject_array(env, objects, "java.lang.Object")?;
        env.call_static_method(
            HELPER,
            "writeAll",
            "(Ljava/lang/String;[Ljava/lang/Object;)V",
            &[JValue::from(&jpath), JValue::from(&array)],
        )?
        .v()?;
        Ok(())
    })
}

/// Reads one object from `path`; `None` if a null was written.
pub fn read(runtime: &Runtime, path: impl AsRef<Path>) -> Result<Option<JavaObject>> {
    let path = path_str(path.as_ref())?;
    runtime.with_env(|env| {
        let jpath = env.new_string(path)?;
        let obj = env
            .call_static_method(
                HELPER,
                "read",
                "(Ljava/lang/String;)Ljava/lang/Object;",
                &[JValue::from(&jpath)],
            )?
            .l()?;
        JavaObject::from_local(runtime, env, &obj)
    })
}

/// Reads all objects from `path`, in order.
pub fn read_all(runtime: &Runtime, path: impl AsRef<Path>) -> Result<Vec<Option<JavaObject>>> {
    let path = path_str(path.as_ref())?;
    runtime.with_env(|env| {
        let jpath = env.new_string(path)?;
        let array = env
            .call_static_method(
                HELPER,
                "readAll",
                "(Ljava/lang/String;)[Ljava/lang/Object;",
                &[JValue::from(&jpath)],
            )?
            .l()?;
        typeconv::from_jobject_array(runtime, env, &array)
    })
}

/// Serializes objects into a byte buffer.
pub fn to_bytes(runtime: &Runtime, objects: &[&JavaObject]) -> Result<Vec<u8>> {
    runtime.with_env(|env| {
        let stream = env.new_object("java/io/ByteArrayOutputStream", "()V", &[])?;
        let array = typeconv::to_jobject_array(env, objects, "java.lang.Object")?;
        env.call_static_method(
            HELPER,
            "writeAll",
            "(Ljava/io/OutputStream;[Ljava/lang/Object;)V",
            &[JValue::from(&stream), JValue::from(&array)],
        )?
        .v()?;
        let bytes = env.call_method(&stream, "toByteArray", "()[B", &[])?.l()?;
        Ok(env.convert_byte_array(JByteArray::from(bytes))?)
    })
}

/// Deserializes all objects from a buffer made by [`to_bytes`].
pub fn from_bytes(runtime: &Runtime, bytes: &[u8]) -> Result<Vec<Option<JavaObject>>> {
    runtime.with_env(|env| {
        let array = env.byte_array_from_slice(bytes)?;
        let stream = env.new_object(
            "java/io/ByteArrayInputStream",
            "([B)V",
            &[JValue::from(&array)],
        )?;
        let objects = env
            .call_static_method(
                HELPER,
                "readAll",
                "(Ljava/io/InputStream;)[Ljava/lang/Object;",
                &[JValue::from(&stream)],
            )?
            .l()?;
        typeconv::from_jobject_array(runtime, env, &objects)
    })
}

/// Copies an object through serialization (`weka.core.SerializedObject`).
pub fn try_deepcopy<W: JavaWrapper>(object: &W) -> Result<W> {
    let source = object.java_object();
    let copy = source.with_env(|env, obj| {
        let serialized = env.new_object(
            "weka/core/SerializedObject",
            "(Ljava/lang/Object;)V",
            &[JValue::from(obj)],
        )?;
        let copy = env
            .call_method(&serialized, "getObject", "()Ljava/lang/Object;", &[])?
            .l()?;
        JavaObject::from_local_non_null(source.runtime(), env, &copy, "SerializedObject.getObject")
    })?;
    W::from_object(copy)
}

/// Copies an object through serialization; logs and returns `None` on failure.
pub fn deepcopy<W: JavaWrapper>(object: &W) -> Option<W> {
    match try_deepcopy(object) {
        Ok(copy) => Some(copy),
        Err(e) => {
            let classname = object
                .java_object()
                .classname()
                .unwrap_or_else(|_| "?".to_string());
            error!("Failed to create copy of {}: {}", classname, e);
            None
        }
    }
}
