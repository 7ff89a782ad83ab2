//! Small helpers for talking to the JVM through JNI.
//!
//! Class names are accepted in Java dot notation (`weka.core.Utils`) by the
//! public API and converted here to the slash notation JNI expects
//! (`weka/core/Utils`). Every helper takes the `JNIEnv` of the current
//! thread, as handed out by [`Runtime::with_env`](crate::Runtime::with_env).

use crate::error::{Result, WekaError};
use jni::JNIEnv;
use jni::objects::{JObject, JString, JValue};

/// Converts a dot-notation class name into JNI slash notation.
///
/// ```
/// use weka_bridge::jvm::bridge::jni_name;
///
/// assert_eq!(jni_name("weka.core.Utils"), "weka/core/Utils");
/// assert_eq!(jni_name("weka.core.Capabilities$Capability"), "weka/core/Capabilities$Capability");
/// ```
pub fn jni_name(classname: &str) -> String {
    classname.replace('.', "/")
}

/// Converts a dot-notation class name into a JNI type descriptor.
///
/// ```
/// use weka_bridge::jvm::bridge::jni_descriptor;
///
/// assert_eq!(jni_descriptor("weka.core.Instances"), "Lweka/core/Instances;");
/// ```
pub fn jni_descriptor(classname: &str) -> String {
    format!("L{};", jni_name(classname))
}

/// Converts a JNI slash-notation (or descriptor) class name into dot notation.
pub fn dot_name(jni_classname: &str) -> String {
    let name = jni_classname
        .strip_prefix('L')
        .and_then(|n| n.strip_suffix(';'))
        .unwrap_or(jni_classname);
    name.replace('/', ".")
}

/// Instantiates `classname` through its public no-argument constructor.
pub(crate) fn new_instance<'local>(
    env: &mut JNIEnv<'local>,
    classname: &str,
) -> Result<JObject<'local>> {
    Ok(env.new_object(jni_name(classname), "()V", &[])?)
}

/// Whether `obj` is an instance of (implements or extends) `classname`.
pub(crate) fn is_instance_of(env: &mut JNIEnv, obj: &JObject, classname: &str) -> Result<bool> {
    Ok(env.is_instance_of(obj, jni_name(classname))?)
}

/// Returns the dot-notation class name of `obj`.
pub(crate) fn classname_of(env: &mut JNIEnv, obj: &JObject) -> Result<String> {
    let class = env
        .call_method(obj, "getClass", "()Ljava/lang/Class;", &[])?
        .l()?;
    let name = env
        .call_method(&class, "getName", "()Ljava/lang/String;", &[])?
        .l()?;
    Ok(jstring_to_string(env, name)?.unwrap_or_default())
}

/// Converts a `java.lang.String` reference; a null reference yields `None`.
pub(crate) fn jstring_to_string(env: &mut JNIEnv, obj: JObject) -> Result<Option<String>> {
    if obj.is_null() {
        return Ok(None);
    }
    let jstring = JString::from(obj);
    let text: String = env.get_string(&jstring)?.into();
    Ok(Some(text))
}

/// Calls a no-argument method returning a `String`.
pub(crate) fn call_string_method(
    env: &mut JNIEnv,
    obj: &JObject,
    method: &str,
) -> Result<Option<String>> {
    let value = env
        .call_method(obj, method, "()Ljava/lang/String;", &[])?
        .l()?;
    jstring_to_string(env, value)
}

/// `String.valueOf(obj)`: the `toString()` of the object, `"null"` for null.
pub(crate) fn object_to_string(env: &mut JNIEnv, obj: &JObject) -> Result<String> {
    let value = env
        .call_static_method(
            "java/lang/String",
            "valueOf",
            "(Ljava/lang/Object;)Ljava/lang/String;",
            &[JValue::from(obj)],
        )?
        .l()?;
    Ok(jstring_to_string(env, value)?.unwrap_or_default())
}

/// Reads a static `String` field, e.g. `weka.core.Version.VERSION`.
pub(crate) fn static_string_field(
    env: &mut JNIEnv,
    classname: &str,
    field: &str,
) -> Result<Option<String>> {
    let value = env
        .get_static_field(jni_name(classname), field, "Ljava/lang/String;")?
        .l()?;
    jstring_to_string(env, value)
}

/// Takes the pending Java exception (if any), clears it and converts it.
///
/// Returns `None` when no exception is pending.
pub(crate) fn take_pending_exception(env: &mut JNIEnv) -> Option<WekaError> {
    if !env.exception_check().unwrap_or(false) {
        return None;
    }
    let throwable = match env.exception_occurred() {
        Ok(throwable) => throwable,
        Err(_) => {
            let _ = env.exception_clear();
            return None;
        }
    };
    // JNI calls other than a few are not allowed while an exception is pending
    let _ = env.exception_clear();

    let described = env.with_local_frame(16, |env| -> Result<(String, String)> {
        let class =
            classname_of(env, &throwable).unwrap_or_else(|_| "java.lang.Throwable".to_string());
        let message = match call_string_method(env, &throwable, "getMessage") {
            Ok(Some(message)) => message,
            _ => object_to_string(env, &throwable).unwrap_or_default(),
        };
        Ok((class, message))
    });
    // describing the throwable must not leave another exception behind
    let _ = env.exception_clear();
    let _ = env.delete_local_ref(throwable);

    let (class, message) =
        described.unwrap_or_else(|_| ("java.lang.Throwable".to_string(), String::new()));
    Some(WekaError::Java { class, message })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jni_name() {
        assert_eq!(jni_name("weka.classifiers.trees.J48"), "weka/classifiers/trees/J48");
        assert_eq!(jni_name("Plain"), "Plain");
    }

    #[test]
    fn test_jni_descriptor() {
        assert_eq!(jni_descriptor("java.lang.String"), "Ljava/lang/String;");
    }

    #[test]
    fn test_dot_name() {
        assert_eq!(dot_name("weka/core/Instances"), "weka.core.Instances");
        assert_eq!(dot_name("Lweka/core/Instances;"), "weka.core.Instances");
        assert_eq!(dot_name("weka.core.Instances"), "weka.core.Instances");
    }
}
