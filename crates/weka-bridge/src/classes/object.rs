//! Object handles and the proxy contract.
//!
//! [`JavaObject`] owns one global reference into the VM together with the
//! [`Runtime`] it lives in. Typed proxies ([`Classifier`](crate::Classifier),
//! [`Filter`](crate::Filter), ...) implement [`JavaWrapper`], which runs the
//! type guard before the proxy gets to resolve its cached members.

use crate::classes::OptionHandler;
use crate::classes::registry::Family;
use crate::error::{Result, WekaError};
use crate::jvm::Runtime;
use crate::jvm::bridge::{self, jni_name};
use jni::JNIEnv;
use jni::objects::{GlobalRef, JMethodID, JObject, JValue, JValueOwned};
use jni::signature::{Primitive, ReturnType};
use jni::sys::jvalue;
use std::marker::PhantomData;

/// A handle to an object inside the VM.
///
/// Cloning shares the handle; use [`serialization::deepcopy`](crate::serialization::deepcopy)
/// for an independent copy.
#[derive(Clone)]
pub struct JavaObject {
    // released before the runtime clone below
    handle: GlobalRef,
    runtime: Runtime,
}

impl JavaObject {
    /// Wraps an existing global reference.
    pub fn from_global(runtime: &Runtime, handle: GlobalRef) -> Self {
        Self {
            handle,
            runtime: runtime.clone(),
        }
    }

    /// Promotes a local reference to a handle; `None` for a null reference.
    pub(crate) fn from_local(
        runtime: &Runtime,
        env: &mut JNIEnv,
        obj: &JObject,
    ) -> Result<Option<Self>> {
        if obj.is_null() {
            return Ok(None);
        }
        let handle = env.new_global_ref(obj)?;
        Ok(Some(Self::from_global(runtime, handle)))
    }

    /// Like [`from_local`](Self::from_local), but a null reference is an error.
    pub(crate) fn from_local_non_null(
        runtime: &Runtime,
        env: &mut JNIEnv,
        obj: &JObject,
        what: &str,
    ) -> Result<Self> {
        Self::from_local(runtime, env, obj)?.ok_or_else(|| WekaError::Java {
            class: "java.lang.NullPointerException".to_string(),
            message: format!("{} returned null", what),
        })
    }

    /// Instantiates `classname` (dot notation) through its no-argument constructor.
    ///
    /// This is the dynamic construction path: any class reachable on the
    /// classpath can be created. Use [`ClassRegistry`](crate::ClassRegistry)
    /// to restrict construction to known classes.
    pub fn new_instance(runtime: &Runtime, classname: &str) -> Result<Self> {
        runtime.with_env(|env| {
            let obj = bridge::new_instance(env, classname)?;
            Self::from_local_non_null(runtime, env, &obj, classname)
        })
    }

    /// The runtime this object lives in.
    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    /// The underlying global reference.
    pub fn global(&self) -> &GlobalRef {
        &self.handle
    }

    /// The underlying object, for use inside [`Runtime::with_env`].
    pub fn as_obj(&self) -> &JObject<'static> {
        self.handle.as_obj()
    }

    /// Runs `f` with the current thread's JNI environment and this object.
    pub fn with_env<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut JNIEnv, &JObject<'static>) -> Result<T>,
    {
        let obj = self.as_obj();
        self.runtime.with_env(|env| f(env, obj))
    }

    /// The class name in dot notation.
    pub fn classname(&self) -> Result<String> {
        self.with_env(|env, obj| bridge::classname_of(env, obj))
    }

    /// The result of the object's `toString()`.
    #[allow(clippy::inherent_to_string)]
    pub fn to_string(&self) -> Result<String> {
        self.with_env(|env, obj| bridge::object_to_string(env, obj))
    }

    /// Java `equals` between two handles.
    pub fn java_equals(&self, other: &JavaObject) -> Result<bool> {
        self.with_env(|env, obj| {
            Ok(env
                .call_method(
                    obj,
                    "equals",
                    "(Ljava/lang/Object;)Z",
                    &[JValue::from(other.as_obj())],
                )?
                .z()?)
        })
    }

    /// Whether the object implements or extends `classname` (dot notation).
    pub fn is_instance_of(&self, classname: &str) -> Result<bool> {
        self.with_env(|env, obj| bridge::is_instance_of(env, obj, classname))
    }

    /// Fails with [`WekaError::TypeMismatch`] unless the object implements
    /// or extends `classname`.
    pub fn enforce_type(&self, classname: &str) -> Result<()> {
        self.with_env(|env, obj| {
            if bridge::is_instance_of(env, obj, classname)? {
                Ok(())
            } else {
                Err(WekaError::TypeMismatch {
                    expected: classname.to_string(),
                    actual: bridge::classname_of(env, obj)?,
                })
            }
        })
    }

    /// Whether the object implements `java.io.Serializable`.
    pub fn is_serializable(&self) -> Result<bool> {
        self.is_instance_of("java.io.Serializable")
    }

    /// Reads a bean property path, e.g. `"filter"` for a `getFilter()` method.
    ///
    /// Primitive properties come back boxed; `None` for a null value.
    pub fn get_property(&self, path: &str) -> Result<Option<JavaObject>> {
        self.with_env(|env, obj| {
            let jpath = env.new_string(path)?;
            let value = env
                .call_static_method(
                    "weka/core/PropertyPath",
                    "getValue",
                    "(Ljava/lang/Object;Ljava/lang/String;)Ljava/lang/Object;",
                    &[JValue::from(obj), JValue::from(&jpath)],
                )?
                .l()?;
            JavaObject::from_local(&self.runtime, env, &value)
        })
    }

    /// Calls an instance method returning an object.
    ///
    /// Arguments must be primitives or references that outlive the call
    /// (such as other handles).
    pub(crate) fn call_object(
        &self,
        name: &str,
        signature: &str,
        args: &[JValue],
    ) -> Result<Option<JavaObject>> {
        self.with_env(|env, obj| {
            let value = env.call_method(obj, name, signature, args)?.l()?;
            JavaObject::from_local(&self.runtime, env, &value)
        })
    }

    /// Like [`call_object`](Self::call_object), but a null result is an error.
    pub(crate) fn call_non_null(
        &self,
        name: &str,
        signature: &str,
        args: &[JValue],
    ) -> Result<JavaObject> {
        self.with_env(|env, obj| {
            let value = env.call_method(obj, name, signature, args)?.l()?;
            JavaObject::from_local_non_null(&self.runtime, env, &value, name)
        })
    }

    pub(crate) fn call_int(&self, name: &str, signature: &str, args: &[JValue]) -> Result<i32> {
        self.with_env(|env, obj| Ok(env.call_method(obj, name, signature, args)?.i()?))
    }

    pub(crate) fn call_double(&self, name: &str, signature: &str, args: &[JValue]) -> Result<f64> {
        self.with_env(|env, obj| Ok(env.call_method(obj, name, signature, args)?.d()?))
    }

    pub(crate) fn call_bool(&self, name: &str, signature: &str, args: &[JValue]) -> Result<bool> {
        self.with_env(|env, obj| Ok(env.call_method(obj, name, signature, args)?.z()?))
    }

    pub(crate) fn call_void(&self, name: &str, signature: &str, args: &[JValue]) -> Result<()> {
        self.with_env(|env, obj| {
            env.call_method(obj, name, signature, args)?.v()?;
            Ok(())
        })
    }

    /// Calls a no-argument method returning a `String`.
    pub(crate) fn call_string(&self, name: &str) -> Result<Option<String>> {
        self.with_env(|env, obj| bridge::call_string_method(env, obj, name))
    }

    /// Sets a bean property path, e.g. `"filter"` for a `setFilter(...)` method.
    pub fn set_property(&self, path: &str, value: &JavaObject) -> Result<()> {
        self.with_env(|env, obj| {
            let jpath = env.new_string(path)?;
            env.call_static_method(
                "weka/core/PropertyPath",
                "setValue",
                "(Ljava/lang/Object;Ljava/lang/String;Ljava/lang/Object;)V",
                &[JValue::from(obj), JValue::from(&jpath), JValue::from(value.as_obj())],
            )?
            .v()?;
            Ok(())
        })
    }
}

impl std::fmt::Debug for JavaObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let classname = self.classname().unwrap_or_else(|_| "?".to_string());
        f.debug_struct("JavaObject")
            .field("class", &classname)
            .finish()
    }
}

/// A handle that passed the type guard of proxy `W`.
///
/// Only [`JavaWrapper::from_object`] creates one, so [`JavaWrapper::wrap`]
/// never sees a handle of the wrong type:
///
/// ```compile_fail
/// use weka_bridge::{JavaObject, JavaWrapper, Stopwords};
///
/// fn bypass(object: JavaObject) -> weka_bridge::Result<Stopwords> {
///     Stopwords::wrap(object)
/// }
/// ```
pub struct Guarded<W> {
    object: JavaObject,
    _proxy: PhantomData<fn() -> W>,
}

impl<W> Guarded<W> {
    pub fn object(&self) -> &JavaObject {
        &self.object
    }

    pub fn into_inner(self) -> JavaObject {
        self.object
    }
}

impl<W> std::fmt::Debug for Guarded<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Guarded").field(&self.object).finish()
    }
}

/// A typed proxy around a [`JavaObject`].
///
/// Implementors name the Java type their handle must satisfy and resolve
/// their cached members in [`wrap`](Self::wrap). A proxy built on top of
/// [`OptionHandler`] creates it with [`OptionHandler::of`] first so caches
/// compose.
pub trait JavaWrapper: Sized {
    /// The interface or class (dot notation) every wrapped handle must
    /// implement or extend.
    const REQUIRED_TYPE: &'static str;

    /// The capability family, checked by [`ClassRegistry::create`](crate::ClassRegistry::create).
    const FAMILY: Family;

    /// Builds the proxy from a handle that passed the type guard.
    ///
    /// Called by [`from_object`](Self::from_object) only.
    #[doc(hidden)]
    fn wrap(object: Guarded<Self>) -> Result<Self>;

    /// The wrapped handle.
    fn java_object(&self) -> &JavaObject;

    /// Type-checks `object` against [`REQUIRED_TYPE`](Self::REQUIRED_TYPE) and wraps it.
    fn from_object(object: JavaObject) -> Result<Self> {
        object.enforce_type(Self::REQUIRED_TYPE)?;
        Self::wrap(Guarded {
            object,
            _proxy: PhantomData,
        })
    }

    /// Instantiates `classname` and wraps it.
    fn new(runtime: &Runtime, classname: &str) -> Result<Self> {
        Self::from_object(JavaObject::new_instance(runtime, classname)?)
    }

    /// Instantiates `classname`, applies `options` and wraps it.
    fn with_options(runtime: &Runtime, classname: &str, options: &[String]) -> Result<Self> {
        let proxy = Self::new(runtime, classname)?;
        OptionHandler::of(proxy.java_object().clone())?.set_options(options)?;
        Ok(proxy)
    }
}

impl JavaWrapper for JavaObject {
    const REQUIRED_TYPE: &'static str = "java.lang.Object";
    const FAMILY: Family = Family::Other;

    fn wrap(object: Guarded<Self>) -> Result<Self> {
        Ok(object.into_inner())
    }

    fn java_object(&self) -> &JavaObject {
        self
    }
}

/// What a cached method returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Returns {
    Object,
    Array,
    Double,
    Int,
    Boolean,
    Void,
}

impl Returns {
    fn from_signature(signature: &str) -> Option<Self> {
        let ret = signature.rsplit_once(')')?.1;
        match ret.chars().next()? {
            'L' => Some(Self::Object),
            '[' => Some(Self::Array),
            'D' => Some(Self::Double),
            'I' => Some(Self::Int),
            'Z' => Some(Self::Boolean),
            'V' => Some(Self::Void),
            _ => None,
        }
    }

    fn return_type(self) -> ReturnType {
        match self {
            Self::Object => ReturnType::Object,
            Self::Array => ReturnType::Array,
            Self::Double => ReturnType::Primitive(Primitive::Double),
            Self::Int => ReturnType::Primitive(Primitive::Int),
            Self::Boolean => ReturnType::Primitive(Primitive::Boolean),
            Self::Void => ReturnType::Primitive(Primitive::Void),
        }
    }
}

/// A method ID resolved once on a proxy's required type.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CachedMethod {
    id: JMethodID,
    returns: Returns,
}

impl CachedMethod {
    /// Resolves `name` with `signature` on `classname` (dot notation).
    pub(crate) fn resolve(
        env: &mut JNIEnv,
        classname: &str,
        name: &str,
        signature: &str,
    ) -> Result<Self> {
        let returns = Returns::from_signature(signature).ok_or_else(|| {
            WekaError::InvalidConfig(format!("Unsupported method signature: {}", signature))
        })?;
        let id = env.get_method_id(jni_name(classname), name, signature)?;
        Ok(Self { id, returns })
    }

    /// Calls the method on `obj`.
    ///
    /// `obj` must be an instance of the type the method was resolved on and
    /// `args` must match the signature.
    pub(crate) fn call<'local>(
        &self,
        env: &mut JNIEnv<'local>,
        obj: &JObject,
        args: &[JValue],
    ) -> Result<JValueOwned<'local>> {
        let args: Vec<jvalue> = args.iter().map(|arg| arg.as_jni()).collect();
        // SAFETY: method ids are resolved in `JavaWrapper::wrap`, which only
        // receives a `Guarded` handle of the type the id was resolved on, and
        // every call site passes that same handle with arguments built from
        // the same signature.
        let value =
            unsafe { env.call_method_unchecked(obj, self.id, self.returns.return_type(), &args)? };
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_returns_from_signature() {
        assert_eq!(
            Returns::from_signature("(Lweka/core/Instance;)D"),
            Some(Returns::Double)
        );
        assert_eq!(
            Returns::from_signature("()[Ljava/lang/String;"),
            Some(Returns::Array)
        );
        assert_eq!(
            Returns::from_signature("([Ljava/lang/String;)V"),
            Some(Returns::Void)
        );
        assert_eq!(
            Returns::from_signature("(Ljava/lang/String;)Z"),
            Some(Returns::Boolean)
        );
        assert_eq!(
            Returns::from_signature("()Ljava/lang/String;"),
            Some(Returns::Object)
        );
        assert_eq!(Returns::from_signature("()I"), Some(Returns::Int));
        assert_eq!(Returns::from_signature("()F"), None);
        assert_eq!(Returns::from_signature("no-parens"), None);
    }
}
