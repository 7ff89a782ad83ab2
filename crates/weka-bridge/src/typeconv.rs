//! Conversions between Rust values and Java arrays, lists and enumerations.
//!
//! All converters run inside [`Runtime::with_env`](crate::Runtime::with_env)
//! and take the current thread's `JNIEnv`. Element order is preserved;
//! doubles stay IEEE `f64`, integer arrays stay `i32`.

use crate::classes::JavaObject;
use crate::error::{Result, WekaError};
use crate::jvm::Runtime;
use crate::jvm::bridge::{self, jni_name};
use jni::JNIEnv;
use jni::objects::{JDoubleArray, JIntArray, JObject, JObjectArray, JValue};

/// Replaces missing values with NaN, or fails on the first one.
///
/// This is the check [`to_jdouble_array`] runs before touching the VM.
pub fn fill_missing(values: &[Option<f64>], none_as_nan: bool) -> Result<Vec<f64>> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| match value {
            Some(v) => Ok(*v),
            None if none_as_nan => Ok(f64::NAN),
            None => Err(WekaError::MissingValue { index }),
        })
        .collect()
}

/// A Rust size or index as a Java `int`.
pub fn to_jint(value: usize) -> Result<i32> {
    i32::try_from(value)
        .map_err(|_| WekaError::IntegerOutOfRange(format!("{} does not fit a Java int", value)))
}

/// A Java `int` count or index as a Rust size; negative values fail.
pub fn from_jint(value: i32) -> Result<usize> {
    usize::try_from(value)
        .map_err(|_| WekaError::IntegerOutOfRange(format!("unexpected negative value {}", value)))
}

/// Turns a string list into a `String[]`.
pub fn string_list_to_jarray<'local, S: AsRef<str>>(
    env: &mut JNIEnv<'local>,
    values: &[S],
) -> Result<JObjectArray<'local>> {
    let length = to_jint(values.len())?;
    let array = env.new_object_array(length, "java/lang/String", JObject::null())?;
    for (i, value) in values.iter().enumerate() {
        let jstring = env.new_string(value.as_ref())?;
        env.set_object_array_element(&array, to_jint(i)?, &jstring)?;
        env.delete_local_ref(jstring)?;
    }
    Ok(array)
}

/// Turns a `String[]` into a string list.
///
/// A null array yields an empty list; null elements become empty strings.
pub fn jstring_array_to_list(env: &mut JNIEnv, array: &JObject) -> Result<Vec<String>> {
    if array.is_null() {
        return Ok(Vec::new());
    }
    let array = JObjectArray::from(env.new_local_ref(array)?);
    let len = env.get_array_length(&array)?;
    let mut result = Vec::with_capacity(from_jint(len)?);
    for i in 0..len {
        let element = env.get_object_array_element(&array, i)?;
        result.push(bridge::jstring_to_string(env, element)?.unwrap_or_default());
    }
    Ok(result)
}

/// Turns a string list into a `java.util.ArrayList`.
pub fn string_list_to_jlist<'local, S: AsRef<str>>(
    env: &mut JNIEnv<'local>,
    values: &[S],
) -> Result<JObject<'local>> {
    let list = env.new_object("java/util/ArrayList", "()V", &[])?;
    for value in values {
        let jstring = env.new_string(value.as_ref())?;
        env.call_method(&list, "add", "(Ljava/lang/Object;)Z", &[JValue::from(&jstring)])?
            .z()?;
        env.delete_local_ref(jstring)?;
    }
    Ok(list)
}

/// Turns a `java.util.List` of strings into a string list.
///
/// A null list yields `None`.
pub fn jstring_list_to_string_list(env: &mut JNIEnv, list: &JObject) -> Result<Option<Vec<String>>> {
    if list.is_null() {
        return Ok(None);
    }
    let size = env.call_method(list, "size", "()I", &[])?.i()?;
    let mut result = Vec::with_capacity(from_jint(size)?);
    for i in 0..size {
        let element = env
            .call_method(list, "get", "(I)Ljava/lang/Object;", &[JValue::Int(i)])?
            .l()?;
        result.push(to_string(env, &element)?.unwrap_or_default());
        env.delete_local_ref(element)?;
    }
    Ok(Some(result))
}

/// Turns a `double[]` into a vector; a null array yields an empty vector.
pub fn jdouble_array_to_vec(env: &mut JNIEnv, array: &JObject) -> Result<Vec<f64>> {
    if array.is_null() {
        return Ok(Vec::new());
    }
    let array = JDoubleArray::from(env.new_local_ref(array)?);
    let len = env.get_array_length(&array)?;
    let mut result = vec![0.0; from_jint(len)?];
    env.get_double_array_region(&array, 0, &mut result)?;
    Ok(result)
}

/// Turns a `double[][]` into nested vectors.
pub fn jdouble_matrix_to_vec(env: &mut JNIEnv, matrix: &JObject) -> Result<Vec<Vec<f64>>> {
    if matrix.is_null() {
        return Ok(Vec::new());
    }
    let matrix = JObjectArray::from(env.new_local_ref(matrix)?);
    let rows = env.get_array_length(&matrix)?;
    let mut result = Vec::with_capacity(from_jint(rows)?);
    for i in 0..rows {
        let row = env.get_object_array_element(&matrix, i)?;
        result.push(jdouble_array_to_vec(env, &row)?);
        env.delete_local_ref(row)?;
    }
    Ok(result)
}

/// Turns an `int[]` into a vector; a null array yields an empty vector.
pub fn jint_array_to_vec(env: &mut JNIEnv, array: &JObject) -> Result<Vec<i32>> {
    if array.is_null() {
        return Ok(Vec::new());
    }
    let array = JIntArray::from(env.new_local_ref(array)?);
    let len = env.get_array_length(&array)?;
    let mut result = vec![0; from_jint(len)?];
    env.get_int_array_region(&array, 0, &mut result)?;
    Ok(result)
}

/// Drains a `java.util.Enumeration` into local references.
pub fn jenumeration_to_list<'local>(
    env: &mut JNIEnv<'local>,
    enumeration: &JObject,
) -> Result<Vec<JObject<'local>>> {
    let mut result = Vec::new();
    if enumeration.is_null() {
        return Ok(result);
    }
    while env
        .call_method(enumeration, "hasMoreElements", "()Z", &[])?
        .z()?
    {
        result.push(
            env.call_method(enumeration, "nextElement", "()Ljava/lang/Object;", &[])?
                .l()?,
        );
    }
    Ok(result)
}

/// Turns values with gaps into a `double[]`.
///
/// With `none_as_nan`, missing values become NaN; otherwise the first one
/// fails with [`WekaError::MissingValue`] before the array is created.
pub fn to_jdouble_array<'local>(
    env: &mut JNIEnv<'local>,
    values: &[Option<f64>],
    none_as_nan: bool,
) -> Result<JDoubleArray<'local>> {
    let values = fill_missing(values, none_as_nan)?;
    doubles_to_jarray(env, &values)
}

/// Turns doubles into a `double[]`.
pub fn doubles_to_jarray<'local>(
    env: &mut JNIEnv<'local>,
    values: &[f64],
) -> Result<JDoubleArray<'local>> {
    let array = env.new_double_array(to_jint(values.len())?)?;
    env.set_double_array_region(&array, 0, values)?;
    Ok(array)
}

/// Turns integers into an `int[]`.
pub fn to_jint_array<'local>(env: &mut JNIEnv<'local>, values: &[i32]) -> Result<JIntArray<'local>> {
    let array = env.new_int_array(to_jint(values.len())?)?;
    env.set_int_array_region(&array, 0, values)?;
    Ok(array)
}

/// Turns handles into an array with component type `classname` (dot notation).
pub fn to_jobject_array<'local>(
    env: &mut JNIEnv<'local>,
    objects: &[&JavaObject],
    classname: &str,
) -> Result<JObjectArray<'local>> {
    let length = to_jint(objects.len())?;
    let array = env.new_object_array(length, jni_name(classname), JObject::null())?;
    for (i, object) in objects.iter().enumerate() {
        env.set_object_array_element(&array, to_jint(i)?, object.as_obj())?;
    }
    Ok(array)
}

/// Turns an object array into handles; null elements stay `None`.
pub fn from_jobject_array(
    runtime: &Runtime,
    env: &mut JNIEnv,
    array: &JObject,
) -> Result<Vec<Option<JavaObject>>> {
    if array.is_null() {
        return Ok(Vec::new());
    }
    let array = JObjectArray::from(env.new_local_ref(array)?);
    let len = env.get_array_length(&array)?;
    let mut result = Vec::with_capacity(from_jint(len)?);
    for i in 0..len {
        let element = env.get_object_array_element(&array, i)?;
        result.push(JavaObject::from_local(runtime, env, &element)?);
        env.delete_local_ref(element)?;
    }
    Ok(result)
}

/// Boxes a float as `java.lang.Float`.
pub fn float_to_jfloat<'local>(env: &mut JNIEnv<'local>, value: f32) -> Result<JObject<'local>> {
    Ok(env
        .call_static_method(
            "java/lang/Float",
            "valueOf",
            "(F)Ljava/lang/Float;",
            &[JValue::Float(value)],
        )?
        .l()?)
}

/// Unboxes a `java.lang.Number` (typically `java.lang.Double`).
pub fn jdouble_to_float(env: &mut JNIEnv, value: &JObject) -> Result<f64> {
    Ok(env.call_method(value, "doubleValue", "()D", &[])?.d()?)
}

/// `toString()` of an object; `None` for null.
pub fn to_string(env: &mut JNIEnv, obj: &JObject) -> Result<Option<String>> {
    if obj.is_null() {
        return Ok(None);
    }
    bridge::object_to_string(env, obj).map(Some)
}
