//! Numeric helpers from `weka.core.Utils` and the toolkit version.

use crate::error::{Result, WekaError};
use crate::jvm::Runtime;
use crate::jvm::bridge;
use crate::typeconv;
use jni::objects::JValue;

/// Fails with [`WekaError::LengthMismatch`] unless both lists have the same length.
pub fn check_lengths<A, B>(left: &[A], right: &[B]) -> Result<()> {
    if left.len() != right.len() {
        return Err(WekaError::LengthMismatch {
            left: left.len(),
            right: right.len(),
        });
    }
    Ok(())
}

fn missing_as_nan<V: Copy + Into<Option<f64>>>(values: &[V]) -> Vec<f64> {
    values
        .iter()
        .map(|v| (*v).into().unwrap_or(f64::NAN))
        .collect()
}

/// Correlation coefficient of two equally long lists.
///
/// Accepts `f64` or `Option<f64>` values; missing values count as NaN.
/// The lengths are checked before the VM is involved.
pub fn correlation<V: Copy + Into<Option<f64>>>(
    runtime: &Runtime,
    values1: &[V],
    values2: &[V],
) -> Result<f64> {
    check_lengths(values1, values2)?;
    let values1 = missing_as_nan(values1);
    let values2 = missing_as_nan(values2);
    runtime.with_env(|env| {
        let array1 = typeconv::doubles_to_jarray(env, &values1)?;
        let array2 = typeconv::doubles_to_jarray(env, &values2)?;
        Ok(env
            .call_static_method(
                "weka/core/Utils",
                "correlation",
                "([D[DI)D",
                &[
                    JValue::from(&array1),
                    JValue::from(&array2),
                    JValue::Int(typeconv::to_jint(values1.len())?),
                ],
            )?
            .d()?)
    })
}

/// Variance of a list; missing values count as NaN.
pub fn variance<V: Copy + Into<Option<f64>>>(runtime: &Runtime, values: &[V]) -> Result<f64> {
    let values = missing_as_nan(values);
    runtime.with_env(|env| {
        let array = typeconv::doubles_to_jarray(env, &values)?;
        Ok(env
            .call_static_method("weka/core/Utils", "variance", "([D)D", &[JValue::from(&array)])?
            .d()?)
    })
}

/// Normalizes the values by their sum, or by `sum` when given.
pub fn normalize<V: Copy + Into<Option<f64>>>(
    runtime: &Runtime,
    values: &[V],
    sum: Option<f64>,
) -> Result<Vec<f64>> {
    let values = missing_as_nan(values);
    runtime.with_env(|env| {
        let array = typeconv::doubles_to_jarray(env, &values)?;
        let returned = match sum {
            Some(sum) => env.call_static_method(
                "weka/core/Utils",
                "normalize",
                "([DD)V",
                &[JValue::from(&array), JValue::Double(sum)],
            )?,
            None => env.call_static_method(
                "weka/core/Utils",
                "normalize",
                "([D)V",
                &[JValue::from(&array)],
            )?,
        };
        returned.v()?;
        typeconv::jdouble_array_to_vec(env, &array)
    })
}

/// The toolkit version (`weka.core.Version.VERSION`).
pub fn version(runtime: &Runtime) -> Result<String> {
    runtime.with_env(|env| {
        Ok(bridge::static_string_field(env, "weka.core.Version", "VERSION")?.unwrap_or_default())
    })
}
