//! Distance functions (`weka.core.DistanceFunction`).

use crate::classes::registry::Family;
use crate::classes::{CachedMethod, Guarded, JavaObject, JavaWrapper, OptionHandler};
use crate::dataset::{Instance, Instances};
use crate::error::Result;
use jni::objects::JValue;

const DISTANCE_FUNCTION: &str = "weka.core.DistanceFunction";

/// Proxy for `weka.core.DistanceFunction`.
#[derive(Debug, Clone)]
pub struct DistanceFunction {
    handler: OptionHandler,
    distance: CachedMethod,
    distance_cutoff: CachedMethod,
}

impl JavaWrapper for DistanceFunction {
    const REQUIRED_TYPE: &'static str = DISTANCE_FUNCTION;
    const FAMILY: Family = Family::DistanceFunction;

    fn wrap(object: Guarded<Self>) -> Result<Self> {
        let handler = OptionHandler::of(object.into_inner())?;
        let (distance, distance_cutoff) = handler.java_object().with_env(|env, _| {
            Ok((
                CachedMethod::resolve(
                    env,
                    DISTANCE_FUNCTION,
                    "distance",
                    "(Lweka/core/Instance;Lweka/core/Instance;)D",
                )?,
                CachedMethod::resolve(
                    env,
                    DISTANCE_FUNCTION,
                    "distance",
                    "(Lweka/core/Instance;Lweka/core/Instance;D)D",
                )?,
            ))
        })?;
        Ok(Self {
            handler,
            distance,
            distance_cutoff,
        })
    }

    fn java_object(&self) -> &JavaObject {
        self.handler.java_object()
    }
}

impl DistanceFunction {
    pub fn option_handler(&self) -> &OptionHandler {
        &self.handler
    }

    /// The dataset the distances are normalized against.
    pub fn instances(&self) -> Result<Option<Instances>> {
        self.java_object()
            .call_object("getInstances", "()Lweka/core/Instances;", &[])?
            .map(Instances::from_object)
            .transpose()
    }

    pub fn set_instances(&self, data: &Instances) -> Result<()> {
        self.java_object().call_void(
            "setInstances",
            "(Lweka/core/Instances;)V",
            &[JValue::from(data.java_object().as_obj())],
        )
    }

    /// The attribute range in use, e.g. `first-last`.
    pub fn attribute_indices(&self) -> Result<String> {
        Ok(self
            .java_object()
            .call_string("getAttributeIndices")?
            .unwrap_or_default())
    }

    pub fn set_attribute_indices(&self, indices: &str) -> Result<()> {
        self.java_object().with_env(|env, obj| {
            let jindices = env.new_string(indices)?;
            env.call_method(
                obj,
                "setAttributeIndices",
                "(Ljava/lang/String;)V",
                &[JValue::from(&jindices)],
            )?
            .v()?;
            Ok(())
        })
    }

    /// Distance between two rows.
    ///
    /// With a `cutoff`, the computation may stop early and return
    /// `f64::INFINITY` once the distance exceeds it.
    pub fn distance(&self, first: &Instance, second: &Instance, cutoff: Option<f64>) -> Result<f64> {
        self.java_object().with_env(|env, obj| {
            let first = JValue::from(first.java_object().as_obj());
            let second = JValue::from(second.java_object().as_obj());
            let value = match cutoff {
                Some(cutoff) => self
                    .distance_cutoff
                    .call(env, obj, &[first, second, JValue::Double(cutoff)])?,
                None => self.distance.call(env, obj, &[first, second])?,
            };
            Ok(value.d()?)
        })
    }
}
