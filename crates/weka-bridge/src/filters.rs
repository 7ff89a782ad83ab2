//! Filters (`weka.filters.Filter`).
//!
//! A filter is first told the input format, then applied to whole datasets
//! with [`Filter::filter`] or row by row with [`Filter::input`] and
//! [`Filter::output`].

use crate::classes::registry::Family;
use crate::classes::{Guarded, JavaObject, JavaWrapper, OptionHandler};
use crate::dataset::{Instance, Instances};
use crate::error::Result;
use jni::objects::JValue;

/// Proxy for `weka.filters.Filter`.
#[derive(Debug, Clone)]
pub struct Filter {
    handler: OptionHandler,
}

impl JavaWrapper for Filter {
    const REQUIRED_TYPE: &'static str = "weka.filters.Filter";
    const FAMILY: Family = Family::Filter;

    fn wrap(object: Guarded<Self>) -> Result<Self> {
        Ok(Self {
            handler: OptionHandler::of(object.into_inner())?,
        })
    }

    fn java_object(&self) -> &JavaObject {
        self.handler.java_object()
    }
}

impl Filter {
    pub fn option_handler(&self) -> &OptionHandler {
        &self.handler
    }

    /// Sets the input format; returns whether the output format is known already.
    pub fn set_inputformat(&self, data: &Instances) -> Result<bool> {
        self.java_object().call_bool(
            "setInputFormat",
            "(Lweka/core/Instances;)Z",
            &[JValue::from(data.java_object().as_obj())],
        )
    }

    /// Filters a whole dataset (`Filter.useFilter`).
    pub fn filter(&self, data: &Instances) -> Result<Instances> {
        let object = self.java_object();
        let filtered = object.with_env(|env, obj| {
            let filtered = env
                .call_static_method(
                    "weka/filters/Filter",
                    "useFilter",
                    "(Lweka/core/Instances;Lweka/filters/Filter;)Lweka/core/Instances;",
                    &[JValue::from(data.java_object().as_obj()), JValue::from(obj)],
                )?
                .l()?;
            JavaObject::from_local_non_null(object.runtime(), env, &filtered, "useFilter")
        })?;
        Instances::from_object(filtered)
    }

    /// Pushes one row; returns whether a filtered row is ready.
    pub fn input(&self, instance: &Instance) -> Result<bool> {
        self.java_object().call_bool(
            "input",
            "(Lweka/core/Instance;)Z",
            &[JValue::from(instance.java_object().as_obj())],
        )
    }

    /// Signals the end of a batch; returns whether filtered rows are pending.
    pub fn batch_finished(&self) -> Result<bool> {
        self.java_object().call_bool("batchFinished", "()Z", &[])
    }

    /// The next filtered row, `None` when none is pending.
    pub fn output(&self) -> Result<Option<Instance>> {
        self.java_object()
            .call_object("output", "()Lweka/core/Instance;", &[])?
            .map(Instance::from_object)
            .transpose()
    }

    /// The format of the filtered data.
    pub fn output_format(&self) -> Result<Instances> {
        let format = self
            .java_object()
            .call_non_null("getOutputFormat", "()Lweka/core/Instances;", &[])?;
        Instances::from_object(format)
    }
}
