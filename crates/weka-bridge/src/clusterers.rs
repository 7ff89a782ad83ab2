//! Clusterers (`weka.clusterers.Clusterer`).

use crate::classes::registry::Family;
use crate::classes::{CachedMethod, Guarded, JavaObject, JavaWrapper, OptionHandler};
use crate::dataset::{Instance, Instances};
use crate::error::Result;
use crate::typeconv;
use jni::objects::JValue;

const CLUSTERER: &str = "weka.clusterers.Clusterer";

/// Proxy for `weka.clusterers.Clusterer`.
#[derive(Debug, Clone)]
pub struct Clusterer {
    handler: OptionHandler,
    cluster_instance: CachedMethod,
    distribution_for_instance: CachedMethod,
}

impl JavaWrapper for Clusterer {
    const REQUIRED_TYPE: &'static str = CLUSTERER;
    const FAMILY: Family = Family::Clusterer;

    fn wrap(object: Guarded<Self>) -> Result<Self> {
        let handler = OptionHandler::of(object.into_inner())?;
        let (cluster_instance, distribution_for_instance) =
            handler.java_object().with_env(|env, _| {
                Ok((
                    CachedMethod::resolve(env, CLUSTERER, "clusterInstance", "(Lweka/core/Instance;)I")?,
                    CachedMethod::resolve(
                        env,
                        CLUSTERER,
                        "distributionForInstance",
                        "(Lweka/core/Instance;)[D",
                    )?,
                ))
            })?;
        Ok(Self {
            handler,
            cluster_instance,
            distribution_for_instance,
        })
    }

    fn java_object(&self) -> &JavaObject {
        self.handler.java_object()
    }
}

impl Clusterer {
    pub fn option_handler(&self) -> &OptionHandler {
        &self.handler
    }

    /// Builds the clusterer on `data`, which must not have a class attribute set.
    pub fn build_clusterer(&self, data: &Instances) -> Result<()> {
        self.java_object().call_void(
            "buildClusterer",
            "(Lweka/core/Instances;)V",
            &[JValue::from(data.java_object().as_obj())],
        )
    }

    /// Feeds one row to an incremental clusterer (`weka.clusterers.UpdateableClusterer`).
    pub fn update_clusterer(&self, instance: &Instance) -> Result<()> {
        self.java_object().enforce_type("weka.clusterers.UpdateableClusterer")?;
        self.java_object().call_void(
            "updateClusterer",
            "(Lweka/core/Instance;)V",
            &[JValue::from(instance.java_object().as_obj())],
        )
    }

    /// Signals an incremental clusterer that no more rows follow.
    pub fn update_finished(&self) -> Result<()> {
        self.java_object().enforce_type("weka.clusterers.UpdateableClusterer")?;
        self.java_object().call_void("updateFinished", "()V", &[])
    }

    /// The 0-based cluster the row is assigned to.
    pub fn cluster_instance(&self, instance: &Instance) -> Result<usize> {
        let cluster = self.java_object().with_env(|env, obj| {
            Ok(self
                .cluster_instance
                .call(env, obj, &[JValue::from(instance.java_object().as_obj())])?
                .i()?)
        })?;
        typeconv::from_jint(cluster)
    }

    /// Cluster membership probabilities.
    pub fn distribution_for_instance(&self, instance: &Instance) -> Result<Vec<f64>> {
        self.java_object().with_env(|env, obj| {
            let distribution = self
                .distribution_for_instance
                .call(env, obj, &[JValue::from(instance.java_object().as_obj())])?
                .l()?;
            typeconv::jdouble_array_to_vec(env, &distribution)
        })
    }

    pub fn number_of_clusters(&self) -> Result<usize> {
        typeconv::from_jint(self.java_object().call_int("numberOfClusters", "()I", &[])?)
    }
}
