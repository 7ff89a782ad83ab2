//! Classifiers and their evaluation.
//!
//! # Example
//!
//! ```rust,ignore
//! use weka_bridge::{Classifier, Evaluation, JavaWrapper};
//!
//! let data = weka_bridge::converters::load_any_file(&runtime, "iris.arff", Some(ClassIndex::Last))?
//!     .expect("arff loader");
//! let j48 = Classifier::with_options(&runtime, "weka.classifiers.trees.J48", &["-C".into(), "0.3".into()])?;
//!
//! let evaluation = Evaluation::new(&data)?;
//! evaluation.crossvalidate_model(&j48, &data, 10, 1)?;
//! println!("{}", evaluation.summary()?);
//! ```

use crate::classes::registry::Family;
use crate::classes::{CachedMethod, Guarded, JavaObject, JavaWrapper, OptionHandler};
use crate::dataset::{Instance, Instances};
use crate::error::{Result, WekaError};
use crate::jvm::Runtime;
use crate::serialization;
use crate::typeconv;
use jni::objects::{JObject, JValue};
use std::path::Path;

const CLASSIFIER: &str = "weka.classifiers.Classifier";

/// Proxy for `weka.classifiers.Classifier`.
#[derive(Debug, Clone)]
pub struct Classifier {
    handler: OptionHandler,
    classify_instance: CachedMethod,
    distribution_for_instance: CachedMethod,
}

impl JavaWrapper for Classifier {
    const REQUIRED_TYPE: &'static str = CLASSIFIER;
    const FAMILY: Family = Family::Classifier;

    fn wrap(object: Guarded<Self>) -> Result<Self> {
        let handler = OptionHandler::of(object.into_inner())?;
        let (classify_instance, distribution_for_instance) =
            handler.java_object().with_env(|env, _| {
                Ok((
                    CachedMethod::resolve(env, CLASSIFIER, "classifyInstance", "(Lweka/core/Instance;)D")?,
                    CachedMethod::resolve(
                        env,
                        CLASSIFIER,
                        "distributionForInstance",
                        "(Lweka/core/Instance;)[D",
                    )?,
                ))
            })?;
        Ok(Self {
            handler,
            classify_instance,
            distribution_for_instance,
        })
    }

    fn java_object(&self) -> &JavaObject {
        self.handler.java_object()
    }
}

impl Classifier {
    pub fn option_handler(&self) -> &OptionHandler {
        &self.handler
    }

    /// Trains the classifier on `data`; the class attribute must be set.
    pub fn build_classifier(&self, data: &Instances) -> Result<()> {
        self.java_object().call_void(
            "buildClassifier",
            "(Lweka/core/Instances;)V",
            &[JValue::from(data.java_object().as_obj())],
        )
    }

    /// Updates an incremental classifier (`weka.classifiers.UpdateableClassifier`).
    pub fn update_classifier(&self, instance: &Instance) -> Result<()> {
        self.java_object().enforce_type("weka.classifiers.UpdateableClassifier")?;
        self.java_object().call_void(
            "updateClassifier",
            "(Lweka/core/Instance;)V",
            &[JValue::from(instance.java_object().as_obj())],
        )
    }

    /// The predicted class index, or the predicted value for numeric classes.
    pub fn classify_instance(&self, instance: &Instance) -> Result<f64> {
        self.java_object().with_env(|env, obj| {
            Ok(self
                .classify_instance
                .call(env, obj, &[JValue::from(instance.java_object().as_obj())])?
                .d()?)
        })
    }

    /// Class membership probabilities.
    pub fn distribution_for_instance(&self, instance: &Instance) -> Result<Vec<f64>> {
        self.java_object().with_env(|env, obj| {
            let distribution = self
                .distribution_for_instance
                .call(env, obj, &[JValue::from(instance.java_object().as_obj())])?
                .l()?;
            typeconv::jdouble_array_to_vec(env, &distribution)
        })
    }

    /// An untrained copy with the same options (`AbstractClassifier.makeCopy`).
    pub fn make_copy(&self) -> Result<Self> {
        let object = self.java_object();
        let copy = object.with_env(|env, obj| {
            let copy = env
                .call_static_method(
                    "weka/classifiers/AbstractClassifier",
                    "makeCopy",
                    "(Lweka/classifiers/Classifier;)Lweka/classifiers/Classifier;",
                    &[JValue::from(obj)],
                )?
                .l()?;
            JavaObject::from_local_non_null(object.runtime(), env, &copy, "makeCopy")
        })?;
        Self::from_object(copy)
    }

    /// Writes the model, plus an empty copy of the training header if given.
    pub fn serialize(&self, path: impl AsRef<Path>, header: Option<&Instances>) -> Result<()> {
        match header {
            Some(header) => {
                let header = Instances::template_instances(header, 0)?;
                serialization::write_all(
                    self.java_object().runtime(),
                    path,
                    &[self.java_object(), header.java_object()],
                )
            }
            None => serialization::write(path, self),
        }
    }

    /// Reads a model written by [`serialize`](Self::serialize), with its header if present.
    pub fn deserialize(runtime: &Runtime, path: impl AsRef<Path>) -> Result<(Self, Option<Instances>)> {
        let path = path.as_ref();
        let mut objects = serialization::read_all(runtime, path)?.into_iter().flatten();
        let (model, header) = match (objects.next(), objects.next(), objects.next()) {
            (Some(model), header, None) => (model, header),
            _ => {
                return Err(WekaError::InvalidConfig(format!(
                    "Expected one or two objects in model file {}",
                    path.display()
                )));
            }
        };
        let header = header.map(Instances::from_object).transpose()?;
        Ok((Self::from_object(model)?, header))
    }
}

/// Proxy for `weka.classifiers.Evaluation`.
#[derive(Debug, Clone)]
pub struct Evaluation {
    object: JavaObject,
}

impl JavaWrapper for Evaluation {
    const REQUIRED_TYPE: &'static str = "weka.classifiers.Evaluation";
    const FAMILY: Family = Family::Other;

    fn wrap(object: Guarded<Self>) -> Result<Self> {
        let object = object.into_inner();
        Ok(Self { object })
    }

    fn java_object(&self) -> &JavaObject {
        &self.object
    }
}

impl Evaluation {
    /// Creates an evaluation for datasets with the header of `data`.
    ///
    /// Shadows [`JavaWrapper::new`], which instantiates by class name.
    pub fn new(data: &Instances) -> Result<Self> {
        let source = data.java_object();
        let object = source.with_env(|env, obj| {
            let evaluation = env.new_object(
                "weka/classifiers/Evaluation",
                "(Lweka/core/Instances;)V",
                &[JValue::from(obj)],
            )?;
            JavaObject::from_local_non_null(source.runtime(), env, &evaluation, "Evaluation")
        })?;
        Self::from_object(object)
    }

    /// Cross-validates an untrained classifier with `num_folds` folds.
    pub fn crossvalidate_model(
        &self,
        classifier: &Classifier,
        data: &Instances,
        num_folds: usize,
        seed: i64,
    ) -> Result<()> {
        self.object.with_env(|env, obj| {
            let random = env.new_object("java/util/Random", "(J)V", &[JValue::Long(seed)])?;
            let output = env.new_object_array(0, "java/lang/Object", JObject::null())?;
            env.call_method(
                obj,
                "crossValidateModel",
                "(Lweka/classifiers/Classifier;Lweka/core/Instances;ILjava/util/Random;[Ljava/lang/Object;)V",
                &[
                    JValue::from(classifier.java_object().as_obj()),
                    JValue::from(data.java_object().as_obj()),
                    JValue::Int(typeconv::to_jint(num_folds)?),
                    JValue::from(&random),
                    JValue::from(&output),
                ],
            )?
            .v()?;
            Ok(())
        })
    }

    /// Evaluates a trained classifier on `data` and returns the predictions.
    pub fn test_model(&self, classifier: &Classifier, data: &Instances) -> Result<Vec<f64>> {
        self.object.with_env(|env, obj| {
            let output = env.new_object_array(0, "java/lang/Object", JObject::null())?;
            let predictions = env
                .call_method(
                    obj,
                    "evaluateModel",
                    "(Lweka/classifiers/Classifier;Lweka/core/Instances;[Ljava/lang/Object;)[D",
                    &[
                        JValue::from(classifier.java_object().as_obj()),
                        JValue::from(data.java_object().as_obj()),
                        JValue::from(&output),
                    ],
                )?
                .l()?;
            typeconv::jdouble_array_to_vec(env, &predictions)
        })
    }

    /// Evaluates a trained classifier on one row and returns the prediction.
    pub fn test_model_once(&self, classifier: &Classifier, instance: &Instance) -> Result<f64> {
        self.object.call_double(
            "evaluateModelOnce",
            "(Lweka/classifiers/Classifier;Lweka/core/Instance;)D",
            &[
                JValue::from(classifier.java_object().as_obj()),
                JValue::from(instance.java_object().as_obj()),
            ],
        )
    }

    pub fn percent_correct(&self) -> Result<f64> {
        self.object.call_double("pctCorrect", "()D", &[])
    }

    pub fn percent_incorrect(&self) -> Result<f64> {
        self.object.call_double("pctIncorrect", "()D", &[])
    }

    pub fn num_instances(&self) -> Result<f64> {
        self.object.call_double("numInstances", "()D", &[])
    }

    /// The `toSummaryString()` report.
    pub fn summary(&self) -> Result<String> {
        Ok(self.object.call_string("toSummaryString")?.unwrap_or_default())
    }

    /// Per-class statistics (`toClassDetailsString()`).
    pub fn class_details(&self) -> Result<String> {
        Ok(self.object.call_string("toClassDetailsString")?.unwrap_or_default())
    }

    /// The confusion matrix (`toMatrixString()`).
    pub fn matrix(&self) -> Result<String> {
        Ok(self.object.call_string("toMatrixString")?.unwrap_or_default())
    }
}
