//! Attribute selection: evaluators, search methods and the
//! `weka.attributeSelection.AttributeSelection` driver.
//!
//! # Example
//!
//! ```rust,ignore
//! use weka_bridge::{ASEvaluation, ASSearch, AttributeSelection, JavaWrapper};
//!
//! let selection = AttributeSelection::new(&runtime)?;
//! selection.set_evaluator(&ASEvaluation::new(&runtime, "weka.attributeSelection.CfsSubsetEval")?)?;
//! selection.set_search(&ASSearch::with_options(
//!     &runtime,
//!     "weka.attributeSelection.BestFirst",
//!     &["-D".into(), "1".into()],
//! )?)?;
//! selection.select_attributes(&data)?;
//! println!("{:?}", selection.selected_attributes()?);
//! ```

use crate::capabilities::Capabilities;
use crate::classes::registry::Family;
use crate::classes::{Guarded, JavaObject, JavaWrapper, OptionHandler};
use crate::container::{Container, ContainerKind};
use crate::dataset::{Instance, Instances};
use crate::error::{Result, WekaError};
use crate::jvm::Runtime;
use crate::typeconv;
use jni::objects::JValue;

const AS_EVALUATION: &str = "weka.attributeSelection.ASEvaluation";
const AS_SEARCH: &str = "weka.attributeSelection.ASSearch";
const ATTRIBUTE_SELECTION: &str = "weka.attributeSelection.AttributeSelection";
const ATTRIBUTE_TRANSFORMER: &str = "weka.attributeSelection.AttributeTransformer";

fn to_indices(values: Vec<i32>) -> Result<Vec<usize>> {
    values.into_iter().map(typeconv::from_jint).collect()
}

fn to_jints(values: &[usize]) -> Result<Vec<i32>> {
    values.iter().copied().map(typeconv::to_jint).collect()
}

/// Proxy for `weka.attributeSelection.ASEvaluation`.
#[derive(Debug, Clone)]
pub struct ASEvaluation {
    handler: OptionHandler,
}

impl JavaWrapper for ASEvaluation {
    const REQUIRED_TYPE: &'static str = AS_EVALUATION;
    const FAMILY: Family = Family::AttributeEvaluator;

    fn wrap(object: Guarded<Self>) -> Result<Self> {
        Ok(Self {
            handler: OptionHandler::of(object.into_inner())?,
        })
    }

    fn java_object(&self) -> &JavaObject {
        self.handler.java_object()
    }
}

impl ASEvaluation {
    pub fn option_handler(&self) -> &OptionHandler {
        &self.handler
    }

    pub fn capabilities(&self) -> Result<Capabilities> {
        Capabilities::of(self)
    }

    /// Initializes the evaluator on `data`.
    pub fn build_evaluator(&self, data: &Instances) -> Result<()> {
        self.java_object().call_void(
            "buildEvaluator",
            "(Lweka/core/Instances;)V",
            &[JValue::from(data.java_object().as_obj())],
        )
    }

    /// Lets the evaluator adjust the attribute set chosen by a search.
    pub fn post_process(&self, attributes: &[usize]) -> Result<Vec<usize>> {
        let attributes = to_jints(attributes)?;
        let processed = self.java_object().with_env(|env, obj| {
            let array = typeconv::to_jint_array(env, &attributes)?;
            let result = env
                .call_method(obj, "postProcess", "([I)[I", &[JValue::from(&array)])?
                .l()?;
            typeconv::jint_array_to_vec(env, &result)
        })?;
        to_indices(processed)
    }

    /// Whether the evaluator transforms the data (e.g. principal components).
    pub fn is_transformer(&self) -> Result<bool> {
        self.java_object().is_instance_of(ATTRIBUTE_TRANSFORMER)
    }

    /// Header of the transformed data; only for transforming evaluators.
    pub fn transformed_header(&self) -> Result<Instances> {
        self.java_object().enforce_type(ATTRIBUTE_TRANSFORMER)?;
        Instances::from_object(self.java_object().call_non_null(
            "transformedHeader",
            "()Lweka/core/Instances;",
            &[],
        )?)
    }

    /// Transforms `data`; only for transforming evaluators.
    pub fn transformed_data(&self, data: &Instances) -> Result<Instances> {
        self.java_object().enforce_type(ATTRIBUTE_TRANSFORMER)?;
        Instances::from_object(self.java_object().call_non_null(
            "transformedData",
            "(Lweka/core/Instances;)Lweka/core/Instances;",
            &[JValue::from(data.java_object().as_obj())],
        )?)
    }

    /// Transforms one row; only for transforming evaluators.
    pub fn convert_instance(&self, instance: &Instance) -> Result<Instance> {
        self.java_object().enforce_type(ATTRIBUTE_TRANSFORMER)?;
        Instance::from_object(self.java_object().call_non_null(
            "convertInstance",
            "(Lweka/core/Instance;)Lweka/core/Instance;",
            &[JValue::from(instance.java_object().as_obj())],
        )?)
    }
}

/// Proxy for `weka.attributeSelection.ASSearch`.
#[derive(Debug, Clone)]
pub struct ASSearch {
    handler: OptionHandler,
}

impl JavaWrapper for ASSearch {
    const REQUIRED_TYPE: &'static str = AS_SEARCH;
    const FAMILY: Family = Family::AttributeSearch;

    fn wrap(object: Guarded<Self>) -> Result<Self> {
        Ok(Self {
            handler: OptionHandler::of(object.into_inner())?,
        })
    }

    fn java_object(&self) -> &JavaObject {
        self.handler.java_object()
    }
}

impl ASSearch {
    pub fn option_handler(&self) -> &OptionHandler {
        &self.handler
    }

    /// Searches the attribute space with a built `evaluation`; returns 0-based indices.
    pub fn search(&self, evaluation: &ASEvaluation, data: &Instances) -> Result<Vec<usize>> {
        let found = self.java_object().with_env(|env, obj| {
            let result = env
                .call_method(
                    obj,
                    "search",
                    "(Lweka/attributeSelection/ASEvaluation;Lweka/core/Instances;)[I",
                    &[
                        JValue::from(evaluation.java_object().as_obj()),
                        JValue::from(data.java_object().as_obj()),
                    ],
                )?
                .l()?;
            typeconv::jint_array_to_vec(env, &result)
        })?;
        to_indices(found)
    }
}

/// An attribute with its merit, from a ranking search.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct RankedAttribute {
    /// 0-based attribute index.
    pub index: usize,
    pub merit: f64,
}

/// Proxy for `weka.attributeSelection.AttributeSelection`.
#[derive(Debug, Clone)]
pub struct AttributeSelection {
    object: JavaObject,
}

impl JavaWrapper for AttributeSelection {
    const REQUIRED_TYPE: &'static str = ATTRIBUTE_SELECTION;
    const FAMILY: Family = Family::Other;

    fn wrap(object: Guarded<Self>) -> Result<Self> {
        Ok(Self {
            object: object.into_inner(),
        })
    }

    fn java_object(&self) -> &JavaObject {
        &self.object
    }
}

impl AttributeSelection {
    /// Creates a driver with Weka's defaults (`CfsSubsetEval`, `GreedyStepwise`).
    ///
    /// Shadows [`JavaWrapper::new`], which instantiates by class name.
    pub fn new(runtime: &Runtime) -> Result<Self> {
        <Self as JavaWrapper>::new(runtime, ATTRIBUTE_SELECTION)
    }

    pub fn set_evaluator(&self, evaluation: &ASEvaluation) -> Result<()> {
        self.object.call_void(
            "setEvaluator",
            "(Lweka/attributeSelection/ASEvaluation;)V",
            &[JValue::from(evaluation.java_object().as_obj())],
        )
    }

    pub fn set_search(&self, search: &ASSearch) -> Result<()> {
        self.object.call_void(
            "setSearch",
            "(Lweka/attributeSelection/ASSearch;)V",
            &[JValue::from(search.java_object().as_obj())],
        )
    }

    /// Number of folds used with [`set_crossvalidation`](Self::set_crossvalidation).
    pub fn set_folds(&self, folds: usize) -> Result<()> {
        self.object
            .call_void("setFolds", "(I)V", &[JValue::Int(typeconv::to_jint(folds)?)])
    }

    /// Produce a ranking; requires a search that can rank (e.g. `Ranker`).
    pub fn set_ranking(&self, ranking: bool) -> Result<()> {
        self.object
            .call_void("setRanking", "(Z)V", &[JValue::from(ranking)])
    }

    pub fn set_seed(&self, seed: i32) -> Result<()> {
        self.object.call_void("setSeed", "(I)V", &[JValue::Int(seed)])
    }

    /// Cross-validate the selection instead of running it once.
    pub fn set_crossvalidation(&self, enabled: bool) -> Result<()> {
        self.object
            .call_void("setXval", "(Z)V", &[JValue::from(enabled)])
    }

    /// Runs the selection on `data`.
    pub fn select_attributes(&self, data: &Instances) -> Result<()> {
        self.object.call_void(
            "SelectAttributes",
            "(Lweka/core/Instances;)V",
            &[JValue::from(data.java_object().as_obj())],
        )
    }

    /// Runs the selection on one cross-validation split (`data` is the training fold).
    pub fn select_attributes_cv_split(&self, data: &Instances) -> Result<()> {
        self.object.call_void(
            "selectAttributesCVSplit",
            "(Lweka/core/Instances;)V",
            &[JValue::from(data.java_object().as_obj())],
        )
    }

    /// The selected 0-based indices; the class attribute, if set, comes last.
    pub fn selected_attributes(&self) -> Result<Vec<usize>> {
        let selected = self.object.with_env(|env, obj| {
            let array = env.call_method(obj, "selectedAttributes", "()[I", &[])?.l()?;
            typeconv::jint_array_to_vec(env, &array)
        })?;
        to_indices(selected)
    }

    /// Number of selected attributes, excluding the class.
    pub fn number_attributes_selected(&self) -> Result<usize> {
        typeconv::from_jint(self.object.call_int("numberAttributesSelected", "()I", &[])?)
    }

    /// The textual report of the last selection.
    pub fn results_string(&self) -> Result<String> {
        Ok(self.object.call_string("toResultsString")?.unwrap_or_default())
    }

    /// The report of the cross-validated selection.
    pub fn cv_results(&self) -> Result<String> {
        Ok(self.object.call_string("CVResultsString")?.unwrap_or_default())
    }

    /// Attributes with their merit, best first; only after a ranking selection.
    pub fn ranked_attributes(&self) -> Result<Vec<RankedAttribute>> {
        let matrix = self.object.with_env(|env, obj| {
            let matrix = env.call_method(obj, "rankedAttributes", "()[[D", &[])?.l()?;
            typeconv::jdouble_matrix_to_vec(env, &matrix)
        })?;
        matrix
            .into_iter()
            .filter_map(|row| match row.as_slice() {
                [index, merit, ..] => Some((*index, *merit)),
                _ => None,
            })
            .map(|(index, merit)| {
                if !(index >= 0.0 && index <= f64::from(i32::MAX) && index.fract() == 0.0) {
                    return Err(WekaError::IntegerOutOfRange(format!(
                        "Invalid ranked attribute index {}",
                        index
                    )));
                }
                Ok(RankedAttribute {
                    index: typeconv::from_jint(index as i32)?,
                    merit,
                })
            })
            .collect()
    }

    /// Reduces `data` to the selected attributes.
    pub fn reduce_dimensionality(&self, data: &Instances) -> Result<Instances> {
        Instances::from_object(self.object.call_non_null(
            "reduceDimensionality",
            "(Lweka/core/Instances;)Lweka/core/Instances;",
            &[JValue::from(data.java_object().as_obj())],
        )?)
    }

    /// Reduces one row to the selected attributes.
    pub fn reduce_instance(&self, instance: &Instance) -> Result<Instance> {
        Instance::from_object(self.object.call_non_null(
            "reduceDimensionality",
            "(Lweka/core/Instance;)Lweka/core/Instance;",
            &[JValue::from(instance.java_object().as_obj())],
        )?)
    }

    /// Bundles the outcome of a selection on `data`.
    ///
    /// The container holds `Original`, `Reduced`, `NumAttributes`, `Selected`
    /// and `Results`.
    pub fn to_container(&self, data: &Instances) -> Result<Container> {
        let selected = self
            .selected_attributes()?
            .into_iter()
            .map(|index| index as i64)
            .collect::<Vec<_>>();
        let mut container = Container::new(ContainerKind::AttributeSelection);
        container.set("Original", data.java_object().clone())?;
        container.set(
            "Reduced",
            self.reduce_dimensionality(data)?.java_object().clone(),
        )?;
        container.set("NumAttributes", self.number_attributes_selected()? as i64)?;
        container.set("Selected", selected)?;
        container.set("Results", self.results_string()?)?;
        Ok(container)
    }
}
