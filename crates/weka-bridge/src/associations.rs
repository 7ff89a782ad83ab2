//! Associators (`weka.associations.Associator`) and the rules they produce.

use crate::capabilities::Capabilities;
use crate::classes::registry::Family;
use crate::classes::{Guarded, JavaObject, JavaWrapper, OptionHandler};
use crate::dataset::Instances;
use crate::error::Result;
use crate::jvm::bridge;
use jni::JNIEnv;
use jni::objects::{JObject, JObjectArray, JValue};
use serde::Serialize;

const ASSOCIATOR: &str = "weka.associations.Associator";
const RULES_PRODUCER: &str = "weka.associations.AssociationRulesProducer";

/// Proxy for `weka.associations.Associator`.
#[derive(Debug, Clone)]
pub struct Associator {
    handler: OptionHandler,
}

impl JavaWrapper for Associator {
    const REQUIRED_TYPE: &'static str = ASSOCIATOR;
    const FAMILY: Family = Family::Associator;

    fn wrap(object: Guarded<Self>) -> Result<Self> {
        Ok(Self {
            handler: OptionHandler::of(object.into_inner())?,
        })
    }

    fn java_object(&self) -> &JavaObject {
        self.handler.java_object()
    }
}

/// One association rule, `premise ==> consequence`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssociationRule {
    pub premise: Vec<String>,
    pub consequence: Vec<String>,
    pub premise_support: i32,
    pub consequence_support: i32,
    pub total_support: i32,
    /// Name of the ranking metric, e.g. `Confidence`.
    pub metric_name: String,
    pub metric_value: f64,
}

impl AssociationRule {
    fn from_rule(env: &mut JNIEnv, rule: &JObject) -> Result<Self> {
        Ok(Self {
            premise: items(env, rule, "getPremise")?,
            consequence: items(env, rule, "getConsequence")?,
            premise_support: env.call_method(rule, "getPremiseSupport", "()I", &[])?.i()?,
            consequence_support: env
                .call_method(rule, "getConsequenceSupport", "()I", &[])?
                .i()?,
            total_support: env.call_method(rule, "getTotalSupport", "()I", &[])?.i()?,
            metric_name: bridge::call_string_method(env, rule, "getPrimaryMetricName")?
                .unwrap_or_default(),
            metric_value: env.call_method(rule, "getPrimaryMetricValue", "()D", &[])?.d()?,
        })
    }
}

/// The `toString()` of each item of a rule side.
fn items(env: &mut JNIEnv, rule: &JObject, side: &str) -> Result<Vec<String>> {
    let collection = env
        .call_method(rule, side, "()Ljava/util/Collection;", &[])?
        .l()?;
    if collection.is_null() {
        return Ok(Vec::new());
    }
    let array = JObjectArray::from(
        env.call_method(&collection, "toArray", "()[Ljava/lang/Object;", &[])?
            .l()?,
    );
    let len = env.get_array_length(&array)?;
    let mut result = Vec::new();
    for i in 0..len {
        let item = env.get_object_array_element(&array, i)?;
        result.push(bridge::object_to_string(env, &item)?);
        env.delete_local_ref(item)?;
    }
    Ok(result)
}

impl std::fmt::Display for AssociationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} ==> {} {}    {}:({:.2})",
            self.premise.join(" "),
            self.premise_support,
            self.consequence.join(" "),
            self.total_support,
            self.metric_name.to_lowercase(),
            self.metric_value
        )
    }
}

impl Associator {
    pub fn option_handler(&self) -> &OptionHandler {
        &self.handler
    }

    pub fn capabilities(&self) -> Result<Capabilities> {
        Capabilities::of(self)
    }

    /// Generates the associations for `data`.
    pub fn build_associations(&self, data: &Instances) -> Result<()> {
        self.java_object().call_void(
            "buildAssociations",
            "(Lweka/core/Instances;)V",
            &[JValue::from(data.java_object().as_obj())],
        )
    }

    /// An unbuilt copy with the same options (`AbstractAssociator.makeCopy`).
    pub fn make_copy(&self) -> Result<Self> {
        let object = self.java_object();
        let copy = object.with_env(|env, obj| {
            let copy = env
                .call_static_method(
                    "weka/associations/AbstractAssociator",
                    "makeCopy",
                    "(Lweka/associations/Associator;)Lweka/associations/Associator;",
                    &[JValue::from(obj)],
                )?
                .l()?;
            JavaObject::from_local_non_null(object.runtime(), env, &copy, "makeCopy")
        })?;
        Self::from_object(copy)
    }

    /// Whether [`rules`](Self::rules) can be called.
    pub fn can_produce_rules(&self) -> Result<bool> {
        if !self.java_object().is_instance_of(RULES_PRODUCER)? {
            return Ok(false);
        }
        self.java_object().call_bool("canProduceRules", "()Z", &[])
    }

    /// The rules found by the last build.
    pub fn rules(&self) -> Result<Vec<AssociationRule>> {
        self.java_object().enforce_type(RULES_PRODUCER)?;
        self.java_object().with_env(|env, obj| {
            let rules = env
                .call_method(
                    obj,
                    "getAssociationRules",
                    "()Lweka/associations/AssociationRules;",
                    &[],
                )?
                .l()?;
            let list = env.call_method(&rules, "getRules", "()Ljava/util/List;", &[])?.l()?;
            let size = env.call_method(&list, "size", "()I", &[])?.i()?;
            let mut result = Vec::new();
            for i in 0..size {
                let rule = env
                    .call_method(&list, "get", "(I)Ljava/lang/Object;", &[JValue::Int(i)])?
                    .l()?;
                result.push(AssociationRule::from_rule(env, &rule)?);
                env.delete_local_ref(rule)?;
            }
            Ok(result)
        })
    }

    /// The textual report (`toString()`).
    pub fn report(&self) -> Result<String> {
        self.java_object().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rule_display() {
        let rule = AssociationRule {
            premise: vec!["outlook=overcast".to_string()],
            consequence: vec!["play=yes".to_string()],
            premise_support: 4,
            consequence_support: 9,
            total_support: 4,
            metric_name: "Confidence".to_string(),
            metric_value: 1.0,
        };
        assert_eq!(
            rule.to_string(),
            "outlook=overcast 4 ==> play=yes 4    confidence:(1.00)"
        );
    }

    #[test]
    fn test_rule_serializes() {
        let rule = AssociationRule {
            premise: vec![],
            consequence: vec!["a=1".to_string()],
            premise_support: 0,
            consequence_support: 2,
            total_support: 2,
            metric_name: "Lift".to_string(),
            metric_value: 1.5,
        };
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["metric_name"], "Lift");
        assert_eq!(json["consequence"][0], "a=1");
    }
}
