//! Keyed result bundles.
//!
//! A [`Container`] maps a fixed set of keys to values of different kinds,
//! e.g. a trained model together with the dataset header it was built on.
//! Each [`ContainerKind`] allows its own key set and declares which keys must
//! be present for the container to be valid.
//!
//! ```rust,ignore
//! use weka_bridge::container::{Container, ContainerKind, ContainerValue};
//!
//! let mut model = Container::new(ContainerKind::Model);
//! model.set("Model", ContainerValue::Object(classifier.java_object().clone()))?;
//! assert!(model.is_valid());
//! ```

use crate::classes::JavaObject;
use crate::error::{Result, WekaError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The kinds of container and their key sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerKind {
    /// A model and, optionally, its training header.
    Model,
    /// The prediction for one row.
    Classification,
    /// The cluster assignment for one row.
    Clustering,
    /// The outcome of an attribute selection.
    AttributeSelection,
}

impl ContainerKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Model => "Model",
            Self::Classification => "Classification",
            Self::Clustering => "Clustering",
            Self::AttributeSelection => "AttributeSelection",
        }
    }

    /// All keys the kind accepts.
    pub fn allowed_keys(self) -> &'static [&'static str] {
        match self {
            Self::Model => &["Model", "Header"],
            Self::Classification => &["Instance", "Classification", "Label", "Distribution"],
            Self::Clustering => &["Instance", "Cluster", "Distribution"],
            Self::AttributeSelection => &["Original", "Reduced", "NumAttributes", "Selected", "Results"],
        }
    }

    /// The keys that must be present for a container to be valid.
    pub fn required_keys(self) -> &'static [&'static str] {
        match self {
            Self::Model => &["Model"],
            Self::Classification => &["Instance", "Classification"],
            Self::Clustering => &["Instance", "Cluster"],
            Self::AttributeSelection => &["Reduced", "NumAttributes", "Selected"],
        }
    }

    pub fn allows(self, key: &str) -> bool {
        self.allowed_keys().contains(&key)
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value stored in a [`Container`].
#[derive(Debug, Clone)]
pub enum ContainerValue {
    /// A handle into the VM (model, dataset, row).
    Object(JavaObject),
    Number(f64),
    Integer(i64),
    Text(String),
    Numbers(Vec<f64>),
    Integers(Vec<i64>),
}

impl ContainerValue {
    pub fn as_object(&self) -> Option<&JavaObject> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Integer(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_numbers(&self) -> Option<&[f64]> {
        match self {
            Self::Numbers(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_integers(&self) -> Option<&[i64]> {
        match self {
            Self::Integers(values) => Some(values),
            _ => None,
        }
    }
}

impl From<JavaObject> for ContainerValue {
    fn from(value: JavaObject) -> Self {
        Self::Object(value)
    }
}

impl From<f64> for ContainerValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for ContainerValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<String> for ContainerValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for ContainerValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Vec<f64>> for ContainerValue {
    fn from(values: Vec<f64>) -> Self {
        Self::Numbers(values)
    }
}

impl From<Vec<i64>> for ContainerValue {
    fn from(values: Vec<i64>) -> Self {
        Self::Integers(values)
    }
}

/// A keyed bundle of results.
#[derive(Debug, Clone)]
pub struct Container {
    kind: ContainerKind,
    values: BTreeMap<&'static str, ContainerValue>,
}

impl Container {
    pub fn new(kind: ContainerKind) -> Self {
        Self {
            kind,
            values: BTreeMap::new(),
        }
    }

    /// Builds a container from key/value pairs, rejecting unknown keys.
    pub fn from_pairs<I, K, V>(kind: ContainerKind, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<ContainerValue>,
    {
        let mut container = Self::new(kind);
        for (key, value) in pairs {
            container.set(key.as_ref(), value)?;
        }
        Ok(container)
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    fn check_key(&self, key: &str) -> Result<&'static str> {
        self.kind
            .allowed_keys()
            .iter()
            .find(|allowed| **allowed == key)
            .copied()
            .ok_or_else(|| WekaError::InvalidContainerKey {
                key: key.to_string(),
                container: self.kind.name(),
            })
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn set(&mut self, key: &str, value: impl Into<ContainerValue>) -> Result<()> {
        let key = self.check_key(key)?;
        self.values.insert(key, value.into());
        Ok(())
    }

    /// The value under `key`; `Ok(None)` when an allowed key is unset.
    pub fn get(&self, key: &str) -> Result<Option<&ContainerValue>> {
        let key = self.check_key(key)?;
        Ok(self.values.get(key))
    }

    pub fn remove(&mut self, key: &str) -> Result<Option<ContainerValue>> {
        let key = self.check_key(key)?;
        Ok(self.values.remove(key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Keys currently set, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether every required key of the kind is present.
    pub fn is_valid(&self) -> bool {
        self.kind
            .required_keys()
            .iter()
            .all(|key| self.values.contains_key(key))
    }

    /// Required keys that are still unset.
    pub fn missing_keys(&self) -> Vec<&'static str> {
        self.kind
            .required_keys()
            .iter()
            .copied()
            .filter(|key| !self.values.contains_key(key))
            .collect()
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Container(", self.kind)?;
        for (i, key) in self.values.keys().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(key)?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_required_keys_are_allowed() {
        for kind in [
            ContainerKind::Model,
            ContainerKind::Classification,
            ContainerKind::Clustering,
            ContainerKind::AttributeSelection,
        ] {
            for key in kind.required_keys() {
                assert!(kind.allows(key), "{kind} requires disallowed key {key}");
            }
        }
    }

    #[test]
    fn test_unknown_key_rejected() {
        let mut container = Container::new(ContainerKind::Model);
        let err = container.set("Label", "yes").unwrap_err();
        assert!(err.is_configuration_error());
        assert_eq!(err.to_string(), "Key 'Label' not allowed in Model container");
        assert!(container.is_empty());

        assert!(container.get("Cluster").is_err());
    }

    #[test]
    fn test_classification_validity() {
        let mut container = Container::new(ContainerKind::Classification);
        assert!(!container.is_valid());
        assert_eq!(container.missing_keys(), vec!["Instance", "Classification"]);

        container.set("Classification", 1.0).unwrap();
        container.set("Distribution", vec![0.25, 0.75]).unwrap();
        assert!(!container.is_valid());
        assert_eq!(container.missing_keys(), vec!["Instance"]);

        container.set("Instance", 3_i64).unwrap();
        assert!(container.is_valid());
        assert_eq!(
            container.get("Distribution").unwrap().and_then(|v| v.as_numbers()),
            Some(&[0.25, 0.75][..])
        );
        assert!(container.get("Label").unwrap().is_none());
    }

    #[test]
    fn test_attribute_selection_validity() {
        let container = Container::from_pairs(
            ContainerKind::AttributeSelection,
            [
                ("NumAttributes", ContainerValue::from(2_i64)),
                ("Selected", ContainerValue::from(vec![0_i64, 3])),
                ("Results", ContainerValue::from("=== Attribute Selection ===")),
            ],
        )
        .unwrap();
        assert!(!container.is_valid());
        assert_eq!(container.missing_keys(), vec!["Reduced"]);
        assert_eq!(container.get("Selected").unwrap().and_then(|v| v.as_integers()), Some(&[0, 3][..]));
    }

    #[test]
    fn test_remove_and_display() {
        let mut container = Container::new(ContainerKind::Clustering);
        container.set("Instance", 0_i64).unwrap();
        container.set("Cluster", 2_i64).unwrap();
        assert!(container.is_valid());
        assert_eq!(container.to_string(), "ClusteringContainer(Cluster, Instance)");

        let removed = container.remove("Cluster").unwrap();
        assert_eq!(removed.and_then(|v| v.as_integer()), Some(2));
        assert!(!container.is_valid());
        assert_eq!(container.keys().collect::<Vec<_>>(), vec!["Instance"]);
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(ContainerValue::from(4_i64).as_number(), Some(4.0));
        assert_eq!(ContainerValue::from("x").as_text(), Some("x"));
        assert!(ContainerValue::from(1.5).as_integer().is_none());
        assert!(ContainerValue::from(1.5).as_object().is_none());
    }
}
