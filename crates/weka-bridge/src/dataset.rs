//! Datasets (`weka.core.Instances`) and rows (`weka.core.Instance`).

use crate::classes::registry::Family;
use crate::classes::{CachedMethod, Guarded, JavaObject, JavaWrapper};
use crate::error::{Result, WekaError};
use crate::jvm::Runtime;
use crate::typeconv;
use jni::objects::JValue;
use serde::Serialize;
use std::str::FromStr;

const INSTANCES: &str = "weka.core.Instances";
const INSTANCE: &str = "weka.core.Instance";
const ATTRIBUTE: &str = "weka.core.Attribute";

/// Where the class attribute of a dataset is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassIndex {
    First,
    Last,
    /// 0-based attribute index.
    Index(usize),
}

/// Parses `first`, `last` or a 1-based attribute number, as Weka's `-c` flag does.
impl FromStr for ClassIndex {
    type Err = WekaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(Self::First),
            "last" => Ok(Self::Last),
            other => match other.parse::<usize>() {
                Ok(n) if n > 0 => Ok(Self::Index(n - 1)),
                _ => Err(WekaError::InvalidConfig(format!("Invalid class index: {}", s))),
            },
        }
    }
}

/// A dataset.
#[derive(Debug, Clone)]
pub struct Instances {
    object: JavaObject,
    instance: CachedMethod,
    num_instances: CachedMethod,
}

impl JavaWrapper for Instances {
    const REQUIRED_TYPE: &'static str = INSTANCES;
    const FAMILY: Family = Family::Other;

    fn wrap(object: Guarded<Self>) -> Result<Self> {
        let object = object.into_inner();
        let (instance, num_instances) = object.with_env(|env, _| {
            Ok((
                CachedMethod::resolve(env, INSTANCES, "instance", "(I)Lweka/core/Instance;")?,
                CachedMethod::resolve(env, INSTANCES, "numInstances", "()I")?,
            ))
        })?;
        Ok(Self {
            object,
            instance,
            num_instances,
        })
    }

    fn java_object(&self) -> &JavaObject {
        &self.object
    }
}

impl Instances {
    /// An empty copy of `dataset`'s header with room for `capacity` rows.
    pub fn template_instances(dataset: &Instances, capacity: usize) -> Result<Self> {
        let object = dataset.object.with_env(|env, obj| {
            let copy = env.new_object(
                "weka/core/Instances",
                "(Lweka/core/Instances;I)V",
                &[JValue::from(obj), JValue::Int(typeconv::to_jint(capacity)?)],
            )?;
            JavaObject::from_local_non_null(dataset.object.runtime(), env, &copy, "Instances")
        })?;
        Self::from_object(object)
    }

    /// A full copy of the dataset (header and rows).
    pub fn copy(&self) -> Result<Self> {
        let object = self.object.with_env(|env, obj| {
            let copy = env.new_object(
                "weka/core/Instances",
                "(Lweka/core/Instances;)V",
                &[JValue::from(obj)],
            )?;
            JavaObject::from_local_non_null(self.object.runtime(), env, &copy, "Instances")
        })?;
        Self::from_object(object)
    }

    pub fn relation_name(&self) -> Result<String> {
        Ok(self.object.call_string("relationName")?.unwrap_or_default())
    }

    pub fn set_relation_name(&self, name: &str) -> Result<()> {
        self.object.with_env(|env, obj| {
            let jname = env.new_string(name)?;
            env.call_method(obj, "setRelationName", "(Ljava/lang/String;)V", &[JValue::from(&jname)])?
                .v()?;
            Ok(())
        })
    }

    pub fn num_instances(&self) -> Result<usize> {
        let count = self.object.with_env(|env, obj| Ok(self.num_instances.call(env, obj, &[])?.i()?))?;
        typeconv::from_jint(count)
    }

    pub fn num_attributes(&self) -> Result<usize> {
        typeconv::from_jint(self.object.call_int("numAttributes", "()I", &[])?)
    }

    /// Names of all attributes, in order.
    pub fn attribute_names(&self) -> Result<Vec<String>> {
        let count = self.num_attributes()?;
        self.object.with_env(|env, obj| {
            let mut names = Vec::with_capacity(count);
            for i in 0..count {
                let index = JValue::Int(typeconv::to_jint(i)?);
                let attribute = env
                    .call_method(obj, "attribute", "(I)Lweka/core/Attribute;", &[index])?
                    .l()?;
                let name = env.call_method(&attribute, "name", "()Ljava/lang/String;", &[])?.l()?;
                names.push(crate::jvm::bridge::jstring_to_string(env, name)?.unwrap_or_default());
                env.delete_local_ref(attribute)?;
            }
            Ok(names)
        })
    }

    /// The attribute at `index`.
    pub fn attribute(&self, index: usize) -> Result<Attribute> {
        let index = JValue::Int(typeconv::to_jint(index)?);
        Attribute::from_object(self.object.call_non_null(
            "attribute",
            "(I)Lweka/core/Attribute;",
            &[index],
        )?)
    }

    /// The attribute called `name`, if there is one.
    pub fn attribute_by_name(&self, name: &str) -> Result<Option<Attribute>> {
        let object = self.object.with_env(|env, obj| {
            let jname = env.new_string(name)?;
            let attribute = env
                .call_method(
                    obj,
                    "attribute",
                    "(Ljava/lang/String;)Lweka/core/Attribute;",
                    &[JValue::from(&jname)],
                )?
                .l()?;
            JavaObject::from_local(self.object.runtime(), env, &attribute)
        })?;
        object.map(Attribute::from_object).transpose()
    }

    /// The class attribute; `None` when no class is set.
    pub fn class_attribute(&self) -> Result<Option<Attribute>> {
        match self.class_index()? {
            Some(index) => self.attribute(index).map(Some),
            None => Ok(None),
        }
    }

    /// The class attribute index; `None` when no class is set.
    pub fn class_index(&self) -> Result<Option<usize>> {
        let index = self.object.call_int("classIndex", "()I", &[])?;
        Ok(usize::try_from(index).ok())
    }

    /// Sets the class attribute; `None` unsets it.
    pub fn set_class_index(&self, index: Option<usize>) -> Result<()> {
        let index = index.map_or(Ok(-1), typeconv::to_jint)?;
        self.object.call_void("setClassIndex", "(I)V", &[JValue::Int(index)])
    }

    /// Resolves and sets a [`ClassIndex`].
    pub fn set_class(&self, class_index: ClassIndex) -> Result<()> {
        let index = match class_index {
            ClassIndex::First => 0,
            ClassIndex::Last => self.num_attributes()?.saturating_sub(1),
            ClassIndex::Index(i) => i,
        };
        self.set_class_index(Some(index))
    }

    pub fn has_class(&self) -> Result<bool> {
        Ok(self.class_index()?.is_some())
    }

    /// The row at `index`.
    pub fn instance(&self, index: usize) -> Result<Instance> {
        let object = self.object.with_env(|env, obj| {
            let row = self
                .instance
                .call(env, obj, &[JValue::Int(typeconv::to_jint(index)?)])?
                .l()?;
            JavaObject::from_local_non_null(self.object.runtime(), env, &row, "instance")
        })?;
        Instance::from_object(object)
    }

    /// Appends a row (the dataset stores a shallow copy).
    pub fn add_instance(&self, instance: &Instance) -> Result<()> {
        self.object
            .call_bool(
                "add",
                "(Lweka/core/Instance;)Z",
                &[JValue::from(instance.object.as_obj())],
            )
            .map(|_| ())
    }

    /// Shuffles the rows with a `java.util.Random` seeded with `seed`.
    pub fn randomize(&self, seed: i64) -> Result<()> {
        self.object.with_env(|env, obj| {
            let random = env.new_object("java/util/Random", "(J)V", &[JValue::Long(seed)])?;
            env.call_method(obj, "randomize", "(Ljava/util/Random;)V", &[JValue::from(&random)])?
                .v()?;
            Ok(())
        })
    }

    /// Training split of fold `fold` out of `num_folds`.
    pub fn train_cv(&self, num_folds: usize, fold: usize) -> Result<Self> {
        let object = self.object.call_non_null(
            "trainCV",
            "(II)Lweka/core/Instances;",
            &[
                JValue::Int(typeconv::to_jint(num_folds)?),
                JValue::Int(typeconv::to_jint(fold)?),
            ],
        )?;
        Self::from_object(object)
    }

    /// Test split of fold `fold` out of `num_folds`.
    pub fn test_cv(&self, num_folds: usize, fold: usize) -> Result<Self> {
        let object = self.object.call_non_null(
            "testCV",
            "(II)Lweka/core/Instances;",
            &[
                JValue::Int(typeconv::to_jint(num_folds)?),
                JValue::Int(typeconv::to_jint(fold)?),
            ],
        )?;
        Self::from_object(object)
    }

    /// Whether both datasets share the same header.
    pub fn equal_headers(&self, other: &Instances) -> Result<bool> {
        self.object.call_bool(
            "equalHeaders",
            "(Lweka/core/Instances;)Z",
            &[JValue::from(other.object.as_obj())],
        )
    }

    /// The `toSummaryString()` statistics.
    pub fn summary(&self) -> Result<String> {
        Ok(self.object.call_string("toSummaryString")?.unwrap_or_default())
    }
}

/// The kind of values an [`Attribute`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    Numeric,
    Nominal,
    String,
    Date,
    Relational,
}

impl AttributeType {
    fn from_jint(value: i32) -> Result<Self> {
        match value {
            0 => Ok(Self::Numeric),
            1 => Ok(Self::Nominal),
            2 => Ok(Self::String),
            3 => Ok(Self::Date),
            4 => Ok(Self::Relational),
            other => Err(WekaError::IntegerOutOfRange(format!(
                "Unknown attribute type {}",
                other
            ))),
        }
    }
}

/// One column of a dataset header.
#[derive(Debug, Clone)]
pub struct Attribute {
    object: JavaObject,
}

impl JavaWrapper for Attribute {
    const REQUIRED_TYPE: &'static str = ATTRIBUTE;
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

impl Attribute {
    pub fn name(&self) -> Result<String> {
        Ok(self.object.call_string("name")?.unwrap_or_default())
    }

    /// 0-based position in the header.
    pub fn index(&self) -> Result<usize> {
        typeconv::from_jint(self.object.call_int("index", "()I", &[])?)
    }

    pub fn attribute_type(&self) -> Result<AttributeType> {
        AttributeType::from_jint(self.object.call_int("type", "()I", &[])?)
    }

    pub fn is_numeric(&self) -> Result<bool> {
        self.object.call_bool("isNumeric", "()Z", &[])
    }

    pub fn is_nominal(&self) -> Result<bool> {
        self.object.call_bool("isNominal", "()Z", &[])
    }

    /// Number of labels; 0 for numeric attributes.
    pub fn num_values(&self) -> Result<usize> {
        typeconv::from_jint(self.object.call_int("numValues", "()I", &[])?)
    }

    /// The label at `index` of a nominal or string attribute.
    pub fn value(&self, index: usize) -> Result<String> {
        let index = JValue::Int(typeconv::to_jint(index)?);
        self.object.with_env(|env, obj| {
            let label = env
                .call_method(obj, "value", "(I)Ljava/lang/String;", &[index])?
                .l()?;
            Ok(crate::jvm::bridge::jstring_to_string(env, label)?.unwrap_or_default())
        })
    }

    /// All labels, in internal order.
    pub fn values(&self) -> Result<Vec<String>> {
        (0..self.num_values()?).map(|i| self.value(i)).collect()
    }

    /// Internal index of `label`; `None` when the attribute has no such label.
    pub fn index_of_value(&self, label: &str) -> Result<Option<usize>> {
        let index = self.object.with_env(|env, obj| {
            let jlabel = env.new_string(label)?;
            Ok(env
                .call_method(obj, "indexOfValue", "(Ljava/lang/String;)I", &[JValue::from(&jlabel)])?
                .i()?)
        })?;
        Ok(usize::try_from(index).ok())
    }
}

/// One row of a dataset.
#[derive(Debug, Clone)]
pub struct Instance {
    object: JavaObject,
    value: CachedMethod,
}

impl JavaWrapper for Instance {
    const REQUIRED_TYPE: &'static str = INSTANCE;
    const FAMILY: Family = Family::Other;

    fn wrap(object: Guarded<Self>) -> Result<Self> {
        let object = object.into_inner();
        let value = object.with_env(|env, _| CachedMethod::resolve(env, INSTANCE, "value", "(I)D"))?;
        Ok(Self { object, value })
    }

    fn java_object(&self) -> &JavaObject {
        &self.object
    }
}

impl Instance {
    /// A `weka.core.DenseInstance` with `values` in internal format.
    ///
    /// Missing values are stored as the toolkit's missing value (NaN).
    pub fn create_instance(runtime: &Runtime, values: &[Option<f64>], weight: f64) -> Result<Self> {
        let object = runtime.with_env(|env| {
            let array = typeconv::to_jdouble_array(env, values, true)?;
            let row = env.new_object(
                "weka/core/DenseInstance",
                "(D[D)V",
                &[JValue::Double(weight), JValue::from(&array)],
            )?;
            JavaObject::from_local_non_null(runtime, env, &row, "DenseInstance")
        })?;
        Self::from_object(object)
    }

    pub fn num_attributes(&self) -> Result<usize> {
        typeconv::from_jint(self.object.call_int("numAttributes", "()I", &[])?)
    }

    /// The value at `index` in internal format (NaN when missing).
    pub fn value(&self, index: usize) -> Result<f64> {
        let index = JValue::Int(typeconv::to_jint(index)?);
        self.object
            .with_env(|env, obj| Ok(self.value.call(env, obj, &[index])?.d()?))
    }

    pub fn set_value(&self, index: usize, value: f64) -> Result<()> {
        let index = JValue::Int(typeconv::to_jint(index)?);
        self.object
            .call_void("setValue", "(ID)V", &[index, JValue::Double(value)])
    }

    pub fn is_missing(&self, index: usize) -> Result<bool> {
        self.object.call_bool("isMissing", "(I)Z", &[JValue::Int(typeconv::to_jint(index)?)])
    }

    /// All values in internal format.
    pub fn values(&self) -> Result<Vec<f64>> {
        self.object.with_env(|env, obj| {
            let array = env.call_method(obj, "toDoubleArray", "()[D", &[])?.l()?;
            typeconv::jdouble_array_to_vec(env, &array)
        })
    }

    pub fn weight(&self) -> Result<f64> {
        self.object.call_double("weight", "()D", &[])
    }

    pub fn set_weight(&self, weight: f64) -> Result<()> {
        self.object.call_void("setWeight", "(D)V", &[JValue::Double(weight)])
    }

    /// Attaches the row to a dataset's header.
    pub fn set_dataset(&self, dataset: &Instances) -> Result<()> {
        self.object.call_void(
            "setDataset",
            "(Lweka/core/Instances;)V",
            &[JValue::from(dataset.object.as_obj())],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_index_from_str() {
        assert_eq!("first".parse::<ClassIndex>().unwrap(), ClassIndex::First);
        assert_eq!("Last".parse::<ClassIndex>().unwrap(), ClassIndex::Last);
        assert_eq!("3".parse::<ClassIndex>().unwrap(), ClassIndex::Index(2));
        assert!("0".parse::<ClassIndex>().is_err());
        assert!("middle".parse::<ClassIndex>().is_err());
    }

    #[test]
    fn test_attribute_type_codes() {
        assert_eq!(AttributeType::from_jint(0).unwrap(), AttributeType::Numeric);
        assert_eq!(AttributeType::from_jint(1).unwrap(), AttributeType::Nominal);
        assert_eq!(AttributeType::from_jint(4).unwrap(), AttributeType::Relational);
        assert!(matches!(
            AttributeType::from_jint(9),
            Err(WekaError::IntegerOutOfRange(_))
        ));
    }
}
