//! Capabilities (`weka.core.Capabilities`): the kinds of data a scheme handles.
//!
//! ```rust,ignore
//! use weka_bridge::capabilities::{Capabilities, Capability};
//!
//! let caps = Capabilities::of(&classifier)?;
//! if !caps.handles(Capability::NumericClass)? {
//!     println!("needs a nominal class");
//! }
//! ```

use crate::classes::registry::Family;
use crate::classes::{Guarded, JavaObject, JavaWrapper};
use crate::dataset::Instances;
use crate::error::{Result, WekaError};
use crate::typeconv;
use jni::JNIEnv;
use jni::objects::{JObject, JValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

const CAPABILITIES: &str = "weka.core.Capabilities";
const CAPABILITY_CLASS: &str = "weka/core/Capabilities$Capability";
const CAPABILITY_SIG: &str = "(Lweka/core/Capabilities$Capability;)";

/// One constant of `weka.core.Capabilities.Capability`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Capability {
    NominalAttributes,
    BinaryAttributes,
    UnaryAttributes,
    EmptyNominalAttributes,
    NumericAttributes,
    DateAttributes,
    StringAttributes,
    RelationalAttributes,
    MissingValues,
    NoClass,
    NominalClass,
    BinaryClass,
    UnaryClass,
    EmptyNominalClass,
    NumericClass,
    DateClass,
    StringClass,
    RelationalClass,
    MissingClassValues,
    OnlyMultiinstance,
}

impl Capability {
    pub const ALL: [Capability; 20] = [
        Self::NominalAttributes,
        Self::BinaryAttributes,
        Self::UnaryAttributes,
        Self::EmptyNominalAttributes,
        Self::NumericAttributes,
        Self::DateAttributes,
        Self::StringAttributes,
        Self::RelationalAttributes,
        Self::MissingValues,
        Self::NoClass,
        Self::NominalClass,
        Self::BinaryClass,
        Self::UnaryClass,
        Self::EmptyNominalClass,
        Self::NumericClass,
        Self::DateClass,
        Self::StringClass,
        Self::RelationalClass,
        Self::MissingClassValues,
        Self::OnlyMultiinstance,
    ];

    /// The Java constant name, e.g. `NUMERIC_CLASS`.
    pub fn name(self) -> &'static str {
        match self {
            Self::NominalAttributes => "NOMINAL_ATTRIBUTES",
            Self::BinaryAttributes => "BINARY_ATTRIBUTES",
            Self::UnaryAttributes => "UNARY_ATTRIBUTES",
            Self::EmptyNominalAttributes => "EMPTY_NOMINAL_ATTRIBUTES",
            Self::NumericAttributes => "NUMERIC_ATTRIBUTES",
            Self::DateAttributes => "DATE_ATTRIBUTES",
            Self::StringAttributes => "STRING_ATTRIBUTES",
            Self::RelationalAttributes => "RELATIONAL_ATTRIBUTES",
            Self::MissingValues => "MISSING_VALUES",
            Self::NoClass => "NO_CLASS",
            Self::NominalClass => "NOMINAL_CLASS",
            Self::BinaryClass => "BINARY_CLASS",
            Self::UnaryClass => "UNARY_CLASS",
            Self::EmptyNominalClass => "EMPTY_NOMINAL_CLASS",
            Self::NumericClass => "NUMERIC_CLASS",
            Self::DateClass => "DATE_CLASS",
            Self::StringClass => "STRING_CLASS",
            Self::RelationalClass => "RELATIONAL_CLASS",
            Self::MissingClassValues => "MISSING_CLASS_VALUES",
            Self::OnlyMultiinstance => "ONLY_MULTIINSTANCE",
        }
    }

    /// Whether the capability concerns attributes (as opposed to the class).
    pub fn is_attribute(self) -> bool {
        matches!(
            self,
            Self::NominalAttributes
                | Self::BinaryAttributes
                | Self::UnaryAttributes
                | Self::EmptyNominalAttributes
                | Self::NumericAttributes
                | Self::DateAttributes
                | Self::StringAttributes
                | Self::RelationalAttributes
        )
    }

    /// Whether the capability concerns the class attribute.
    pub fn is_class(self) -> bool {
        matches!(
            self,
            Self::NoClass
                | Self::NominalClass
                | Self::BinaryClass
                | Self::UnaryClass
                | Self::EmptyNominalClass
                | Self::NumericClass
                | Self::DateClass
                | Self::StringClass
                | Self::RelationalClass
        )
    }

    fn to_java<'local>(self, env: &mut JNIEnv<'local>) -> Result<JObject<'local>> {
        let name = env.new_string(self.name())?;
        let value = env
            .call_static_method(
                CAPABILITY_CLASS,
                "valueOf",
                "(Ljava/lang/String;)Lweka/core/Capabilities$Capability;",
                &[JValue::from(&name)],
            )?
            .l()?;
        env.delete_local_ref(name)?;
        Ok(value)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses the Java constant name, case-insensitively.
impl FromStr for Capability {
    type Err = WekaError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|capability| capability.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| WekaError::InvalidConfig(format!("Unknown capability: {}", s)))
    }
}

/// Proxy for `weka.core.Capabilities`.
#[derive(Debug, Clone)]
pub struct Capabilities {
    object: JavaObject,
}

impl JavaWrapper for Capabilities {
    const REQUIRED_TYPE: &'static str = CAPABILITIES;
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

impl Capabilities {
    /// The capabilities of a scheme (`weka.core.CapabilitiesHandler`).
    pub fn of<W: JavaWrapper>(handler: &W) -> Result<Self> {
        let object = handler.java_object();
        object.enforce_type("weka.core.CapabilitiesHandler")?;
        Self::from_object(object.call_non_null(
            "getCapabilities",
            "()Lweka/core/Capabilities;",
            &[],
        )?)
    }

    /// The minimal capabilities needed to process `data`.
    pub fn for_instances(data: &Instances) -> Result<Self> {
        let source = data.java_object();
        let object = source.with_env(|env, obj| {
            let caps = env
                .call_static_method(
                    "weka/core/Capabilities",
                    "forInstances",
                    "(Lweka/core/Instances;)Lweka/core/Capabilities;",
                    &[JValue::from(obj)],
                )?
                .l()?;
            JavaObject::from_local_non_null(source.runtime(), env, &caps, "forInstances")
        })?;
        Self::from_object(object)
    }

    pub fn handles(&self, capability: Capability) -> Result<bool> {
        self.object.with_env(|env, obj| {
            let value = capability.to_java(env)?;
            Ok(env
                .call_method(obj, "handles", format!("{}Z", CAPABILITY_SIG), &[JValue::from(&value)])?
                .z()?)
        })
    }

    pub fn enable(&self, capability: Capability) -> Result<()> {
        self.toggle("enable", capability)
    }

    pub fn disable(&self, capability: Capability) -> Result<()> {
        self.toggle("disable", capability)
    }

    fn toggle(&self, method: &str, capability: Capability) -> Result<()> {
        self.object.with_env(|env, obj| {
            let value = capability.to_java(env)?;
            env.call_method(obj, method, format!("{}V", CAPABILITY_SIG), &[JValue::from(&value)])?
                .v()?;
            Ok(())
        })
    }

    pub fn enable_all(&self) -> Result<()> {
        self.object.call_void("enableAll", "()V", &[])
    }

    pub fn disable_all(&self) -> Result<()> {
        self.object.call_void("disableAll", "()V", &[])
    }

    /// The enabled capabilities.
    ///
    /// Constants this crate does not know are skipped.
    pub fn capabilities(&self) -> Result<Vec<Capability>> {
        self.object.with_env(|env, obj| {
            let iterator = env
                .call_method(obj, "capabilities", "()Ljava/util/Iterator;", &[])?
                .l()?;
            let mut result = Vec::new();
            while env.call_method(&iterator, "hasNext", "()Z", &[])?.z()? {
                let element = env
                    .call_method(&iterator, "next", "()Ljava/lang/Object;", &[])?
                    .l()?;
                let name = env.call_method(&element, "name", "()Ljava/lang/String;", &[])?.l()?;
                let name = typeconv::to_string(env, &name)?.unwrap_or_default();
                match name.parse() {
                    Ok(capability) => result.push(capability),
                    Err(_) => debug!("Skipping unknown capability {}", name),
                }
                env.delete_local_ref(element)?;
            }
            Ok(result)
        })
    }

    /// Whether these capabilities cover all of `other`.
    pub fn supports(&self, other: &Capabilities) -> Result<bool> {
        self.object.call_bool(
            "supports",
            "(Lweka/core/Capabilities;)Z",
            &[JValue::from(other.object.as_obj())],
        )
    }

    /// Like [`supports`](Self::supports), but dependencies count as support.
    pub fn supports_maybe(&self, other: &Capabilities) -> Result<bool> {
        self.object.call_bool(
            "supportsMaybe",
            "(Lweka/core/Capabilities;)Z",
            &[JValue::from(other.object.as_obj())],
        )
    }

    /// Whether `data` can be processed; see [`test_error`](Self::test_error) for the reason.
    pub fn test(&self, data: &Instances) -> Result<bool> {
        self.object.call_bool(
            "test",
            "(Lweka/core/Instances;)Z",
            &[JValue::from(data.java_object().as_obj())],
        )
    }

    /// The message of the last failed [`test`](Self::test).
    pub fn test_error(&self) -> Result<Option<String>> {
        self.object.with_env(|env, obj| {
            let failure = env
                .call_method(obj, "getFailReason", "()Ljava/lang/Exception;", &[])?
                .l()?;
            if failure.is_null() {
                return Ok(None);
            }
            crate::jvm::bridge::call_string_method(env, &failure, "getMessage")
        })
    }

    pub fn min_instances(&self) -> Result<usize> {
        typeconv::from_jint(self.object.call_int("getMinimumNumberInstances", "()I", &[])?)
    }

    pub fn set_min_instances(&self, count: usize) -> Result<()> {
        self.object.call_void(
            "setMinimumNumberInstances",
            "(I)V",
            &[JValue::Int(typeconv::to_jint(count)?)],
        )
    }

    /// Only the attribute capabilities.
    pub fn attribute_capabilities(&self) -> Result<Self> {
        self.subset("getAttributeCapabilities")
    }

    /// Only the class capabilities.
    pub fn class_capabilities(&self) -> Result<Self> {
        self.subset("getClassCapabilities")
    }

    /// Capabilities that are neither attribute nor class related.
    pub fn other_capabilities(&self) -> Result<Self> {
        self.subset("getOtherCapabilities")
    }

    fn subset(&self, method: &str) -> Result<Self> {
        Self::from_object(
            self.object
                .call_non_null(method, "()Lweka/core/Capabilities;", &[])?,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_capability() {
        assert_eq!("NUMERIC_CLASS".parse::<Capability>().unwrap(), Capability::NumericClass);
        assert_eq!(
            " missing_values ".parse::<Capability>().unwrap(),
            Capability::MissingValues
        );
        assert!("NUMERIC".parse::<Capability>().is_err());
    }

    #[test]
    fn test_names_are_unique_and_round_trip() {
        for capability in Capability::ALL {
            assert_eq!(capability.to_string().parse::<Capability>().unwrap(), capability);
        }
        let mut names: Vec<&str> = Capability::ALL.iter().map(|c| c.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Capability::ALL.len());
    }

    #[test]
    fn test_attribute_and_class_groups() {
        assert!(Capability::DateAttributes.is_attribute());
        assert!(!Capability::DateAttributes.is_class());
        assert!(Capability::NoClass.is_class());
        assert!(!Capability::MissingValues.is_attribute());
        assert!(!Capability::MissingValues.is_class());
    }

    #[test]
    fn test_serde_uses_java_names() {
        let json = serde_json::to_string(&Capability::BinaryClass).unwrap();
        assert_eq!(json, "\"BINARY_CLASS\"");
    }
}
