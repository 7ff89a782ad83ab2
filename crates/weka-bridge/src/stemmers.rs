//! Stemmers (`weka.core.stemmers.Stemmer`).

use crate::classes::registry::Family;
use crate::classes::{CachedMethod, Guarded, JavaObject, JavaWrapper, OptionHandler};
use crate::error::Result;
use crate::jvm::bridge;
use jni::objects::JValue;

const STEMMER: &str = "weka.core.stemmers.Stemmer";

#[derive(Debug, Clone)]
pub struct Stemmer {
    handler: OptionHandler,
    stem: CachedMethod,
}

impl JavaWrapper for Stemmer {
    const REQUIRED_TYPE: &'static str = STEMMER;
    const FAMILY: Family = Family::Stemmer;

    fn wrap(object: Guarded<Self>) -> Result<Self> {
        let handler = OptionHandler::of(object.into_inner())?;
        let stem = handler.java_object().with_env(|env, _| {
            CachedMethod::resolve(env, STEMMER, "stem", "(Ljava/lang/String;)Ljava/lang/String;")
        })?;
        Ok(Self { handler, stem })
    }

    fn java_object(&self) -> &JavaObject {
        self.handler.java_object()
    }
}

impl Stemmer {
    pub fn option_handler(&self) -> &OptionHandler {
        &self.handler
    }

    /// Stems a single word.
    pub fn stem(&self, word: &str) -> Result<String> {
        self.java_object().with_env(|env, obj| {
            let jword = env.new_string(word)?;
            let stemmed = self.stem.call(env, obj, &[JValue::from(&jword)])?.l()?;
            Ok(bridge::jstring_to_string(env, stemmed)?.unwrap_or_default())
        })
    }
}
