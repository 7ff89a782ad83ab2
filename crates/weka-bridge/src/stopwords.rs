//! Stopword handlers (`weka.core.stopwords.StopwordsHandler`).

use crate::classes::registry::Family;
use crate::classes::{CachedMethod, Guarded, JavaObject, JavaWrapper, OptionHandler};
use crate::error::Result;
use jni::objects::JValue;

const STOPWORDS_HANDLER: &str = "weka.core.stopwords.StopwordsHandler";

#[derive(Debug, Clone)]
pub struct Stopwords {
    handler: OptionHandler,
    is_stopword: CachedMethod,
}

impl JavaWrapper for Stopwords {
    const REQUIRED_TYPE: &'static str = STOPWORDS_HANDLER;
    const FAMILY: Family = Family::Stopwords;

    fn wrap(object: Guarded<Self>) -> Result<Self> {
        let handler = OptionHandler::of(object.into_inner())?;
        let is_stopword = handler.java_object().with_env(|env, _| {
            CachedMethod::resolve(env, STOPWORDS_HANDLER, "isStopword", "(Ljava/lang/String;)Z")
        })?;
        Ok(Self {
            handler,
            is_stopword,
        })
    }

    fn java_object(&self) -> &JavaObject {
        self.handler.java_object()
    }
}

impl Stopwords {
    pub fn option_handler(&self) -> &OptionHandler {
        &self.handler
    }

    pub fn is_stopword(&self, word: &str) -> Result<bool> {
        self.java_object().with_env(|env, obj| {
            let jword = env.new_string(word)?;
            Ok(self.is_stopword.call(env, obj, &[JValue::from(&jword)])?.z()?)
        })
    }
}
