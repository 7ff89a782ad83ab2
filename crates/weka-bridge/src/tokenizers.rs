//! Tokenizers (`weka.core.tokenizers.Tokenizer`).

use crate::classes::registry::Family;
use crate::classes::{Guarded, JavaObject, JavaWrapper, OptionHandler};
use crate::error::Result;
use crate::typeconv;
use jni::objects::JValue;

#[derive(Debug, Clone)]
pub struct Tokenizer {
    handler: OptionHandler,
}

impl JavaWrapper for Tokenizer {
    const REQUIRED_TYPE: &'static str = "weka.core.tokenizers.Tokenizer";
    const FAMILY: Family = Family::Tokenizer;

    fn wrap(object: Guarded<Self>) -> Result<Self> {
        Ok(Self {
            handler: OptionHandler::of(object.into_inner())?,
        })
    }

    fn java_object(&self) -> &JavaObject {
        self.handler.java_object()
    }
}

impl Tokenizer {
    pub fn option_handler(&self) -> &OptionHandler {
        &self.handler
    }

    /// Splits `text` into tokens.
    ///
    /// The tokenizer is stateful; concurrent calls on clones of the same
    /// proxy interleave their tokens.
    pub fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        self.java_object().with_env(|env, obj| {
            let jtext = env.new_string(text)?;
            env.call_method(obj, "tokenize", "(Ljava/lang/String;)V", &[JValue::from(&jtext)])?
                .v()?;
            let mut tokens = Vec::new();
            while env.call_method(obj, "hasMoreElements", "()Z", &[])?.z()? {
                let token = env
                    .call_method(obj, "nextElement", "()Ljava/lang/Object;", &[])?
                    .l()?;
                tokens.push(typeconv::to_string(env, &token)?.unwrap_or_default());
                env.delete_local_ref(token)?;
            }
            Ok(tokens)
        })
    }
}
