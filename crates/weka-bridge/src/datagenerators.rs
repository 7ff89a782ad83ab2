//! Artificial data (`weka.datagenerators.DataGenerator`).
//!
//! ```rust,ignore
//! let generator: DataGenerator = weka_bridge::from_commandline(
//!     &runtime,
//!     "weka.datagenerators.classifiers.classification.Agrawal -n 20",
//! )?;
//! let data = generator.generate()?;
//! assert_eq!(data.num_instances()?, 20);
//! ```

use crate::classes::registry::Family;
use crate::classes::{Guarded, JavaObject, JavaWrapper, OptionHandler};
use crate::dataset::{Instance, Instances};
use crate::error::Result;
use crate::typeconv;
use jni::objects::JValue;
use tracing::debug;

const DATA_GENERATOR: &str = "weka.datagenerators.DataGenerator";

/// Proxy for `weka.datagenerators.DataGenerator`.
#[derive(Debug, Clone)]
pub struct DataGenerator {
    handler: OptionHandler,
}

impl JavaWrapper for DataGenerator {
    const REQUIRED_TYPE: &'static str = DATA_GENERATOR;
    const FAMILY: Family = Family::DataGenerator;

    fn wrap(object: Guarded<Self>) -> Result<Self> {
        Ok(Self {
            handler: OptionHandler::of(object.into_inner())?,
        })
    }

    fn java_object(&self) -> &JavaObject {
        self.handler.java_object()
    }
}

impl DataGenerator {
    pub fn option_handler(&self) -> &OptionHandler {
        &self.handler
    }

    /// Initializes the generator and returns the format of the data it produces.
    pub fn define_data_format(&self) -> Result<Instances> {
        Instances::from_object(self.java_object().call_non_null(
            "defineDataFormat",
            "()Lweka/core/Instances;",
            &[],
        )?)
    }

    /// Whether rows are produced one at a time ([`generate_example`](Self::generate_example))
    /// rather than all at once ([`generate_examples`](Self::generate_examples)).
    pub fn single_mode(&self) -> Result<bool> {
        self.java_object().call_bool("getSingleModeFlag", "()Z", &[])
    }

    pub fn dataset_format(&self) -> Result<Option<Instances>> {
        self.java_object()
            .call_object("getDatasetFormat", "()Lweka/core/Instances;", &[])?
            .map(Instances::from_object)
            .transpose()
    }

    pub fn set_dataset_format(&self, format: &Instances) -> Result<()> {
        self.java_object().call_void(
            "setDatasetFormat",
            "(Lweka/core/Instances;)V",
            &[JValue::from(format.java_object().as_obj())],
        )
    }

    /// Comment text for the start of the output, if any.
    pub fn generate_start(&self) -> Result<Option<String>> {
        self.java_object().call_string("generateStart")
    }

    /// Comment text for the end of the output, if any.
    pub fn generate_finish(&self) -> Result<Option<String>> {
        self.java_object().call_string("generateFinish")
    }

    /// The number of rows the generator will produce.
    pub fn num_examples_act(&self) -> Result<usize> {
        typeconv::from_jint(self.java_object().call_int("getNumExamplesAct", "()I", &[])?)
    }

    /// One row; single mode only.
    pub fn generate_example(&self) -> Result<Instance> {
        Instance::from_object(self.java_object().call_non_null(
            "generateExample",
            "()Lweka/core/Instance;",
            &[],
        )?)
    }

    /// All rows at once; batch mode only.
    pub fn generate_examples(&self) -> Result<Instances> {
        Instances::from_object(self.java_object().call_non_null(
            "generateExamples",
            "()Lweka/core/Instances;",
            &[],
        )?)
    }

    /// Defines the format and produces the complete dataset in either mode.
    pub fn generate(&self) -> Result<Instances> {
        let format = self.define_data_format()?;
        if !self.single_mode()? {
            return self.generate_examples();
        }
        let count = self.num_examples_act()?;
        debug!("Generating {} rows one at a time", count);
        let data = Instances::template_instances(&format, count)?;
        for _ in 0..count {
            let row = self.generate_example()?;
            data.add_instance(&row)?;
        }
        Ok(data)
    }

    /// Runs `DataGenerator.makeData` with command-line `options`, which
    /// writes ARFF to the `-o` file or to standard output.
    pub fn make_data<S: AsRef<str>>(&self, options: &[S]) -> Result<()> {
        self.java_object().with_env(|env, obj| {
            let array = typeconv::string_list_to_jarray(env, options)?;
            env.call_static_method(
                "weka/datagenerators/DataGenerator",
                "makeData",
                "(Lweka/datagenerators/DataGenerator;[Ljava/lang/String;)V",
                &[JValue::from(obj), JValue::from(&array)],
            )?
            .v()?;
            Ok(())
        })
    }
}
