//! Registry of known class names.
//!
//! [`ClassRegistry::create`] only instantiates class names that were
//! registered, and only as the proxy type of their family. Both checks run
//! before any call into the VM. Arbitrary classes can still be created with
//! [`JavaObject::new_instance`].

use crate::classes::object::JavaWrapper;
use crate::classes::options::CommandLine;
use crate::error::{Result, WekaError};
use crate::jvm::Runtime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The capability family of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    Classifier,
    Clusterer,
    Filter,
    DistanceFunction,
    Stemmer,
    Tokenizer,
    Stopwords,
    Loader,
    Saver,
    AttributeEvaluator,
    AttributeSearch,
    Associator,
    DataGenerator,
    /// No particular family; a proxy of this family accepts any registered class.
    Other,
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Classifier => "classifier",
            Self::Clusterer => "clusterer",
            Self::Filter => "filter",
            Self::DistanceFunction => "distance function",
            Self::Stemmer => "stemmer",
            Self::Tokenizer => "tokenizer",
            Self::Stopwords => "stopwords",
            Self::Loader => "loader",
            Self::Saver => "saver",
            Self::AttributeEvaluator => "attribute evaluator",
            Self::AttributeSearch => "attribute search",
            Self::Associator => "associator",
            Self::DataGenerator => "data generator",
            Self::Other => "object",
        };
        f.write_str(name)
    }
}

const DEFAULT_CLASSES: &[(&str, Family)] = &[
    ("weka.classifiers.bayes.NaiveBayes", Family::Classifier),
    ("weka.classifiers.functions.LinearRegression", Family::Classifier),
    ("weka.classifiers.functions.Logistic", Family::Classifier),
    ("weka.classifiers.functions.MultilayerPerceptron", Family::Classifier),
    ("weka.classifiers.functions.SMO", Family::Classifier),
    ("weka.classifiers.lazy.IBk", Family::Classifier),
    ("weka.classifiers.meta.AdaBoostM1", Family::Classifier),
    ("weka.classifiers.meta.Bagging", Family::Classifier),
    ("weka.classifiers.meta.FilteredClassifier", Family::Classifier),
    ("weka.classifiers.rules.JRip", Family::Classifier),
    ("weka.classifiers.rules.OneR", Family::Classifier),
    ("weka.classifiers.rules.ZeroR", Family::Classifier),
    ("weka.classifiers.trees.J48", Family::Classifier),
    ("weka.classifiers.trees.REPTree", Family::Classifier),
    ("weka.classifiers.trees.RandomForest", Family::Classifier),
    ("weka.clusterers.Cobweb", Family::Clusterer),
    ("weka.clusterers.EM", Family::Clusterer),
    ("weka.clusterers.FarthestFirst", Family::Clusterer),
    ("weka.clusterers.HierarchicalClusterer", Family::Clusterer),
    ("weka.clusterers.SimpleKMeans", Family::Clusterer),
    ("weka.filters.AllFilter", Family::Filter),
    ("weka.filters.MultiFilter", Family::Filter),
    ("weka.filters.supervised.attribute.Discretize", Family::Filter),
    ("weka.filters.unsupervised.attribute.Discretize", Family::Filter),
    ("weka.filters.unsupervised.attribute.NominalToBinary", Family::Filter),
    ("weka.filters.unsupervised.attribute.Normalize", Family::Filter),
    ("weka.filters.unsupervised.attribute.Remove", Family::Filter),
    ("weka.filters.unsupervised.attribute.ReplaceMissingValues", Family::Filter),
    ("weka.filters.unsupervised.attribute.Standardize", Family::Filter),
    ("weka.filters.unsupervised.attribute.StringToWordVector", Family::Filter),
    ("weka.filters.unsupervised.instance.RemovePercentage", Family::Filter),
    ("weka.filters.unsupervised.instance.Resample", Family::Filter),
    ("weka.core.ChebyshevDistance", Family::DistanceFunction),
    ("weka.core.EuclideanDistance", Family::DistanceFunction),
    ("weka.core.ManhattanDistance", Family::DistanceFunction),
    ("weka.core.MinkowskiDistance", Family::DistanceFunction),
    ("weka.core.stemmers.IteratedLovinsStemmer", Family::Stemmer),
    ("weka.core.stemmers.LovinsStemmer", Family::Stemmer),
    ("weka.core.stemmers.NullStemmer", Family::Stemmer),
    ("weka.core.stemmers.SnowballStemmer", Family::Stemmer),
    ("weka.core.tokenizers.AlphabeticTokenizer", Family::Tokenizer),
    ("weka.core.tokenizers.CharacterNGramTokenizer", Family::Tokenizer),
    ("weka.core.tokenizers.NGramTokenizer", Family::Tokenizer),
    ("weka.core.tokenizers.WordTokenizer", Family::Tokenizer),
    ("weka.core.stopwords.MultiStopwords", Family::Stopwords),
    ("weka.core.stopwords.Null", Family::Stopwords),
    ("weka.core.stopwords.Rainbow", Family::Stopwords),
    ("weka.core.stopwords.RegExpFromFile", Family::Stopwords),
    ("weka.core.stopwords.WordsFromFile", Family::Stopwords),
    ("weka.core.converters.ArffLoader", Family::Loader),
    ("weka.core.converters.CSVLoader", Family::Loader),
    ("weka.core.converters.ArffSaver", Family::Saver),
    ("weka.core.converters.CSVSaver", Family::Saver),
    ("weka.attributeSelection.CfsSubsetEval", Family::AttributeEvaluator),
    ("weka.attributeSelection.CorrelationAttributeEval", Family::AttributeEvaluator),
    ("weka.attributeSelection.GainRatioAttributeEval", Family::AttributeEvaluator),
    ("weka.attributeSelection.InfoGainAttributeEval", Family::AttributeEvaluator),
    ("weka.attributeSelection.PrincipalComponents", Family::AttributeEvaluator),
    ("weka.attributeSelection.BestFirst", Family::AttributeSearch),
    ("weka.attributeSelection.GreedyStepwise", Family::AttributeSearch),
    ("weka.attributeSelection.Ranker", Family::AttributeSearch),
    ("weka.associations.Apriori", Family::Associator),
    ("weka.associations.FPGrowth", Family::Associator),
    ("weka.datagenerators.classifiers.classification.Agrawal", Family::DataGenerator),
    ("weka.datagenerators.classifiers.classification.RDG1", Family::DataGenerator),
    ("weka.datagenerators.classifiers.regression.MexicanHat", Family::DataGenerator),
    ("weka.datagenerators.clusterers.BIRCHCluster", Family::DataGenerator),
];

/// Maps class names (dot notation) to their capability family.
#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    classes: HashMap<String, Family>,
}

impl ClassRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the toolkit's commonly used classes.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for (classname, family) in DEFAULT_CLASSES {
            registry.register(*classname, *family);
        }
        registry
    }

    /// Registers (or re-registers) a class name.
    pub fn register(&mut self, classname: impl Into<String>, family: Family) -> &mut Self {
        self.classes.insert(classname.into(), family);
        self
    }

    /// The family of a registered class.
    pub fn family(&self, classname: &str) -> Option<Family> {
        self.classes.get(classname).copied()
    }

    pub fn contains(&self, classname: &str) -> bool {
        self.classes.contains_key(classname)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Registered class names of one family, sorted.
    pub fn classes_of(&self, family: Family) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .classes
            .iter()
            .filter(|(_, f)| **f == family)
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Checks that `classname` may be created as a `W`.
    pub fn check<W: JavaWrapper>(&self, classname: &str) -> Result<()> {
        let family = self
            .family(classname)
            .ok_or_else(|| WekaError::UnregisteredClass(classname.to_string()))?;
        if W::FAMILY != Family::Other && family != W::FAMILY {
            return Err(WekaError::TypeMismatch {
                expected: W::REQUIRED_TYPE.to_string(),
                actual: format!("{} ({})", classname, family),
            });
        }
        Ok(())
    }

    /// Instantiates a registered class as a `W`.
    ///
    /// # Errors
    ///
    /// - [`WekaError::UnregisteredClass`] for an unknown class name
    /// - [`WekaError::TypeMismatch`] when the class belongs to another family
    pub fn create<W: JavaWrapper>(&self, runtime: &Runtime, classname: &str) -> Result<W> {
        self.check::<W>(classname)?;
        W::new(runtime, classname)
    }

    /// Parses a command-line string and instantiates its registered class with the options.
    pub fn create_from_commandline<W: JavaWrapper>(
        &self,
        runtime: &Runtime,
        cmdline: &str,
    ) -> Result<W> {
        let cmdline: CommandLine = cmdline.parse()?;
        self.check::<W>(&cmdline.classname)?;
        W::with_options(runtime, &cmdline.classname, &cmdline.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classes::JavaObject;
    use crate::{Classifier, Filter};

    #[test]
    fn test_defaults() {
        let registry = ClassRegistry::with_defaults();
        assert_eq!(
            registry.family("weka.classifiers.trees.J48"),
            Some(Family::Classifier)
        );
        assert_eq!(
            registry.family("weka.core.EuclideanDistance"),
            Some(Family::DistanceFunction)
        );
        assert!(!registry.contains("java.lang.Runtime"));
        assert!(
            registry
                .classes_of(Family::Stemmer)
                .contains(&"weka.core.stemmers.LovinsStemmer")
        );
    }

    #[test]
    fn test_attribute_selection_families() {
        use crate::{ASEvaluation, ASSearch, Associator, DataGenerator};

        let registry = ClassRegistry::with_defaults();
        assert!(registry.check::<ASEvaluation>("weka.attributeSelection.CfsSubsetEval").is_ok());
        assert!(registry.check::<ASSearch>("weka.attributeSelection.Ranker").is_ok());
        assert!(registry.check::<Associator>("weka.associations.Apriori").is_ok());
        assert!(
            registry
                .check::<DataGenerator>("weka.datagenerators.classifiers.classification.Agrawal")
                .is_ok()
        );

        match registry.check::<ASSearch>("weka.attributeSelection.InfoGainAttributeEval") {
            Err(WekaError::TypeMismatch { expected, actual }) => {
                assert_eq!(expected, "weka.attributeSelection.ASSearch");
                assert_eq!(
                    actual,
                    "weka.attributeSelection.InfoGainAttributeEval (attribute evaluator)"
                );
            }
            other => panic!("expected type mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_unregistered_class() {
        let registry = ClassRegistry::with_defaults();
        let result = registry.check::<Classifier>("com.example.Unknown");
        assert!(matches!(result, Err(WekaError::UnregisteredClass(name)) if name == "com.example.Unknown"));
    }

    #[test]
    fn test_family_mismatch() {
        let registry = ClassRegistry::with_defaults();
        let result = registry.check::<Filter>("weka.classifiers.trees.J48");
        match result {
            Err(WekaError::TypeMismatch { expected, actual }) => {
                assert_eq!(expected, "weka.filters.Filter");
                assert_eq!(actual, "weka.classifiers.trees.J48 (classifier)");
            }
            other => panic!("expected type mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_other_family_accepts_any_registered_class() {
        let registry = ClassRegistry::with_defaults();
        assert!(registry.check::<JavaObject>("weka.filters.AllFilter").is_ok());
        assert!(registry.check::<JavaObject>("foo.Bar").is_err());
    }

    #[test]
    fn test_register_custom_class() {
        let mut registry = ClassRegistry::new();
        assert!(registry.is_empty());
        registry.register("com.example.MyClassifier", Family::Classifier);
        assert_eq!(registry.len(), 1);
        assert!(registry.check::<Classifier>("com.example.MyClassifier").is_ok());
    }

    #[test]
    fn test_commandline_checked_before_bridge() {
        // a runtime is never needed to reject these
        let registry = ClassRegistry::with_defaults();
        let parsed: CommandLine = "weka.core.stemmers.LovinsStemmer".parse().unwrap();
        assert!(registry.check::<Classifier>(&parsed.classname).is_err());
    }
}
