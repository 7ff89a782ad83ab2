//! Integration tests against a real JVM.
//!
//! These tests need a JDK (`JAVA_HOME`) and a Weka jar. They are ignored by
//! default; run them with:
//!
//! ```text
//! WEKA_JAR=/path/to/weka.jar cargo test -p weka-bridge --test jvm_tests -- --ignored
//! ```
//!
//! A process can host only one JVM, so all tests share the runtime and none
//! of them stops it.

use pretty_assertions::assert_eq;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use weka_bridge::classes::options;
use weka_bridge::{
    ASEvaluation, ASSearch, Associator, AttributeSelection, AttributeType, Capabilities, Capability, ClassIndex,
    ClassRegistry, Classifier, ContainerKind, DataGenerator, Family, Filter, Instances, JavaObject,
    JavaWrapper, JvmConfig, OptionHandler, Runtime, Stemmer, Stopwords, Tokenizer, WekaError,
    converters, serialization, typeconv, utils,
};

// ============================================================================
// Helper Functions
// ============================================================================

fn weka_jar() -> PathBuf {
    PathBuf::from(std::env::var("WEKA_JAR").expect("WEKA_JAR must point at weka.jar"))
}

fn config() -> JvmConfig {
    JvmConfig::builder()
        .class_path(weka_jar())
        .bundled(false)
        .build()
        .expect("valid config")
}

fn runtime() -> Runtime {
    weka_bridge::start(&config()).expect("Failed to start JVM")
}

fn java_string(runtime: &Runtime, value: &str) -> JavaObject {
    runtime
        .with_env(|env| {
            let s = env.new_string(value)?;
            Ok(JavaObject::from_global(runtime, env.new_global_ref(&s)?))
        })
        .unwrap()
}

fn java_integer(runtime: &Runtime, value: i32) -> JavaObject {
    runtime
        .with_env(|env| {
            let i = env.new_object("java/lang/Integer", "(I)V", &[value.into()])?;
            Ok(JavaObject::from_global(runtime, env.new_global_ref(&i)?))
        })
        .unwrap()
}

fn java_list(runtime: &Runtime, values: &[&str]) -> JavaObject {
    runtime
        .with_env(|env| {
            let list = typeconv::string_list_to_jlist(env, values)?;
            Ok(JavaObject::from_global(runtime, env.new_global_ref(&list)?))
        })
        .unwrap()
}

const WEATHER_ARFF: &str = "\
@relation weather.symbolic

@attribute outlook {sunny, overcast, rainy}
@attribute temperature {hot, mild, cool}
@attribute humidity {high, normal}
@attribute windy {TRUE, FALSE}
@attribute play {yes, no}

@data
sunny,hot,high,FALSE,no
sunny,hot,high,TRUE,no
overcast,hot,high,FALSE,yes
rainy,mild,high,FALSE,yes
rainy,cool,normal,FALSE,yes
rainy,cool,normal,TRUE,no
overcast,cool,normal,TRUE,yes
sunny,mild,high,FALSE,no
sunny,cool,normal,FALSE,yes
rainy,mild,normal,FALSE,yes
sunny,mild,normal,TRUE,yes
overcast,mild,high,TRUE,yes
overcast,hot,normal,FALSE,yes
rainy,mild,high,TRUE,no
";

/// Writes the nominal weather data to `dir` and loads it with the class last.
fn weather(runtime: &Runtime, dir: &Path) -> Instances {
    let path = dir.join("weather.nominal.arff");
    std::fs::write(&path, WEATHER_ARFF).expect("Failed to write ARFF");
    converters::load_any_file(runtime, &path, Some(ClassIndex::Last))
        .unwrap()
        .expect("ARFF loader")
}

fn assert_type_mismatch<T: Debug>(result: weka_bridge::Result<T>, expected: &str, actual: &str) {
    match result {
        Err(WekaError::TypeMismatch {
            expected: found_expected,
            actual: found_actual,
        }) => {
            assert_eq!(found_expected, expected);
            assert_eq!(found_actual, actual);
        }
        other => panic!("expected TypeMismatch for {expected}, got {other:?}"),
    }
}

// ============================================================================
// Runtime
// ============================================================================

#[test]
#[ignore = "requires a JVM and WEKA_JAR"]
fn test_start_is_idempotent() {
    let first = runtime();
    let second = runtime();

    assert!(weka_bridge::is_running());
    assert_eq!(first.classpath().entries(), second.classpath().entries());
    assert_eq!(first.classpath().position(weka_jar()), Some(0));
}

#[test]
#[ignore = "requires a JVM and WEKA_JAR"]
fn test_second_start_ignores_new_config() {
    let first = runtime();
    let extra = std::env::temp_dir().join("weka-bridge-never-added.jar");
    let config = JvmConfig::builder()
        .class_path(weka_jar())
        .class_path(&extra)
        .bundled(false)
        .build()
        .unwrap();

    let second = weka_bridge::start(&config).unwrap();

    assert_eq!(second.classpath().entries(), first.classpath().entries());
    assert_eq!(second.classpath().position(&extra), None);
}

#[test]
#[ignore = "requires a JVM and WEKA_JAR"]
fn test_version() {
    let runtime = runtime();
    let version = utils::version(&runtime).unwrap();
    assert!(version.starts_with('3'), "unexpected version {version}");
}

#[test]
#[ignore = "requires a JVM and WEKA_JAR"]
fn test_java_exception_is_captured() {
    let runtime = runtime();
    let err = JavaObject::new_instance(&runtime, "weka.does.not.Exist").unwrap_err();
    match err {
        WekaError::Java { class, .. } => assert!(class.ends_with("Exception") || class.ends_with("Error")),
        other => panic!("expected a Java exception, got {other:?}"),
    }

    // the runtime stays usable
    assert!(JavaObject::new_instance(&runtime, "java.util.ArrayList").is_ok());
}

// ============================================================================
// Command lines and options
// ============================================================================

#[test]
#[ignore = "requires a JVM and WEKA_JAR"]
fn test_commandline_round_trip_through_object() {
    let runtime = runtime();
    let classifier: Classifier =
        weka_bridge::from_commandline(&runtime, "weka.classifiers.trees.J48 -C 0.3 -M 3").unwrap();

    let options = classifier.option_handler().options().unwrap();
    let c = options.iter().position(|o| o == "-C").expect("-C present");
    assert_eq!(options[c + 1], "0.3");

    let cmdline = weka_bridge::to_commandline(&classifier).unwrap();
    assert!(cmdline.starts_with("weka.classifiers.trees.J48 "));

    let again: Classifier = weka_bridge::from_commandline(&runtime, &cmdline).unwrap();
    assert_eq!(weka_bridge::to_commandline(&again).unwrap(), cmdline);
}

#[test]
#[ignore = "requires a JVM and WEKA_JAR"]
fn test_join_matches_java() {
    let runtime = runtime();
    let tokens = ["-W", "weka.classifiers.trees.J48 -C 0.25", "-x", "a\"b", "tab\there"];
    let java = runtime
        .with_env(|env| {
            let array = typeconv::string_list_to_jarray(env, &tokens)?;
            let joined = env
                .call_static_method(
                    "weka/core/Utils",
                    "joinOptions",
                    "([Ljava/lang/String;)Ljava/lang/String;",
                    &[(&array).into()],
                )?
                .l()?;
            typeconv::to_string(env, &joined)
        })
        .unwrap()
        .unwrap();

    assert_eq!(options::join_options(&tokens), java);
    assert_eq!(options::split_options(&java).unwrap(), tokens);
}

#[test]
#[ignore = "requires a JVM and WEKA_JAR"]
fn test_option_help() {
    let runtime = runtime();
    let handler = OptionHandler::new(&runtime, "weka.classifiers.trees.J48").unwrap();
    assert!(handler.is_option_handler());
    assert!(handler.global_info().unwrap().is_some());
    assert!(handler.list_options().unwrap().iter().any(|o| o.name == "C"));
    assert!(handler.to_help().unwrap().starts_with("weka.classifiers.trees.J48\n"));
}

#[test]
#[ignore = "requires a JVM and WEKA_JAR"]
fn test_global_info_missing_is_none() {
    let runtime = runtime();
    let list = JavaObject::new_instance(&runtime, "java.util.ArrayList").unwrap();
    let handler = OptionHandler::of(list).unwrap();

    assert!(!handler.is_option_handler());
    assert_eq!(handler.global_info().unwrap(), None);
    assert!(handler.to_help().unwrap().starts_with("java.util.ArrayList\n"));

    // the failed lookup leaves no pending exception behind
    assert!(JavaObject::new_instance(&runtime, "java.util.ArrayList").is_ok());
}

// ============================================================================
// Type guard and registry
// ============================================================================

#[test]
#[ignore = "requires a JVM and WEKA_JAR"]
fn test_type_guard_rejects_mismatch() {
    let runtime = runtime();
    let object = JavaObject::new_instance(&runtime, "weka.classifiers.trees.J48").unwrap();

    let err = Filter::from_object(object.clone()).unwrap_err();
    match err {
        WekaError::TypeMismatch { expected, actual } => {
            assert_eq!(expected, "weka.filters.Filter");
            assert_eq!(actual, "weka.classifiers.trees.J48");
        }
        other => panic!("expected TypeMismatch, got {other:?}"),
    }

    assert!(Classifier::from_object(object).is_ok());
}

#[test]
#[ignore = "requires a JVM and WEKA_JAR"]
fn test_type_guard_on_every_entry_point() {
    const LIST: &str = "java.util.ArrayList";
    let runtime = runtime();
    let list = JavaObject::new_instance(&runtime, LIST).unwrap();

    assert_type_mismatch(Stopwords::from_object(list.clone()), "weka.core.stopwords.StopwordsHandler", LIST);
    assert_type_mismatch(Stemmer::new(&runtime, LIST), "weka.core.stemmers.Stemmer", LIST);
    assert_type_mismatch(
        Tokenizer::with_options(&runtime, LIST, &["-x".to_string()]),
        "weka.core.tokenizers.Tokenizer",
        LIST,
    );
    assert_type_mismatch(
        weka_bridge::from_commandline::<Instances>(&runtime, LIST),
        "weka.core.Instances",
        LIST,
    );
    assert_type_mismatch(ASSearch::from_object(list.clone()), "weka.attributeSelection.ASSearch", LIST);
    assert_type_mismatch(
        DataGenerator::from_object(list.clone()),
        "weka.datagenerators.DataGenerator",
        LIST,
    );

    // a registry entry with the wrong family still hits the guard
    let mut registry = ClassRegistry::new();
    registry.register(LIST, Family::Stopwords);
    assert_type_mismatch(
        registry.create::<Stopwords>(&runtime, LIST),
        "weka.core.stopwords.StopwordsHandler",
        LIST,
    );

    // objects read back from a stream are checked as well
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("list.ser");
    serialization::write_all(&runtime, &path, &[&list]).unwrap();
    let read = serialization::read(&runtime, &path).unwrap().expect("object");
    assert_type_mismatch(Stopwords::from_object(read), "weka.core.stopwords.StopwordsHandler", LIST);
}

#[test]
#[ignore = "requires a JVM and WEKA_JAR"]
fn test_registry_create() {
    let runtime = runtime();
    let registry = ClassRegistry::with_defaults();
    let classifier: Classifier = registry
        .create_from_commandline(&runtime, "weka.classifiers.functions.SMO -C 2.0")
        .unwrap();
    assert_eq!(
        classifier.java_object().classname().unwrap(),
        "weka.classifiers.functions.SMO"
    );
}

// ============================================================================
// Conversions
// ============================================================================

#[test]
#[ignore = "requires a JVM and WEKA_JAR"]
fn test_double_array_fidelity() {
    let runtime = runtime();
    let values = vec![0.1, -2.5, 1e-300, f64::MAX, 3.0];
    let back = runtime
        .with_env(|env| {
            let array = typeconv::doubles_to_jarray(env, &values)?;
            typeconv::jdouble_array_to_vec(env, &array)
        })
        .unwrap();
    assert_eq!(back, values);
}

#[test]
#[ignore = "requires a JVM and WEKA_JAR"]
fn test_string_list_conversion() {
    let runtime = runtime();
    let values = ["a", "b c", ""];
    let back = runtime
        .with_env(|env| {
            let list = typeconv::string_list_to_jlist(env, &values)?;
            typeconv::jstring_list_to_string_list(env, &list)
        })
        .unwrap();
    assert_eq!(back, Some(vec!["a".to_string(), "b c".to_string(), String::new()]));
}

#[test]
#[ignore = "requires a JVM and WEKA_JAR"]
fn test_numeric_utils() {
    let runtime = runtime();

    let err = utils::correlation(&runtime, &[1.0, 2.0, 3.0], &[1.0, 2.0]).unwrap_err();
    assert!(matches!(err, WekaError::LengthMismatch { left: 3, right: 2 }));

    let r = utils::correlation(&runtime, &[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap();
    assert!((r - 1.0).abs() < 1e-12);

    let normalized = utils::normalize(&runtime, &[1.0, 3.0], None).unwrap();
    assert_eq!(normalized, vec![0.25, 0.75]);
}

// ============================================================================
// Serialization
// ============================================================================

#[test]
#[ignore = "requires a JVM and WEKA_JAR"]
fn test_bytes_round_trip() {
    let runtime = runtime();
    let objects = [
        java_string(&runtime, "hello"),
        java_integer(&runtime, 42),
        java_list(&runtime, &["x", "y"]),
    ];
    let refs: Vec<&JavaObject> = objects.iter().collect();

    let bytes = serialization::to_bytes(&runtime, &refs).unwrap();
    let back = serialization::from_bytes(&runtime, &bytes).unwrap();

    assert_eq!(back.len(), 3);
    for (original, copy) in objects.iter().zip(&back) {
        let copy = copy.as_ref().expect("non-null object");
        assert!(original.java_equals(copy).unwrap());
    }
    assert_eq!(back[1].as_ref().unwrap().to_string().unwrap(), "42");
}

#[test]
#[ignore = "requires a JVM and WEKA_JAR"]
fn test_file_round_trip_and_deepcopy() {
    let runtime = runtime();
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("j48.model");

    let classifier: Classifier =
        weka_bridge::from_commandline(&runtime, "weka.classifiers.trees.J48 -C 0.3").unwrap();
    serialization::write(&path, &classifier).unwrap();

    let read = serialization::read(&runtime, &path).unwrap().expect("object");
    let read = Classifier::from_object(read).unwrap();
    assert_eq!(
        weka_bridge::to_commandline(&read).unwrap(),
        weka_bridge::to_commandline(&classifier).unwrap()
    );

    let copy = serialization::deepcopy(&classifier).expect("copy");
    assert!(!copy.java_object().global().as_obj().is_null());
    assert_eq!(
        weka_bridge::to_commandline(&copy).unwrap(),
        weka_bridge::to_commandline(&classifier).unwrap()
    );
}

#[test]
#[ignore = "requires a JVM and WEKA_JAR"]
fn test_write_all_read_all_file() {
    let runtime = runtime();
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("objects.ser");
    let objects = [java_string(&runtime, "first"), java_integer(&runtime, 7)];

    serialization::write_all(&runtime, &path, &[&objects[0], &objects[1]]).unwrap();
    let back = serialization::read_all(&runtime, &path).unwrap();

    assert_eq!(back.len(), 2);
    assert_eq!(back[0].as_ref().unwrap().to_string().unwrap(), "first");
    assert_eq!(back[1].as_ref().unwrap().to_string().unwrap(), "7");

    // `read` returns the first object only
    let first = serialization::read(&runtime, &path).unwrap().expect("object");
    assert!(first.java_equals(&objects[0]).unwrap());
}

#[test]
#[ignore = "requires a JVM and WEKA_JAR"]
fn test_deepcopy_of_unserializable_object() {
    let runtime = runtime();
    let thread = JavaObject::new_instance(&runtime, "java.lang.Thread").unwrap();
    assert!(!thread.is_serializable().unwrap());

    assert!(serialization::deepcopy(&thread).is_none());
    assert!(serialization::try_deepcopy(&thread).is_err());

    // the runtime stays usable after the swallowed failure
    assert!(serialization::deepcopy(&java_string(&runtime, "copy me")).is_some());
}

#[test]
#[ignore = "requires a JVM and WEKA_JAR"]
fn test_model_with_header_round_trip() {
    let runtime = runtime();
    let dir = tempfile::TempDir::new().unwrap();
    let data = weather(&runtime, dir.path());
    let path = dir.path().join("j48.model");

    let classifier = Classifier::new(&runtime, "weka.classifiers.trees.J48").unwrap();
    classifier.build_classifier(&data).unwrap();
    classifier.serialize(&path, Some(&data)).unwrap();

    let (model, header) = Classifier::deserialize(&runtime, &path).unwrap();
    let header = header.expect("header stored with the model");
    assert!(header.equal_headers(&data).unwrap());
    assert_eq!(header.num_instances().unwrap(), 0);
    assert_eq!(header.class_index().unwrap(), Some(4));

    for i in 0..data.num_instances().unwrap() {
        let row = data.instance(i).unwrap();
        assert_eq!(
            model.classify_instance(&row).unwrap(),
            classifier.classify_instance(&row).unwrap()
        );
    }

    // without a header only the model is written
    classifier.serialize(&path, None).unwrap();
    let (_, header) = Classifier::deserialize(&runtime, &path).unwrap();
    assert!(header.is_none());
}

// ============================================================================
// Attribute selection, associations, data generators
// ============================================================================

#[test]
#[ignore = "requires a JVM and WEKA_JAR"]
fn test_attribute_subset_selection() {
    let runtime = runtime();
    let dir = tempfile::TempDir::new().unwrap();
    let data = weather(&runtime, dir.path());

    let registry = ClassRegistry::with_defaults();
    let evaluator: ASEvaluation = registry
        .create(&runtime, "weka.attributeSelection.CfsSubsetEval")
        .unwrap();
    let search: ASSearch = registry
        .create_from_commandline(&runtime, "weka.attributeSelection.BestFirst -D 1 -N 5")
        .unwrap();

    let selection = AttributeSelection::new(&runtime).unwrap();
    selection.set_evaluator(&evaluator).unwrap();
    selection.set_search(&search).unwrap();
    selection.select_attributes(&data).unwrap();

    let selected = selection.selected_attributes().unwrap();
    assert_eq!(selected.last(), Some(&4), "class attribute comes last");
    assert_eq!(selection.number_attributes_selected().unwrap() + 1, selected.len());

    let container = selection.to_container(&data).unwrap();
    assert_eq!(container.kind(), ContainerKind::AttributeSelection);
    assert!(container.is_valid());
    let reduced = Instances::from_object(
        container.get("Reduced").unwrap().unwrap().as_object().unwrap().clone(),
    )
    .unwrap();
    assert_eq!(reduced.num_attributes().unwrap(), selected.len());
    assert_eq!(reduced.num_instances().unwrap(), 14);
}

#[test]
#[ignore = "requires a JVM and WEKA_JAR"]
fn test_attribute_ranking() {
    let runtime = runtime();
    let dir = tempfile::TempDir::new().unwrap();
    let data = weather(&runtime, dir.path());

    let evaluator =
        ASEvaluation::new(&runtime, "weka.attributeSelection.InfoGainAttributeEval").unwrap();
    let search = ASSearch::new(&runtime, "weka.attributeSelection.Ranker").unwrap();
    let selection = AttributeSelection::new(&runtime).unwrap();
    selection.set_evaluator(&evaluator).unwrap();
    selection.set_search(&search).unwrap();
    selection.set_ranking(true).unwrap();
    selection.select_attributes(&data).unwrap();

    let ranked = selection.ranked_attributes().unwrap();
    assert_eq!(ranked.len(), 4);
    assert_eq!(ranked[0].index, 0, "outlook has the highest information gain");
    assert!(ranked.windows(2).all(|w| w[0].merit >= w[1].merit));

    // a search can also be driven directly
    evaluator.build_evaluator(&data).unwrap();
    let found = search.search(&evaluator, &data).unwrap();
    assert_eq!(found.len(), 4);
    assert!(!evaluator.is_transformer().unwrap());
}

#[test]
#[ignore = "requires a JVM and WEKA_JAR"]
fn test_attribute_header() {
    let runtime = runtime();
    let dir = tempfile::TempDir::new().unwrap();
    let data = weather(&runtime, dir.path());

    let outlook = data.attribute(0).unwrap();
    assert_eq!(outlook.name().unwrap(), "outlook");
    assert_eq!(outlook.index().unwrap(), 0);
    assert_eq!(outlook.attribute_type().unwrap(), AttributeType::Nominal);
    assert_eq!(outlook.values().unwrap(), vec!["sunny", "overcast", "rainy"]);
    assert_eq!(outlook.index_of_value("rainy").unwrap(), Some(2));
    assert_eq!(outlook.index_of_value("snowy").unwrap(), None);

    let play = data.class_attribute().unwrap().unwrap();
    assert_eq!(play.name().unwrap(), "play");
    assert!(data.attribute_by_name("humidity").unwrap().is_some());
    assert!(data.attribute_by_name("pressure").unwrap().is_none());

    data.set_class_index(None).unwrap();
    assert!(data.class_attribute().unwrap().is_none());
}

#[test]
#[ignore = "requires a JVM and WEKA_JAR"]
fn test_capabilities() {
    let runtime = runtime();
    let dir = tempfile::TempDir::new().unwrap();
    let data = weather(&runtime, dir.path());

    let j48 = Classifier::new(&runtime, "weka.classifiers.trees.J48").unwrap();
    let caps = Capabilities::of(&j48).unwrap();
    assert!(caps.handles(Capability::NominalClass).unwrap());
    assert!(!caps.handles(Capability::NumericClass).unwrap());
    assert!(caps.capabilities().unwrap().contains(&Capability::MissingValues));
    assert!(caps.test(&data).unwrap());

    let needed = Capabilities::for_instances(&data).unwrap();
    assert!(caps.supports(&needed).unwrap());

    caps.disable(Capability::NominalAttributes).unwrap();
    assert!(!caps.handles(Capability::NominalAttributes).unwrap());
    assert!(!caps.test(&data).unwrap());
    assert!(caps.test_error().unwrap().is_some());

    let list = JavaObject::new_instance(&runtime, "java.util.ArrayList").unwrap();
    assert_type_mismatch(
        Capabilities::of(&list),
        "weka.core.CapabilitiesHandler",
        "java.util.ArrayList",
    );
}

#[test]
#[ignore = "requires a JVM and WEKA_JAR"]
fn test_apriori_rules() {
    let runtime = runtime();
    let dir = tempfile::TempDir::new().unwrap();
    let data = weather(&runtime, dir.path());
    data.set_class_index(None).unwrap();

    let apriori: Associator =
        weka_bridge::from_commandline(&runtime, "weka.associations.Apriori -N 5").unwrap();
    apriori.build_associations(&data).unwrap();

    assert!(apriori.can_produce_rules().unwrap());
    let rules = apriori.rules().unwrap();
    assert_eq!(rules.len(), 5);
    assert!(rules.iter().all(|r| r.metric_name == "Confidence"));
    assert!(rules.iter().all(|r| !r.consequence.is_empty()));
    assert!(apriori.report().unwrap().contains("Best rules found"));

    let copy = apriori.make_copy().unwrap();
    assert_eq!(
        weka_bridge::to_commandline(&copy).unwrap(),
        weka_bridge::to_commandline(&apriori).unwrap()
    );
}

#[test]
#[ignore = "requires a JVM and WEKA_JAR"]
fn test_data_generator() {
    let runtime = runtime();
    let generator: DataGenerator = weka_bridge::from_commandline(
        &runtime,
        "weka.datagenerators.classifiers.classification.Agrawal -n 20 -S 3",
    )
    .unwrap();

    let data = generator.generate().unwrap();
    assert_eq!(data.num_instances().unwrap(), 20);
    assert_eq!(generator.num_examples_act().unwrap(), 20);
    assert!(generator.dataset_format().unwrap().is_some());
}
