//! CLI entry point for weka-bridge.

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use dotenv::dotenv;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use weka_bridge::classes::options;
use weka_bridge::jvm::classpath;
use weka_bridge::{
    ASEvaluation, ASSearch, AttributeSelection, ClassIndex, Classifier, CommandLine, Evaluation,
    Filter, JavaObject, JavaWrapper, JvmConfig, OptionHandler, Runtime, converters,
};

#[derive(Parser, Debug)]
#[command(
    author = "weka-bridge developers",
    version,
    about = "Drive the Weka toolkit from the command line through an embedded JVM",
    long_about = "Drive the Weka toolkit from the command line through an embedded JVM.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  JAVA_HOME             JDK/JRE used to create the VM\n  \
                  WEKA_HOME             Weka home directory (default ~/.wekafiles)\n  \
                  WEKA_BRIDGE_LIB_DIR   Directory with the bundled jars\n  \
                  CLASSPATH             Appended with --system-classpath\n\n\
                  EXAMPLES:\n  \
                  # Show the classpath the VM would be started with\n  \
                  weka-bridge --packages classpath\n\n  \
                  # Cross-validate J48 and save the model\n  \
                  weka-bridge train -d iris.arff -c \"weka.classifiers.trees.J48 -C 0.25\" -o j48.model\n\n  \
                  # Apply a filter\n  \
                  weka-bridge filter -i iris.arff -o out.arff -f \"weka.filters.unsupervised.attribute.Normalize\"\n\n  \
                  # Rank attributes by information gain\n  \
                  weka-bridge select -d iris.arff -e weka.attributeSelection.InfoGainAttributeEval -s weka.attributeSelection.Ranker --ranking"
)]
struct Cli {
    #[command(flatten)]
    jvm: JvmArgs,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

/// Options that decide how the VM is started.
#[derive(Args, Debug)]
struct JvmArgs {
    /// JSON file with a JvmConfig; the flags below are applied on top
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Additional classpath entry (repeatable)
    #[arg(long = "cp", global = true)]
    class_path: Vec<PathBuf>,

    /// Do not add the bundled jars
    #[arg(long, global = true)]
    no_bundled: bool,

    /// Add the jars of installed Weka packages
    #[arg(long, global = true)]
    packages: bool,

    /// Weka home directory (parent of packages/)
    #[arg(long, global = true)]
    weka_home: Option<PathBuf>,

    /// Append the entries of the CLASSPATH environment variable
    #[arg(long, global = true)]
    system_classpath: bool,

    /// Maximum heap size, e.g. 512m or 2g
    #[arg(long, global = true)]
    max_heap_size: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the assembled classpath without starting the VM
    Classpath {
        /// Output JSON instead of one entry per line
        #[arg(long)]
        json: bool,
    },
    /// Split an option string into tokens
    Split {
        /// The option string, e.g. "-C 0.25 -M 2"
        options: String,
        /// Output JSON instead of one token per line
        #[arg(long)]
        json: bool,
    },
    /// Join option tokens into a single string
    Join {
        /// The tokens to join
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        tokens: Vec<String>,
    },
    /// Print the Weka version
    Version,
    /// Print the options of a class
    Help {
        /// Fully qualified class name
        classname: String,
    },
    /// Cross-validate a classifier and optionally save the model
    Train {
        /// Dataset in any format Weka can load
        #[arg(short, long)]
        data: PathBuf,
        /// Classifier command line, e.g. "weka.classifiers.trees.J48 -C 0.25"
        #[arg(short, long)]
        classifier: String,
        /// Class attribute: first, last or a 1-based number
        #[arg(long, default_value = "last")]
        class_index: ClassIndex,
        /// Number of cross-validation folds (0 skips cross-validation)
        #[arg(long, default_value = "10")]
        folds: usize,
        /// Seed for the cross-validation folds
        #[arg(long, default_value = "1")]
        seed: i64,
        /// Where to write the model trained on the full dataset
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Filter a dataset
    Filter {
        /// Input dataset
        #[arg(short, long)]
        input: PathBuf,
        /// Output dataset (format from the extension)
        #[arg(short, long)]
        output: PathBuf,
        /// Filter command line, e.g. "weka.filters.unsupervised.attribute.Normalize"
        #[arg(short, long)]
        filter: String,
        /// Class attribute: first, last or a 1-based number
        #[arg(long)]
        class_index: Option<ClassIndex>,
    },
    /// Select attributes with an evaluator and a search method
    Select {
        /// Dataset in any format Weka can load
        #[arg(short, long)]
        data: PathBuf,
        /// Evaluator command line, e.g. "weka.attributeSelection.CfsSubsetEval"
        #[arg(short, long)]
        evaluator: String,
        /// Search command line, e.g. "weka.attributeSelection.BestFirst -D 1"
        #[arg(short, long)]
        search: String,
        /// Class attribute: first, last or a 1-based number
        #[arg(long, default_value = "last")]
        class_index: ClassIndex,
        /// Produce a ranking (requires a ranking search)
        #[arg(long)]
        ranking: bool,
        /// Output JSON instead of the textual report
        #[arg(long)]
        json: bool,
    },
}

/// Initialize the tracing subscriber for logging.
fn init_logging(level: &str, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn jvm_config(args: &JvmArgs) -> Result<JvmConfig> {
    let mut config = match &args.config {
        Some(path) => JvmConfig::from_json_file(path)?,
        None => JvmConfig::default(),
    };
    config.class_path.extend(args.class_path.iter().cloned());
    if args.no_bundled {
        config.bundled = false;
    }
    if args.packages {
        config.packages = true;
    }
    if args.weka_home.is_some() {
        config.weka_home = args.weka_home.clone();
    }
    if args.system_classpath {
        config.system_classpath = true;
    }
    if args.max_heap_size.is_some() {
        config.max_heap_size = args.max_heap_size.clone();
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level, cli.quiet);

    // Load environment variables from .env file
    dotenv().ok();

    let config = jvm_config(&cli.jvm)?;
    debug!("JVM config: {:?}", config);

    match cli.command {
        Command::Classpath { json } => run_classpath(&config, json),
        Command::Split { options, json } => run_split(&options, json),
        Command::Join { tokens } => {
            println!("{}", options::join_options(&tokens));
            Ok(())
        }
        Command::Version => Runtime::scoped(&config, |runtime| {
            println!("{}", weka_bridge::utils::version(runtime)?);
            Ok(())
        })
        .map_err(Into::into),
        Command::Help { classname } => Runtime::scoped(&config, |runtime| {
            let object = JavaObject::new_instance(runtime, &classname)?;
            println!("{}", OptionHandler::of(object)?.to_help()?);
            Ok(())
        })
        .map_err(Into::into),
        Command::Train {
            data,
            classifier,
            class_index,
            folds,
            seed,
            output,
        } => {
            let runtime = weka_bridge::start(&config)?;
            let result = run_train(&runtime, &data, &classifier, class_index, folds, seed, output);
            weka_bridge::stop();
            result
        }
        Command::Filter {
            input,
            output,
            filter,
            class_index,
        } => {
            let runtime = weka_bridge::start(&config)?;
            let result = run_filter(&runtime, &input, &output, &filter, class_index);
            weka_bridge::stop();
            result
        }
        Command::Select {
            data,
            evaluator,
            search,
            class_index,
            ranking,
            json,
        } => {
            let runtime = weka_bridge::start(&config)?;
            let result = run_select(&runtime, &data, &evaluator, &search, class_index, ranking, json);
            weka_bridge::stop();
            result
        }
    }
}

fn run_classpath(config: &JvmConfig, json: bool) -> Result<()> {
    let classpath = classpath::assemble(config);
    if json {
        println!("{}", serde_json::to_string_pretty(classpath.entries())?);
    } else {
        for entry in classpath.entries() {
            println!("{}", entry.display());
        }
    }
    Ok(())
}

fn run_split(value: &str, json: bool) -> Result<()> {
    let tokens = options::split_options(value)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&tokens)?);
    } else {
        for token in tokens {
            println!("{}", token);
        }
    }
    Ok(())
}

fn run_train(
    runtime: &Runtime,
    data: &Path,
    cmdline: &str,
    class_index: ClassIndex,
    folds: usize,
    seed: i64,
    output: Option<PathBuf>,
) -> Result<()> {
    // Parse first so a malformed command line fails before any data is loaded
    let cmdline: CommandLine = cmdline.parse()?;

    info!("Loading dataset from: {}", data.display());
    let dataset = converters::load_any_file(runtime, data, Some(class_index))?
        .ok_or_else(|| anyhow!("No loader for file: {}", data.display()))?;
    info!(
        "Dataset loaded: {} instances, {} attributes",
        dataset.num_instances()?,
        dataset.num_attributes()?
    );

    let classifier = Classifier::with_options(runtime, &cmdline.classname, &cmdline.options)?;
    info!("Classifier: {}", classifier.option_handler().to_commandline()?);

    if folds > 1 {
        let evaluation = Evaluation::new(&dataset)?;
        evaluation.crossvalidate_model(&classifier, &dataset, folds, seed)?;
        println!("{}", evaluation.summary()?);
        println!("{}", evaluation.class_details()?);
        println!("{}", evaluation.matrix()?);
    }

    if let Some(output) = output {
        classifier.build_classifier(&dataset)?;
        classifier
            .serialize(&output, Some(&dataset))
            .with_context(|| format!("Failed to save model to {}", output.display()))?;
        info!("Model saved to: {}", output.display());
    }

    Ok(())
}

fn run_filter(
    runtime: &Runtime,
    input: &Path,
    output: &Path,
    cmdline: &str,
    class_index: Option<ClassIndex>,
) -> Result<()> {
    let filter: Filter = weka_bridge::from_commandline(runtime, cmdline)?;

    info!("Loading dataset from: {}", input.display());
    let dataset = converters::load_any_file(runtime, input, class_index)?
        .ok_or_else(|| anyhow!("No loader for file: {}", input.display()))?;

    filter.set_inputformat(&dataset)?;
    let filtered = filter.filter(&dataset)?;
    info!(
        "Filtered: {} -> {} attributes",
        dataset.num_attributes()?,
        filtered.num_attributes()?
    );

    if !converters::save_any_file(&filtered, output)? {
        return Err(anyhow!("No saver for file: {}", output.display()));
    }
    info!("Saved to: {}", output.display());
    Ok(())
}

fn run_select(
    runtime: &Runtime,
    data: &Path,
    evaluator: &str,
    search: &str,
    class_index: ClassIndex,
    ranking: bool,
    json: bool,
) -> Result<()> {
    let evaluator: ASEvaluation = weka_bridge::from_commandline(runtime, evaluator)?;
    let search: ASSearch = weka_bridge::from_commandline(runtime, search)?;

    info!("Loading dataset from: {}", data.display());
    let dataset = converters::load_any_file(runtime, data, Some(class_index))?
        .ok_or_else(|| anyhow!("No loader for file: {}", data.display()))?;

    let selection = AttributeSelection::new(runtime)?;
    selection.set_evaluator(&evaluator)?;
    selection.set_search(&search)?;
    selection.set_ranking(ranking)?;
    selection.select_attributes(&dataset)?;

    let names = dataset.attribute_names()?;
    let selected = selection.selected_attributes()?;
    info!(
        "Selected {} of {} attributes",
        selection.number_attributes_selected()?,
        names.len()
    );

    if json {
        let selected: Vec<&str> = selected
            .iter()
            .filter_map(|i| names.get(*i).map(String::as_str))
            .collect();
        let report = serde_json::json!({
            "selected": selected,
            "ranked": if ranking { Some(selection.ranked_attributes()?) } else { None },
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", selection.results_string()?);
    }
    Ok(())
}
