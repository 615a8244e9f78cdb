use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::collections::BTreeMap;
use std::path::PathBuf;

use shopper_intent::config::{ConfigOverrides, ExperimentConfig};
use shopper_intent::dataset::{DatasetKind, LabeledTable, load_feature_subset, read_dataset};
use shopper_intent::evaluation::{Evaluation, evaluate};
use shopper_intent::machine_learning::{
    GridSearch, LogisticRegression, NaiveBayes, Scoring, refit,
};
use shopper_intent::persistence::save_json;
use shopper_intent::traits::Classifier;

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Warn)
        .parse_env(
            env_logger::Env::default().filter_or("SHOPPER_INTENT_LOG", "warn,shopper_intent=info"),
        )
        .init();

    let matches = Command::new("shopper-intent")
        .version(clap::crate_version!())
        .about("Naive Bayes and logistic regression on the online shoppers purchasing intention dataset")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            with_common_args(
                Command::new("evaluate")
                    .about("Fit Naive Bayes and logistic regression, then score them on train and test"),
            ),
        )
        .subcommand(
            with_common_args(
                Command::new("tune")
                    .about("Grid search logistic regression hyperparameters with stratified k-fold"),
            )
            .arg(
                Arg::new("cv")
                    .long("cv")
                    .help("Number of folds. Overrides the configuration file.")
                    .value_parser(clap::value_parser!(usize)),
            )
            .arg(
                Arg::new("scoring")
                    .long("scoring")
                    .help("Metric to maximize. Overrides the configuration file.")
                    .value_parser(["accuracy", "precision", "recall", "f1"]),
            )
            .arg(
                Arg::new("params_output")
                    .long("params-output")
                    .help("File the best hyperparameters are written to (JSON)")
                    .value_parser(clap::value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath),
            ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("evaluate", sub_m)) => run_evaluate(&load_config(sub_m, common_overrides(sub_m)?)?),
        Some(("tune", sub_m)) => {
            let overrides = ConfigOverrides {
                cv: sub_m.get_one::<usize>("cv").copied(),
                scoring: sub_m
                    .get_one::<String>("scoring")
                    .map(|s| s.parse::<Scoring>())
                    .transpose()
                    .map_err(anyhow::Error::msg)?,
                params_output: sub_m.get_one::<PathBuf>("params_output").cloned(),
                ..common_overrides(sub_m)?
            };
            run_tune(&load_config(sub_m, overrides)?)
        }
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn with_common_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to an experiment configuration file (JSON)")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("data_dir")
                .short('d')
                .long("data-dir")
                .help("Directory with the training and test CSV files. Overrides the configuration file.")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::DirPath),
        )
        .arg(
            Arg::new("dataset")
                .long("dataset")
                .help("Training split to use. Overrides the configuration file.")
                .value_parser(["unbalanced", "smote", "rbo"]),
        )
        .arg(
            Arg::new("features")
                .short('f')
                .long("features")
                .help("JSON array of column names logistic regression is restricted to")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .help("Seed for weight initialization, batch sampling and grid search")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("File the evaluation results are written to (JSON)")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
}

/// Flags shared by every subcommand.
fn common_overrides(matches: &ArgMatches) -> Result<ConfigOverrides> {
    Ok(ConfigOverrides {
        data_dir: matches.get_one::<PathBuf>("data_dir").cloned(),
        dataset: matches
            .get_one::<String>("dataset")
            .map(|kind| kind.parse::<DatasetKind>())
            .transpose()
            .map_err(anyhow::Error::msg)?,
        features: matches.get_one::<PathBuf>("features").cloned(),
        seed: matches.get_one::<u64>("seed").copied(),
        output: matches.get_one::<PathBuf>("output").cloned(),
        ..Default::default()
    })
}

fn load_config(matches: &ArgMatches, overrides: ConfigOverrides) -> Result<ExperimentConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => {
            log::info!("Using config: {:?}", path);
            ExperimentConfig::from_json_file(path)
                .with_context(|| format!("failed to read config {}", path.display()))?
        }
        None => {
            log::info!("No config provided, using defaults");
            ExperimentConfig::default()
        }
    };
    config.apply_overrides(overrides);
    Ok(config)
}

fn load_splits(config: &ExperimentConfig) -> Result<(LabeledTable, LabeledTable)> {
    read_dataset(&config.data_dir, config.dataset, &config.label_column).with_context(|| {
        format!(
            "failed to read the {:?} split from {}",
            config.dataset,
            config.data_dir.display()
        )
    })
}

/// Restricts both splits to the configured feature subset, if any.
fn apply_feature_subset(
    config: &ExperimentConfig,
    train: &LabeledTable,
    test: &LabeledTable,
) -> Result<(LabeledTable, LabeledTable)> {
    match &config.feature_subset {
        Some(path) => {
            let names = load_feature_subset(path)
                .with_context(|| format!("failed to read feature subset {}", path.display()))?;
            let train = train.select_intersection(&names);
            let test = test.select_intersection(&names);
            log::info!(
                "Feature subset {}: keeping {} of {} listed columns",
                path.display(),
                train.features.ncols(),
                names.len()
            );
            Ok((train, test))
        }
        None => Ok((train.clone(), test.clone())),
    }
}

fn score(
    results: &mut BTreeMap<String, Evaluation>,
    model: &dyn Classifier,
    train: &LabeledTable,
    test: &LabeledTable,
) -> Result<()> {
    let evaluation = evaluate(model, train, test)
        .with_context(|| format!("failed to evaluate {}", model.name()))?;
    log::info!(
        "{} test confusion matrix [[tn, fp], [fn, tp]]: {:?}",
        model.name(),
        evaluation.test.cm
    );
    results.insert(model.name().to_string(), evaluation);
    Ok(())
}

fn run_evaluate(config: &ExperimentConfig) -> Result<()> {
    let (train, test) = load_splits(config)?;
    let mut results = BTreeMap::new();

    let mut naive_bayes = NaiveBayes::new(train.features.clone(), train.labels.clone(), &config.schema)
        .context("failed to set up Naive Bayes")?;
    if let Some(min_std) = config.naive_bayes_min_std {
        naive_bayes = naive_bayes.with_min_std(min_std)?;
    }
    naive_bayes.fit().context("failed to fit Naive Bayes")?;
    score(&mut results, &naive_bayes, &train, &test)?;

    let (lr_train, lr_test) = apply_feature_subset(config, &train, &test)?;
    let mut logistic_regression = LogisticRegression::new(
        lr_train.features.clone(),
        lr_train.labels.clone(),
        config.seeded_logistic_regression(),
    )
    .context("failed to set up logistic regression")?;
    logistic_regression
        .train()
        .context("failed to train logistic regression")?;
    score(&mut results, &logistic_regression, &lr_train, &lr_test)?;

    save_json(&config.results_file, &results)
        .with_context(|| format!("failed to write {}", config.results_file.display()))?;
    log::info!("Results written to {}", config.results_file.display());
    Ok(())
}

fn run_tune(config: &ExperimentConfig) -> Result<()> {
    let (train, test) = load_splits(config)?;
    let (train, test) = apply_feature_subset(config, &train, &test)?;

    let search = GridSearch::new(config.grid.clone(), config.cv, config.scoring)
        .context("invalid grid search settings")?
        .with_random_state(config.seed);
    let result = search.fit(&train).context("grid search failed")?;

    save_json(&config.best_params_file, &result.best_params)
        .with_context(|| format!("failed to write {}", config.best_params_file.display()))?;
    log::info!(
        "Best parameters ({} {:.4}) written to {}",
        config.scoring,
        result.best_score,
        config.best_params_file.display()
    );

    let best_model = refit(&train, result.best_params).context("failed to refit the best model")?;
    let mut results = BTreeMap::new();
    score(&mut results, &best_model, &train, &test)?;

    save_json(&config.results_file, &results)
        .with_context(|| format!("failed to write {}", config.results_file.display()))?;
    log::info!("Results written to {}", config.results_file.display());
    Ok(())
}
