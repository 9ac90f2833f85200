//! Developer utility to train and export the sentiment model artifact.

use std::path::PathBuf;

use sentra::ml::SentimentPipeline;
use sentra::ml::pipeline::TRAINING_EXAMPLES;
use sentra::store::{DEFAULT_ARTIFACT_NAME, save_pipeline};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let options = parse_args(std::env::args().skip(1).collect())?;

    let pipeline = SentimentPipeline::train()?;
    save_pipeline(&options.model_out, &pipeline).map_err(|err| err.to_string())?;

    println!("model written to {}", options.model_out.display());
    println!("classes: {}", pipeline.classes().join(", "));
    println!("vocabulary size: {}", pipeline.vocabulary_size());

    let mut hits = 0usize;
    for (text, label) in TRAINING_EXAMPLES {
        let result = pipeline.predict(text)?;
        if result.prediction == *label {
            hits += 1;
        }
    }
    println!(
        "in-sample accuracy: {:.4}",
        hits as f64 / TRAINING_EXAMPLES.len() as f64
    );
    Ok(())
}

#[derive(Debug, Clone)]
struct CliOptions {
    model_out: PathBuf,
}

fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut model_out = PathBuf::from(DEFAULT_ARTIFACT_NAME);

    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => return Err(help_text()),
            "--out" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--out requires a value".to_string())?;
                model_out = PathBuf::from(value);
            }
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }

    Ok(CliOptions { model_out })
}

fn help_text() -> String {
    [
        "sentra-train",
        "",
        "Trains the TF-IDF + Naive Bayes sentiment pipeline on the built-in",
        "example set and writes the model artifact.",
        "",
        "Usage:",
        "  sentra-train [--out sentiment_model.json]",
        "",
        "Options:",
        "  --out <file>  Output artifact path (default: sentiment_model.json).",
    ]
    .join("\n")
}
