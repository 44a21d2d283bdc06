use anyhow::{Context, Result};
use bridge_core::core::dictionary::PhraseDictionaries;
use bridge_core::persistence::{load_phrase_pack, save_snapshot};
use bridge_core::{EngineConfig, TranslationEngine};
use clap::{Args, Parser, Subcommand};
use std::collections::HashSet;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bridge_cli", about = "Script-aware translation and transliteration")]
struct Cli {
    /// Engine configuration (TOML)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Translate text, pivoting through English
    Translate(TranslateArgs),
    /// Render roman text in a native script
    Transliterate(TransliterateArgs),
    /// Guess the script and language of text
    Detect { text: String },
    /// List supported languages
    Languages,
    /// Write the phrase dictionaries, plus any JSON packs, to a snapshot
    ExportSnapshot(ExportArgs),
}

#[derive(Args, Debug)]
struct TranslateArgs {
    #[arg(long, short = 'f', default_value = "english")]
    from: String,
    #[arg(long, short = 't')]
    to: String,
    text: String,
}

#[derive(Args, Debug)]
struct TransliterateArgs {
    #[arg(long, short = 't')]
    to: String,
    text: String,
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// JSON phrase packs to merge before writing
    #[arg(long = "pack", value_name = "FILE")]
    packs: Vec<PathBuf>,
    #[arg(value_name = "OUT")]
    output: PathBuf,
}

fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_engine(path: Option<&PathBuf>) -> Result<TranslationEngine> {
    let config = match path {
        Some(path) => EngineConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => EngineConfig::default(),
    };
    TranslationEngine::from_config(config).context("building translation engine")
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let engine = load_engine(cli.config.as_ref())?;

    match cli.command {
        Command::Translate(args) => {
            engine.try_translate(&args.text, &args.from, &args.to)?;
            let result = engine.translate_with_fallback(&args.text, &args.from, &args.to).await;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", result.text);
                if let Some(error) = &result.error {
                    eprintln!("note: {error}");
                }
            }
        }
        Command::Transliterate(args) => {
            let text = engine.transliterate(&args.text, &args.to);
            if cli.json {
                println!("{}", serde_json::json!({ "text": text, "targetLanguage": args.to }));
            } else {
                println!("{text}");
            }
        }
        Command::Detect { text } => {
            let detection = engine.detect(&text);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&detection)?);
            } else {
                println!(
                    "{} ({}, confidence {:.2})",
                    detection.language,
                    detection.script.name(),
                    detection.confidence
                );
            }
        }
        Command::Languages => {
            let with_dictionary: HashSet<&str> = engine.dictionaries().languages().collect();
            for profile in engine.supported_languages() {
                let marker = if with_dictionary.contains(profile.name) { "*" } else { " " };
                println!(
                    "{marker} {:<12} {:<12} {}",
                    profile.name,
                    profile.script.name(),
                    profile.aliases.join(", ")
                );
            }
            println!("\n* phrase dictionary available");
        }
        Command::ExportSnapshot(args) => {
            let mut dictionaries = PhraseDictionaries::from_packs(&engine.dictionaries().packs(), engine.languages())?;
            for path in &args.packs {
                let pack = load_phrase_pack(path).with_context(|| format!("reading {}", path.display()))?;
                let added = dictionaries.add_pack(&pack, engine.languages())?;
                eprintln!("merged {added} entries for {}", pack.language);
            }
            save_snapshot(&dictionaries, &args.output)
                .with_context(|| format!("writing {}", args.output.display()))?;
            println!("snapshot written to {}", args.output.display());
        }
    }
    Ok(())
}
