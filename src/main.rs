use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use redflag::nlp::normalize;
use redflag::stages::{anonymize, chunk_text, customer_sentences, segment};
use redflag::{
    parse_request_file, AnthropicConfig, AnthropicTranslator, AuditRecord, MachineTranslateClient,
    MachineTranslateConfig, PipelineConfig, RedFlagPipeline, RuleSet, VerdictResponse,
};

#[derive(Parser)]
#[command(name = "redflag")]
#[command(author, version, about = "Compliance red-flag detection for customer-service transcripts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate and match a transcript, printing the verdict as JSON
    Process {
        /// Request file (JSON with IncrementalTranscript, Language, ...)
        #[arg(short, long)]
        input: PathBuf,

        /// Rules file (JSON list of rules)
        #[arg(short, long, default_value = "rules.json")]
        rules: PathBuf,

        /// Pipeline configuration (TOML); defaults are used when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory for audit records
        #[arg(long)]
        audit_dir: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Load and compile a rules file
    CheckRules {
        /// Rules file (JSON list of rules)
        #[arg(short, long)]
        rules: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show how a transcript would be segmented and chunked, without calling any backend
    Analyze {
        /// Request file (JSON with IncrementalTranscript, Language, ...)
        #[arg(short, long)]
        input: PathBuf,

        /// Pipeline configuration (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            input,
            rules,
            config,
            audit_dir,
            verbose,
        } => {
            setup_logging(verbose);
            process_request(input, rules, config, audit_dir).await
        }
        Commands::CheckRules { rules, verbose } => {
            setup_logging(verbose);
            check_rules(rules)
        }
        Commands::Analyze {
            input,
            config,
            verbose,
        } => {
            setup_logging(verbose);
            analyze_request(input, config)
        }
    }
}

/// Logs go to stderr so stdout stays machine-readable; `RUST_LOG` wins over `--verbose`
fn setup_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn load_config(path: Option<PathBuf>) -> Result<PipelineConfig> {
    match path {
        Some(path) => {
            info!("Loading config from {:?}", path);
            PipelineConfig::from_file(&path).context("Failed to load pipeline config")
        }
        None => Ok(PipelineConfig::default()),
    }
}

async fn process_request(
    input: PathBuf,
    rules: PathBuf,
    config: Option<PathBuf>,
    audit_dir: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(config)?;
    let rules = RuleSet::from_file(&rules).context("Failed to load rules")?;
    info!("Loaded {} rules", rules.len());

    let request = parse_request_file(&input).context("Failed to parse request")?;

    let generative = AnthropicTranslator::new(AnthropicConfig::from_env()?);
    let deterministic = MachineTranslateClient::new(MachineTranslateConfig::from_env()?);
    let pipeline = RedFlagPipeline::new(
        config,
        Arc::new(rules),
        Arc::new(generative),
        Arc::new(deterministic),
    );

    let verdict = pipeline
        .process(
            &request.transcript,
            &request.language,
            &request.name_mapping(),
            &request.channel,
        )
        .await;

    if let Some(dir) = audit_dir {
        let path = AuditRecord::new(&request, &verdict)
            .write(&dir, Utc::now())
            .context("Failed to write audit record")?;
        info!("Audit record written to {:?}", path);
    }

    let response = VerdictResponse::new(&verdict);
    println!(
        "{}",
        serde_json::to_string_pretty(&response).context("Failed to serialize verdict")?
    );

    Ok(())
}

fn check_rules(path: PathBuf) -> Result<()> {
    let rules = RuleSet::from_file(&path).context("Failed to load rules")?;

    println!("{} rules OK", rules.len());
    for (i, rule) in rules.iter().enumerate() {
        let order = if rule.rule.flexible_order {
            "any order"
        } else {
            "in order"
        };
        println!(
            "  [{}] keywords {:?} ({}, within {}), {} regex, {} exclusions",
            i,
            rule.rule.keywords,
            order,
            rule.rule.max_distance,
            rule.include.len(),
            rule.exclude.len()
        );
    }

    Ok(())
}

fn analyze_request(input: PathBuf, config: Option<PathBuf>) -> Result<()> {
    let config = load_config(config)?;
    let request = parse_request_file(&input).context("Failed to parse request")?;

    println!("Request Analysis");
    println!("================");
    println!("Language: {}", request.language);
    println!("Channel: {}", request.channel);
    println!("Length: {} chars", request.transcript.chars().count());

    if !config.normalizer.channel_enabled(&request.channel) {
        println!("Channel is not processed; the transcript would be skipped.");
        return Ok(());
    }

    let anonymized = anonymize(
        &request.transcript,
        &request.name_mapping(),
        &config.normalizer,
    );

    println!();
    println!("Translation Plan");
    println!("----------------");
    match config.languages.resolve(&request.language) {
        Some(language) if language.is_english() => println!("English, no translation"),
        Some(language) => {
            let threshold = config.chunking.threshold_for(&language.code);
            let chunks = chunk_text(&anonymized, threshold, &config.chunking);
            println!(
                "{} ({}), {} backend, threshold {} chars",
                language.name, language.code, language.model, threshold
            );
            for chunk in &chunks {
                println!("  chunk {}: {} chars", chunk.index, chunk.char_len());
            }
        }
        None => println!("Unsupported language; translation would fail"),
    }

    let messages = segment(&anonymized, &config.normalizer);
    println!();
    println!("Messages ({})", messages.len());
    println!("--------");
    for message in &messages {
        println!("{}: {}", message.sender, message.text);
    }

    let sentences = customer_sentences(&messages);
    println!();
    println!("Customer Sentences ({})", sentences.len());
    println!("------------------");
    for sentence in &sentences {
        println!("{}", sentence);
        println!("  -> {}", normalize(sentence.as_str()).join(" "));
    }

    Ok(())
}
