use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use colored::*;
use hashgen_cli::config::{AppConfig, ConfigManager, get_config};
use hashgen_cli::input;
use hashgen_cli::output::{self, HashRecord, OutputFormat};
use hashgen_core::{
    AlgorithmCategory, AlgorithmRegistry, HashEngine, HashOptions, LogNotifier, Notifier,
    NotifyLevel, detect, detect_all, strength,
};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "hashgen")]
#[command(author, version, about = "Hash Generator - parallel hashing, hash detection and password strength", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Number of worker threads (defaults to available parallelism)
    #[arg(long, global = true, value_name = "N")]
    workers: Option<usize>,

    /// Maximum items per bulk batch
    #[arg(long, global = true, value_name = "N")]
    batch_size: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hash a single text
    Hash {
        /// Text to hash
        text: String,

        #[command(flatten)]
        options: HashArgs,

        /// Compute on the current thread instead of the worker pool
        #[arg(long)]
        no_workers: bool,
    },

    /// Hash one input per line from a file or stdin
    Bulk {
        /// Input file (reads stdin when omitted)
        file: Option<PathBuf>,

        #[command(flatten)]
        options: HashArgs,

        /// Output format (defaults to output.default_format from the config)
        #[arg(short, long, value_enum)]
        output: Option<OutputFormat>,
    },

    /// Generate a random salt
    Salt {
        /// Salt length in characters (defaults to engine.default_salt_length)
        #[arg(short, long)]
        length: Option<usize>,
    },

    /// Guess the family of a hash string
    Detect {
        /// Hash to classify
        hash: String,

        /// List every matching family instead of the best guess
        #[arg(long)]
        all: bool,
    },

    /// Score a password's strength
    Strength {
        /// Password to evaluate
        password: String,
    },

    /// List supported algorithms
    Algorithms,

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Print the configuration file path
    Path,
}

#[derive(Args, Debug, Clone)]
struct HashArgs {
    /// Algorithm id (see `hashgen algorithms`)
    #[arg(short, long)]
    algorithm: String,

    /// Explicit salt (random when omitted for salted algorithms)
    #[arg(long)]
    salt: Option<String>,

    /// Iteration count or rounds
    #[arg(long)]
    iterations: Option<u32>,

    /// Cost factor (log2 work factor for bcrypt, Argon2 and scrypt)
    #[arg(long)]
    cost: Option<u32>,

    /// Digest encoding
    #[arg(short, long, value_enum, default_value = "hex")]
    format: DigestFormat,

    /// Uppercase hex output
    #[arg(long)]
    uppercase: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum DigestFormat {
    Hex,
    Base64,
    Standard,
}

impl From<DigestFormat> for hashgen_core::OutputFormat {
    fn from(format: DigestFormat) -> Self {
        match format {
            DigestFormat::Hex => hashgen_core::OutputFormat::Hex,
            DigestFormat::Base64 => hashgen_core::OutputFormat::Base64,
            DigestFormat::Standard => hashgen_core::OutputFormat::Standard,
        }
    }
}

impl HashArgs {
    fn to_options(&self) -> HashOptions {
        HashOptions {
            salt: self.salt.clone(),
            iterations: self.iterations,
            cost_factor: self.cost,
            output_format: self.format.into(),
            uppercase: self.uppercase,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on debug flag
    if cli.debug {
        env_logger::Builder::from_env(env_logger::Env::default())
            .filter_level(log::LevelFilter::Debug)
            .filter_module("hashgen_core", log::LevelFilter::Debug)
            .filter_module("hashgen_cli", log::LevelFilter::Debug)
            .format_timestamp_millis()
            .init();
        eprintln!("Debug logging enabled");
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let mut config = get_config().context("Failed to load configuration")?;
    config.apply_cli_overrides(cli.workers, cli.batch_size);
    if !config.output.color_enabled {
        colored::control::set_override(false);
    }

    match cli.command {
        Commands::Hash {
            text,
            options,
            no_workers,
        } => {
            hash_command(&config, &text, &options, no_workers).await?;
        }
        Commands::Bulk {
            file,
            options,
            output,
        } => {
            bulk_command(&config, file, &options, output).await?;
        }
        Commands::Salt { length } => {
            let length = length.unwrap_or(config.engine.default_salt_length);
            println!("{}", hashgen_core::generate_salt(length));
        }
        Commands::Detect { hash, all } => {
            detect_command(&hash, all);
        }
        Commands::Strength { password } => {
            strength_command(&password);
        }
        Commands::Algorithms => {
            algorithms_command();
        }
        Commands::Config { command } => {
            config_command(command)?;
        }
        Commands::Completions { shell } => {
            generate_completions(shell);
        }
    }

    Ok(())
}

fn start_engine(config: &AppConfig) -> Result<HashEngine> {
    log::debug!("Starting engine with {:?}", config.engine);
    HashEngine::new(config.engine.clone()).context("Failed to start hash engine")
}

/// Report a failure through the notifier before it propagates
fn notify_failure<T>(result: hashgen_core::Result<T>, what: &str) -> Result<T> {
    result.map_err(|e| {
        LogNotifier.notify(&format!("{what} failed: {e}"), NotifyLevel::Error);
        anyhow::Error::new(e).context(format!("{what} failed"))
    })
}

async fn hash_command(
    config: &AppConfig,
    text: &str,
    args: &HashArgs,
    no_workers: bool,
) -> Result<()> {
    let engine = start_engine(config)?;
    let options = args.to_options();

    let digest = if no_workers {
        notify_failure(
            engine.compute_sync(text, &args.algorithm, &options),
            "Hashing",
        )?
    } else {
        notify_failure(
            engine.generate_hash(text, &args.algorithm, &options).await,
            "Hashing",
        )?
    };

    println!("{digest}");
    engine.shutdown().await;
    Ok(())
}

async fn bulk_command(
    config: &AppConfig,
    file: Option<PathBuf>,
    args: &HashArgs,
    output: Option<OutputFormat>,
) -> Result<()> {
    let format = match output {
        Some(format) => format,
        None => OutputFormat::from_string(&config.output.default_format)
            .context("Invalid output.default_format in configuration")?,
    };

    let inputs = input::read_inputs(file.as_deref())?;
    let engine = start_engine(config)?;
    engine.on_stats_update(|update| {
        log::debug!(
            "{} hashes/s across {} algorithm(s)",
            update.hashes_per_second,
            update.unique_algorithms
        );
    });

    let start = Instant::now();
    let digests = notify_failure(
        engine
            .generate_bulk_hashes(&inputs, &args.algorithm, &args.to_options())
            .await,
        "Bulk hashing",
    )?;
    LogNotifier.notify(
        &format!(
            "Hashed {} input(s) with {} in {:.2}s",
            digests.len(),
            args.algorithm,
            start.elapsed().as_secs_f64()
        ),
        NotifyLevel::Success,
    );

    let records: Vec<HashRecord> = inputs
        .into_iter()
        .zip(digests)
        .map(|(input, digest)| HashRecord::new(input, digest))
        .collect();

    let formatter = output::create_formatter(format, config.output.color_enabled);
    let rendered = formatter.format_batch(&records)?;
    if !rendered.is_empty() {
        println!("{}", rendered.trim_end());
    }

    engine.shutdown().await;
    Ok(())
}

fn detect_command(hash: &str, all: bool) {
    let detections = if all {
        detect_all(hash)
    } else {
        let detection = detect(hash);
        if detection.is_unknown() {
            Vec::new()
        } else {
            vec![detection]
        }
    };

    if detections.is_empty() {
        println!("{}", "Unknown hash format".yellow());
        return;
    }

    for detection in detections {
        let algorithm = detection
            .family
            .algorithm_id()
            .map(|id| format!(" [{id}]"))
            .unwrap_or_default();
        println!(
            "{}{} (confidence {}%)",
            detection.family.to_string().green(),
            algorithm,
            detection.confidence
        );
    }
}

fn strength_command(password: &str) {
    let report = strength::evaluate(password);
    let rating = match report.score {
        0..40 => report.rating.to_string().red(),
        40..60 => report.rating.to_string().yellow(),
        _ => report.rating.to_string().green(),
    };

    println!("Score: {}/100 ({rating})", report.score);
    for line in &report.feedback {
        println!("  - {line}");
    }
}

fn algorithms_command() {
    let registry = AlgorithmRegistry::global();
    let mut current: Option<AlgorithmCategory> = None;

    for descriptor in registry.list() {
        if current != Some(descriptor.category) {
            if current.is_some() {
                println!();
            }
            println!("{}", descriptor.category.to_string().bold().blue());
            current = Some(descriptor.category);
        }

        let mut notes = Vec::new();
        if descriptor.supports_salt {
            notes.push("salted".to_string());
        }
        if let Some(iterations) = descriptor.default_iterations {
            notes.push(format!("iterations={iterations}"));
        }
        if let Some(cost) = descriptor.default_cost_factor {
            notes.push(format!("cost={cost}"));
        }

        let notes = if notes.is_empty() {
            String::new()
        } else {
            format!(" ({})", notes.join(", "))
        };
        let id = format!("{:<14}", descriptor.id);
        println!("  {} {}{}", id.cyan(), descriptor.display_name, notes);
    }
}

fn config_command(command: ConfigCommand) -> Result<()> {
    let manager = ConfigManager::new();

    match command {
        ConfigCommand::Show => {
            eprintln!("Config file: {}", manager.get_config_path().display());
            print!("{}", manager.show()?);
        }
        ConfigCommand::Path => {
            println!("{}", manager.get_config_path().display());
        }
    }

    Ok(())
}

fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();

    generate(shell, &mut cmd, name, &mut std::io::stdout());
}
