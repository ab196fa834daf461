use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use std::time::Instant;

use speech_rubric::batch::MIN_DURATION_SECS;
use speech_rubric::error::RubricError;
use speech_rubric::scoring::{Rubric, RubricScorer};
use speech_rubric::services::Collaborators;

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_SCORING: i32 = 2;
const EXIT_UNAVAILABLE: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score one transcript
    Analyze {
        /// Transcript file, or "-" for stdin
        input: String,

        /// Spoken duration in seconds (at least 10)
        #[arg(short, long, value_parser = parse_duration_secs)]
        duration: f64,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Score every transcript listed in a manifest
    Batch {
        /// YAML manifest with `entries: [{transcript, duration, name}]`
        manifest: PathBuf,

        /// Print the results as JSON
        #[arg(long)]
        json: bool,

        /// Transcripts scored concurrently
        #[arg(short, long, default_value_t = 4)]
        jobs: usize,
    },
    /// Validate the config and probe the inference services
    Check,
    /// Create a config file interactively
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "speech-rubric")]
#[command(about = "Score speech transcripts against a weighted rubric", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/speech-rubric/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn parse_duration_secs(s: &str) -> Result<f64, String> {
    let secs: f64 = s.trim().parse().map_err(|_| format!("'{}' is not a number", s))?;
    if !secs.is_finite() || secs < MIN_DURATION_SECS {
        return Err(format!("duration must be at least {} seconds", MIN_DURATION_SECS));
    }
    Ok(secs)
}

fn read_transcript(input: &str) -> std::io::Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(input)
    }
}

fn exit_code_for(err: &RubricError) -> i32 {
    match err {
        e if e.is_validation() => EXIT_INPUT,
        RubricError::CollaboratorUnavailable { .. } => EXIT_UNAVAILABLE,
        _ => EXIT_SCORING,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    speech_rubric::logging::init_logging(cli.verbose);
    let start_time = Instant::now();
    let config_path = cli.config.map(PathBuf::from);

    if let Commands::Init = cli.command {
        if let Err(e) = speech_rubric::config::run_init_wizard(config_path) {
            eprintln!("Init failed: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    // Load and validate config
    let config = match speech_rubric::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = speech_rubric::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let (rubric, timeout) = match (Rubric::compile(&config.rubric), config.services.request_timeout()) {
        (Ok(r), Ok(t)) => (r, t),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Read the transcript before touching the services
    let transcript = match &cli.command {
        Commands::Analyze { input, .. } => match read_transcript(input) {
            Ok(t) => Some(t),
            Err(e) => {
                eprintln!("Failed to read transcript {}: {}", input, e);
                std::process::exit(EXIT_INPUT);
            }
        },
        _ => None,
    };

    let manifest = match &cli.command {
        Commands::Batch { manifest, .. } => match speech_rubric::batch::load_manifest(manifest) {
            Ok(m) => Some(m),
            Err(e) => {
                eprintln!("Manifest error: {:#}", e);
                std::process::exit(EXIT_INPUT);
            }
        },
        _ => None,
    };

    let collaborators = match Collaborators::connect(&config.services).await {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Startup failed: {}", e);
            std::process::exit(EXIT_UNAVAILABLE);
        }
    };
    tracing::info!(elapsed = ?start_time.elapsed(), "services ready");

    let scorer = RubricScorer::new(rubric, collaborators).with_timeout(timeout);
    let use_colors = speech_rubric::output::should_use_colors();
    let width = speech_rubric::output::get_terminal_width();

    match cli.command {
        Commands::Check => {
            println!("Config OK");
            println!("  embedder:  {}", config.services.embedder.url);
            println!("  grammar:   {}", config.services.grammar.url);
            println!("  sentiment: {}", config.services.sentiment.url);
            println!("All services reachable.");
        }
        Commands::Analyze { duration, json, .. } => {
            let transcript = transcript.unwrap_or_default();
            match scorer.analyze(&transcript, duration).await {
                Ok(result) => {
                    if json {
                        match speech_rubric::output::format_json(&result) {
                            Ok(out) => println!("{}", out),
                            Err(e) => {
                                eprintln!("Failed to serialize result: {}", e);
                                std::process::exit(EXIT_SCORING);
                            }
                        }
                    } else {
                        println!(
                            "{}",
                            speech_rubric::output::format_report(&result, scorer.rubric(), use_colors, width)
                        );
                    }
                }
                Err(e) => {
                    if json {
                        println!("{}", speech_rubric::output::format_error_json(&e.to_string()));
                    } else {
                        eprintln!("Error: {}", e);
                    }
                    std::process::exit(exit_code_for(&e));
                }
            }
        }
        Commands::Batch { json, jobs, .. } => {
            let manifest = manifest.unwrap_or_else(|| speech_rubric::batch::BatchManifest { entries: Vec::new() });
            let outcomes = speech_rubric::batch::score_batch(&scorer, manifest, jobs).await;

            if json {
                match speech_rubric::output::format_batch_json(&outcomes) {
                    Ok(out) => println!("{}", out),
                    Err(e) => {
                        eprintln!("Failed to serialize results: {}", e);
                        std::process::exit(EXIT_SCORING);
                    }
                }
            } else {
                println!(
                    "{}",
                    speech_rubric::output::format_batch_table(&outcomes, use_colors, width)
                );
            }

            let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
            tracing::info!(
                total = outcomes.len(),
                failed,
                elapsed = ?start_time.elapsed(),
                "batch finished"
            );
            if failed > 0 {
                eprintln!("{} of {} entries failed", failed, outcomes.len());
                std::process::exit(EXIT_SCORING);
            }
        }
        Commands::Init => {}
    }

    std::process::exit(EXIT_SUCCESS);
}
