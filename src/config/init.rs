use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{get_config_path, save_config, Config};
use crate::services::{validate_services, EmbedderConfig, GrammarConfig, SentimentConfig, ServicesConfig};

/// Line-oriented prompts over any reader and writer.
struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Prompt user with a message and return their trimmed input.
    fn prompt(&mut self, message: &str) -> Result<String> {
        write!(self.output, "{}", message).context("Failed to write prompt")?;
        self.output.flush().context("Failed to flush output")?;
        let mut line = String::new();
        self.input.read_line(&mut line).context("Failed to read input")?;
        Ok(line.trim().to_string())
    }

    /// Returns `default` if the input is empty.
    fn prompt_with_default(&mut self, message: &str, default: &str) -> Result<String> {
        let input = self.prompt(&format!("{} [{}]: ", message, default))?;
        if input.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(input)
        }
    }

    fn prompt_yes_no(&mut self, message: &str, default_yes: bool) -> Result<bool> {
        let hint = if default_yes { "Y/n" } else { "y/N" };
        let input = self.prompt(&format!("{} [{}]: ", message, hint))?.to_lowercase();
        if input.is_empty() {
            Ok(default_yes)
        } else {
            Ok(input == "y" || input == "yes")
        }
    }

    fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", text).context("Failed to write output")
    }

    /// Ask for every service setting, re-prompting until the section validates.
    fn services(&mut self) -> Result<ServicesConfig> {
        let defaults = ServicesConfig::default();
        loop {
            let config = ServicesConfig {
                timeout: self.prompt_with_default("Request timeout", &defaults.timeout)?,
                http_timeout: self.prompt_with_default("Per-call HTTP timeout", &defaults.http_timeout)?,
                embedder: EmbedderConfig {
                    url: self.prompt_with_default("Embedding service URL", &defaults.embedder.url)?,
                    model: self.prompt_with_default("Embedding model", &defaults.embedder.model)?,
                },
                grammar: GrammarConfig {
                    url: self.prompt_with_default("Grammar service URL", &defaults.grammar.url)?,
                    language: self.prompt_with_default("Grammar language", &defaults.grammar.language)?,
                },
                sentiment: SentimentConfig {
                    url: self.prompt_with_default("Sentiment service URL", &defaults.sentiment.url)?,
                },
            };

            match validate_services(&config) {
                Ok(()) => return Ok(config),
                Err(errors) => {
                    for e in errors {
                        self.say(&format!("  Invalid: {}", e))?;
                    }
                    self.say("  Try again.")?;
                }
            }
        }
    }
}

/// Run the interactive init wizard to create a config file.
///
/// The rubric section is written with the standard defaults so it can be
/// tuned by hand afterwards.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    let stdin = std::io::stdin();
    let mut prompter = Prompter {
        input: stdin.lock(),
        output: std::io::stdout(),
    };
    let default_config_path = match default_path {
        Some(p) => p,
        None => get_config_path()?,
    };
    run_wizard(&mut prompter, default_config_path)
}

fn run_wizard<R: BufRead, W: Write>(p: &mut Prompter<R, W>, default_config_path: PathBuf) -> Result<()> {
    p.say("")?;
    p.say("Speech Rubric Configuration")?;
    p.say("===========================")?;
    p.say("")?;
    p.say("The scorer needs three inference services: sentence embeddings, grammar checking and sentiment.")?;
    p.say("Press enter to accept a default.")?;
    p.say("")?;

    let services = p.services()?;

    p.say("")?;
    let path_str = p.prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = p.prompt_yes_no(
            &format!("Config already exists at {}. Overwrite?", config_path.display()),
            false,
        )?;
        if !overwrite {
            p.say("Aborted.")?;
            return Ok(());
        }
    }

    let config = Config {
        services,
        ..Config::default()
    };
    save_config(&config_path, &config)?;

    p.say("")?;
    p.say(&format!("Config written to {}", config_path.display()))?;
    p.say("Run `speech-rubric check` to verify the services are reachable.")?;
    Ok(())
}
