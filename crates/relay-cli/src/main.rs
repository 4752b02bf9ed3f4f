//! Relay CLI - Persona management and ask
//!
//! Simple CLI for interacting with the Persona Relay API.

mod api;
mod config;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::{Input, Password};
use std::fs;

use api::RelayClient;
use config::Config;

#[derive(Parser)]
#[command(name = "relay")]
#[command(about = "Relay CLI - Persona management and ask", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Login and store API key
    Login {
        /// API key (will prompt if not provided)
        #[arg(short, long)]
        key: Option<String>,
        /// Server URL (keeps the stored one if not provided)
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Manage personas
    Persona {
        #[command(subcommand)]
        action: PersonaAction,
    },

    /// Ask a persona a question
    Ask {
        /// Persona name
        name: String,
        /// Question text
        question: String,
    },

    /// Show current configuration
    Config,
}

#[derive(Subcommand)]
enum PersonaAction {
    /// Create or overwrite a persona
    Create {
        /// Persona name (e.g., "Einstein")
        name: String,
        /// System prompt (or use -f for file)
        prompt: Option<String>,
        /// Read prompt from file
        #[arg(short, long)]
        file: Option<String>,
    },
    /// Delete a persona
    Delete {
        /// Persona name
        name: String,
    },
    /// List all personas
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Login { key, url } => cmd_login(key, url).await,
        Commands::Persona { action } => cmd_persona(action).await,
        Commands::Ask { name, question } => cmd_ask(name, question).await,
        Commands::Config => cmd_config(),
    }
}

// ============================================
// Command Implementations
// ============================================

async fn cmd_login(key: Option<String>, url: Option<String>) -> Result<()> {
    let mut config = Config::load()?;

    if let Some(url) = url {
        config.set_base_url(&url);
    }

    let api_key = match key {
        Some(k) => k,
        None => Password::new()
            .with_prompt("API Key")
            .interact()
            .context("Failed to read API key")?,
    };

    // Test connection
    let client = RelayClient::new(&config.base_url, Some(&api_key));
    print!("Testing connection... ");

    match client.health().await {
        Ok(true) => {}
        _ => {
            println!("{}", "Failed".red());
            bail!("Could not reach Persona Relay at {}", config.base_url);
        }
    }

    if let Err(e) = client.verify_key().await {
        println!("{}", "Failed".red());
        bail!("API key rejected: {}", e);
    }
    println!("{}", "OK".green());

    config.set_api_key(api_key);
    config.save()?;

    println!("{} API key saved to {:?}", "✓".green(), Config::config_path()?);

    Ok(())
}

fn client_from_config() -> Result<RelayClient> {
    let config = Config::load()?;
    Ok(RelayClient::new(&config.base_url, config.api_key.as_deref()))
}

async fn cmd_persona(action: PersonaAction) -> Result<()> {
    let client = client_from_config()?;

    match action {
        PersonaAction::Create { name, prompt, file } => {
            let prompt_text = match (prompt, file) {
                (Some(p), None) => p,
                (None, Some(f)) => {
                    fs::read_to_string(&f).with_context(|| format!("Failed to read file: {}", f))?
                }
                (Some(_), Some(_)) => {
                    bail!("Cannot specify both prompt and --file");
                }
                (None, None) => Input::new()
                    .with_prompt("System prompt")
                    .interact_text()
                    .context("Failed to read input")?,
            };

            let message = client.create_persona(&name, &prompt_text).await?;
            println!("{} {}", "✓".green(), message);
            println!("  {}", truncate_string(&prompt_text, 80).dimmed());
        }

        PersonaAction::Delete { name } => {
            let message = client.delete_persona(&name).await?;
            println!("{} {}", "✓".green(), message);
        }

        PersonaAction::List => {
            let personas = client.list_personas().await?;

            if personas.is_empty() {
                println!("No personas found.");
                println!("\n{}", "Add one with:".dimmed());
                println!("  relay persona create <name> <prompt>");
                return Ok(());
            }

            println!("{}", "Personas:".bold());
            for persona in personas {
                println!(
                    "  {} {}",
                    persona.name.cyan().bold(),
                    truncate_string(&persona.persona, 60).dimmed()
                );
            }
        }
    }

    Ok(())
}

async fn cmd_ask(name: String, question: String) -> Result<()> {
    let client = client_from_config()?;

    let answer = client.ask(&name, &question).await?;

    // Output the answer to stdout (clean for piping)
    println!("{}", answer);

    Ok(())
}

/// Truncate string safely for UTF-8 (by char count, not bytes)
fn truncate_string(s: &str, max_chars: usize) -> String {
    let chars: Vec<char> = s.chars().take(max_chars).collect();
    if s.chars().count() > max_chars {
        format!("{}...", chars.into_iter().collect::<String>())
    } else {
        s.to_string()
    }
}

fn cmd_config() -> Result<()> {
    let config = Config::load()?;

    println!("{}", "Configuration:".bold());
    println!("  Path: {:?}", Config::config_path()?);
    println!("  Base URL: {}", config.base_url);
    match config.masked_api_key() {
        Some(masked) => println!("  API Key: {}", masked.green()),
        None => println!("  API Key: {}", "Not set".red()),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_persona_create_from_file() {
        let cli = Cli::parse_from(["relay", "persona", "create", "Einstein", "--file", "p.txt"]);
        match cli.command {
            Commands::Persona {
                action: PersonaAction::Create { name, prompt, file },
            } => {
                assert_eq!(name, "Einstein");
                assert!(prompt.is_none());
                assert_eq!(file.as_deref(), Some("p.txt"));
            }
            _ => panic!("expected persona create"),
        }
    }

    #[test]
    fn test_truncate_string_multibyte() {
        assert_eq!(truncate_string("こんにちは", 3), "こんに...");
        assert_eq!(truncate_string("short", 10), "short");
    }
}
