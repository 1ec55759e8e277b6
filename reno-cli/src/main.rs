mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::io::Read;
use std::path::Path;

use reno_core::{
    codec, collator, get_config_path, Collator, Config, DetailField,
};

use crate::cli::{Cli, Command, ConfigCommand};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Command::Encode { file } => {
            encode_record(file.as_deref())?;
        }
        Command::Decode { portable, file } => {
            decode_record(portable.as_deref(), file.as_deref())?;
        }
        Command::Collate { file } => {
            collate(file.as_deref())?;
        }
        Command::Config(config_cmd) => {
            handle_config_command(config_cmd)?;
        }
    }

    Ok(())
}

/// Reads the given file, or stdin when no path was provided
fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {:?}", path)),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn encode_record(file: Option<&Path>) -> Result<()> {
    let input = read_input(file)?;
    let value: serde_json::Value =
        serde_json::from_str(&input).context("Input is not valid JSON")?;
    let record = codec::from_canonical_json(&value)?;

    println!("{}", codec::encode(&record));
    Ok(())
}

fn decode_record(portable: Option<&str>, file: Option<&Path>) -> Result<()> {
    let input = match portable {
        Some(s) => s.to_string(),
        None => read_input(file)?,
    };
    let record = codec::decode(input.trim())?;

    let json = serde_json::to_string_pretty(&codec::to_canonical_json(&record))?;
    println!("{}", json);
    Ok(())
}

fn collate(file: Option<&Path>) -> Result<()> {
    let input = read_input(file)?;

    let mut collator = Collator::new();
    let report = collator.ingest(&input);

    let counts = format!("{} added, {} failed", report.added, report.failed);
    if report.failed > 0 {
        println!("{}", counts.yellow());
    } else {
        println!("{}", counts.green());
    }

    for entry in collator.entries() {
        let card = collator::summarize(entry);
        println!();
        println!("{}", card.headline.bold());
        if !card.service_line.is_empty() {
            println!("{}", card.service_line.cyan());
        }

        for detail in &card.details {
            println!("  {}", detail.service.bold());
            for field in &detail.fields {
                match field {
                    DetailField::Text { label, value } => {
                        // Indent continuation lines of multi-line values
                        let value = value.replace('\n', "\n      ");
                        println!("    {}: {}", label, value);
                    }
                    DetailField::Links { label, items } => {
                        println!("    {}:", label);
                        for item in items {
                            if item.is_url {
                                println!("      {}", item.text.blue().underline());
                            } else {
                                println!("      {}", item.text);
                            }
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

fn handle_config_command(command: &ConfigCommand) -> Result<()> {
    let path = get_config_path()?;

    match command {
        ConfigCommand::Path => {
            println!("{}", path.display());
        }
        ConfigCommand::Show => {
            let config = Config::load(&path)?;
            println!("{}", "Contacts:".bold());
            for name in config.contact_names() {
                println!("  {}", name);
            }
            println!("{}", "Services:".bold());
            for name in config.service_names() {
                println!("  {}", name);
            }
        }
    }

    Ok(())
}
