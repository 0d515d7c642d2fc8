//! `fbrelay` - CLI for feedback-relay
//!
//! This binary provides the command-line interface for recording feedback
//! submissions and inspecting the local fallback file.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Result;
use clap::Parser;

use feedback_relay::cli::{Cli, Command, ConfigCommand, ListCommand, SubmitCommand};
use feedback_relay::store::CsvSink;
use feedback_relay::{init_logging, Config, FeedbackStore};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Submit(cmd) => handle_submit(&config, &cmd).await,
        Command::List(cmd) => handle_list(&config, &cmd),
        Command::Status(cmd) => handle_status(&config, cmd.json),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

async fn handle_submit(config: &Config, cmd: &SubmitCommand) -> Result<()> {
    let store = FeedbackStore::from_config(config)?;

    match store.submit(&cmd.name, &cmd.email, &cmd.message).await {
        Ok(receipt) => {
            if cmd.json {
                let out = serde_json::json!({
                    "success": true,
                    "sink": receipt.sink.to_string(),
                    "timestamp": receipt.record.timestamp.to_rfc3339(),
                    "fallback_reason": receipt.fallback_reason,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                // Identical confirmation regardless of which sink absorbed
                // the record.
                println!("Thank you! Your message has been recorded.");
            }
            Ok(())
        }
        Err(e) if e.is_validation() => {
            eprintln!("{e}");
            Err(e.into())
        }
        Err(e) if e.is_persistence_failed() => {
            eprintln!("Your message could not be saved, please retry.");
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}

fn handle_list(config: &Config, cmd: &ListCommand) -> Result<()> {
    let sink = CsvSink::new(config.feedback_path(), config.local.rotate_max_bytes)?;
    let records = sink.read_recent(cmd.limit)?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else if records.is_empty() {
        println!("No local feedback records.");
    } else {
        for record in &records {
            println!(
                "{}  {} <{}>  [{}]",
                record.timestamp.to_rfc3339(),
                record.name,
                record.email,
                record.status
            );
            println!("    {}", record.message.replace('\n', "\n    "));
        }
    }
    Ok(())
}

fn handle_status(config: &Config, json: bool) -> Result<()> {
    let store = FeedbackStore::from_config(config)?;
    let stats = store.local().stats()?;

    if json {
        let status = serde_json::json!({
            "remote_enabled": store.remote_enabled(),
            "remote_note": store.remote_note(),
            "sheet_id": config.sheet.sheet_id,
            "local_path": config.feedback_path(),
            "local_records": stats.total_records,
            "local_file_size_bytes": stats.file_size_bytes,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("fbrelay status");
        println!("--------------");
        println!(
            "Remote sheet:  {}",
            if store.remote_enabled() {
                "enabled"
            } else {
                "disabled"
            }
        );
        if let Some(note) = store.remote_note() {
            println!("               ({note})");
        }
        println!("Local file:    {}", config.feedback_path().display());
        println!("Records:       {}", stats.total_records);
        println!("File size:     {} bytes", stats.file_size_bytes);
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Sheet]");
                println!(
                    "  Sheet id:           {}",
                    config.sheet.sheet_id.as_deref().unwrap_or("(not set)")
                );
                println!(
                    "  Credentials path:   {}",
                    config
                        .sheet
                        .credentials_path
                        .as_ref()
                        .map_or_else(|| "(not set)".to_string(), |p| p.display().to_string())
                );
                println!("  Append range:       {}", config.sheet.append_range);
                println!(
                    "  Request timeout:    {}s",
                    config.sheet.request_timeout_secs
                );
                println!();
                println!("[Local]");
                println!("  Feedback file:      {}", config.feedback_path().display());
                println!("  Rotate max bytes:   {}", config.local.rotate_max_bytes);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
