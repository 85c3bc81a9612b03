use clap::Parser;
use colored::*;
use std::fs;
use std::io;
use std::path::Path;
use std::process;
use tokio::io::{AsyncBufRead, BufReader};

use thinkstream::cli::Args;
use thinkstream::config::Config;
use thinkstream::conversation::ConversationRegistry;
use thinkstream::feed::jsonl_items;
use thinkstream::history::{FilesystemTranscriptStore, TranscriptStore};
use thinkstream::orchestrator::{run_turn, OrchestratorContext, TurnOutcome, TurnReport, TurnWarning};
use thinkstream::sink::{write_events, ChannelSink};
use thinkstream::ui::TerminalSink;
use thinkstream::{Result, ThinkStreamError};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("{} {}", "Error:".red(), e);
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let config = Config::from_env_and_args(&args)?;
    let store = FilesystemTranscriptStore::new(config.history_dir.clone());

    // Handle --clear option
    if args.clear_history {
        let cleared = store.clear_all()?;
        println!("{}", format!("Cleared {} stored transcript(s).", cleared).green());
        return Ok(());
    }

    if args.last {
        match store.find_recent()? {
            Some(transcript) => println!("{}", serde_json::to_string_pretty(&transcript)?),
            None => println!("{}", "No stored transcripts.".yellow()),
        }
        return Ok(());
    }

    if config.verbose {
        eprintln!(
            "{}",
            format!(
                "[config] Markers: {} ... {}",
                config.markers.open, config.markers.close
            )
            .dimmed()
        );
        eprintln!(
            "{}",
            format!(
                "[config] Item timeout: {}s, turn limit: {}s, tool calls: {}",
                config.limits.item_timeout.as_secs(),
                config.limits.max_turn_duration.as_secs(),
                config.limits.max_tool_calls
            )
            .dimmed()
        );
    }

    let context = OrchestratorContext::from_config(&config);
    let registry = ConversationRegistry::new();
    let conversation_id = registry.create();
    let mut conversation = registry.begin_turn(&conversation_id)?;

    let reader = open_input(args.input.as_deref()).await?;
    let items = jsonl_items(reader, config.verbose);
    let cancel = async {
        // Without a signal handler the turn simply cannot be interrupted.
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    let report = if args.events {
        let (mut sink, rx) = ChannelSink::channel();
        let printer = tokio::spawn(write_events(rx, io::stdout()));

        let report = run_turn(
            &context,
            &mut conversation,
            args.query.as_deref(),
            items,
            &mut sink,
            cancel,
        )
        .await;
        drop(sink);
        match printer.await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => eprintln!("{} Failed to print render events: {}", "Error:".red(), e),
            Err(e) => eprintln!("{} Render event printer stopped: {}", "Error:".red(), e),
        }
        report
    } else {
        let mut sink = TerminalSink::new(args.hide_reasoning);
        let report = run_turn(
            &context,
            &mut conversation,
            args.query.as_deref(),
            items,
            &mut sink,
            cancel,
        )
        .await;
        sink.finish();
        report
    };

    print_report(&report, config.verbose);

    if let Some(path) = &args.output {
        fs::write(path, conversation.log().to_json()?)?;
        if config.verbose {
            eprintln!(
                "{}",
                format!("[turn] Wrote {} message(s) to {}", conversation.log().len(), path.display())
                    .dimmed()
            );
        }
    }

    if args.save {
        if let Err(e) = store.save(&conversation.to_transcript()) {
            eprintln!(
                "{}",
                format!("Warning: Failed to save transcript: {}", e).yellow()
            );
        }
    }

    match report.outcome {
        TurnOutcome::Completed => Ok(()),
        TurnOutcome::Cancelled(reason) => Err(ThinkStreamError::Other(format!(
            "Turn cancelled: {}",
            reason
        ))),
    }
}

async fn open_input(path: Option<&Path>) -> Result<Box<dyn AsyncBufRead + Unpin + Send>> {
    match path {
        Some(path) if path != Path::new("-") => {
            let file = tokio::fs::File::open(path).await.map_err(|e| {
                ThinkStreamError::Other(format!("Cannot open {}: {}", path.display(), e))
            })?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => Ok(Box::new(BufReader::new(tokio::io::stdin()))),
    }
}

fn print_report(report: &TurnReport, verbose: bool) {
    for warning in &report.warnings {
        let text = match warning {
            TurnWarning::UnknownItem { index } => {
                format!("Warning: ignored unknown stream item #{}", index)
            }
            TurnWarning::ArgsFallback { tool_name, reason } => {
                format!("Warning: arguments for '{}' shown raw ({})", tool_name, reason)
            }
            TurnWarning::FormatFallback { tool_name, reason } => {
                format!("Warning: result of '{}' shown raw ({})", tool_name, reason)
            }
            TurnWarning::FormatFailed { tool_name, error } => {
                format!("Warning: result of '{}' could not be formatted: {}", tool_name, error)
            }
        };
        eprintln!("{}", text.yellow());
    }

    if verbose {
        eprintln!(
            "{}",
            format!(
                "[turn] Conversation {}: {} message(s) appended",
                report.conversation_id, report.appended
            )
            .dimmed()
        );
    }
}
