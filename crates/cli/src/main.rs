//! CLI tool for generating slide decks from a topic or reference document.

use anyhow::{Context, Result};
use clap::Parser;
use deck_core::normalize::DEFAULT_LOOKBACK_WINDOW;
use deck_core::UnterminatedFence;
use deck_llm::{OpenAiClient, OpenAiConfig};
use deck_pipeline::config::DEFAULT_NUM_SLIDES;
use deck_pipeline::{generate_presentation, PipelineConfig, PipelineSummary};
use std::env;
use std::path::PathBuf;

/// Generate a slide deck from a topic prompt and/or a reference document.
#[derive(Parser, Debug)]
#[command(name = "deckgen")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base name for the generated deck (without extension)
    output: String,

    /// Presentation request driving the outline
    #[arg(short, long)]
    prompt: Option<String>,

    /// Path to a reference markdown document
    #[arg(short, long)]
    reference: Option<PathBuf>,

    /// Number of slides to generate
    #[arg(short, long, default_value_t = DEFAULT_NUM_SLIDES)]
    slides: usize,

    /// Skip the diagram enhancement stage
    #[arg(long)]
    no_diagrams: bool,

    /// Directory for generated artifacts
    #[arg(short, long, default_value = "./outputs")]
    output_dir: PathBuf,

    /// Model identifier override
    #[arg(short, long)]
    model: Option<String>,

    /// Base URL of the chat-completions API
    #[arg(long)]
    base_url: Option<String>,

    /// Look-back window (in lines) for orphan fence-marker cleanup
    #[arg(long, default_value_t = DEFAULT_LOOKBACK_WINDOW)]
    lookback: usize,

    /// Close unterminated diagram blocks instead of preserving them
    #[arg(long)]
    close_unterminated: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let mut builder = PipelineConfig::builder(&args.output)
        .num_slides(args.slides)
        .diagrams(!args.no_diagrams)
        .output_dir(&args.output_dir)
        .lookback_window(args.lookback);
    if let Some(prompt) = &args.prompt {
        builder = builder.prompt(prompt);
    }
    if let Some(reference) = &args.reference {
        builder = builder.reference(reference);
    }
    if let Some(model) = &args.model {
        builder = builder.model(model);
    }
    if args.close_unterminated {
        builder = builder.unterminated(UnterminatedFence::CloseAtEnd);
    }
    let config = builder.build().context("invalid configuration")?;

    println!("{}", config.summary());

    let api_key = env::var("API_KEY").context("API_KEY environment variable is not set")?;
    let mut client_config = OpenAiConfig::new(api_key);
    if let Some(base_url) = &args.base_url {
        client_config = client_config.with_base_url(base_url);
    }
    if let Some(model) = &args.model {
        client_config = client_config.with_model(model);
    }
    log::debug!("using chat-completions client: {client_config:?}");
    let client = OpenAiClient::new(client_config).context("failed to build service client")?;

    let summary = generate_presentation(&config, &client)?;

    print_summary(&summary);
    println!("\nArtifacts in: {}", config.paths.session_dir.display());

    Ok(())
}

/// Print the usage statistics for a completed run.
fn print_summary(summary: &PipelineSummary) {
    println!("\n=== Usage Statistics ===");
    println!(
        "Outline generation tokens: {}",
        summary.structure_usage.total_tokens
    );
    println!(
        "Content generation tokens: {}",
        summary.content_usage.total_tokens
    );

    if let Some(diagram) = &summary.diagram {
        println!(
            "Diagram processing tokens: {}",
            diagram.usage.total().total_tokens
        );

        if diagram.report.is_valid() {
            println!("Structural validation: clean");
        } else {
            println!(
                "Structural validation: {} finding(s)",
                diagram.report.violations.len()
            );
            for violation in &diagram.report.violations {
                println!("  - {violation}");
            }
        }
    }

    println!("Total tokens used: {}", summary.total_usage().total_tokens);
}
