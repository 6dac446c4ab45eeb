//! Penwright CLI entry point.
//!
//! Provides `generate`, `prompt`, and `styles` subcommands for producing an
//! article, previewing the prompts that would be sent, or listing the
//! available writing styles.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use penwright::config::Config;
use penwright::export;
use penwright::pipeline::{ArticlePipeline, Tier};
use penwright::prompt::build_prompts;
use penwright::providers::openai::OpenAiProvider;
use penwright::types::{GenerationRequest, Style};

/// Exit code when `--fail-on-fallback` is set and the article was synthesized.
const EXIT_FALLBACK: i32 = 2;

/// Penwright: resilient article generation from an LLM service.
#[derive(Parser)]
#[command(name = "penwright", version, about)]
struct Cli {
    /// Config file path (default: `$PENWRIGHT_CONFIG_PATH` or `~/.penwright/config.toml`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Command {
    /// Generate an article. Always prints a complete article.
    Generate {
        /// Article parameters.
        #[command(flatten)]
        request: RequestArgs,
        /// Write the plain-text article into this directory.
        #[arg(long)]
        output: Option<PathBuf>,
        /// Print the document and diagnostics as JSON.
        #[arg(long)]
        json: bool,
        /// Exit with status 2 when the article had to be synthesized.
        #[arg(long)]
        fail_on_fallback: bool,
    },
    /// Print the system and user prompts without calling the service.
    Prompt {
        /// Article parameters.
        #[command(flatten)]
        request: RequestArgs,
    },
    /// List the available writing styles.
    Styles,
}

/// Parameters shared by `generate` and `prompt`.
#[derive(Args)]
struct RequestArgs {
    /// What the article is about.
    #[arg(long)]
    topic: String,
    /// Writing style: professional, casual, humorous, inspirational.
    #[arg(long, default_value = "professional")]
    style: Style,
    /// Approximate target length.
    #[arg(long, default_value_t = 800)]
    words: u32,
    /// Intended readership.
    #[arg(long)]
    audience: String,
}

impl RequestArgs {
    fn into_request(self) -> anyhow::Result<GenerationRequest> {
        GenerationRequest::new(self.topic, self.style, self.words, self.audience)
            .context("invalid article request")
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate {
            request,
            output,
            json,
            fail_on_fallback,
        } => {
            let fell_back =
                handle_generate(cli.config, request.into_request()?, output, json).await?;
            if fell_back && fail_on_fallback {
                std::io::stdout()
                    .flush()
                    .context("failed to flush stdout")?;
                std::process::exit(EXIT_FALLBACK);
            }
            Ok(())
        }
        Command::Prompt { request } => handle_prompt(request.into_request()?),
        Command::Styles => {
            handle_styles();
            Ok(())
        }
    }
}

/// Run the pipeline once and print the result. Returns whether the article
/// was synthesized.
async fn handle_generate(
    config_path: Option<PathBuf>,
    request: GenerationRequest,
    output: Option<PathBuf>,
    json: bool,
) -> anyhow::Result<bool> {
    let config = Config::load(config_path.as_deref()).context("failed to load configuration")?;

    let _logging_guard = match &config.logging.dir {
        Some(dir) => Some(penwright::logging::init_file(dir, &config.logging.level)?),
        None => {
            penwright::logging::init_cli(&config.logging.level)?;
            None
        }
    };

    if config.service.api_key.is_none() {
        warn!("no API key configured, requests are sent without authorization");
    }

    let provider = Arc::new(OpenAiProvider::from_config(&config.service));
    info!(endpoint = %provider.endpoint(), "provider ready");
    let pipeline = ArticlePipeline::new(provider, config.service.timeout());

    let generated = pipeline
        .generate_with_cancel(&request, async {
            if tokio::signal::ctrl_c().await.is_err() {
                std::future::pending::<()>().await;
            }
        })
        .await;

    if json {
        let rendered = serde_json::to_string_pretty(&generated)
            .context("failed to serialize generated article")?;
        println!("{rendered}");
    } else {
        print!("{}", export::render_plain_text(&generated.document));
    }

    if let Some(dir) = output {
        let path = export::write_to_dir(&dir, &generated.document)?;
        info!(path = %path.display(), "article written");
    }

    Ok(generated.diagnostics.tier == Tier::Synthesized)
}

/// Print the prompts for a request.
fn handle_prompt(request: GenerationRequest) -> anyhow::Result<()> {
    let prompts = build_prompts(&request);
    println!("[system]\n{}\n\n[user]\n{}", prompts.system, prompts.user);
    Ok(())
}

/// Print one line per style.
fn handle_styles() {
    for style in Style::ALL {
        println!("{style}\t{}\t{}", style.label(), style.description());
    }
}
