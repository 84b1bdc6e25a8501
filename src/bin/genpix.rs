//! CLI for genpix - batch AI image generation.

use clap::{Args, Parser, Subcommand, ValueEnum};
use genpix::batch::{Orchestrator, SlotUpdate, FAILED_STATUS_TEXT};
use genpix::theme::{self, ThemeController};
use genpix::{
    AspectRatio, GenerationRequest, PollinationsProvider, SlotState, MAX_IMAGE_COUNT,
};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "genpix")]
#[command(about = "Generate batches of images from a text prompt via Pollinations AI")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one or more images from a text prompt
    Generate(GenerateArgs),

    /// Print a random example prompt
    Example,

    /// Show or toggle the light/dark theme preference
    Theme {
        #[arg(value_enum, default_value = "show")]
        action: ThemeAction,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// The text prompt describing the image
    prompt: Option<String>,

    /// Use a random example prompt
    #[arg(long, conflicts_with = "prompt")]
    surprise: bool,

    /// Number of images to generate
    #[arg(
        short = 'n',
        long,
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..=MAX_IMAGE_COUNT as i64)
    )]
    count: u32,

    /// Aspect ratio as W/H (e.g. 16/9)
    #[arg(short, long, default_value = "1/1")]
    ratio: AspectRatio,

    /// Directory to save images into
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Pollinations model name
    #[arg(long, default_value = "flux")]
    model: String,

    /// Seconds to wait between issuing requests
    #[arg(long, default_value_t = 5)]
    interval: u64,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ThemeAction {
    Show,
    Toggle,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => {
            generate(args, cli.json).await?;
        }
        Commands::Example => {
            let prompt = genpix::prompts::random_prompt();
            if cli.json {
                println!("{}", serde_json::json!({ "prompt": prompt }));
            } else {
                println!("{prompt}");
            }
        }
        Commands::Theme { action } => {
            run_theme(action, cli.json)?;
        }
    }

    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("genpix=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn generate(args: GenerateArgs, json_output: bool) -> anyhow::Result<()> {
    let prompt = match (args.prompt, args.surprise) {
        (Some(prompt), _) => prompt,
        (None, true) => {
            let prompt = genpix::prompts::random_prompt().to_string();
            eprintln!("Prompt: {prompt}");
            prompt
        }
        (None, false) => anyhow::bail!("provide a prompt or pass --surprise"),
    };

    let request = GenerationRequest::new(prompt, args.count, args.ratio)?;

    let provider = PollinationsProvider::builder().model(&args.model).build()?;
    let orchestrator = Orchestrator::builder(provider)
        .issue_interval(Duration::from_secs(args.interval))
        .output_dir(&args.output)
        .build();

    let progress = (!json_output).then(|| {
        let mut updates = orchestrator.gallery().subscribe();
        tokio::spawn(async move {
            let mut total = 0;
            loop {
                match updates.recv().await {
                    Ok(SlotUpdate::Reset { count, dimensions }) => {
                        total = count;
                        eprintln!("Generating {count} image(s) at {dimensions}...");
                    }
                    Ok(SlotUpdate::Settled(slot)) => match slot.state {
                        SlotState::Ready => eprintln!(
                            "  [{}/{total}] {}",
                            slot.index + 1,
                            slot.result_url.unwrap_or_default()
                        ),
                        SlotState::Failed(error) => eprintln!(
                            "  [{}/{total}] {FAILED_STATUS_TEXT} ({error})",
                            slot.index + 1
                        ),
                        SlotState::Pending => {}
                    },
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                }
            }
        })
    });

    let report = orchestrator.run(&request).await?;
    if let Some(progress) = progress {
        drop(orchestrator);
        let _ = progress.await;
    }

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "Generated {} of {} image(s) ({}) in {}",
            report.succeeded,
            report.requested,
            report.dimensions,
            args.output.display()
        );
    }

    if report.succeeded == 0 {
        anyhow::bail!("all {} generations failed", report.requested);
    }

    Ok(())
}

fn run_theme(action: ThemeAction, json_output: bool) -> anyhow::Result<()> {
    let mut controller = ThemeController::load(theme::system_prefers_dark());

    if let ThemeAction::Toggle = action {
        controller.toggle()?;
    }

    if json_output {
        let result = serde_json::json!({
            "theme": controller.mode().as_str(),
            "icon": controller.icon(),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Theme: {} (icon: {})", controller.mode(), controller.icon());
    }

    Ok(())
}
