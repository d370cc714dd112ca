//! StoryReel: turn a short description into a narrated video.

mod styles;
mod wizard;

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sreel_gen::ProviderConfig;
use sreel_models::{AspectRatio, DurationPlan, PriceTable, VoicePreset};
use sreel_pipeline::{RunRequest, Workflow};
use sreel_session::Session;

use styles::StyleStore;

#[derive(Debug, Parser)]
#[command(name = "sreel", about = "Generate a narrated short video from a description")]
struct Cli {
    /// What the video should be about.
    description: String,

    /// Target duration in seconds.
    #[arg(long)]
    duration: Option<u32>,

    /// Aspect ratio (9:16 or 16:9).
    #[arg(long)]
    aspect: Option<AspectRatio>,

    /// Narration voice name.
    #[arg(long)]
    voice: Option<String>,

    /// Visual style name from the style store.
    #[arg(long)]
    style: Option<String>,

    /// Reference image: a local file or URL to guide image generation.
    #[arg(long)]
    reference_image: Option<String>,

    /// Use this narration script instead of generating one.
    #[arg(long)]
    story: Option<String>,

    /// Where session directories are created.
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Path of the style store file.
    #[arg(long, default_value = "styles.json")]
    styles_file: PathBuf,

    /// Use the free/cheap model set.
    #[arg(long)]
    free: bool,

    /// Transcribe the narration and save caption data.
    #[arg(long)]
    captions: bool,

    /// Skip all prompts; requires --duration, --style and --story or
    /// accepts their defaults where they exist.
    #[arg(long, short = 'y')]
    yes: bool,
}

fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sreel=info"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        error!("{e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    sreel_media::check_ffmpeg().context("ffmpeg is required")?;
    sreel_media::check_ffprobe().context("ffprobe is required")?;

    let provider = ProviderConfig::from_env(cli.free)?;
    let workflow = Workflow::new(provider.clone());

    let duration = match cli.duration {
        Some(d) => d,
        None if cli.yes => 20,
        None => wizard::choose_duration(20)?,
    };
    if duration == 0 || duration > 300 {
        bail!("duration must be between 1 and 300 seconds");
    }
    let plan = DurationPlan::for_duration(duration);

    let aspect = match cli.aspect {
        Some(a) => a,
        None if cli.yes => AspectRatio::default(),
        None => wizard::choose_aspect()?,
    };

    let mut style_store = StyleStore::load(&cli.styles_file)?;
    let style = match &cli.style {
        Some(name) => style_store
            .by_name(name)
            .cloned()
            .with_context(|| format!("unknown style '{name}'"))?,
        None if cli.yes => style_store
            .styles()
            .first()
            .cloned()
            .context("style store is empty")?,
        None => wizard::choose_style(&mut style_store)?,
    };

    let voice = match &cli.voice {
        Some(name) => VoicePreset::by_name(name)
            .with_context(|| format!("unknown voice '{name}'"))?,
        None if cli.yes => VoicePreset::default_voice(),
        None => wizard::choose_voice()?,
    };

    let story = match &cli.story {
        Some(story) => story.clone(),
        None if cli.yes => {
            let variants = workflow
                .text_client()
                .story_variants(&cli.description, &plan, 1)
                .await?;
            variants[0].text.clone()
        }
        None => wizard::choose_story(workflow.text_client(), &cli.description, &plan).await?,
    };

    print_estimate(&provider, &plan, &story);
    if !cli.yes && !wizard::confirm("Proceed?")? {
        println!("Aborted.");
        return Ok(());
    }

    let session = Session::create(&cli.output_dir)?;
    info!(session = session.session_id(), "session created");

    let request = RunRequest {
        description: cli.description.clone(),
        story,
        plan,
        aspect,
        voice_id: voice.voice_id.to_string(),
        style_suffix: style.suffix.clone(),
        reference_image: cli.reference_image.clone(),
        captions: cli.captions,
    };

    let outcome = workflow.run(&session, &request).await?;

    let table = PriceTable::builtin();
    let breakdown = outcome.cost.breakdown(
        &table,
        &provider.image_model,
        &provider.video_model,
        &provider.tts_model,
    );
    println!("\nDone in session {}", session.session_id());
    println!("Final video: {}", outcome.final_video.display());
    println!("Duration: {:.1}s", outcome.duration);
    if !outcome.failed.is_empty() {
        println!(
            "{} of {} segments failed and were skipped.",
            outcome.failed.len(),
            outcome.failed.len() + outcome.succeeded.len()
        );
    }
    println!("{}", breakdown.to_description());
    Ok(())
}

/// Show the estimated run cost before anything is submitted.
fn print_estimate(provider: &ProviderConfig, plan: &DurationPlan, story: &str) {
    let table = PriceTable::builtin();
    let mut estimate = sreel_models::CostAccumulator::new();
    for _ in 0..plan.segment_count {
        estimate.add_image();
        estimate.add_video(DurationPlan::SEGMENT_SECONDS);
    }
    estimate.add_narration_chars(story.chars().count() as u64);

    let breakdown = estimate.breakdown(
        &table,
        &provider.image_model,
        &provider.video_model,
        &provider.tts_model,
    );
    println!(
        "\nPlan: {} segments of {}s, ~{} words of narration.",
        plan.segment_count,
        DurationPlan::SEGMENT_SECONDS,
        plan.estimated_words
    );
    println!("Estimated cost: {}", breakdown.to_description());
}
