//! Interactive prompts for run setup.
//!
//! Everything here reads from stdin and writes to stdout directly; the
//! pipeline itself never prompts.

use std::io::{self, Write};

use anyhow::{bail, Context};
use tracing::debug;

use sreel_gen::TextClient;
use sreel_models::{AspectRatio, DurationPlan, VoicePreset};

use crate::styles::{StylePreset, StyleStore};

fn prompt(question: &str) -> anyhow::Result<String> {
    print!("{question} ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("reading from stdin")?;
    Ok(line.trim().to_string())
}

/// Ask for the video duration in seconds.
pub fn choose_duration(default_seconds: u32) -> anyhow::Result<u32> {
    let answer = prompt(&format!(
        "Video duration in seconds [{default_seconds}]:"
    ))?;
    if answer.is_empty() {
        return Ok(default_seconds);
    }
    let seconds: u32 = answer.parse().context("duration must be a number")?;
    if seconds == 0 || seconds > 300 {
        bail!("duration must be between 1 and 300 seconds");
    }
    Ok(seconds)
}

/// Ask for the aspect ratio.
pub fn choose_aspect() -> anyhow::Result<AspectRatio> {
    let answer = prompt("Aspect ratio, 9:16 or 16:9 [9:16]:")?;
    if answer.is_empty() {
        return Ok(AspectRatio::default());
    }
    answer.parse().map_err(anyhow::Error::from)
}

/// Ask the user to pick, regenerate, or modify a story variant.
///
/// Loops until a variant is accepted. `r` regenerates all variants,
/// `m<n> <instruction>` rewrites variant n with the instruction.
pub async fn choose_story(
    text: &TextClient,
    description: &str,
    plan: &DurationPlan,
) -> anyhow::Result<String> {
    let mut variants = text.story_variants(description, plan, 3).await?;

    loop {
        println!("\nStory options:");
        for (i, variant) in variants.iter().enumerate() {
            println!("\n[{}] {}", i + 1, variant.text);
        }
        let answer = prompt(
            "\nPick a story (1-3), 'r' to regenerate, or 'm<n> <instruction>' to modify:",
        )?;

        if answer.eq_ignore_ascii_case("r") {
            variants = text.story_variants(description, plan, 3).await?;
            continue;
        }
        if let Some(rest) = answer.strip_prefix('m').or_else(|| answer.strip_prefix('M')) {
            let mut parts = rest.splitn(2, ' ');
            let n: usize = parts
                .next()
                .unwrap_or_default()
                .parse()
                .context("expected 'm<n> <instruction>'")?;
            let instruction = parts.next().unwrap_or_default().trim();
            if n == 0 || n > variants.len() || instruction.is_empty() {
                println!("Expected 'm<n> <instruction>', e.g. 'm2 make it funnier'.");
                continue;
            }
            debug!(variant = n, "modifying story variant");
            let rewritten = text
                .modify_story(&variants[n - 1].text, instruction, plan)
                .await?;
            variants[n - 1].text = rewritten;
            continue;
        }
        if let Ok(n) = answer.parse::<usize>() {
            if n >= 1 && n <= variants.len() {
                return Ok(variants[n - 1].text.clone());
            }
        }
        println!("Unrecognized choice.");
    }
}

/// Ask the user to pick a style preset or define a new one.
pub fn choose_style(store: &mut StyleStore) -> anyhow::Result<StylePreset> {
    println!("\nStyles:");
    for (i, style) in store.styles().iter().enumerate() {
        println!("[{}] {}: {}", i + 1, style.name, style.suffix);
    }
    let answer = prompt("\nPick a style (number or name), or 'n' for a new one:")?;

    if answer.eq_ignore_ascii_case("n") {
        let name = prompt("Style name:")?;
        let suffix = prompt("Prompt suffix:")?;
        if name.is_empty() || suffix.is_empty() {
            bail!("style name and suffix must be non-empty");
        }
        let preset = StylePreset { name, suffix };
        store.add(preset.clone())?;
        return Ok(preset);
    }
    if let Ok(n) = answer.parse::<usize>() {
        if n >= 1 && n <= store.styles().len() {
            return Ok(store.styles()[n - 1].clone());
        }
    }
    store
        .by_name(&answer)
        .cloned()
        .with_context(|| format!("unknown style '{answer}'"))
}

/// Ask the user to pick a narration voice.
pub fn choose_voice() -> anyhow::Result<&'static VoicePreset> {
    println!("\nVoices:");
    for (i, voice) in VoicePreset::ALL.iter().enumerate() {
        println!("[{}] {}: {}", i + 1, voice.name, voice.description);
    }
    let answer = prompt(&format!(
        "\nPick a voice [{}]:",
        VoicePreset::default_voice().name
    ))?;

    if answer.is_empty() {
        return Ok(VoicePreset::default_voice());
    }
    if let Ok(n) = answer.parse::<usize>() {
        if n >= 1 && n <= VoicePreset::ALL.len() {
            return Ok(&VoicePreset::ALL[n - 1]);
        }
    }
    VoicePreset::by_name(&answer).with_context(|| format!("unknown voice '{answer}'"))
}

/// Yes/no confirmation, defaulting to yes.
pub fn confirm(question: &str) -> anyhow::Result<bool> {
    let answer = prompt(&format!("{question} [Y/n]:"))?;
    Ok(answer.is_empty() || answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}
