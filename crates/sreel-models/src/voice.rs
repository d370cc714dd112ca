//! Narration voice presets.

use serde::Serialize;

/// A selectable narration voice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoicePreset {
    /// Display name shown in the wizard.
    pub name: &'static str,
    /// Provider voice identifier.
    pub voice_id: &'static str,
    /// Short description of the voice character.
    pub description: &'static str,
}

impl VoicePreset {
    /// Built-in voices.
    pub const ALL: &'static [VoicePreset] = &[
        VoicePreset {
            name: "George",
            voice_id: "JBFqnCBsd6RMkjVDRZzb",
            description: "Deep, authoritative male voice",
        },
        VoicePreset {
            name: "Rachel",
            voice_id: "21m00Tcm4TlvDq8ikWAM",
            description: "Warm, clear female voice",
        },
        VoicePreset {
            name: "Adam",
            voice_id: "pNInz6obpgDQGcFmaJgB",
            description: "Energetic male voice",
        },
        VoicePreset {
            name: "Bella",
            voice_id: "EXAVITQu4vr4xnSDxMaL",
            description: "Soft, narrative female voice",
        },
    ];

    /// Default narration voice.
    pub fn default_voice() -> &'static VoicePreset {
        &Self::ALL[0]
    }

    /// Look up a preset by display name, case-insensitive.
    pub fn by_name(name: &str) -> Option<&'static VoicePreset> {
        Self::ALL
            .iter()
            .find(|v| v.name.eq_ignore_ascii_case(name.trim()))
    }
}
