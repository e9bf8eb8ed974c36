use std::fmt;

/// Degradations that occurred during a conversion without failing it.
/// Surfaced in the result envelope so callers can tell when the pipeline
/// substituted fabricated content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionWarning {
    /// The external encoder was unavailable or failed; a synthetic tone
    /// was fed into the pipeline instead of the real audio.
    SyntheticAudioSubstituted,
    /// Every transcription attempt failed and the configured placeholder
    /// transcript was used instead.
    PlaceholderTranscriptUsed,
}

impl ConversionWarning {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversionWarning::SyntheticAudioSubstituted => "synthetic_audio_substituted",
            ConversionWarning::PlaceholderTranscriptUsed => "placeholder_transcript_used",
        }
    }
}

impl fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
