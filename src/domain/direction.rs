use std::fmt;
use std::str::FromStr;

/// Which way a session converts: audio into an image, or an image into
/// narrated audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversionDirection {
    AudioToImage,
    ImageToAudio,
}

impl ConversionDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversionDirection::AudioToImage => "AUDIO_TO_IMAGE",
            ConversionDirection::ImageToAudio => "IMAGE_TO_AUDIO",
        }
    }
}

impl FromStr for ConversionDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AUDIO_TO_IMAGE" => Ok(ConversionDirection::AudioToImage),
            "IMAGE_TO_AUDIO" => Ok(ConversionDirection::ImageToAudio),
            _ => Err(format!("Invalid conversion direction: {}", s)),
        }
    }
}

impl fmt::Display for ConversionDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
