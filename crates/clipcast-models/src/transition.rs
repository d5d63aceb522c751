//! Transition styles and their encoder effect mapping.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error for transition names outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported transition '{0}'")]
pub struct UnknownTransition(pub String);

/// How adjacent segments are joined in the merged highlight.
///
/// Styles are mapped to the encoder's named xfade effects, never passed
/// through verbatim. `Cut` bypasses transition compositing entirely and
/// uses plain concatenation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransitionStyle {
    #[default]
    Fade,
    FadeBlack,
    Crossfade,
    Slide,
    Zoom,
    Wipe,
    Cut,
    Auto,
}

impl TransitionStyle {
    /// The encoder's xfade effect name, or `None` for plain concatenation.
    pub fn effect(&self) -> Option<&'static str> {
        match self {
            TransitionStyle::Fade => Some("fade"),
            TransitionStyle::FadeBlack => Some("fadeblack"),
            TransitionStyle::Crossfade => Some("fade"),
            TransitionStyle::Slide => Some("slideleft"),
            TransitionStyle::Zoom => Some("zoom"),
            TransitionStyle::Wipe => Some("wipeleft"),
            TransitionStyle::Cut => None,
            TransitionStyle::Auto => Some("fade"),
        }
    }

    /// Whether this style concatenates without any blend.
    pub fn is_cut(&self) -> bool {
        matches!(self, TransitionStyle::Cut)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionStyle::Fade => "fade",
            TransitionStyle::FadeBlack => "fadeblack",
            TransitionStyle::Crossfade => "crossfade",
            TransitionStyle::Slide => "slide",
            TransitionStyle::Zoom => "zoom",
            TransitionStyle::Wipe => "wipe",
            TransitionStyle::Cut => "cut",
            TransitionStyle::Auto => "auto",
        }
    }
}

impl fmt::Display for TransitionStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransitionStyle {
    type Err = UnknownTransition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fade" => Ok(TransitionStyle::Fade),
            "fadeblack" => Ok(TransitionStyle::FadeBlack),
            "crossfade" => Ok(TransitionStyle::Crossfade),
            "slide" => Ok(TransitionStyle::Slide),
            "zoom" => Ok(TransitionStyle::Zoom),
            "wipe" => Ok(TransitionStyle::Wipe),
            "cut" => Ok(TransitionStyle::Cut),
            "auto" => Ok(TransitionStyle::Auto),
            other => Err(UnknownTransition(other.to_string())),
        }
    }
}
