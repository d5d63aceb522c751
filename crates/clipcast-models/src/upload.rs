//! Upload metadata for publishing a highlight.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Privacy status of the published video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum PrivacyStatus {
    Private,
    Public,
    #[default]
    Unlisted,
}

/// Video metadata sent with the resumable-upload initiation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct UploadMetadata {
    /// Video title
    #[serde(default)]
    pub title: String,

    /// Video description
    #[serde(default)]
    pub description: String,

    /// User-supplied tags
    #[serde(default)]
    pub tags: Vec<String>,

    /// Privacy status for the published video
    #[serde(default)]
    pub privacy_status: PrivacyStatus,

    /// Whether the highlight is published as a short
    #[serde(default)]
    pub shorts_mode: bool,
}

impl UploadMetadata {
    /// Tags as uploaded: in shorts mode a "shorts" tag is appended unless
    /// one is already present (case-insensitive, "#shorts" counts too).
    pub fn effective_tags(&self) -> Vec<String> {
        let mut tags = self.tags.clone();
        if self.shorts_mode {
            let already_tagged = tags.iter().any(|tag| {
                let lowered = tag.to_lowercase();
                lowered == "shorts" || lowered == "#shorts"
            });
            if !already_tagged {
                tags.push("shorts".to_string());
            }
        }
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorts_mode_appends_tag() {
        let metadata = UploadMetadata {
            shorts_mode: true,
            ..Default::default()
        };
        assert_eq!(metadata.effective_tags(), vec!["shorts".to_string()]);
    }

    #[test]
    fn test_shorts_tag_not_duplicated() {
        let metadata = UploadMetadata {
            tags: vec!["#Shorts".to_string()],
            shorts_mode: true,
            ..Default::default()
        };
        assert_eq!(metadata.effective_tags(), vec!["#Shorts".to_string()]);

        let metadata = UploadMetadata {
            tags: vec!["SHORTS".to_string()],
            shorts_mode: true,
            ..Default::default()
        };
        assert_eq!(metadata.effective_tags().len(), 1);
    }

    #[test]
    fn test_tags_untouched_without_shorts_mode() {
        let metadata = UploadMetadata {
            tags: vec!["highlights".to_string()],
            shorts_mode: false,
            ..Default::default()
        };
        assert_eq!(metadata.effective_tags(), vec!["highlights".to_string()]);
    }

    #[test]
    fn test_privacy_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&PrivacyStatus::Unlisted).unwrap(),
            "\"unlisted\""
        );
    }
}
