use serde::{Deserialize, Serialize};

/// A content source as returned by the channel endpoint. Identity is always
/// `channel_id`; names are display-only and not unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub channel_name: String,
}

/// One video record as returned by the video endpoint. Every field the server
/// may omit is optional; the accessors below apply the fallback rules.
#[derive(Debug, Clone, Deserialize)]
pub struct Video {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub vid_type: Option<String>,
    #[serde(default)]
    pub published: Option<String>,
    #[serde(default)]
    pub youtube_id: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub video_id: Option<String>,
    #[serde(default)]
    pub channel: Option<ChannelRef>,
    #[serde(default)]
    pub player: Option<PlayerState>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChannelRef {
    #[serde(default)]
    pub channel_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerState {
    #[serde(default)]
    pub watched: bool,
}

impl Video {
    pub fn title(&self) -> &str {
        non_empty(&self.title).unwrap_or("Untitled")
    }

    pub fn vid_type(&self) -> &str {
        non_empty(&self.vid_type).unwrap_or("Unknown")
    }

    /// External identifier usable for display and for the watched endpoint.
    /// Preference order: `youtube_id`, `id`, `video_id`; first non-empty wins.
    pub fn external_id(&self) -> Option<&str> {
        non_empty(&self.youtube_id)
            .or_else(|| non_empty(&self.id))
            .or_else(|| non_empty(&self.video_id))
    }

    /// Owning channel id from the nested channel reference, if present.
    pub fn channel_id(&self) -> Option<&str> {
        self.channel
            .as_ref()
            .and_then(|ch| non_empty(&ch.channel_id))
    }

    pub fn watched(&self) -> bool {
        self.player.as_ref().is_some_and(|p| p.watched)
    }

    /// Sort key for newest-first ordering. Videos without a publication date
    /// compare below every dated video so they land at the end of a
    /// descending sort.
    pub fn published_sort_key(&self) -> Option<&str> {
        non_empty(&self.published)
    }

    /// Date portion of `published`: text before the first `T`, the raw value
    /// when there is no separator, or `Unknown` when absent.
    pub fn display_date(&self) -> &str {
        match non_empty(&self.published) {
            Some(published) => match published.split_once('T') {
                Some((date, _)) => date,
                None => published,
            },
            None => "Unknown",
        }
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}
