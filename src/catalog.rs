use std::collections::HashMap;

use crate::types::{Channel, Video};

pub const UNKNOWN_CHANNEL: &str = "Unknown Channel";

/// Normalized view of one fetch: channels deduplicated by id in first-seen
/// order, videos indexed by owning channel, and the id → name lookup every
/// downstream consumer sorts and displays with. Built once per run.
#[derive(Debug, Default)]
pub struct Catalog {
    channels: Vec<Channel>,
    videos_by_channel: HashMap<String, Vec<Video>>,
    names: HashMap<String, String>,
}

impl Catalog {
    pub fn build(channels: Vec<Channel>, videos: Vec<Video>) -> Self {
        let mut deduped = Vec::new();
        let mut names = HashMap::new();
        for channel in channels {
            if channel.channel_id.is_empty() || names.contains_key(&channel.channel_id) {
                continue;
            }
            names.insert(channel.channel_id.clone(), channel.channel_name.clone());
            deduped.push(channel);
        }

        let mut videos_by_channel: HashMap<String, Vec<Video>> = HashMap::new();
        for video in videos {
            let Some(channel_id) = video.channel_id() else {
                continue;
            };
            videos_by_channel
                .entry(channel_id.to_string())
                .or_default()
                .push(video);
        }

        Self {
            channels: deduped,
            videos_by_channel,
            names,
        }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Channels in display order: by name, case-insensitively ascending.
    pub fn channels_by_name(&self) -> Vec<&Channel> {
        let mut sorted: Vec<&Channel> = self.channels.iter().collect();
        sorted.sort_by_key(|ch| ch.channel_name.to_lowercase());
        sorted
    }

    pub fn videos_for(&self, channel_id: &str) -> &[Video] {
        self.videos_by_channel
            .get(channel_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Ids of channels that own at least one video. May include ids the
    /// channel endpoint never returned; `name_of` falls back for those.
    pub fn channel_ids_with_videos(&self) -> impl Iterator<Item = &str> {
        self.videos_by_channel.keys().map(String::as_str)
    }

    pub fn name_of(&self, channel_id: &str) -> &str {
        self.names
            .get(channel_id)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_CHANNEL)
    }

    pub fn names(&self) -> &HashMap<String, String> {
        &self.names
    }

    pub fn watched_split(&self, channel_id: &str) -> (usize, usize) {
        let videos = self.videos_for(channel_id);
        let watched = videos.iter().filter(|v| v.watched()).count();
        (watched, videos.len() - watched)
    }
}
