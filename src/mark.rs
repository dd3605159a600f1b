use std::collections::HashSet;

use anyhow::Result;

use crate::catalog::Catalog;

/// Seam for the watched endpoint so the driver can run against a fake in
/// tests. `ApiClient` is the real implementation.
pub trait WatchedStateSink {
    async fn set_watched(&self, video_id: &str, watched: bool) -> Result<()>;
}

/// Which videos a marking run touches.
pub enum MarkScope<'a> {
    /// Every video owned by one channel.
    Channel(&'a str),
    /// Every video owned by a channel in the selection set.
    Selection(&'a HashSet<String>),
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct MarkOutcome {
    /// In-scope videos with a resolvable id.
    pub processed: usize,
    /// Mutation requests that succeeded.
    pub marked: usize,
    /// Videos skipped because they were already in the target state.
    pub already_satisfied: usize,
}

/// Set the watched flag of every in-scope video to `target`, one independent
/// request per video. Videos without a resolvable id are skipped with a
/// diagnostic; a failed request is logged and does not abort the rest. With
/// `skip_satisfied`, videos already in the target state are counted as
/// satisfied instead of re-submitted.
pub async fn mark_videos(
    sink: &impl WatchedStateSink,
    catalog: &Catalog,
    scope: &MarkScope<'_>,
    target: bool,
    skip_satisfied: bool,
) -> MarkOutcome {
    let channel_ids: Vec<&str> = match scope {
        MarkScope::Channel(id) => vec![*id],
        MarkScope::Selection(selected) => catalog
            .channel_ids_with_videos()
            .filter(|id| selected.contains(*id))
            .collect(),
    };
    let direction = if target { "watched" } else { "unwatched" };

    let mut outcome = MarkOutcome::default();
    for channel_id in channel_ids {
        for video in catalog.videos_for(channel_id) {
            let Some(video_id) = video.external_id() else {
                println!("Skipping video with missing id: {}", video.title());
                continue;
            };
            outcome.processed += 1;
            if skip_satisfied && video.watched() == target {
                println!("Video {video_id} already {direction}: {}", video.title());
                outcome.already_satisfied += 1;
                continue;
            }
            match sink.set_watched(video_id, target).await {
                Ok(()) => {
                    println!("Marked video {video_id} as {direction}: {}", video.title());
                    outcome.marked += 1;
                }
                Err(err) => {
                    println!("Error marking video {video_id} as {direction}: {err:#}");
                }
            }
        }
    }
    outcome
}
