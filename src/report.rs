use std::collections::HashSet;
use std::fmt::Write;

use crate::catalog::Catalog;
use crate::types::Video;

/// Which channels make it into the report.
pub enum ReportFilter<'a> {
    /// Only channels whose id is in the selection set.
    Selected(&'a HashSet<String>),
    /// Every channel that owns at least one video.
    ChannelsWithVideos,
}

/// Per-channel count column.
#[derive(Clone, Copy)]
pub enum CountStyle {
    Total,
    WatchedSplit,
}

/// Deterministic report: channels sorted by name case-insensitively, videos
/// newest first with undated videos last. An empty result renders a single
/// explanatory line instead of nothing.
pub fn render_report(catalog: &Catalog, filter: &ReportFilter<'_>, style: CountStyle) -> String {
    let mut ids: Vec<&str> = catalog
        .channel_ids_with_videos()
        .filter(|id| match filter {
            ReportFilter::Selected(selected) => selected.contains(*id),
            ReportFilter::ChannelsWithVideos => true,
        })
        .collect();
    ids.sort_by_key(|id| catalog.name_of(id).to_lowercase());

    if ids.is_empty() {
        return match filter {
            ReportFilter::Selected(_) => "No selected channels with videos.\n".to_string(),
            ReportFilter::ChannelsWithVideos => "No channels with videos.\n".to_string(),
        };
    }

    let mut out = String::new();
    for id in ids {
        let mut videos: Vec<&Video> = catalog.videos_for(id).iter().collect();
        videos.sort_by(|a, b| b.published_sort_key().cmp(&a.published_sort_key()));
        let name = catalog.name_of(id);
        match style {
            CountStyle::Total => {
                let _ = writeln!(out, "\nChannel: {name} (ID: {id}, Videos: {})", videos.len());
            }
            CountStyle::WatchedSplit => {
                let (watched, unwatched) = catalog.watched_split(id);
                let _ = writeln!(
                    out,
                    "\nChannel: {name} (ID: {id}, Watched: {watched}, Unwatched: {unwatched})"
                );
            }
        }
        for video in videos {
            out.push_str(&render_video_line(video));
            out.push('\n');
        }
    }
    out
}

fn render_video_line(video: &Video) -> String {
    let check = if video.watched() { 'x' } else { ' ' };
    let id_display = video
        .external_id()
        .map(|id| format!(" ({id})"))
        .unwrap_or_default();
    format!(
        "  - [{check}] {}: {}{id_display} [{}]",
        video.vid_type(),
        video.title(),
        video.display_date()
    )
}

/// Numbered menu of every channel in display order. `selected` turns on the
/// checkbox column; the count column follows `style`.
pub fn render_channel_menu(
    catalog: &Catalog,
    selected: Option<&HashSet<String>>,
    style: CountStyle,
) -> String {
    let mut out = String::new();
    for (i, channel) in catalog.channels_by_name().into_iter().enumerate() {
        let id = &channel.channel_id;
        let status = match selected {
            Some(sel) if sel.contains(id) => "[x] ",
            Some(_) => "[ ] ",
            None => "",
        };
        match style {
            CountStyle::Total => {
                let _ = writeln!(
                    out,
                    "{}. {status}{} ({id}, Videos: {})",
                    i + 1,
                    channel.channel_name,
                    catalog.videos_for(id).len()
                );
            }
            CountStyle::WatchedSplit => {
                let (watched, unwatched) = catalog.watched_split(id);
                let _ = writeln!(
                    out,
                    "{}. {status}{} ({id}, Watched: {watched}, Unwatched: {unwatched})",
                    i + 1,
                    channel.channel_name
                );
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Channel, ChannelRef, PlayerState};

    fn channel(id: &str, name: &str) -> Channel {
        Channel {
            channel_id: id.into(),
            channel_name: name.into(),
        }
    }

    fn video(
        title: &str,
        channel_id: &str,
        published: Option<&str>,
        youtube_id: Option<&str>,
        watched: bool,
    ) -> Video {
        Video {
            title: Some(title.into()),
            vid_type: Some("videos".into()),
            published: published.map(Into::into),
            youtube_id: youtube_id.map(Into::into),
            id: None,
            video_id: None,
            channel: Some(ChannelRef {
                channel_id: Some(channel_id.into()),
            }),
            player: Some(PlayerState { watched }),
        }
    }

    #[test]
    fn channels_render_in_case_insensitive_name_order() {
        let catalog = Catalog::build(
            vec![channel("1", "banana"), channel("2", "Apple")],
            vec![
                video("b", "1", None, None, false),
                video("a", "2", None, None, false),
            ],
        );
        let report = render_report(&catalog, &ReportFilter::ChannelsWithVideos, CountStyle::Total);
        let apple = report.find("Channel: Apple").unwrap();
        let banana = report.find("Channel: banana").unwrap();
        assert!(apple < banana);
    }

    #[test]
    fn videos_render_newest_first_with_undated_last() {
        let catalog = Catalog::build(
            vec![channel("1", "One")],
            vec![
                video("old", "1", Some("2023-05-05T08:00:00Z"), None, false),
                video("undated", "1", None, None, false),
                video("new", "1", Some("2024-01-01T08:00:00Z"), None, false),
            ],
        );
        let report = render_report(&catalog, &ReportFilter::ChannelsWithVideos, CountStyle::Total);
        let new = report.find("new").unwrap();
        let old = report.find("old").unwrap();
        let undated = report.find("undated").unwrap();
        assert!(new < old && old < undated);
        assert!(report.contains("[2024-01-01]"));
        assert!(report.contains("[Unknown]"));
    }

    #[test]
    fn selection_filter_restricts_channels() {
        let catalog = Catalog::build(
            vec![channel("1", "One"), channel("2", "Two")],
            vec![
                video("a", "1", None, None, false),
                video("b", "2", None, None, false),
            ],
        );
        let selected: HashSet<String> = ["1".to_string()].into();
        let report = render_report(&catalog, &ReportFilter::Selected(&selected), CountStyle::Total);
        assert!(report.contains("Channel: One"));
        assert!(!report.contains("Channel: Two"));
    }

    #[test]
    fn empty_selection_renders_explanatory_line() {
        let catalog = Catalog::build(
            vec![channel("1", "One")],
            vec![video("a", "1", None, None, false)],
        );
        let selected = HashSet::new();
        let report = render_report(&catalog, &ReportFilter::Selected(&selected), CountStyle::Total);
        assert_eq!(report, "No selected channels with videos.\n");
    }

    #[test]
    fn video_without_id_renders_without_parenthesized_id() {
        let catalog = Catalog::build(
            vec![channel("1", "One")],
            vec![
                video("anonymous", "1", None, None, false),
                video("known", "1", None, Some("yt1"), true),
            ],
        );
        let report = render_report(&catalog, &ReportFilter::ChannelsWithVideos, CountStyle::Total);
        assert!(report.contains("  - [ ] videos: anonymous [Unknown]"));
        assert!(report.contains("  - [x] videos: known (yt1) [Unknown]"));
    }

    #[test]
    fn watched_split_header_counts_both_sides() {
        let catalog = Catalog::build(
            vec![channel("1", "One")],
            vec![
                video("a", "1", None, None, true),
                video("b", "1", None, None, false),
            ],
        );
        let report = render_report(
            &catalog,
            &ReportFilter::ChannelsWithVideos,
            CountStyle::WatchedSplit,
        );
        assert!(report.contains("(ID: 1, Watched: 1, Unwatched: 1)"));
    }

    #[test]
    fn menu_shows_selection_checkboxes_and_counts() {
        let catalog = Catalog::build(
            vec![channel("1", "banana"), channel("2", "Apple")],
            vec![video("a", "2", None, None, false)],
        );
        let selected: HashSet<String> = ["2".to_string()].into();
        let menu = render_channel_menu(&catalog, Some(&selected), CountStyle::Total);
        assert_eq!(
            menu,
            "1. [x] Apple (2, Videos: 1)\n2. [ ] banana (1, Videos: 0)\n"
        );
    }
}
