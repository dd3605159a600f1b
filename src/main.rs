use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dialoguer::{Input, theme::ColorfulTheme};

mod api;
mod catalog;
mod config;
mod mark;
mod menu;
mod report;
mod selection;
mod types;

use api::ApiClient;
use catalog::Catalog;
use config::AppConfig;
use mark::{MarkScope, mark_videos};
use menu::{Choice, parse_choice, toggle_selection};
use report::{CountStyle, ReportFilter, render_channel_menu, render_report};
use selection::SelectionStore;

#[derive(Debug, Parser)]
#[command(
    name = "tawatch",
    about = "Curate followed channels and bulk-toggle watched state on a TubeArchivist server.",
    version
)]
struct Cli {
    /// Configuration file (defaults to ./tawatch.toml, then the user config dir).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the report for followed channels and toggle which are followed.
    Curate,
    /// Mark every video of the followed channels as watched.
    MarkWatched,
    /// Pick a channel and mark all of its videos as unwatched.
    MarkUnwatched,
}

#[tokio::main]
async fn main() -> Result<()> {
    let result = run().await;
    if let Err(err) = &result {
        eprintln!("error: {err:?}");
    }
    result
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;
    if config.token.is_empty() {
        println!("Warning: no API token configured; set TAWATCH_TOKEN or add one to tawatch.toml.");
    }
    let client = ApiClient::new(&config)?;
    let store = SelectionStore::new(&config.selection_file);

    match cli.command.unwrap_or(Command::Curate) {
        Command::Curate => run_curate(&client, &store).await,
        Command::MarkWatched => run_mark_watched(&client, &store).await,
        Command::MarkUnwatched => run_mark_unwatched(&client, &config).await,
    }
}

/// Report the followed channels' videos, then loop over the selection menu
/// until the user quits. Every toggle rewrites the selection document.
async fn run_curate(client: &ApiClient, store: &SelectionStore) -> Result<()> {
    let channels = client.fetch_channels().await;
    if channels.is_empty() {
        println!("No channels fetched. Exiting.");
        return Ok(());
    }
    let mut selected = store.load();
    let videos = client.fetch_videos().await;
    let catalog = Catalog::build(channels, videos);

    println!("\n=== Channel and Video Report ===");
    print!(
        "{}",
        render_report(&catalog, &ReportFilter::Selected(&selected), CountStyle::Total)
    );

    loop {
        println!("\n=== Channel Selection ===");
        print!(
            "{}",
            render_channel_menu(&catalog, Some(&selected), CountStyle::Total)
        );
        println!("\nEnter the number of a channel to toggle selection, or 'q' to quit.");
        let choice = prompt_choice()?;
        match parse_choice(&choice, catalog.channel_count()) {
            Choice::Quit => break,
            Choice::Pick(index) => toggle_selection(&catalog, &mut selected, index, store),
            Choice::OutOfRange => println!("Invalid index"),
            Choice::NotANumber => println!("Please enter a valid number"),
        }
    }
    Ok(())
}

/// Mark every not-yet-watched video of the followed channels as watched.
/// A missing selection document means there is nothing to do.
async fn run_mark_watched(client: &ApiClient, store: &SelectionStore) -> Result<()> {
    let entries = store.entries();
    if entries.is_empty() {
        println!("No selected channels. Exiting.");
        return Ok(());
    }
    println!(
        "Loaded {} channels from {}:",
        entries.len(),
        store.path().display()
    );
    for entry in &entries {
        println!("  - {} ({})", entry.channel_name, entry.channel_id);
    }
    let selected: HashSet<String> = entries.into_iter().map(|ch| ch.channel_id).collect();
    println!("Processing videos for {} selected channels.", selected.len());

    let videos = client.fetch_videos().await;
    if videos.is_empty() {
        println!("No videos fetched. Exiting.");
        return Ok(());
    }
    let catalog = Catalog::build(Vec::new(), videos);

    let outcome = mark_videos(
        client,
        &catalog,
        &MarkScope::Selection(&selected),
        true,
        true,
    )
    .await;
    println!(
        "\nProcessed {} videos from selected channels.",
        outcome.processed
    );
    println!("Marked {} videos as watched.", outcome.marked);
    Ok(())
}

/// Show the full watched/unwatched report, then loop letting the user pick a
/// channel whose videos all get marked unwatched. The catalog is refetched
/// after every pass so the counts reflect the mutations just made.
async fn run_mark_unwatched(client: &ApiClient, config: &AppConfig) -> Result<()> {
    loop {
        let channels = client.fetch_channels().await;
        if channels.is_empty() {
            println!("No channels fetched. Exiting.");
            return Ok(());
        }
        let videos = client.fetch_videos().await;
        let catalog = Catalog::build(channels, videos);

        println!("\n=== Channel and Video Report ===");
        print!(
            "{}",
            render_report(
                &catalog,
                &ReportFilter::ChannelsWithVideos,
                CountStyle::WatchedSplit
            )
        );

        println!("\n=== Channel Selection ===");
        print!(
            "{}",
            render_channel_menu(&catalog, None, CountStyle::WatchedSplit)
        );
        println!("Enter the number of a channel to mark all videos as unwatched, or 'q' to quit.");
        let choice = prompt_choice()?;
        match parse_choice(&choice, catalog.channel_count()) {
            Choice::Quit => {
                println!("Exiting.");
                return Ok(());
            }
            Choice::Pick(index) => {
                let channels = catalog.channels_by_name();
                let channel = channels[index];
                println!(
                    "Marking all videos as unwatched for {}...",
                    channel.channel_name
                );
                let outcome = mark_videos(
                    client,
                    &catalog,
                    &MarkScope::Channel(channel.channel_id.as_str()),
                    false,
                    config.symmetric_marking,
                )
                .await;
                println!(
                    "Marked {} videos as unwatched for {}.",
                    outcome.marked, channel.channel_name
                );
            }
            Choice::OutOfRange => println!("Invalid index."),
            Choice::NotANumber => println!("Please enter a valid number or 'q'."),
        }
    }
}

fn prompt_choice() -> Result<String> {
    let choice: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Choice")
        .allow_empty(true)
        .interact_text()?;
    Ok(choice)
}
