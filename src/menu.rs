use std::collections::HashSet;

use crate::catalog::Catalog;
use crate::selection::SelectionStore;

/// One parsed line of menu input.
#[derive(Debug, PartialEq, Eq)]
pub enum Choice {
    Quit,
    /// Zero-based index into the displayed, name-sorted channel list.
    Pick(usize),
    OutOfRange,
    NotANumber,
}

/// Interpret menu input against a displayed list of `count` entries. The
/// quit sentinel is a case-insensitive `q`; ordinals are 1-based.
pub fn parse_choice(input: &str, count: usize) -> Choice {
    let trimmed = input.trim();
    if trimmed.eq_ignore_ascii_case("q") {
        return Choice::Quit;
    }
    match trimmed.parse::<usize>() {
        Ok(ordinal) if (1..=count).contains(&ordinal) => Choice::Pick(ordinal - 1),
        Ok(_) => Choice::OutOfRange,
        Err(_) => Choice::NotANumber,
    }
}

/// Flip membership of the channel at `index` in display order, then persist
/// the updated selection through the store. An index past the displayed list
/// leaves the selection untouched.
pub fn toggle_selection(
    catalog: &Catalog,
    selected: &mut HashSet<String>,
    index: usize,
    store: &SelectionStore,
) {
    let channels = catalog.channels_by_name();
    let Some(channel) = channels.get(index) else {
        println!("Invalid index");
        return;
    };
    if selected.remove(&channel.channel_id) {
        println!("Unselected {}", channel.channel_name);
    } else {
        selected.insert(channel.channel_id.clone());
        println!("Selected {}", channel.channel_name);
    }
    store.save(selected, catalog.names());
}
