//! Region selection state.
//!
//! One ordered set of active regions with two transitions (add, remove),
//! both idempotent. The legend and the multiselect control write to the same
//! [`SharedSelection`], so they can never disagree.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

use crate::models::NormalizedRow;

/// Ordered set of active regions. Empty means "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionSelection(Vec<String>);

/// A change coming from either writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    Add(String),
    Remove(String),
    /// Plain legend click selects only that region; shift-click toggles it.
    LegendClick { region: String, additive: bool },
    /// The multiselect control reports its full state.
    Replace(Vec<String>),
    Clear,
}

impl RegionSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma-separated query value, e.g. `Andalucía,Total Nacional`.
    pub fn from_query(query: &str) -> Self {
        query
            .split(',')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .collect()
    }

    /// Returns `true` if the set changed.
    pub fn add(&mut self, region: impl Into<String>) -> bool {
        let region = region.into();
        if self.contains(&region) {
            return false;
        }
        self.0.push(region);
        true
    }

    /// Returns `true` if the set changed.
    pub fn remove(&mut self, region: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|r| r != region);
        self.0.len() != before
    }

    pub fn toggle(&mut self, region: &str) {
        if !self.remove(region) {
            self.add(region);
        }
    }

    pub fn replace<I, S>(&mut self, regions: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let next: RegionSelection = regions.into_iter().collect();
        if next == *self {
            return false;
        }
        *self = next;
        true
    }

    /// Apply an event; returns `true` if the set changed.
    pub fn apply_event(&mut self, event: SelectionEvent) -> bool {
        match event {
            SelectionEvent::Add(region) => self.add(region),
            SelectionEvent::Remove(region) => self.remove(&region),
            SelectionEvent::LegendClick { region, additive: true } => {
                self.toggle(&region);
                true
            }
            SelectionEvent::LegendClick { region, additive: false } => self.replace([region]),
            SelectionEvent::Replace(regions) => self.replace(regions),
            SelectionEvent::Clear => self.replace(Vec::<String>::new()),
        }
    }

    pub fn contains(&self, region: &str) -> bool {
        self.0.iter().any(|r| r == region)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    /// Rows drawn under this selection; an empty selection keeps everything.
    pub fn filter<'r>(&self, rows: &'r [NormalizedRow]) -> Vec<&'r NormalizedRow> {
        rows.iter()
            .filter(|row| self.is_empty() || self.contains(&row.region))
            .collect()
    }
}

impl<S: Into<String>> FromIterator<S> for RegionSelection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut selection = RegionSelection::new();
        for region in iter {
            selection.add(region);
        }
        selection
    }
}

/// Observable selection shared by several writers.
///
/// Clones share the same underlying value.
#[derive(Debug, Clone)]
pub struct SharedSelection {
    sender: Arc<watch::Sender<RegionSelection>>,
}

impl SharedSelection {
    pub fn new(initial: RegionSelection) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Apply an event from any writer; subscribers are notified only on change.
    pub fn apply(&self, event: SelectionEvent) -> bool {
        self.sender.send_if_modified(|selection| selection.apply_event(event))
    }

    pub fn current(&self) -> RegionSelection {
        self.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<RegionSelection> {
        self.sender.subscribe()
    }
}

impl Default for SharedSelection {
    fn default() -> Self {
        Self::new(RegionSelection::default())
    }
}
