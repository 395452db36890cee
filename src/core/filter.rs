use crate::domain::model::Starship;
use std::collections::HashSet;
use tokio::sync::watch;

/// Active film resource URLs.
pub type FilterSet = HashSet<String>;

/// Holds the active film filters and publishes every membership change.
pub struct FilterEngine {
    active: watch::Sender<FilterSet>,
}

impl FilterEngine {
    pub fn new() -> Self {
        Self {
            active: watch::Sender::new(FilterSet::new()),
        }
    }

    /// Activates a film. Adding an already active film changes nothing and
    /// notifies no one.
    pub fn add_filter(&self, film_url: &str) -> bool {
        self.active
            .send_if_modified(|set| set.insert(film_url.to_string()))
    }

    pub fn remove_filter(&self, film_url: &str) -> bool {
        self.active.send_if_modified(|set| set.remove(film_url))
    }

    pub fn clear(&self) {
        self.active.send_if_modified(|set| {
            let changed = !set.is_empty();
            set.clear();
            changed
        });
    }

    pub fn is_active(&self, film_url: &str) -> bool {
        self.active.borrow().contains(film_url)
    }

    pub fn snapshot(&self) -> FilterSet {
        self.active.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FilterSet> {
        self.active.subscribe()
    }

    pub fn filtered_data(&self, all: &[Starship]) -> Vec<Starship> {
        filtered_data(all, &self.active.borrow())
    }
}

impl Default for FilterEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Starships declaring at least one active film, in input order.
/// An empty filter set keeps everything.
///
/// Membership is whatever the starship itself lists. The catalog's film
/// records name starships that do not list the film back; those are not
/// reconciled here.
pub fn filtered_data(all: &[Starship], filters: &FilterSet) -> Vec<Starship> {
    if filters.is_empty() {
        return all.to_vec();
    }

    all.iter()
        .filter(|ship| ship.film_urls.iter().any(|url| filters.contains(url)))
        .cloned()
        .collect()
}
