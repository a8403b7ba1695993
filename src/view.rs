//! Search filtering and the growing visible window.
//!
//! `ViewState` caches which people match the current query. It must be
//! rebuilt whenever the working set it was computed from changes; the
//! session does this after every mutation.

use crate::config::DEFAULT_PAGE_SIZE;
use crate::models::Person;

#[derive(Debug, Clone)]
pub struct ViewState {
    query: String,
    needle: String,
    page_size: usize,
    display_limit: usize,
    matches: Vec<usize>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ViewState {
    pub fn new(page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            query: String::new(),
            needle: String::new(),
            page_size,
            display_limit: page_size,
            matches: Vec::new(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn display_limit(&self) -> usize {
        self.display_limit
    }

    /// Replace the query, shrink the window back to one page and refilter.
    pub fn set_query(&mut self, query: &str, people: &[Person]) {
        self.query = query.to_string();
        self.needle = query.to_lowercase();
        self.reset_window();
        self.rebuild(people);
    }

    pub fn reset_window(&mut self) {
        self.display_limit = self.page_size;
    }

    /// Recompute the matching rows for `people`.
    pub fn rebuild(&mut self, people: &[Person]) {
        self.matches = if self.needle.is_empty() {
            (0..people.len()).collect()
        } else {
            people
                .iter()
                .enumerate()
                .filter(|(_, p)| p.matches(&self.needle))
                .map(|(idx, _)| idx)
                .collect()
        };
    }

    pub fn filtered_len(&self) -> usize {
        self.matches.len()
    }

    /// All matching people in stored order.
    pub fn filtered<'a>(&'a self, people: &'a [Person]) -> impl Iterator<Item = &'a Person> + 'a {
        self.matches.iter().filter_map(move |&idx| people.get(idx))
    }

    /// The first `display_limit` matching people.
    pub fn visible<'a>(&'a self, people: &'a [Person]) -> Vec<&'a Person> {
        self.filtered(people).take(self.display_limit).collect()
    }

    /// Whether matches remain below the window, i.e. whether the load-more
    /// trigger should be reachable at all.
    pub fn has_more(&self) -> bool {
        self.display_limit < self.matches.len()
    }

    /// Grow the window by one page. Ignored when nothing is left to show.
    pub fn request_more(&mut self) -> bool {
        if !self.has_more() {
            return false;
        }
        self.display_limit += self.page_size;
        true
    }
}
