// Collection pages and the cursor protocol
//
// The service pages with a single opaque `cursor` token per response that
// leads to the next page. Going back is done by replaying the token that
// fetched the previous page, so a `PageCursor` keeps the trail of tokens
// used to reach the current page. Every token in it came from the service;
// none is ever built or inspected here.

use serde::Deserialize;

use super::entity::Entity;

/// Wire shape of a Usergrid GET response: `{ "entities": [...], "cursor": "..." }`.
#[derive(Debug, Deserialize)]
pub(crate) struct GetResponse<T> {
    #[serde(default = "Vec::new")]
    pub entities: Vec<T>,
    #[serde(default)]
    pub cursor: Option<String>,
}

// ── Cursor ───────────────────────────────────────────────────────────

/// Position of one page within a listing, enough to fetch its neighbours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    collection: String,
    limit: u32,
    query: Option<String>,
    /// Token used to fetch each page up to the current one; `None` is the
    /// first page. Never empty.
    trail: Vec<Option<String>>,
    /// Token the service issued for the page after this one.
    next: Option<String>,
}

impl PageCursor {
    pub(crate) fn first(collection: &str, limit: u32, query: Option<&str>) -> Self {
        Self {
            collection: collection.to_owned(),
            limit,
            query: query.map(str::to_owned),
            trail: vec![None],
            next: None,
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Zero-based index of the page this cursor points at.
    pub fn page_index(&self) -> usize {
        self.trail.len().saturating_sub(1)
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn has_previous(&self) -> bool {
        self.trail.len() > 1
    }

    /// Service token for the following page.
    pub fn next_cursor(&self) -> Option<&str> {
        self.next.as_deref()
    }

    /// Service token for the preceding page. `None` both when there is no
    /// previous page and when the previous page is the first one, which is
    /// fetched without a token; use [`has_previous`](Self::has_previous) to
    /// tell them apart.
    pub fn previous_cursor(&self) -> Option<&str> {
        self.trail
            .len()
            .checked_sub(2)
            .and_then(|i| self.trail.get(i))
            .and_then(Option::as_deref)
    }

    /// Token that fetched the current page.
    pub(crate) fn position(&self) -> Option<&str> {
        self.trail.last().and_then(Option::as_deref)
    }

    pub(crate) fn with_next(mut self, next: Option<String>) -> Self {
        self.next = next;
        self
    }

    /// Cursor for the following page, before its own `next` is known.
    pub(crate) fn forward(&self) -> Option<Self> {
        let token = self.next.clone()?;
        let mut trail = self.trail.clone();
        trail.push(Some(token));
        Some(Self {
            collection: self.collection.clone(),
            limit: self.limit,
            query: self.query.clone(),
            trail,
            next: None,
        })
    }

    /// Cursor for the preceding page, before its own `next` is known.
    pub(crate) fn backward(&self) -> Option<Self> {
        if !self.has_previous() {
            return None;
        }
        let mut trail = self.trail.clone();
        trail.pop();
        Some(Self {
            collection: self.collection.clone(),
            limit: self.limit,
            query: self.query.clone(),
            trail,
            next: None,
        })
    }
}

// ── Collection page ──────────────────────────────────────────────────

/// One page of entities from a collection listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    entities: Vec<Entity<T>>,
    cursor: PageCursor,
}

impl<T> Collection<T> {
    pub(crate) fn new(entities: Vec<Entity<T>>, cursor: PageCursor) -> Self {
        Self { entities, cursor }
    }

    /// A page with no entities and nowhere to go.
    pub(crate) fn empty(collection: &str, limit: u32, query: Option<&str>) -> Self {
        Self::new(Vec::new(), PageCursor::first(collection, limit, query))
    }

    pub fn entities(&self) -> &[Entity<T>] {
        &self.entities
    }

    pub fn into_entities(self) -> Vec<Entity<T>> {
        self.entities
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entity<T>> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn cursor(&self) -> &PageCursor {
        &self.cursor
    }

    pub fn has_next(&self) -> bool {
        self.cursor.has_next()
    }

    pub fn has_previous(&self) -> bool {
        self.cursor.has_previous()
    }

    pub fn next_cursor(&self) -> Option<&str> {
        self.cursor.next_cursor()
    }

    pub fn previous_cursor(&self) -> Option<&str> {
        self.cursor.previous_cursor()
    }
}

impl<T> IntoIterator for Collection<T> {
    type Item = Entity<T>;
    type IntoIter = std::vec::IntoIter<Entity<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a Entity<T>;
    type IntoIter = std::slice::Iter<'a, Entity<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.iter()
    }
}
