use super::{Poll, PollId, User, UserId};
use serde::Deserialize;

/// Records that can be de-duplicated by their server identity.
pub trait Identified {
    type Id: PartialEq + Copy;

    fn id(&self) -> Self::Id;
}

impl Identified for Poll {
    type Id = PollId;

    fn id(&self) -> PollId {
        self.id
    }
}

impl Identified for User {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.id
    }
}

/// One page as returned by the list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub rows: Vec<T>,
    #[serde(default)]
    pub count: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Errored,
}

/// Identifies the fetch a completion belongs to.
///
/// A reset to page 1 bumps the collection generation, so completions of
/// fetches dispatched before the reset no longer apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub page: u32,
    generation: u64,
}

#[derive(Debug, Clone)]
pub struct PaginatedCollection<T> {
    items: Vec<T>,
    current_page: u32,
    page_size: u32,
    total_count: Option<u64>,
    has_more: bool,
    state: LoadState,
    error: Option<String>,
    generation: u64,
}

impl<T: Identified> PaginatedCollection<T> {
    pub fn new(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            current_page: 0,
            page_size: page_size.max(1),
            total_count: None,
            has_more: true,
            state: LoadState::Idle,
            error: None,
            generation: 0,
        }
    }

    /// Marks a fetch of `page` as outstanding. Page 1 starts the list over.
    pub fn begin_fetch(&mut self, page: u32) -> FetchTicket {
        if page <= 1 {
            self.reset();
        }
        self.state = LoadState::Loading;
        self.error = None;
        FetchTicket {
            page: page.max(1),
            generation: self.generation,
        }
    }

    /// Appends the rows not already present. Returns false for a stale ticket.
    pub fn apply_page(&mut self, ticket: FetchTicket, page: Page<T>) -> bool {
        if ticket.generation != self.generation {
            return false;
        }

        let received = page.rows.len();
        for row in page.rows {
            let id = row.id();
            if !self.items.iter().any(|existing| existing.id() == id) {
                self.items.push(row);
            }
        }

        self.current_page = ticket.page;
        if page.count.is_some() {
            self.total_count = page.count;
        }

        let short_page = received < self.page_size as usize;
        let reached_total = self
            .total_count
            .is_some_and(|total| self.items.len() as u64 >= total);
        if short_page || reached_total {
            self.has_more = false;
        }

        self.state = LoadState::Loaded;
        true
    }

    /// Records a failed fetch, keeping accumulated items.
    pub fn fail(&mut self, ticket: FetchTicket, message: impl Into<String>) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        self.state = LoadState::Errored;
        self.error = Some(message.into());
        true
    }

    pub fn reset(&mut self) {
        self.items.clear();
        self.current_page = 0;
        self.total_count = None;
        self.has_more = true;
        self.state = LoadState::Idle;
        self.error = None;
        self.generation += 1;
    }

    /// Changing the page size invalidates the accumulated window.
    pub fn set_page_size(&mut self, page_size: u32) {
        self.page_size = page_size.max(1);
        self.reset();
    }

    pub fn prepend(&mut self, item: T) {
        let id = item.id();
        self.items.retain(|existing| existing.id() != id);
        self.items.insert(0, item);
    }

    pub fn remove(&mut self, id: T::Id) -> Option<T> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(index))
    }

    pub fn find(&self, id: T::Id) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn find_mut(&mut self, id: T::Id) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn items_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn next_page(&self) -> u32 {
        self.current_page + 1
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    pub fn total_pages(&self) -> Option<u64> {
        self.total_count
            .map(|total| total.div_ceil(u64::from(self.page_size)))
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}
