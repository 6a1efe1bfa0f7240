//! Collection store: single source of truth for the cached record set and
//! transient UI state.
//!
//! Every transition is a named method from the current state and an input to
//! the next state. Transitions that touch a derivation input (the full set,
//! search text, page, page size) re-run `derive_slice` before returning, so
//! the memoized visible slice is always consistent with the inputs.

use serde::{Deserialize, Serialize};

use crate::model::Book;
use crate::view::{derive_slice, ViewState, VisibleSlice};

/// Pagination metadata handed to the presentation layer alongside the
/// visible records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageInfo {
    pub page: usize,
    pub page_size: usize,
    pub total_count: usize,
    pub total_pages: usize,
}

/// Owns the full fetched set, the view parameters, the loading flag, and the
/// last error. Mutated only through the methods below.
#[derive(Debug, Clone)]
pub struct BookStore {
    all_books: Vec<Book>,
    view: ViewState,
    is_loading: bool,
    error: Option<String>,
    visible: VisibleSlice,
}

impl BookStore {
    pub fn new(page_size: usize) -> Self {
        let view = ViewState::new(page_size);
        let visible = derive_slice(&[], &view);
        Self {
            all_books: Vec::new(),
            view,
            is_loading: false,
            error: None,
            visible,
        }
    }

    fn rederive(&mut self) {
        self.visible = derive_slice(&self.all_books, &self.view);
    }

    /// An operation is starting: loading on, previous error cleared.
    pub fn begin_operation(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    /// An operation finished, successfully or not. With overlapping
    /// operations this is last-writer-wins; the flag tracks the most
    /// recently finishing operation, not a count.
    pub fn finish_operation(&mut self) {
        self.is_loading = false;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Replace the full set wholesale after a successful fetch. Page and
    /// page size are left where they were.
    pub fn replace_all(&mut self, books: Vec<Book>) {
        self.all_books = books;
        self.rederive();
    }

    /// Append a freshly created record to the end of the set.
    pub fn append(&mut self, book: Book) {
        self.all_books.push(book);
        self.rederive();
    }

    /// Replace the record with `updated.id` by the store's response. The
    /// response is authoritative; no local field merging. If the id is not
    /// present locally this is a silent no-op.
    pub fn apply_update(&mut self, updated: Book) {
        if let Some(slot) = self.all_books.iter_mut().find(|b| b.id == updated.id) {
            *slot = updated;
            self.rederive();
        }
    }

    /// Remove the record with `id`. Silent no-op if it is not present.
    pub fn remove(&mut self, id: i64) {
        let before = self.all_books.len();
        self.all_books.retain(|b| b.id != id);
        if self.all_books.len() != before {
            self.rederive();
        }
    }

    /// A new search invalidates the old page position.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.view.search_text = text.into();
        self.view.page = 1;
        self.rederive();
    }

    /// No clamping here; consumers are expected to disable navigation past
    /// the bounds reported in `page_info`.
    pub fn set_page(&mut self, page: usize) {
        self.view.page = page;
        self.rederive();
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.view.page_size = page_size;
        self.view.page = 1;
        self.rederive();
    }

    pub fn visible(&self) -> &VisibleSlice {
        &self.visible
    }

    pub fn page_info(&self) -> PageInfo {
        PageInfo {
            page: self.view.page,
            page_size: self.view.page_size,
            total_count: self.visible.total_count,
            total_pages: self.visible.total_pages,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn all_books(&self) -> &[Book] {
        &self.all_books
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: i64, title: &str) -> Book {
        Book {
            id,
            title: title.into(),
            author: "Author".into(),
            isbn: format!("isbn-{id}"),
            year: 2000,
            is_available: true,
        }
    }

    fn seeded(count: i64, page_size: usize) -> BookStore {
        let mut store = BookStore::new(page_size);
        store.replace_all((1..=count).map(|i| book(i, &format!("Book {i}"))).collect());
        store
    }

    #[test]
    fn search_resets_page_to_one() {
        let mut store = seeded(30, 10);
        store.set_page(3);
        store.set_search_text("book");
        assert_eq!(store.view().page, 1);
    }

    #[test]
    fn page_size_change_resets_page_to_one() {
        let mut store = seeded(30, 10);
        store.set_page(2);
        store.set_page_size(5);
        assert_eq!(store.view().page, 1);
        assert_eq!(store.page_info().total_pages, 6);
    }

    #[test]
    fn search_is_idempotent() {
        let mut store = seeded(12, 5);
        store.set_search_text("book 1");
        let once = store.visible().clone();
        store.set_search_text("book 1");
        assert_eq!(store.visible(), &once);
    }

    #[test]
    fn update_of_absent_id_is_a_noop() {
        let mut store = seeded(3, 10);
        let before = store.all_books().to_vec();
        store.apply_update(book(99, "Ghost"));
        assert_eq!(store.all_books(), before.as_slice());
    }

    #[test]
    fn update_replaces_exactly_one_record() {
        let mut store = seeded(3, 10);
        let mut changed = book(2, "Book 2");
        changed.is_available = false;
        store.apply_update(changed.clone());
        assert_eq!(store.all_books()[1], changed);
        assert!(store.all_books()[0].is_available);
        assert!(store.all_books()[2].is_available);
    }

    #[test]
    fn remove_drops_the_record_from_the_slice() {
        let mut store = seeded(3, 10);
        store.remove(2);
        assert!(store.visible().records.iter().all(|b| b.id != 2));
        assert_eq!(store.page_info().total_count, 2);
    }

    #[test]
    fn begin_clears_error_and_sets_loading() {
        let mut store = BookStore::new(10);
        store.set_error("boom");
        store.begin_operation();
        assert!(store.is_loading());
        assert!(store.error().is_none());
        store.finish_operation();
        assert!(!store.is_loading());
    }

    #[test]
    fn clear_error_touches_nothing_else() {
        let mut store = seeded(5, 10);
        store.set_page(2);
        store.set_error("boom");
        store.clear_error();
        assert!(store.error().is_none());
        assert_eq!(store.view().page, 2);
        assert_eq!(store.all_books().len(), 5);
    }

    #[test]
    fn replace_all_keeps_page_position() {
        let mut store = seeded(30, 10);
        store.set_page(2);
        store.replace_all((1..=15).map(|i| book(i, &format!("Book {i}"))).collect());
        assert_eq!(store.view().page, 2);
        assert_eq!(store.page_info().total_pages, 2);
    }
}
