//! Mutation coordination and the presentation-facing surface.
//!
//! [`Catalog`] wraps the gateway and the collection store. Each coordinated
//! operation follows the same shape: mark the store loading, call the
//! gateway, then apply the outcome. The store mutex is never held across the
//! gateway await, so independently initiated mutations interleave freely and
//! each applies its own result when it resolves. With overlapping operations
//! the loading flag tracks the most recently finishing one; that is a
//! documented limitation of the surface, not something this layer corrects.

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::api::BookApi;
use crate::model::{Book, BookPatch, BookQuery, NewBook};
use crate::store::{BookStore, PageInfo};

#[derive(Clone)]
pub struct Catalog {
    api: Arc<dyn BookApi>,
    store: Arc<Mutex<BookStore>>,
}

impl Catalog {
    pub fn new(api: Arc<dyn BookApi>, page_size: usize) -> Self {
        Self {
            api,
            store: Arc::new(Mutex::new(BookStore::new(page_size))),
        }
    }

    /// Refresh the full set from the store. On failure the previous set is
    /// kept and the error is recorded; page and page size stay put either
    /// way. Search text is a client concern and is not part of the hint.
    pub async fn fetch_books(&self, hint: Option<BookQuery>) {
        self.store.lock().await.begin_operation();
        let res = self.api.fetch_all(hint.as_ref()).await;
        let mut store = self.store.lock().await;
        store.finish_operation();
        match res {
            Ok(books) => {
                info!(count = books.len(), "fetched book collection");
                store.replace_all(books);
            }
            Err(err) => {
                warn!(?err, "failed to fetch books");
                store.set_error(format!("failed to fetch books: {err:#}"));
            }
        }
    }

    /// Create a book and append the store's response to the cached set.
    /// Returns whether the operation succeeded; on failure the error is
    /// available through [`Catalog::error`].
    pub async fn create_book(&self, draft: NewBook) -> bool {
        self.store.lock().await.begin_operation();
        let res = self.api.create(&draft).await;
        let mut store = self.store.lock().await;
        store.finish_operation();
        match res {
            Ok(book) => {
                info!(id = book.id, "created book");
                store.append(book);
                true
            }
            Err(err) => {
                warn!(?err, "failed to create book");
                store.set_error(format!("failed to create book: {err:#}"));
                false
            }
        }
    }

    /// Update a book and replace the cached record with the store's
    /// response. The response is authoritative; no local field merge. An id
    /// that is no longer cached locally leaves the set untouched.
    pub async fn update_book(&self, id: i64, patch: BookPatch) -> bool {
        self.store.lock().await.begin_operation();
        let res = self.api.update(id, &patch).await;
        let mut store = self.store.lock().await;
        store.finish_operation();
        match res {
            Ok(book) => {
                info!(id, "updated book");
                store.apply_update(book);
                true
            }
            Err(err) => {
                warn!(?err, id, "failed to update book");
                store.set_error(format!("failed to update book: {err:#}"));
                false
            }
        }
    }

    /// Delete a book and drop it from the cached set.
    pub async fn delete_book(&self, id: i64) -> bool {
        self.store.lock().await.begin_operation();
        let res = self.api.delete(id).await;
        let mut store = self.store.lock().await;
        store.finish_operation();
        match res {
            Ok(()) => {
                info!(id, "deleted book");
                store.remove(id);
                true
            }
            Err(err) => {
                warn!(?err, id, "failed to delete book");
                store.set_error(format!("failed to delete book: {err:#}"));
                false
            }
        }
    }

    pub async fn handle_search(&self, text: impl Into<String>) {
        self.store.lock().await.set_search_text(text);
    }

    pub async fn handle_page_change(&self, page: usize) {
        self.store.lock().await.set_page(page);
    }

    pub async fn handle_page_size_change(&self, page_size: usize) {
        self.store.lock().await.set_page_size(page_size);
    }

    pub async fn clear_error(&self) {
        self.store.lock().await.clear_error();
    }

    /// The records of the current visible slice.
    pub async fn books(&self) -> Vec<Book> {
        self.store.lock().await.visible().records.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.store.lock().await.is_loading()
    }

    pub async fn error(&self) -> Option<String> {
        self.store.lock().await.error().map(str::to_owned)
    }

    pub async fn pagination(&self) -> PageInfo {
        self.store.lock().await.page_info()
    }
}
