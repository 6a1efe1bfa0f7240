//! View derivation: the pure filter/count/paginate pipeline.
//!
//! `derive_slice` is the only place this algorithm exists. It is synchronous,
//! side-effect-free, and re-run by the store whenever one of its inputs
//! changes; nothing else may write a `VisibleSlice`.

use serde::{Deserialize, Serialize};

use crate::model::Book;

/// Client-only view parameters. `page` counts from 1; `page_size` must be
/// greater than zero. The remote store never sees these.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewState {
    pub search_text: String,
    pub page: usize,
    pub page_size: usize,
}

impl ViewState {
    pub fn new(page_size: usize) -> Self {
        Self {
            search_text: String::new(),
            page: 1,
            page_size,
        }
    }
}

/// The derived, filtered, paginated window over the full set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VisibleSlice {
    pub records: Vec<Book>,
    pub total_count: usize,
    pub total_pages: usize,
}

/// Compute the visible slice for `view` over `books`.
///
/// Steps, in order: keep records whose title or author contains the search
/// text case-insensitively (empty search keeps everything), count the
/// survivors, then slice out the requested page preserving order.
///
/// `total_pages` is never less than 1, even for an empty result. A `page`
/// past the bound yields an empty `records` without correcting `page`;
/// clamping navigation is the caller's job.
pub fn derive_slice(books: &[Book], view: &ViewState) -> VisibleSlice {
    let filtered: Vec<&Book> = if view.search_text.is_empty() {
        books.iter().collect()
    } else {
        let needle = view.search_text.to_lowercase();
        books
            .iter()
            .filter(|b| {
                b.title.to_lowercase().contains(&needle)
                    || b.author.to_lowercase().contains(&needle)
            })
            .collect()
    };

    let total_count = filtered.len();
    let total_pages = std::cmp::max(1, total_count.div_ceil(view.page_size));

    let start = view.page.saturating_sub(1) * view.page_size;
    let records = filtered
        .into_iter()
        .skip(start)
        .take(view.page_size)
        .cloned()
        .collect();

    VisibleSlice {
        records,
        total_count,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: i64, title: &str, author: &str, year: i32) -> Book {
        Book {
            id,
            title: title.into(),
            author: author.into(),
            isbn: format!("isbn-{id}"),
            year,
            is_available: true,
        }
    }

    fn view(search: &str, page: usize, page_size: usize) -> ViewState {
        ViewState {
            search_text: search.into(),
            page,
            page_size,
        }
    }

    #[test]
    fn single_record_single_page() {
        let books = vec![book(1, "Dune", "Herbert", 1965)];
        let slice = derive_slice(&books, &view("", 1, 10));
        assert_eq!(slice.records, books);
        assert_eq!(slice.total_count, 1);
        assert_eq!(slice.total_pages, 1);
    }

    #[test]
    fn last_page_holds_the_remainder() {
        let books: Vec<Book> = (1..=12)
            .map(|i| book(i, &format!("Book {i}"), "Author", 2000))
            .collect();
        let slice = derive_slice(&books, &view("", 3, 5));
        assert_eq!(slice.records.len(), 2);
        assert_eq!(slice.total_pages, 3);
        assert_eq!(slice.total_count, 12);
        assert_eq!(slice.records[0].id, 11);
    }

    #[test]
    fn search_matches_title_case_insensitively() {
        let books = vec![
            book(1, "Dune", "Herbert", 1965),
            book(2, "Foundation", "Asimov", 1951),
        ];
        let slice = derive_slice(&books, &view("dun", 1, 10));
        assert_eq!(slice.records.len(), 1);
        assert_eq!(slice.records[0].title, "Dune");
    }

    #[test]
    fn search_matches_author_too() {
        let books = vec![
            book(1, "Dune", "Herbert", 1965),
            book(2, "Foundation", "Asimov", 1951),
        ];
        let slice = derive_slice(&books, &view("ASIMOV", 1, 10));
        assert_eq!(slice.records.len(), 1);
        assert_eq!(slice.records[0].id, 2);
    }

    #[test]
    fn empty_set_still_reports_one_page() {
        let slice = derive_slice(&[], &view("", 1, 10));
        assert!(slice.records.is_empty());
        assert_eq!(slice.total_count, 0);
        assert_eq!(slice.total_pages, 1);
    }

    #[test]
    fn page_past_bound_is_empty_but_pages_stay_correct() {
        let books: Vec<Book> = (1..=4)
            .map(|i| book(i, &format!("Book {i}"), "Author", 2000))
            .collect();
        let slice = derive_slice(&books, &view("book", 5, 2));
        assert!(slice.records.is_empty());
        assert_eq!(slice.total_pages, 2);
        assert_eq!(slice.total_count, 4);
    }

    #[test]
    fn slice_never_exceeds_page_size() {
        let books: Vec<Book> = (1..=37)
            .map(|i| book(i, &format!("Book {i}"), "Author", 2000))
            .collect();
        for page in 1..=6 {
            let slice = derive_slice(&books, &view("", page, 7));
            assert!(slice.records.len() <= 7);
            assert!(slice.total_pages >= 1);
        }
    }

    #[test]
    fn filtered_order_is_preserved() {
        let books = vec![
            book(3, "A Dune Sequel", "Herbert", 1969),
            book(1, "Dune", "Herbert", 1965),
            book(2, "Foundation", "Asimov", 1951),
        ];
        let slice = derive_slice(&books, &view("dune", 1, 10));
        let ids: Vec<i64> = slice.records.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }
}
