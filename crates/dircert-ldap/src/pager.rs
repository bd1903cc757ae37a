//! Page-cursor iteration.
//!
//! A [`PagedSearch`] holds one buffered page and the server's cookie. The
//! next page is requested only once the buffer is drained, and iteration
//! stops only when the server hands back an empty cookie.

use std::collections::VecDeque;
use std::iter::FusedIterator;

use dircert_core::SourceError;
use tracing::debug;

/// One page of results and the cookie to request the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Empty when this was the last page
    pub cookie: Vec<u8>,
}

/// Something that can fetch a page given the previous page's cookie.
///
/// The first call receives an empty cookie.
pub trait PageFetch {
    type Item;

    fn fetch(&mut self, cookie: &[u8]) -> Result<Page<Self::Item>, SourceError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Start,
    More,
    Exhausted,
    Failed,
}

/// Iterator over every item of a paged search.
///
/// Fused: after an error or the last page it yields `None` forever.
pub struct PagedSearch<F: PageFetch> {
    fetcher: F,
    buffer: VecDeque<F::Item>,
    cookie: Vec<u8>,
    cursor: Cursor,
    pages: u32,
}

impl<F: PageFetch> PagedSearch<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            buffer: VecDeque::new(),
            cookie: Vec::new(),
            cursor: Cursor::Start,
            pages: 0,
        }
    }

    /// Pages fetched so far
    pub const fn pages(&self) -> u32 {
        self.pages
    }
}

impl<F: PageFetch> Iterator for PagedSearch<F> {
    type Item = Result<F::Item, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Some(Ok(item));
            }

            match self.cursor {
                Cursor::Exhausted | Cursor::Failed => return None,
                Cursor::Start | Cursor::More => {}
            }

            match self.fetcher.fetch(&self.cookie) {
                Ok(page) => {
                    self.pages += 1;
                    debug!(
                        page = self.pages,
                        entries = page.items.len(),
                        more = !page.cookie.is_empty(),
                        "fetched page"
                    );
                    self.buffer.extend(page.items);
                    self.cursor = if page.cookie.is_empty() {
                        Cursor::Exhausted
                    } else {
                        Cursor::More
                    };
                    self.cookie = page.cookie;
                }
                Err(e) => {
                    self.cursor = Cursor::Failed;
                    self.buffer.clear();
                    return Some(Err(e));
                }
            }
        }
    }
}

impl<F: PageFetch> FusedIterator for PagedSearch<F> {}
