//! Paginator Module
//!
//! Splits an ordered list into fixed-size pages and resolves the page number
//! a client asked for into one that exists.

// == Page ==
/// A slice of a larger result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number
    pub number: usize,
    pub num_pages: usize,
    /// Size of the whole result set
    pub count: usize,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// == Paginator ==
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    per_page: usize,
}

impl Paginator {
    pub fn new(per_page: usize) -> Self {
        Self {
            per_page: per_page.max(1),
        }
    }

    /// An empty result set still has one (empty) page.
    pub fn num_pages(&self, count: usize) -> usize {
        count.div_ceil(self.per_page).max(1)
    }

    /// Missing or non-numeric → 1, below 1 → 1, past the end → last page.
    pub fn resolve_page(&self, raw: Option<&str>, count: usize) -> usize {
        let last = self.num_pages(count);
        match raw.map(str::trim).and_then(|s| s.parse::<i64>().ok()) {
            None => 1,
            Some(n) if n < 1 => 1,
            Some(n) => usize::try_from(n).map_or(last, |n| n.min(last)),
        }
    }

    /// Cuts the requested page out of `items`.
    pub fn get_page<T>(&self, items: Vec<T>, raw: Option<&str>) -> Page<T> {
        let count = items.len();
        let num_pages = self.num_pages(count);
        let number = self.resolve_page(raw, count);

        let items = items
            .into_iter()
            .skip((number - 1) * self.per_page)
            .take(self.per_page)
            .collect();

        Page {
            items,
            number,
            num_pages,
            count,
        }
    }
}
