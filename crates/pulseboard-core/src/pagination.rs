// ── Pagination ──
//
// `PageCursor` is the page the user asked for; `PageState` is what the
// server last said. The cursor is advisory: the server clamps, and its
// answer drives the page-info text and control enablement.

use pulseboard_api::Pagination;

/// Requested page for one table. Never below 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    page: u32,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self { page: 1 }
    }
}

impl PageCursor {
    pub fn page(self) -> u32 {
        self.page
    }

    /// Advance one page. Unbounded; the server clamps.
    pub fn next(&mut self) {
        self.page = self.page.saturating_add(1);
    }

    /// Step back one page. Returns `false` (and does nothing) on page 1.
    pub fn prev(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }
}

/// Authoritative pagination from the last successful fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_records: u64,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 0,
            total_records: 0,
        }
    }
}

impl From<Pagination> for PageState {
    fn from(p: Pagination) -> Self {
        Self {
            current_page: p.page.max(1),
            total_pages: p.pages,
            total_records: p.total,
        }
    }
}

impl PageState {
    /// `"Page 2 of 5 (47 total records)"`. Zero pages display as 1.
    pub fn label(&self) -> String {
        format!(
            "Page {} of {} ({} total records)",
            self.current_page,
            self.total_pages.max(1),
            self.total_records
        )
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prev_at_first_page_stays() {
        let mut cursor = PageCursor::default();
        assert!(!cursor.prev());
        assert_eq!(cursor.page(), 1);
    }

    #[test]
    fn next_ignores_totals() {
        let mut cursor = PageCursor::default();
        for _ in 0..4 {
            cursor.next();
        }
        assert_eq!(cursor.page(), 5);
        assert!(cursor.prev());
        assert_eq!(cursor.page(), 4);
        cursor.reset();
        assert_eq!(cursor.page(), 1);
    }

    #[test]
    fn label_and_controls() {
        let state = PageState::from(Pagination {
            page: 2,
            pages: 5,
            total: 47,
        });
        assert_eq!(state.label(), "Page 2 of 5 (47 total records)");
        assert!(state.has_prev());
        assert!(state.has_next());

        let last = PageState::from(Pagination {
            page: 5,
            pages: 5,
            total: 47,
        });
        assert!(!last.has_next());
    }

    #[test]
    fn empty_result_shows_one_page() {
        let state = PageState::from(Pagination {
            page: 1,
            pages: 0,
            total: 0,
        });
        assert_eq!(state.label(), "Page 1 of 1 (0 total records)");
        assert!(!state.has_prev());
        assert!(!state.has_next());
    }
}
