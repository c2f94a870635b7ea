use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Row counts the page-size selector offers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum PageSize {
    Ten,
    #[default]
    TwentyFive,
    Fifty,
    Hundred,
}

impl PageSize {
    pub const ALL: [PageSize; 4] = [PageSize::Ten, PageSize::TwentyFive, PageSize::Fifty, PageSize::Hundred];

    pub fn get(self) -> usize {
        match self {
            PageSize::Ten => 10,
            PageSize::TwentyFive => 25,
            PageSize::Fifty => 50,
            PageSize::Hundred => 100,
        }
    }
}

impl TryFrom<usize> for PageSize {
    type Error = AppError;

    fn try_from(n: usize) -> AppResult<Self> {
        PageSize::ALL
            .into_iter()
            .find(|p| p.get() == n)
            .ok_or_else(|| AppError::Validation(format!("unsupported page size: {n} (use 10, 25, 50 or 100)")))
    }
}

impl From<PageSize> for usize {
    fn from(p: PageSize) -> usize {
        p.get()
    }
}

/// Page cursor over `total` rows. `current` stays within `[1, total_pages()]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    total: usize,
    size: PageSize,
    current: usize,
}

impl Pagination {
    pub fn new(total: usize, size: PageSize) -> Self {
        Self { total, size, current: 1 }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn size(&self) -> PageSize {
        self.size
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// `ceil(total / size)`, never less than 1.
    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.size.get()).max(1)
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total_pages()
    }

    /// Returns whether the page changed.
    pub fn previous(&mut self) -> bool {
        if self.has_previous() {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    pub fn next(&mut self) -> bool {
        if self.has_next() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    pub fn set_size(&mut self, size: PageSize) {
        self.size = size;
        self.current = 1;
    }

    pub fn reset(&mut self, total: usize) {
        self.total = total;
        self.current = 1;
    }

    /// Half-open row range of the current page.
    pub fn range(&self) -> std::ops::Range<usize> {
        let start = ((self.current - 1) * self.size.get()).min(self.total);
        let end = (self.current * self.size.get()).min(self.total);
        start..end
    }

    pub fn record_info(&self) -> String {
        if self.total == 0 {
            return "0 records".to_string();
        }
        let r = self.range();
        format!("{}-{} of {}", r.start + 1, r.end, self.total)
    }

    pub fn page_info(&self) -> String {
        format!("{} / {}", self.current, self.total_pages())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_accepts_only_offered_values() {
        assert_eq!(PageSize::try_from(50).unwrap(), PageSize::Fifty);
        assert!(matches!(PageSize::try_from(30), Err(AppError::Validation(_))));
        assert_eq!(PageSize::default().get(), 25);
    }

    #[test]
    fn empty_result_is_page_one_of_one() {
        let p = Pagination::new(0, PageSize::TwentyFive);
        assert_eq!(p.total_pages(), 1);
        assert_eq!(p.current(), 1);
        assert_eq!(p.range(), 0..0);
        assert_eq!(p.page_info(), "1 / 1");
        assert_eq!(p.record_info(), "0 records");
        assert!(!p.has_next());
        assert!(!p.has_previous());
    }

    #[test]
    fn total_pages_and_slice_length_hold_for_every_size() {
        for n in [0usize, 1, 9, 10, 11, 25, 99, 100, 101, 257] {
            for size in PageSize::ALL {
                let mut p = Pagination::new(n, size);
                let s = size.get();
                assert_eq!(p.total_pages(), n.div_ceil(s).max(1));
                loop {
                    let expected = s.min(n - (p.current() - 1) * s);
                    assert_eq!(p.range().len(), expected, "n={n} size={s} page={}", p.current());
                    assert!(p.current() >= 1 && p.current() <= p.total_pages());
                    if !p.next() {
                        break;
                    }
                }
                assert_eq!(p.current(), p.total_pages());
            }
        }
    }

    #[test]
    fn navigation_is_a_noop_at_the_edges() {
        let mut p = Pagination::new(30, PageSize::Ten);
        assert!(!p.previous());
        assert_eq!(p.current(), 1);
        assert!(p.next());
        assert!(p.next());
        assert!(!p.next());
        assert_eq!(p.current(), 3);
        assert_eq!(p.range(), 20..30);
        assert_eq!(p.record_info(), "21-30 of 30");
    }

    #[test]
    fn size_change_returns_to_first_page() {
        let mut p = Pagination::new(300, PageSize::Ten);
        p.next();
        p.next();
        p.set_size(PageSize::Hundred);
        assert_eq!(p.current(), 1);
        assert_eq!(p.total_pages(), 3);
    }
}
