pub const QUESTIONS_PER_PAGE: i64 = 10;

/// 1-based page number over an id-ordered result set.
///
/// Pages below 1 are representable because they come straight from the query
/// string; such pages simply select nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page(pub i64);

impl Default for Page {
    fn default() -> Self {
        Page(1)
    }
}

impl Page {
    /// `(limit, offset)` for this page, or `None` when the page can not
    /// contain any rows.
    pub fn window(&self) -> Option<(i64, i64)> {
        if self.0 < 1 {
            return None;
        }
        let offset = (self.0 - 1).checked_mul(QUESTIONS_PER_PAGE)?;
        Some((QUESTIONS_PER_PAGE, offset))
    }

    /// The rows of an already ordered result set that fall on this page.
    pub fn slice<T>(&self, rows: Vec<T>) -> Vec<T> {
        let Some((limit, offset)) = self.window() else {
            return vec![];
        };
        let (Ok(limit), Ok(offset)) = (usize::try_from(limit), usize::try_from(offset)) else {
            return vec![];
        };
        rows.into_iter().skip(offset).take(limit).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_starts_at_zero() {
        assert_eq!(Page::default().window(), Some((10, 0)));
    }

    #[test]
    fn third_page_skips_twenty_rows() {
        assert_eq!(Page(3).window(), Some((10, 20)));
    }

    #[test]
    fn non_positive_pages_select_nothing() {
        assert_eq!(Page(0).window(), None);
        assert_eq!(Page(-4).window(), None);
    }

    #[test]
    fn slice_cuts_the_same_window() {
        let rows: Vec<i64> = (1..=23).collect();
        assert_eq!(Page(3).slice(rows.clone()), vec![21, 22, 23]);
        assert_eq!(Page(2).slice(rows.clone()).len(), 10);
        assert!(Page(4).slice(rows.clone()).is_empty());
        assert!(Page(0).slice(rows.clone()).is_empty());
        assert!(Page(i64::MAX).slice(rows).is_empty());
    }

    #[test]
    fn huge_page_does_not_overflow() {
        assert_eq!(Page(i64::MAX).window(), None);
    }
}
