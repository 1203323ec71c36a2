pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_COUNT: i64 = 20;
pub const MAX_COUNT: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub count: i64,
}

impl Pagination {
    // 0 以下や未指定はデフォルト値に丸め、件数は MAX_COUNT を上限にする
    pub fn new(page: Option<i64>, count: Option<i64>) -> Self {
        Self {
            page: page.filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE),
            count: count
                .filter(|c| *c > 0)
                .unwrap_or(DEFAULT_COUNT)
                .min(MAX_COUNT),
        }
    }

    pub fn offset(&self) -> i64 {
        self.page.saturating_sub(1).max(0).saturating_mul(self.count)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[derive(Debug)]
pub struct PaginatedList<T> {
    pub total: i64,
    pub page: i64,
    pub count: i64,
    pub items: Vec<T>,
}

impl<T> PaginatedList<T> {
    pub fn total_pages(&self) -> i64 {
        if self.total <= 0 || self.count <= 0 {
            return 1;
        }
        (self.total - 1) / self.count + 1
    }

    pub fn into_inner(self) -> Vec<T> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults() {
        let p = Pagination::new(None, Some(0));
        assert_eq!(p, Pagination { page: 1, count: 20 });
        assert_eq!(Pagination::new(Some(3), Some(10)).offset(), 20);
    }

    #[test]
    fn total_pages_rounds_up() {
        let list = PaginatedList::<()> {
            total: 41,
            page: 1,
            count: 20,
            items: vec![],
        };
        assert_eq!(list.total_pages(), 3);
        let empty = PaginatedList::<()> {
            total: 0,
            page: 1,
            count: 20,
            items: vec![],
        };
        assert_eq!(empty.total_pages(), 1);
    }

    #[test]
    fn huge_page_and_count_do_not_overflow() {
        let p = Pagination::new(Some(i64::MAX), Some(i64::MAX));
        assert_eq!(p.count, MAX_COUNT);
        assert_eq!(p.offset(), i64::MAX);

        let list = PaginatedList::<()> {
            total: 2,
            page: 1,
            count: i64::MAX,
            items: vec![],
        };
        assert_eq!(list.total_pages(), 1);

        let list = PaginatedList::<()> {
            total: i64::MAX,
            page: 1,
            count: 1,
            items: vec![],
        };
        assert_eq!(list.total_pages(), i64::MAX);
    }
}
