//! Common functionality for paging the transactions table.

/// The config for pagination.
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The number of rows to display per page when not specified in a request.
    pub default_page_size: u64,
    /// The maximum number of numbered links to show in the pager.
    pub max_indicators: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: 25,
            max_indicators: 5,
        }
    }
}

/// One element of the pager rendered under the transactions table.
#[derive(Debug, PartialEq, Eq)]
pub enum Indicator {
    /// A link to another page.
    Page(u64),
    /// The page currently being viewed.
    Current(u64),
    /// A "..." separator between non-adjacent page numbers.
    Gap,
    /// A link to the previous page.
    Prev(u64),
    /// A link to the next page.
    Next(u64),
}

/// Compute the pager elements for `current` out of `page_count` pages,
/// showing at most `max_indicators` numbered links around the current page.
pub fn page_indicators(current: u64, page_count: u64, max_indicators: u64) -> Vec<Indicator> {
    let number = |page| {
        if page == current {
            Indicator::Current(page)
        } else {
            Indicator::Page(page)
        }
    };

    let half = max_indicators / 2;
    let mut indicators: Vec<Indicator> = if page_count <= max_indicators {
        (1..=page_count).map(number).collect()
    } else if current <= half {
        (1..=max_indicators).map(number).collect()
    } else if current > page_count - half {
        ((page_count - max_indicators + 1)..=page_count)
            .map(number)
            .collect()
    } else {
        ((current - half)..=(current + half)).map(number).collect()
    };

    if page_count > max_indicators {
        if current > half + 1 {
            indicators.insert(0, Indicator::Page(1));
            indicators.insert(1, Indicator::Gap);
        }

        if current < page_count - half {
            indicators.push(Indicator::Gap);
            indicators.push(Indicator::Page(page_count));
        }
    }

    if current > 1 {
        indicators.insert(0, Indicator::Prev(current - 1));
    }

    if current < page_count {
        indicators.push(Indicator::Next(current + 1));
    }

    indicators
}

/// The number of pages needed to show `row_count` rows.
pub fn page_count(row_count: u64, page_size: u64) -> u64 {
    row_count.div_ceil(page_size).max(1)
}

#[cfg(test)]
mod tests {
    use crate::pagination::{Indicator, page_count, page_indicators};

    #[test]
    fn shows_all_pages_when_few() {
        let got = page_indicators(1, 4, 5);

        let want = [
            Indicator::Current(1),
            Indicator::Page(2),
            Indicator::Page(3),
            Indicator::Page(4),
            Indicator::Next(2),
        ];
        assert_eq!(want, got.as_slice());
    }

    #[test]
    fn truncates_on_the_right() {
        let got = page_indicators(1, 10, 5);

        let want = [
            Indicator::Current(1),
            Indicator::Page(2),
            Indicator::Page(3),
            Indicator::Page(4),
            Indicator::Page(5),
            Indicator::Gap,
            Indicator::Page(10),
            Indicator::Next(2),
        ];
        assert_eq!(want, got.as_slice());
    }

    #[test]
    fn truncates_on_the_left() {
        let got = page_indicators(10, 10, 5);

        let want = [
            Indicator::Prev(9),
            Indicator::Page(1),
            Indicator::Gap,
            Indicator::Page(6),
            Indicator::Page(7),
            Indicator::Page(8),
            Indicator::Page(9),
            Indicator::Current(10),
        ];
        assert_eq!(want, got.as_slice());
    }

    #[test]
    fn truncates_both_sides_in_the_middle() {
        let got = page_indicators(5, 10, 5);

        let want = [
            Indicator::Prev(4),
            Indicator::Page(1),
            Indicator::Gap,
            Indicator::Page(3),
            Indicator::Page(4),
            Indicator::Current(5),
            Indicator::Page(6),
            Indicator::Page(7),
            Indicator::Gap,
            Indicator::Page(10),
            Indicator::Next(6),
        ];
        assert_eq!(want, got.as_slice());
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(0, 25), 1);
        assert_eq!(page_count(25, 25), 1);
        assert_eq!(page_count(26, 25), 2);
        assert_eq!(page_count(51, 25), 3);
    }
}
