// src/query.rs

//! Client-side filter and sort over the book collection.
//!
//! `apply` is a pure function of (collection, filters, sort) and holds no
//! state: every call recomputes from the unfiltered collection. Collections
//! are small enough that a full recompute is the contract.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;
use crate::models::Book;

/// Filter criteria. All active predicates are combined with logical AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    /// Case-insensitive substring matched against title OR author
    pub search: String,

    /// Stock-status category
    pub stock: StockFilter,

    /// Price-range category
    pub price: PriceFilter,

    /// Case-insensitive substring matched against author only,
    /// independent of and additional to `search`
    pub author: String,
}

impl Filters {
    /// True if the book passes every active filter.
    pub fn matches(&self, book: &Book) -> bool {
        if !self.search.is_empty()
            && !contains_ci(&book.title, &self.search)
            && !contains_ci(&book.author, &self.search)
        {
            return false;
        }

        if !self.stock.matches(book.qty) {
            return false;
        }

        if !self.price.matches(book.price) {
            return false;
        }

        if !self.author.is_empty() && !contains_ci(&book.author, &self.author) {
            return false;
        }

        true
    }

    /// True if any filter differs from its default.
    pub fn is_active(&self) -> bool {
        *self != Filters::default()
    }
}

/// Stock-status categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StockFilter {
    #[default]
    All,
    /// qty ≥ 10
    InStock,
    /// 0 < qty < 10
    LowStock,
    /// qty = 0
    OutOfStock,
}

impl StockFilter {
    fn matches(self, qty: u32) -> bool {
        match self {
            Self::All => true,
            Self::InStock => qty >= 10,
            Self::LowStock => qty > 0 && qty < 10,
            Self::OutOfStock => qty == 0,
        }
    }
}

impl FromStr for StockFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "all" => Ok(Self::All),
            "instock" => Ok(Self::InStock),
            "lowstock" => Ok(Self::LowStock),
            "outofstock" => Ok(Self::OutOfStock),
            _ => Err(AppError::validation(format!(
                "Unknown stock filter '{s}' (expected all, in-stock, low-stock or out-of-stock)"
            ))),
        }
    }
}

impl fmt::Display for StockFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::All => "all",
            Self::InStock => "in-stock",
            Self::LowStock => "low-stock",
            Self::OutOfStock => "out-of-stock",
        };
        f.write_str(s)
    }
}

/// Price-range categories. Boundaries are inclusive on the 10-to-50 band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriceFilter {
    #[default]
    All,
    /// price < 10
    Under10,
    /// 10 ≤ price ≤ 50
    From10To50,
    /// price > 50
    Over50,
}

impl PriceFilter {
    fn matches(self, price: f64) -> bool {
        match self {
            Self::All => true,
            Self::Under10 => price < 10.0,
            Self::From10To50 => (10.0..=50.0).contains(&price),
            Self::Over50 => price > 50.0,
        }
    }
}

impl FromStr for PriceFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "all" => Ok(Self::All),
            "under10" => Ok(Self::Under10),
            "10to50" => Ok(Self::From10To50),
            "over50" => Ok(Self::Over50),
            _ => Err(AppError::validation(format!(
                "Unknown price range '{s}' (expected all, under-10, 10-to-50 or over-50)"
            ))),
        }
    }
}

impl fmt::Display for PriceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::All => "all",
            Self::Under10 => "under-10",
            Self::From10To50 => "10-to-50",
            Self::Over50 => "over-50",
        };
        f.write_str(s)
    }
}

/// Sort criteria: a field selector and a direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortConfig {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortConfig {
    /// Compare two books on the selected field.
    ///
    /// Descending inverts the key comparison only; equal keys stay `Equal`
    /// in both directions, so a stable sort never reorders them.
    pub fn compare(&self, a: &Book, b: &Book) -> Ordering {
        let ord = match self.field {
            SortField::Title => cmp_ci(&a.title, &b.title),
            SortField::Author => cmp_ci(&a.author, &b.author),
            SortField::Price => a.price.total_cmp(&b.price),
            SortField::Qty => a.qty.cmp(&b.qty),
            SortField::Id => a.id.cmp(&b.id),
        };
        match self.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }
}

/// Sortable fields. Text fields compare case-insensitively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    Title,
    Author,
    Price,
    Qty,
    Id,
}

impl FromStr for SortField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "title" => Ok(Self::Title),
            "author" => Ok(Self::Author),
            "price" => Ok(Self::Price),
            "qty" => Ok(Self::Qty),
            "id" => Ok(Self::Id),
            _ => Err(AppError::validation(format!(
                "Unknown sort field '{s}' (expected title, author, price, qty or id)"
            ))),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::Price => "price",
            Self::Qty => "qty",
            Self::Id => "id",
        };
        f.write_str(s)
    }
}

/// Sort direction. Defaults to ascending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Filter then stably sort the collection.
///
/// Returns a derived collection; the input is never mutated.
pub fn apply(books: &[Book], filters: &Filters, sort: &SortConfig) -> Vec<Book> {
    let mut result: Vec<Book> = books
        .iter()
        .filter(|book| filters.matches(book))
        .cloned()
        .collect();

    result.sort_by(|a, b| sort.compare(a, b));
    result
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn cmp_ci(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Normalize a selector token: lowercase, separators stripped.
fn normalize(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .filter(|c| *c != '-' && *c != '_' && !c.is_whitespace())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_book(id: u64, title: &str, author: &str, price: f64, qty: u32) -> Book {
        Book {
            id,
            title: title.to_string(),
            author: author.to_string(),
            price,
            qty,
        }
    }

    fn sample_shelf() -> Vec<Book> {
        vec![
            make_book(1, "Zoo", "Ann Patchett", 5.0, 0),
            make_book(2, "Ant", "Bram Stoker", 60.0, 20),
            make_book(3, "Dune", "Frank Herbert", 10.0, 4),
            make_book(4, "dune messiah", "Frank Herbert", 50.0, 10),
            make_book(5, "Emma", "Jane Austen", 9.99, 9),
        ]
    }

    fn ids(books: &[Book]) -> Vec<u64> {
        books.iter().map(|b| b.id).collect()
    }

    #[test]
    fn no_filters_keeps_everything_sorted_by_title() {
        let books = sample_shelf();
        let result = apply(&books, &Filters::default(), &SortConfig::default());
        // Case-insensitive title order: Ant, Dune, dune messiah, Emma, Zoo.
        assert_eq!(ids(&result), vec![2, 3, 4, 5, 1]);
    }

    #[test]
    fn search_matches_title_or_author() {
        let books = sample_shelf();
        let filters = Filters {
            search: "dune".to_string(),
            ..Filters::default()
        };
        let result = apply(&books, &filters, &SortConfig::default());
        assert_eq!(ids(&result), vec![3, 4]);

        // "ann" hits author "Ann Patchett" even though no title matches.
        let filters = Filters {
            search: "ann".to_string(),
            ..Filters::default()
        };
        let result = apply(&books, &filters, &SortConfig::default());
        assert_eq!(ids(&result), vec![1]);
    }

    #[test]
    fn search_is_case_insensitive() {
        let books = sample_shelf();
        let filters = Filters {
            search: "ZOO".to_string(),
            ..Filters::default()
        };
        assert_eq!(ids(&apply(&books, &filters, &SortConfig::default())), vec![1]);
    }

    #[test]
    fn stock_filter_boundaries() {
        assert!(StockFilter::InStock.matches(10));
        assert!(!StockFilter::InStock.matches(9));

        assert!(StockFilter::LowStock.matches(1));
        assert!(StockFilter::LowStock.matches(9));
        assert!(!StockFilter::LowStock.matches(0));
        assert!(!StockFilter::LowStock.matches(10));

        assert!(StockFilter::OutOfStock.matches(0));
        assert!(!StockFilter::OutOfStock.matches(1));

        assert!(StockFilter::All.matches(0));
        assert!(StockFilter::All.matches(100));
    }

    #[test]
    fn price_filter_boundaries() {
        assert!(PriceFilter::Under10.matches(9.99));
        assert!(!PriceFilter::Under10.matches(10.0));

        // 10 and 50 are inclusive on the middle band.
        assert!(PriceFilter::From10To50.matches(10.0));
        assert!(PriceFilter::From10To50.matches(50.0));
        assert!(!PriceFilter::From10To50.matches(9.99));
        assert!(!PriceFilter::From10To50.matches(50.01));

        assert!(PriceFilter::Over50.matches(50.01));
        assert!(!PriceFilter::Over50.matches(50.0));
    }

    #[test]
    fn author_filter_is_independent_of_search() {
        let books = sample_shelf();
        // Search matches both Dune titles; author narrows to nothing
        // because "austen" never wrote one.
        let filters = Filters {
            search: "dune".to_string(),
            author: "austen".to_string(),
            ..Filters::default()
        };
        assert!(apply(&books, &filters, &SortConfig::default()).is_empty());

        // Author alone.
        let filters = Filters {
            author: "herbert".to_string(),
            ..Filters::default()
        };
        assert_eq!(
            ids(&apply(&books, &filters, &SortConfig::default())),
            vec![3, 4]
        );
    }

    #[test]
    fn predicates_combine_with_logical_and() {
        let books = sample_shelf();
        let filters = Filters {
            search: "dune".to_string(),
            stock: StockFilter::InStock,
            price: PriceFilter::From10To50,
            author: "frank".to_string(),
        };
        let result = apply(&books, &filters, &SortConfig::default());
        // Only "dune messiah" passes all four predicates.
        assert_eq!(ids(&result), vec![4]);

        // Each record in the result satisfies every predicate on its own.
        for book in &result {
            assert!(filters.matches(book));
        }
    }

    #[test]
    fn result_is_subset_of_input() {
        let books = sample_shelf();
        let input_ids = ids(&books);
        let filters = Filters {
            stock: StockFilter::LowStock,
            ..Filters::default()
        };
        let result = apply(&books, &filters, &SortConfig::default());
        assert!(!result.is_empty());
        for book in &result {
            assert!(input_ids.contains(&book.id));
        }
    }

    #[test]
    fn sort_by_each_field() {
        let books = sample_shelf();
        let by = |field: SortField| {
            let sort = SortConfig {
                field,
                direction: SortDirection::Asc,
            };
            ids(&apply(&books, &Filters::default(), &sort))
        };

        assert_eq!(by(SortField::Author), vec![1, 2, 3, 4, 5]);
        assert_eq!(by(SortField::Price), vec![1, 5, 3, 4, 2]);
        assert_eq!(by(SortField::Qty), vec![1, 3, 5, 4, 2]);
        assert_eq!(by(SortField::Id), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn sort_descending_reverses_keys() {
        let books = sample_shelf();
        let sort = SortConfig {
            field: SortField::Price,
            direction: SortDirection::Desc,
        };
        assert_eq!(
            ids(&apply(&books, &Filters::default(), &sort)),
            vec![2, 4, 3, 5, 1]
        );
    }

    #[test]
    fn sort_is_stable_on_equal_keys() {
        // Two authors tie; input order must survive in both directions.
        let books = vec![
            make_book(10, "B", "Same Author", 1.0, 1),
            make_book(11, "A", "Same Author", 2.0, 2),
            make_book(12, "C", "Other", 3.0, 3),
        ];
        let asc = SortConfig {
            field: SortField::Author,
            direction: SortDirection::Asc,
        };
        let desc = SortConfig {
            field: SortField::Author,
            direction: SortDirection::Desc,
        };

        assert_eq!(ids(&apply(&books, &Filters::default(), &asc)), vec![12, 10, 11]);
        // Descending flips the key order but never the tied pair.
        assert_eq!(ids(&apply(&books, &Filters::default(), &desc)), vec![10, 11, 12]);
    }

    #[test]
    fn apply_is_idempotent() {
        let books = sample_shelf();
        let filters = Filters {
            search: "a".to_string(),
            price: PriceFilter::From10To50,
            ..Filters::default()
        };
        let sort = SortConfig {
            field: SortField::Qty,
            direction: SortDirection::Desc,
        };

        let once = apply(&books, &filters, &sort);
        let twice = apply(&once, &filters, &sort);
        assert_eq!(once, twice);
    }

    #[test]
    fn out_of_stock_scenario() {
        let books = vec![
            make_book(1, "Zoo", "A", 5.0, 0),
            make_book(2, "Ant", "B", 60.0, 20),
        ];
        let filters = Filters {
            stock: StockFilter::OutOfStock,
            ..Filters::default()
        };
        let result = apply(&books, &filters, &SortConfig::default());
        assert_eq!(ids(&result), vec![1]);
    }

    #[test]
    fn over_50_scenario() {
        let books = vec![
            make_book(1, "Zoo", "A", 5.0, 0),
            make_book(2, "Ant", "B", 60.0, 20),
        ];
        let filters = Filters {
            price: PriceFilter::Over50,
            ..Filters::default()
        };
        let result = apply(&books, &filters, &SortConfig::default());
        assert_eq!(ids(&result), vec![2]);
    }

    #[test]
    fn selectors_parse_from_cli_tokens() {
        assert_eq!("in-stock".parse::<StockFilter>().unwrap(), StockFilter::InStock);
        assert_eq!("outOfStock".parse::<StockFilter>().unwrap(), StockFilter::OutOfStock);
        assert_eq!("10-to-50".parse::<PriceFilter>().unwrap(), PriceFilter::From10To50);
        assert_eq!("under10".parse::<PriceFilter>().unwrap(), PriceFilter::Under10);
        assert_eq!("QTY".parse::<SortField>().unwrap(), SortField::Qty);

        assert!("mystery".parse::<StockFilter>().is_err());
        assert!("cheap".parse::<PriceFilter>().is_err());
        assert!("isbn".parse::<SortField>().is_err());
    }

    #[test]
    fn selectors_display_round_trip() {
        for stock in [
            StockFilter::All,
            StockFilter::InStock,
            StockFilter::LowStock,
            StockFilter::OutOfStock,
        ] {
            assert_eq!(stock.to_string().parse::<StockFilter>().unwrap(), stock);
        }
        for price in [
            PriceFilter::All,
            PriceFilter::Under10,
            PriceFilter::From10To50,
            PriceFilter::Over50,
        ] {
            assert_eq!(price.to_string().parse::<PriceFilter>().unwrap(), price);
        }
    }

    #[test]
    fn default_sort_is_title_ascending() {
        let sort = SortConfig::default();
        assert_eq!(sort.field, SortField::Title);
        assert_eq!(sort.direction, SortDirection::Asc);
    }

    #[test]
    fn default_filters_are_inactive() {
        assert!(!Filters::default().is_active());
        let filters = Filters {
            author: "x".to_string(),
            ..Filters::default()
        };
        assert!(filters.is_active());
    }
}
