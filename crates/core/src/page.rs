#![forbid(unsafe_code)]

use crate::fields::as_integer;
use serde_json::{Value, json};

/// Page number standing in for E-infinity.
pub const INFINITY: i64 = 10_000;

/// Page argument of a draw query: a single page or an inclusive page range.
///
/// A single page `p` behaves as the degenerate range `[p, p]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageQuery {
    Page(i64),
    Range(i64, i64),
}

impl PageQuery {
    /// Page used for per-class membership checks.
    pub fn page(self) -> i64 {
        match self {
            Self::Page(page) => page,
            Self::Range(first, _) => first,
        }
    }

    /// Range used for per-edge visibility checks.
    pub fn range(self) -> (i64, i64) {
        match self {
            Self::Page(page) => (page, page),
            Self::Range(first, last) => (first, last),
        }
    }
}

impl From<i64> for PageQuery {
    fn from(page: i64) -> Self {
        Self::Page(page)
    }
}

impl From<(i64, i64)> for PageQuery {
    fn from((first, last): (i64, i64)) -> Self {
        Self::Range(first, last)
    }
}

/// One entry of a chart's `page_list`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageEntry {
    Page(i64),
    Range(i64, i64),
}

impl PageEntry {
    pub fn from_json(value: &Value) -> Option<Self> {
        if let Some(page) = as_integer(value) {
            return Some(Self::Page(page));
        }
        let items = value.as_array()?;
        match items.as_slice() {
            [first, last] => Some(Self::Range(as_integer(first)?, as_integer(last)?)),
            _ => None,
        }
    }

    pub fn to_json(self) -> Value {
        match self {
            Self::Page(page) => json!(page),
            Self::Range(first, last) => json!([first, last]),
        }
    }

    pub fn query(self) -> PageQuery {
        match self {
            Self::Page(page) => PageQuery::Page(page),
            Self::Range(first, last) => PageQuery::Range(first, last),
        }
    }
}
