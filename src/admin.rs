//! Admin order list views: status filtering, per-status counts and search.
//!
//! Everything here works on lists already fetched from the store and is
//! recomputed on demand. Both order kinds are supported through [`StatusView`].

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::domain::{CustomOrder, Order, OrderStatus, UnknownStatus};

/// What the admin list needs to know about an order.
pub trait StatusView {
    fn status(&self) -> OrderStatus;

    /// Text matched by the admin search box.
    fn search_text(&self) -> Vec<&str>;
}

impl StatusView for CustomOrder {
    fn status(&self) -> OrderStatus {
        self.status
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.id.as_str(), self.user_email.as_str(), self.occasion.as_str()]
    }
}

impl StatusView for Order {
    fn status(&self) -> OrderStatus {
        self.status
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.id.as_str(), self.user_id.as_str(), self.product_id.as_str()]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(OrderStatus),
}

impl StatusFilter {
    pub fn matches(self, status: OrderStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(StatusFilter::All),
            other => other.parse().map(StatusFilter::Only),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => f.write_str(status.as_str()),
        }
    }
}

pub fn filter_by_status<T: StatusView>(orders: &[T], filter: StatusFilter) -> Vec<&T> {
    orders.iter().filter(|o| filter.matches(o.status())).collect()
}

/// Per-status tallies from a single pass over an order list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusCounts {
    counts: [usize; OrderStatus::ALL.len()],
    total: usize,
}

impl StatusCounts {
    pub fn tally<T: StatusView>(orders: &[T]) -> Self {
        let mut tally = Self::default();
        for order in orders {
            tally.counts[order.status().index()] += 1;
            tally.total += 1;
        }
        tally
    }

    pub fn get(&self, status: OrderStatus) -> usize {
        self.counts[status.index()]
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Count shown next to a filter tab.
    pub fn for_filter(&self, filter: StatusFilter) -> usize {
        match filter {
            StatusFilter::All => self.total,
            StatusFilter::Only(status) => self.get(status),
        }
    }

    pub fn tabs(&self) -> Vec<StatusTab> {
        std::iter::once(StatusFilter::All)
            .chain(OrderStatus::ALL.into_iter().map(StatusFilter::Only))
            .map(|filter| StatusTab {
                key: filter.to_string(),
                count: self.for_filter(filter),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusTab {
    pub key: String,
    pub count: usize,
}

/// Status filter composed with an optional case-insensitive search term.
#[derive(Debug, Clone, Default)]
pub struct OrderQuery {
    pub status: StatusFilter,
    pub search: Option<String>,
}

impl OrderQuery {
    pub fn matches<T: StatusView>(&self, order: &T) -> bool {
        if !self.status.matches(order.status()) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                order
                    .search_text()
                    .iter()
                    .any(|field| field.to_lowercase().contains(&term))
            }
        }
    }

    pub fn apply<'a, T: StatusView>(&self, orders: &'a [T]) -> Vec<&'a T> {
        orders.iter().filter(|o| self.matches(*o)).collect()
    }
}
