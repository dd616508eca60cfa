//! Typed clients over the resource actors. Business rules live here.

#[macro_use]
mod macros;

pub mod custom_order_client;
pub mod order_client;
pub mod product_client;
pub mod user_client;

pub use custom_order_client::CustomOrderClient;
pub use order_client::OrderClient;
pub use product_client::ProductClient;
pub use user_client::UserClient;

use chrono::{DateTime, Utc};
use tracing::error;

use crate::actor_framework::FrameworkError;

/// Logs a store failure and converts it into the caller's error type.
pub(crate) fn store_failure<E: From<FrameworkError>>(e: FrameworkError) -> E {
    error!(error = %e, "Store request failed");
    E::from(e)
}

/// Newest first. Records created in the same instant keep reverse insertion order.
pub(crate) fn newest_first<T>(mut items: Vec<T>, created_at: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    items.reverse();
    items.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_newest_first_breaks_ties_by_insertion() {
        let t1 = Utc.timestamp_opt(100, 0).unwrap();
        let t2 = Utc.timestamp_opt(200, 0).unwrap();
        let items = vec![("a", t1), ("b", t2), ("c", t1), ("d", t2)];

        let sorted = newest_first(items, |(_, at)| *at);
        let names: Vec<_> = sorted.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["d", "b", "c", "a"]);
    }
}
