use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Fulfilment status shared by standard and custom orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    InProgress,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::InProgress,
        OrderStatus::Ready,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::InProgress => "in-progress",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Position in [`OrderStatus::ALL`], used for array-backed tallies.
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
#[error("Unknown order status: {0:?}")]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Which status changes an admin may apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusPolicy {
    /// Any status may follow any other.
    #[default]
    Unrestricted,
    /// Orders move forward through the fulfilment lifecycle only.
    Lifecycle,
}

impl StatusPolicy {
    pub fn allows(self, from: OrderStatus, to: OrderStatus) -> bool {
        if from == to {
            return true;
        }
        match self {
            StatusPolicy::Unrestricted => true,
            StatusPolicy::Lifecycle => {
                use OrderStatus::*;
                matches!(
                    (from, to),
                    (Pending, Confirmed)
                        | (Pending, Cancelled)
                        | (Confirmed, InProgress)
                        | (Confirmed, Cancelled)
                        | (InProgress, Ready)
                        | (InProgress, Cancelled)
                        | (Ready, Delivered)
                )
            }
        }
    }
}

/// Action shared by the order collections: move to `to` if `policy` allows it.
#[derive(Debug, Clone, Copy)]
pub struct StatusTransition {
    pub to: OrderStatus,
    pub policy: StatusPolicy,
}

impl StatusTransition {
    /// Moves `status` to `self.to` and stamps `updated_at` if the policy allows it.
    pub fn apply(
        self,
        status: &mut OrderStatus,
        updated_at: &mut Option<DateTime<Utc>>,
    ) -> Result<(), (OrderStatus, OrderStatus)> {
        if !self.policy.allows(*status, self.to) {
            return Err((*status, self.to));
        }
        *status = self.to;
        *updated_at = Some(Utc::now());
        Ok(())
    }
}

/// Outcome of a [`StatusTransition`], decided inside the owning actor.
#[derive(Debug, Clone)]
pub enum TransitionOutcome<T> {
    Applied(T),
    Refused { from: OrderStatus, to: OrderStatus },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_strings_round_trip() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
        assert_eq!("in-progress".parse::<OrderStatus>(), Ok(OrderStatus::InProgress));
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        assert_eq!(
            "shipped".parse::<OrderStatus>(),
            Err(UnknownStatus("shipped".to_string()))
        );
        assert!("Pending".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_unrestricted_allows_everything() {
        for from in OrderStatus::ALL {
            for to in OrderStatus::ALL {
                assert!(StatusPolicy::Unrestricted.allows(from, to));
            }
        }
    }

    #[test]
    fn test_apply_stamps_only_on_success() {
        let mut status = OrderStatus::Delivered;
        let mut updated_at = None;

        let refused = StatusTransition { to: OrderStatus::Pending, policy: StatusPolicy::Lifecycle };
        assert_eq!(
            refused.apply(&mut status, &mut updated_at),
            Err((OrderStatus::Delivered, OrderStatus::Pending))
        );
        assert_eq!(status, OrderStatus::Delivered);
        assert!(updated_at.is_none());

        let forced = StatusTransition { to: OrderStatus::Pending, policy: StatusPolicy::Unrestricted };
        assert!(forced.apply(&mut status, &mut updated_at).is_ok());
        assert_eq!(status, OrderStatus::Pending);
        assert!(updated_at.is_some());
    }

    #[test]
    fn test_lifecycle_table() {
        let policy = StatusPolicy::Lifecycle;
        assert!(policy.allows(OrderStatus::Pending, OrderStatus::Confirmed));
        assert!(policy.allows(OrderStatus::InProgress, OrderStatus::Ready));
        assert!(policy.allows(OrderStatus::Ready, OrderStatus::Delivered));
        assert!(policy.allows(OrderStatus::Ready, OrderStatus::Ready));
        assert!(!policy.allows(OrderStatus::Pending, OrderStatus::Delivered));
        assert!(!policy.allows(OrderStatus::Ready, OrderStatus::Cancelled));

        for terminal in [OrderStatus::Delivered, OrderStatus::Cancelled] {
            assert!(terminal.is_terminal());
            for to in OrderStatus::ALL.into_iter().filter(|s| *s != terminal) {
                assert!(!policy.allows(terminal, to));
            }
        }
    }
}
