//! Customer-facing custom cake form.
//!
//! A strictly linear wizard, `Details → Style → Delivery → Review`. Each step
//! owns a typed record and is validated before the wizard moves on. Nothing
//! is persisted until [`CustomOrderWizard::submit`].

use chrono::{NaiveDate, NaiveTime};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::clients::CustomOrderClient;
use crate::custom_order_actor::CustomOrderError;
use crate::domain::{CakeSelection, CustomOrder, CustomOrderDraft, ImageUpload, User};
use crate::pricing::{CakeOption, PricingTable, Quote};

/// Decorations that come with a written message on the cake.
pub const MESSAGE_DECORATIONS: [&str; 3] = ["message", "custom-topper", "premium"];
pub const MAX_MESSAGE_LEN: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Details,
    Style,
    Delivery,
    Review,
}

impl WizardStep {
    fn next(self) -> Option<Self> {
        match self {
            WizardStep::Details => Some(WizardStep::Style),
            WizardStep::Style => Some(WizardStep::Delivery),
            WizardStep::Delivery => Some(WizardStep::Review),
            WizardStep::Review => None,
        }
    }

    fn previous(self) -> Option<Self> {
        match self {
            WizardStep::Details => None,
            WizardStep::Style => Some(WizardStep::Details),
            WizardStep::Delivery => Some(WizardStep::Style),
            WizardStep::Review => Some(WizardStep::Delivery),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DetailsStep {
    pub occasion: String,
    pub size: String,
}

#[derive(Debug, Clone, Default)]
pub struct StyleStep {
    pub flavor: String,
    pub frosting: String,
    pub filling: String,
    pub decorations: String,
    pub message: String,
    pub reference_image: Option<ImageUpload>,
}

#[derive(Debug, Clone, Default)]
pub struct DeliveryStep {
    /// `YYYY-MM-DD`
    pub delivery_date: String,
    /// `HH:MM`
    pub delivery_time: String,
    pub allergies: String,
    pub special_instructions: String,
}

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("{field}: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("Already at the first step")]
    AtFirstStep,
    #[error("Already at the review step")]
    AtLastStep,
    #[error("Orders can only be submitted from the review step")]
    NotAtReview,
    #[error("Submission failed: {0}")]
    Submit(#[from] CustomOrderError),
}

fn invalid(field: &'static str, reason: impl Into<String>) -> WizardError {
    WizardError::Invalid {
        field,
        reason: reason.into(),
    }
}

pub struct CustomOrderWizard {
    pricing: Arc<PricingTable>,
    today: NaiveDate,
    step: WizardStep,
    pub details: DetailsStep,
    pub style: StyleStep,
    pub delivery: DeliveryStep,
}

impl CustomOrderWizard {
    /// `today` bounds the earliest delivery date.
    pub fn new(pricing: Arc<PricingTable>, today: NaiveDate) -> Self {
        Self {
            pricing,
            today,
            step: WizardStep::Details,
            details: DetailsStep::default(),
            style: StyleStep::default(),
            delivery: DeliveryStep::default(),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// Validates the current step and advances. On failure the wizard stays put.
    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        let next = self.step.next().ok_or(WizardError::AtLastStep)?;
        self.validate_step(self.step)?;
        debug!(from = ?self.step, to = ?next, "Wizard advanced");
        self.step = next;
        Ok(next)
    }

    pub fn back(&mut self) -> Result<WizardStep, WizardError> {
        let previous = self.step.previous().ok_or(WizardError::AtFirstStep)?;
        self.step = previous;
        Ok(previous)
    }

    /// Whether the cake message field is shown for the chosen decorations.
    pub fn message_visible(&self) -> bool {
        MESSAGE_DECORATIONS.contains(&self.style.decorations.as_str())
    }

    pub fn validate_step(&self, step: WizardStep) -> Result<(), WizardError> {
        match step {
            WizardStep::Details => {
                if self.details.occasion.trim().is_empty() {
                    return Err(invalid("occasion", "Tell us what the cake is for"));
                }
                self.known("size", CakeOption::Size, &self.details.size)
            }
            WizardStep::Style => {
                self.known("flavor", CakeOption::Flavor, &self.style.flavor)?;
                self.known("frosting", CakeOption::Frosting, &self.style.frosting)?;
                self.known("filling", CakeOption::Filling, &self.style.filling)?;
                self.known("decorations", CakeOption::Decorations, &self.style.decorations)?;
                if self.message_visible() && self.style.message.trim().chars().count() > MAX_MESSAGE_LEN {
                    return Err(invalid(
                        "message",
                        format!("Keep the message under {} characters", MAX_MESSAGE_LEN),
                    ));
                }
                Ok(())
            }
            WizardStep::Delivery => {
                self.delivery_date()?;
                self.delivery_time()?;
                Ok(())
            }
            WizardStep::Review => Ok(()),
        }
    }

    fn known(&self, field: &'static str, option: CakeOption, value: &str) -> Result<(), WizardError> {
        if value.is_empty() {
            return Err(invalid(field, "Please choose one"));
        }
        if !self.pricing.knows(option, value) {
            let menu = self.pricing.choices(option).join(", ");
            return Err(invalid(field, format!("{:?} is not on the menu (choose from: {})", value, menu)));
        }
        Ok(())
    }

    fn delivery_date(&self) -> Result<NaiveDate, WizardError> {
        let raw = self.delivery.delivery_date.trim();
        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| invalid("delivery_date", format!("{:?} is not a date (YYYY-MM-DD)", raw)))?;
        if date < self.today {
            return Err(invalid("delivery_date", "Delivery date is in the past"));
        }
        Ok(date)
    }

    fn delivery_time(&self) -> Result<NaiveTime, WizardError> {
        let raw = self.delivery.delivery_time.trim();
        NaiveTime::parse_from_str(raw, "%H:%M")
            .map_err(|_| invalid("delivery_time", format!("{:?} is not a time (HH:MM)", raw)))
    }

    pub fn selection(&self) -> CakeSelection {
        let set = |value: &str| (!value.is_empty()).then(|| value.to_string());
        CakeSelection {
            size: set(&self.details.size),
            flavor: set(&self.style.flavor),
            frosting: set(&self.style.frosting),
            filling: set(&self.style.filling),
            decorations: set(&self.style.decorations),
        }
    }

    /// Itemised price shown on the review step.
    pub fn quote(&self) -> Result<Quote, WizardError> {
        self.pricing
            .quote_breakdown(&self.selection())
            .map_err(|e| invalid("selection", e.to_string()))
    }

    /// Builds the submission after re-validating every step.
    pub fn draft(&self) -> Result<CustomOrderDraft, WizardError> {
        for step in [WizardStep::Details, WizardStep::Style, WizardStep::Delivery] {
            self.validate_step(step)?;
        }
        let message = Some(self.style.message.trim())
            .filter(|m| self.message_visible() && !m.is_empty())
            .map(str::to_string);

        Ok(CustomOrderDraft {
            occasion: self.details.occasion.trim().to_string(),
            selection: self.selection(),
            message,
            delivery_date: self.delivery_date()?,
            delivery_time: self.delivery_time()?,
            allergies: self.delivery.allergies.trim().to_string(),
            special_instructions: self.delivery.special_instructions.trim().to_string(),
            reference_image: self.style.reference_image.clone(),
            quoted_price: Some(self.quote()?.total),
        })
    }

    /// Prices the order and hands it to the custom order service.
    #[instrument(skip(self, service, user), fields(user_id = %user.id))]
    pub async fn submit(&self, service: &CustomOrderClient, user: &User) -> Result<CustomOrder, WizardError> {
        if self.step != WizardStep::Review {
            return Err(WizardError::NotAtReview);
        }
        let draft = self.draft()?;
        let order = service.create(draft, user).await?;
        info!(order_id = %order.id, price = order.price, "Custom order submitted");
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_framework::{sequential_ids, ResourceActor};
    use crate::domain::{OrderStatus, StatusPolicy};
    use crate::storage::InMemoryBlobStore;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn wizard() -> CustomOrderWizard {
        CustomOrderWizard::new(Arc::new(PricingTable::default()), today())
    }

    fn filled() -> CustomOrderWizard {
        let mut w = wizard();
        w.details = DetailsStep { occasion: "Anniversary".into(), size: "6-inch".into() };
        w.style = StyleStep {
            flavor: "vanilla".into(),
            frosting: "buttercream".into(),
            filling: "none".into(),
            decorations: "basic".into(),
            message: "Happy 10th!".into(),
            reference_image: None,
        };
        w.delivery = DeliveryStep {
            delivery_date: "2026-10-25".into(),
            delivery_time: "15:30".into(),
            allergies: " nuts ".into(),
            special_instructions: String::new(),
        };
        w
    }

    fn service() -> CustomOrderClient {
        let (actor, inner) = ResourceActor::new("custom_orders", 8, sequential_ids("custom_order"));
        tokio::spawn(actor.run());
        CustomOrderClient::new(
            inner,
            Arc::new(InMemoryBlobStore::new("memory://shop")),
            Arc::new(PricingTable::default()),
            StatusPolicy::Unrestricted,
        )
    }

    #[test]
    fn test_linear_navigation() {
        let mut w = filled();
        assert_eq!(w.back().unwrap_err().to_string(), "Already at the first step");
        assert_eq!(w.next().unwrap(), WizardStep::Style);
        assert_eq!(w.next().unwrap(), WizardStep::Delivery);
        assert_eq!(w.next().unwrap(), WizardStep::Review);
        assert!(matches!(w.next(), Err(WizardError::AtLastStep)));
        assert_eq!(w.back().unwrap(), WizardStep::Delivery);
    }

    #[test]
    fn test_invalid_step_blocks_next() {
        let mut w = wizard();
        w.details.size = "6-inch".into();
        assert!(matches!(w.next(), Err(WizardError::Invalid { field: "occasion", .. })));
        assert_eq!(w.step(), WizardStep::Details);

        w.details.occasion = "Wedding".into();
        w.details.size = "tiny".into();
        match w.next() {
            Err(WizardError::Invalid { field: "size", reason }) => {
                assert!(reason.contains("10-inch, 12-inch, 6-inch, 8-inch"));
            }
            other => panic!("Expected a size error, got {:?}", other),
        }

        w.details.size = "12-inch".into();
        w.next().unwrap();
        w.style.flavor = "vanilla".into();
        assert!(matches!(w.next(), Err(WizardError::Invalid { field: "frosting", .. })));
    }

    #[test]
    fn test_delivery_validation() {
        let mut w = filled();
        w.delivery.delivery_date = "2026-10-18".into();
        assert!(matches!(
            w.validate_step(WizardStep::Delivery),
            Err(WizardError::Invalid { field: "delivery_date", .. })
        ));
        w.delivery.delivery_date = "25/10/2026".into();
        assert!(w.validate_step(WizardStep::Delivery).is_err());
        w.delivery.delivery_date = "2026-10-19".into();
        w.delivery.delivery_time = "3pm".into();
        assert!(matches!(
            w.validate_step(WizardStep::Delivery),
            Err(WizardError::Invalid { field: "delivery_time", .. })
        ));
    }

    #[test]
    fn test_message_only_kept_for_message_decorations() {
        let mut w = filled();
        assert!(!w.message_visible());
        assert_eq!(w.draft().unwrap().message, None);

        w.style.decorations = "custom-topper".into();
        assert!(w.message_visible());
        assert_eq!(w.draft().unwrap().message.as_deref(), Some("Happy 10th!"));

        w.style.message = "x".repeat(MAX_MESSAGE_LEN + 1);
        assert!(matches!(w.draft(), Err(WizardError::Invalid { field: "message", .. })));
    }

    #[test]
    fn test_review_quote() {
        let mut w = filled();
        w.details.size = "8-inch".into();
        w.style.flavor = "chocolate".into();
        w.style.frosting = "ganache".into();
        w.style.decorations = "flowers".into();
        assert_eq!(w.quote().unwrap().total, 14800);
        assert_eq!(w.draft().unwrap().quoted_price, Some(14800));
    }

    #[tokio::test]
    async fn test_submit_only_from_review() {
        let service = service();
        let user = User::new("Grace", "grace@example.com").with_id("user_1");
        let mut w = filled();
        assert!(matches!(w.submit(&service, &user).await, Err(WizardError::NotAtReview)));

        while w.step() != WizardStep::Review {
            w.next().unwrap();
        }
        let order = w.submit(&service, &user).await.unwrap();
        assert_eq!(order.price, 8000);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.allergies, "nuts");
        assert_eq!(order.delivery_date, NaiveDate::from_ymd_opt(2026, 10, 25).unwrap());
    }
}
