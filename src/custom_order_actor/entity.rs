use chrono::Utc;

use crate::actor_framework::Entity;
use crate::domain::{CustomOrder, CustomOrderCreate, OrderStatus, StatusTransition, TransitionOutcome};

impl Entity for CustomOrder {
    type Id = String;
    type CreateParams = CustomOrderCreate;
    type Patch = ();
    type Action = StatusTransition;
    type ActionResult = TransitionOutcome<CustomOrder>;

    fn id(&self) -> &String {
        &self.id
    }

    fn from_create_params(id: String, params: CustomOrderCreate) -> Result<Self, String> {
        if params.user_id.is_empty() {
            return Err("Custom order needs an owner".to_string());
        }
        Ok(Self {
            id,
            user_id: params.user_id,
            user_email: params.user_email,
            occasion: params.occasion,
            size: params.size,
            flavor: params.flavor,
            frosting: params.frosting,
            filling: params.filling,
            decorations: params.decorations,
            message: params.message,
            delivery_date: params.delivery_date,
            delivery_time: params.delivery_time,
            allergies: params.allergies,
            special_instructions: params.special_instructions,
            image_url: params.image_url,
            price: params.price,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            updated_at: None,
        })
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), String> {
        Err("Custom orders only change through status transitions".to_string())
    }

    fn handle_action(
        &mut self,
        transition: StatusTransition,
    ) -> Result<TransitionOutcome<CustomOrder>, String> {
        Ok(match transition.apply(&mut self.status, &mut self.updated_at) {
            Ok(()) => TransitionOutcome::Applied(self.clone()),
            Err((from, to)) => TransitionOutcome::Refused { from, to },
        })
    }
}
