use chrono::Utc;

use crate::actor_framework::Entity;
use crate::domain::{Order, OrderCreate, OrderStatus, StatusTransition, TransitionOutcome};

impl Entity for Order {
    type Id = String;
    type CreateParams = OrderCreate;
    type Patch = ();
    type Action = StatusTransition;
    type ActionResult = TransitionOutcome<Order>;

    fn id(&self) -> &String {
        &self.id
    }

    /// Creates a new Order from creation parameters.
    ///
    /// # Notes
    /// The order is initialized with status `pending`.
    fn from_create_params(id: String, params: OrderCreate) -> Result<Self, String> {
        Ok(Self {
            id,
            user_id: params.user_id,
            product_id: params.product_id,
            quantity: params.quantity,
            total: params.total,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            updated_at: None,
        })
    }

    /// Orders are immutable apart from their status.
    fn on_update(&mut self, _patch: ()) -> Result<(), String> {
        Err("Orders only change through status transitions".to_string())
    }

    fn handle_action(&mut self, transition: StatusTransition) -> Result<TransitionOutcome<Order>, String> {
        Ok(match transition.apply(&mut self.status, &mut self.updated_at) {
            Ok(()) => TransitionOutcome::Applied(self.clone()),
            Err((from, to)) => TransitionOutcome::Refused { from, to },
        })
    }
}
