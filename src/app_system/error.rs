use thiserror::Error;

use crate::config::ConfigError;
use crate::custom_order_actor::CustomOrderError;
use crate::order_actor::OrderError;
use crate::product_actor::ProductError;
use crate::user_actor::UserError;
use crate::wizard::WizardError;

#[derive(Debug, Error)]
pub enum SystemError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Actor task failed: {0}")]
    ActorTask(#[from] tokio::task::JoinError),
    #[error(transparent)]
    User(#[from] UserError),
    #[error(transparent)]
    Product(#[from] ProductError),
    #[error(transparent)]
    Order(#[from] OrderError),
    #[error(transparent)]
    CustomOrder(#[from] CustomOrderError),
    #[error(transparent)]
    Wizard(#[from] WizardError),
}
