use tracing::{debug, info, instrument};

use crate::actor_framework::ResourceClient;
use crate::clients::store_failure;
use crate::domain::{User, UserCreate, UserPatch};
use crate::user_actor::UserError;

/// Client for interacting with the User actor.
#[derive(Clone)]
pub struct UserClient {
    inner: ResourceClient<User>,
}

impl_basic_client!(UserClient, User, UserError, user);

impl UserClient {
    #[instrument(skip(self, user), fields(user_email = %user.email))]
    pub async fn create_user(&self, user: User) -> Result<User, UserError> {
        debug!("Sending request");
        let params = UserCreate {
            name: user.name,
            email: user.email,
            role: user.role,
        };
        let created = self.inner.create(params).await.map_err(store_failure::<UserError>)?;
        info!(user_id = %created.id, "User created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn update_user(&self, id: String, patch: UserPatch) -> Result<User, UserError> {
        debug!("Sending request");
        self.inner.update(id, patch).await.map_err(store_failure)
    }
}
