use crate::actor_framework::Entity;
use crate::domain::{User, UserCreate, UserPatch};

impl Entity for User {
    type Id = String;
    type CreateParams = UserCreate;
    type Patch = UserPatch;
    type Action = ();
    type ActionResult = ();

    fn id(&self) -> &String {
        &self.id
    }

    /// Creates a new User from creation parameters.
    ///
    /// # Errors
    /// Rejects an email without an `@`.
    fn from_create_params(id: String, params: UserCreate) -> Result<Self, String> {
        if !params.email.contains('@') {
            return Err(format!("Invalid email: {:?}", params.email));
        }
        Ok(Self {
            id,
            name: params.name,
            email: params.email,
            role: params.role,
        })
    }

    fn on_update(&mut self, patch: UserPatch) -> Result<(), String> {
        if let Some(email) = &patch.email {
            if !email.contains('@') {
                return Err(format!("Invalid email: {:?}", email));
            }
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        Ok(())
    }

    /// No custom actions are defined for users.
    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}
