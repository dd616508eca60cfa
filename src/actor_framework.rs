use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

// =============================================================================
// 1. THE ABSTRACTION (Traits with Hooks, Params, and Actions)
// =============================================================================

/// Trait that any record must implement to be stored by a [`ResourceActor`].
///
/// The actor plays the role of a document store collection: it owns every
/// record of one type and serialises all reads and writes to it.
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;
    type CreateParams: Send + Sync + Debug;
    type Patch: Send + Sync + Debug;
    type Action: Send + Sync + Debug;
    type ActionResult: Send + Sync + Debug;

    /// Get the ID of the entity
    fn id(&self) -> &Self::Id;

    /// Construct the full record from the generated ID and creation params
    fn from_create_params(id: Self::Id, params: Self::CreateParams) -> Result<Self, String>;

    // --- Lifecycle Hooks ---

    fn on_create(&mut self) -> Result<(), String> {
        Ok(())
    }
    fn on_update(&mut self, patch: Self::Patch) -> Result<(), String>;
    fn on_delete(&self) -> Result<(), String> {
        Ok(())
    }

    /// Handle a record-specific action atomically inside the actor
    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, String>;
}

/// Errors produced by the store itself, independent of the record type.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameworkError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Rejected by entity: {0}")]
    Rejected(String),
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped")]
    ActorDropped,
}

/// Query predicate evaluated inside the actor when listing records.
pub struct Predicate<T>(Box<dyn Fn(&T) -> bool + Send + Sync>);

impl<T> Predicate<T> {
    pub fn new(f: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        Self(Box::new(f))
    }

    pub fn matches(&self, item: &T) -> bool {
        (self.0)(item)
    }
}

impl<T> Debug for Predicate<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Predicate(..)")
    }
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

#[derive(Debug)]
pub enum ResourceRequest<T: Entity> {
    Create {
        params: T::CreateParams,
        respond_to: Response<T>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    List {
        filter: Option<Predicate<T>>,
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        patch: T::Patch,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

pub struct ResourceActor<T: Entity> {
    name: &'static str,
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    // Insertion order, so listings are stable across calls.
    order: Vec<T::Id>,
    next_id_fn: Box<dyn Fn() -> T::Id + Send + Sync>,
}

impl<T: Entity> ResourceActor<T> {
    pub fn new(
        name: &'static str,
        buffer_size: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            name,
            receiver,
            store: HashMap::new(),
            order: Vec::new(),
            next_id_fn: Box::new(next_id_fn),
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    pub async fn run(mut self) {
        info!(collection = self.name, "Resource actor starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    let _ = respond_to.send(self.handle_create(params));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::List { filter, respond_to } => {
                    let items = self
                        .order
                        .iter()
                        .filter_map(|id| self.store.get(id))
                        .filter(|item| filter.as_ref().map_or(true, |f| f.matches(item)))
                        .cloned()
                        .collect();
                    let _ = respond_to.send(Ok(items));
                }
                ResourceRequest::Update { id, patch, respond_to } => {
                    let result = match self.store.get_mut(&id) {
                        Some(item) => item
                            .on_update(patch)
                            .map(|_| item.clone())
                            .map_err(FrameworkError::Rejected),
                        None => Err(FrameworkError::NotFound(id.to_string())),
                    };
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Delete { id, respond_to } => {
                    let _ = respond_to.send(self.handle_delete(&id));
                }
                ResourceRequest::Action { id, action, respond_to } => {
                    let result = match self.store.get_mut(&id) {
                        Some(item) => item.handle_action(action).map_err(FrameworkError::Rejected),
                        None => Err(FrameworkError::NotFound(id.to_string())),
                    };
                    let _ = respond_to.send(result);
                }
            }
        }
        info!(collection = self.name, "Resource actor stopped");
    }

    fn handle_create(&mut self, params: T::CreateParams) -> Result<T, FrameworkError> {
        let id = (self.next_id_fn)();
        let mut item = T::from_create_params(id.clone(), params).map_err(FrameworkError::Rejected)?;
        item.on_create().map_err(FrameworkError::Rejected)?;
        if self.store.insert(id.clone(), item.clone()).is_some() {
            warn!(collection = self.name, id = %id, "Generated id overwrote an existing record");
        } else {
            self.order.push(id.clone());
        }
        debug!(collection = self.name, id = %id, "Record stored");
        Ok(item)
    }

    fn handle_delete(&mut self, id: &T::Id) -> Result<(), FrameworkError> {
        let item = self
            .store
            .get(id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        item.on_delete().map_err(FrameworkError::Rejected)?;
        self.store.remove(id);
        self.order.retain(|existing| existing != id);
        Ok(())
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

// Manual impl: deriving would require `T: Clone` on the handle itself.
impl<T: Entity> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: Entity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn create(&self, params: T::CreateParams) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Create { params, respond_to })
            .await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to })
            .await
    }

    pub async fn list(&self, filter: Option<Predicate<T>>) -> Result<Vec<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::List { filter, respond_to })
            .await
    }

    pub async fn update(&self, id: T::Id, patch: T::Patch) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Update { id, patch, respond_to })
            .await
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), FrameworkError> {
        self.request(|respond_to| ResourceRequest::Delete { id, respond_to })
            .await
    }

    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Action { id, action, respond_to })
            .await
    }
}

/// Builds a `{prefix}_{n}` id generator, starting at 1.
pub fn sequential_ids(prefix: &'static str) -> impl Fn() -> String + Send + Sync + 'static {
    let counter = std::sync::atomic::AtomicU64::new(1);
    move || {
        let id = counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        format!("{}_{}", prefix, id)
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Candle {
        id: String,
        scent: String,
        lit: bool,
    }

    #[derive(Debug)]
    struct CandleCreate {
        scent: String,
    }

    #[derive(Debug)]
    struct CandlePatch {
        scent: Option<String>,
    }

    #[derive(Debug)]
    enum CandleAction {
        Light,
    }

    impl Entity for Candle {
        type Id = String;
        type CreateParams = CandleCreate;
        type Patch = CandlePatch;
        type Action = CandleAction;
        type ActionResult = bool;

        fn id(&self) -> &String {
            &self.id
        }

        fn from_create_params(id: String, params: CandleCreate) -> Result<Self, String> {
            if params.scent.is_empty() {
                return Err("scent required".to_string());
            }
            Ok(Self {
                id,
                scent: params.scent,
                lit: false,
            })
        }

        fn on_update(&mut self, patch: CandlePatch) -> Result<(), String> {
            if let Some(scent) = patch.scent {
                self.scent = scent;
            }
            Ok(())
        }

        fn on_delete(&self) -> Result<(), String> {
            if self.lit {
                return Err("blow it out first".to_string());
            }
            Ok(())
        }

        fn handle_action(&mut self, action: CandleAction) -> Result<bool, String> {
            match action {
                CandleAction::Light => {
                    let changed = !self.lit;
                    self.lit = true;
                    Ok(changed)
                }
            }
        }
    }

    fn start() -> ResourceClient<Candle> {
        let (actor, client) = ResourceActor::new("candles", 10, sequential_ids("candle"));
        tokio::spawn(actor.run());
        client
    }

    #[tokio::test]
    async fn test_create_get_and_action() {
        let client = start();

        let created = client
            .create(CandleCreate { scent: "vanilla".into() })
            .await
            .unwrap();
        assert_eq!(created.id, "candle_1");

        assert!(client.perform_action(created.id.clone(), CandleAction::Light).await.unwrap());
        assert!(!client.perform_action(created.id.clone(), CandleAction::Light).await.unwrap());

        let stored = client.get(created.id.clone()).await.unwrap().unwrap();
        assert!(stored.lit);
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order_and_filters() {
        let client = start();
        for scent in ["lavender", "cedar", "lemon"] {
            client.create(CandleCreate { scent: scent.into() }).await.unwrap();
        }

        let all = client.list(None).await.unwrap();
        let scents: Vec<_> = all.iter().map(|c| c.scent.as_str()).collect();
        assert_eq!(scents, vec!["lavender", "cedar", "lemon"]);

        let filtered = client
            .list(Some(Predicate::new(|c: &Candle| c.scent.starts_with('l'))))
            .await
            .unwrap();
        assert_eq!(filtered.len(), 2);
    }

    #[tokio::test]
    async fn test_rejections_and_missing_ids() {
        let client = start();

        let err = client.create(CandleCreate { scent: String::new() }).await.unwrap_err();
        assert_eq!(err, FrameworkError::Rejected("scent required".into()));

        let err = client
            .update("candle_99".into(), CandlePatch { scent: None })
            .await
            .unwrap_err();
        assert_eq!(err, FrameworkError::NotFound("candle_99".into()));

        let candle = client.create(CandleCreate { scent: "pine".into() }).await.unwrap();
        client.perform_action(candle.id.clone(), CandleAction::Light).await.unwrap();
        let err = client.delete(candle.id.clone()).await.unwrap_err();
        assert!(matches!(err, FrameworkError::Rejected(_)));
        assert!(client.get(candle.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_removes_from_listing() {
        let client = start();
        let candle = client.create(CandleCreate { scent: "fig".into() }).await.unwrap();
        client.delete(candle.id.clone()).await.unwrap();
        assert!(client.list(None).await.unwrap().is_empty());
    }
}
