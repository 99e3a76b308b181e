//! # Actor Servers
//!
//! Two kinds of actor cooperate here:
//!
//! - [`ResourceActor`] is the registry for one entity type. It allocates identifiers,
//!   creates entities, answers `List`, and routes every other request to the owning
//!   entity's mailbox.
//! - `EntityActor` owns exactly one entity. Its mailbox is the row lock: requests for the
//!   same entity are handled strictly one after the other, while different entities run in
//!   their own tasks and never wait on each other.
//!
//! Every mutation follows the same path inside an entity actor: clone a draft, run the hook,
//! refresh the audit stamp, write the draft to the [`Store`], and only then replace the live
//! entity. Any failure along the way leaves the live entity and the stored row untouched.

use crate::allocator::IdAllocator;
use crate::audit::{AuditStamp, Clock};
use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::{EntityRequest, ResourceRequest};
use crate::store::{Store, StoreError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

type Mailbox<T> = mpsc::UnboundedSender<EntityRequest<T>>;

/// Short type name for logs (e.g. "InventoryItem" instead of the full path).
fn entity_type<T>() -> &'static str {
    std::any::type_name::<T>()
        .split("::")
        .last()
        .unwrap_or("Unknown")
}

/// The registry actor for one entity type.
///
/// # Usage Pattern
///
/// 1.  **Create**: `ResourceActor::new()` returns the actor (server) and a `ResourceClient`.
/// 2.  **Wire**: dependencies are passed to `actor.run(context)`.
/// 3.  **Run**: spawn the run loop in a background task.
///
/// ```rust,ignore
/// let store = Arc::new(MemoryStore::<Item>::new());
/// let (actor, client) = ResourceActor::new(32, store, Arc::new(SystemClock));
/// tokio::spawn(actor.run(()));
/// let id = client.create(ItemCreate { .. }).await?;
/// ```
///
/// # Operations
///
/// * **Create**: serialised in the registry loop. Takes the caller's identifier or the next
///   one from the [`IdAllocator`], builds and stamps the entity, inserts it together with the
///   new high-water mark, then spawns its actor. A failed create hands the identifier back.
/// * **List**: reads the committed rows from the store in a separate task.
/// * **Get / Update / Delete / Action**: forwarded to the entity actor without waiting.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    directory: HashMap<T::Id, Mailbox<T>>,
    store: Arc<dyn Store<T>>,
    clock: Arc<dyn Clock>,
    allocator: IdAllocator,
    entities: JoinSet<()>,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// `buffer_size` is the capacity of the registry channel; when it is full, client calls
    /// wait until there is space.
    pub fn new(
        buffer_size: usize,
        store: Arc<dyn Store<T>>,
        clock: Arc<dyn Clock>,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            directory: HashMap::new(),
            store,
            clock,
            allocator: IdAllocator::new(),
            entities: JoinSet::new(),
        };
        (actor, ResourceClient::new(sender))
    }

    /// Runs the registry loop until every client is dropped.
    ///
    /// Rows already in the store are restored first, each under its own entity actor, and
    /// the allocator resumes after the stored high-water mark.
    pub async fn run(mut self, context: T::Context) {
        let entity_type = entity_type::<T>();
        let context = Arc::new(context);

        match self.recover(&context).await {
            Ok(restored) => info!(
                entity_type,
                restored,
                last_issued = self.allocator.last_issued(),
                "Actor started"
            ),
            Err(e) => {
                error!(entity_type, error = %e, "Recovery failed");
                return;
            }
        }

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let result = self.create(params, &context).await;
                    match &result {
                        Ok(id) => info!(entity_type, %id, "Created"),
                        Err(e) => warn!(entity_type, error = %e, "Create failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::List { respond_to } => {
                    debug!(entity_type, "List");
                    let store = Arc::clone(&self.store);
                    tokio::spawn(async move {
                        let rows = store.list().await.map_err(FrameworkError::from);
                        let _ = respond_to.send(rows);
                    });
                }
                ResourceRequest::Entity(request) => self.route(request),
            }
        }

        // Closing every mailbox lets the entity actors drain and exit.
        self.directory.clear();
        while let Some(joined) = self.entities.join_next().await {
            if let Err(e) = joined {
                error!(entity_type, error = %e, "Entity task failed");
            }
        }
        info!(entity_type, "Shutdown");
    }

    async fn recover(&mut self, context: &Arc<T::Context>) -> Result<usize, StoreError> {
        self.allocator = IdAllocator::resume_after(self.store.last_issued().await?);
        let rows = self.store.list().await?;
        let restored = rows.len();
        for row in rows {
            self.allocator.observe(row.id().into());
            self.spawn_entity(row, context);
        }
        Ok(restored)
    }

    async fn create(
        &mut self,
        params: T::Create,
        context: &Arc<T::Context>,
    ) -> Result<T::Id, FrameworkError> {
        let (id, allocated) = match T::requested_id(&params) {
            Some(id) if self.is_live(&id) => {
                return Err(FrameworkError::Conflict(id.to_string()));
            }
            Some(id) => (id, false),
            None => match self.allocator.next_code() {
                Some(code) => (T::Id::from(code), true),
                None => return Err(FrameworkError::Exhausted),
            },
        };

        let result = self.insert(id, params, context).await;
        match result {
            Ok(()) => self.allocator.observe(id.into()),
            Err(_) if allocated => {
                self.allocator.release(id.into());
            }
            Err(_) => {}
        }
        result.map(|()| id)
    }

    async fn insert(
        &mut self,
        id: T::Id,
        params: T::Create,
        context: &Arc<T::Context>,
    ) -> Result<(), FrameworkError> {
        let stamp = AuditStamp::new(self.clock.now());
        let mut item = T::from_create_params(id, params, stamp)
            .map_err(|e| FrameworkError::EntityError(Box::new(e)))?;
        item.on_create(context)
            .await
            .map_err(|e| FrameworkError::EntityError(Box::new(e)))?;

        let last_issued = self.allocator.last_issued().max(id.into());
        self.store
            .insert(&item, last_issued)
            .await
            .map_err(|e| match e {
                StoreError::Duplicate(key) => FrameworkError::Conflict(key),
                other => FrameworkError::Storage(other),
            })?;

        self.spawn_entity(item, context);
        Ok(())
    }

    fn spawn_entity(&mut self, item: T, context: &Arc<T::Context>) {
        let (mailbox, receiver) = mpsc::unbounded_channel();
        let id = item.id();
        let actor = EntityActor {
            item,
            receiver,
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
        };
        self.entities.spawn(actor.run(Arc::clone(context)));
        self.directory.insert(id, mailbox);
    }

    fn route(&mut self, request: EntityRequest<T>) {
        let id = request.id();
        let undelivered = match self.directory.get(&id) {
            Some(mailbox) => mailbox.send(request).err().map(|e| e.0),
            None => Some(request),
        };
        if let Some(request) = undelivered {
            // A closed mailbox belongs to a deleted entity.
            self.directory.remove(&id);
            warn!(entity_type = entity_type::<T>(), %id, "Not found");
            request.reject(FrameworkError::NotFound(id.to_string()));
        }
    }

    fn is_live(&self, id: &T::Id) -> bool {
        self.directory
            .get(id)
            .is_some_and(|mailbox| !mailbox.is_closed())
    }
}

/// The actor owning a single entity.
struct EntityActor<T: ActorEntity> {
    item: T,
    receiver: mpsc::UnboundedReceiver<EntityRequest<T>>,
    store: Arc<dyn Store<T>>,
    clock: Arc<dyn Clock>,
}

impl<T: ActorEntity> EntityActor<T> {
    async fn run(mut self, context: Arc<T::Context>) {
        let entity_type = entity_type::<T>();
        let id = self.item.id();

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                EntityRequest::Get { respond_to, .. } => {
                    debug!(entity_type, %id, "Get");
                    let _ = respond_to.send(Ok(Some(self.item.clone())));
                }
                EntityRequest::Update {
                    update, respond_to, ..
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    let mut draft = self.item.clone();
                    let result = match draft.on_update(update, &context).await {
                        Ok(()) => self.commit(draft).await.map(T::clone),
                        Err(e) => Err(FrameworkError::EntityError(Box::new(e))),
                    };
                    match &result {
                        Ok(_) => {
                            let updated_at = self.item.audit().updated_at();
                            info!(entity_type, %id, %updated_at, "Updated");
                        }
                        Err(e) => warn!(entity_type, %id, error = %e, "Update failed"),
                    }
                    let _ = respond_to.send(result);
                }
                EntityRequest::Action {
                    action, respond_to, ..
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    let mut draft = self.item.clone();
                    let result = match draft.handle_action(action, &context).await {
                        Ok(outcome) => self.commit(draft).await.map(|_| outcome),
                        Err(e) => Err(FrameworkError::EntityError(Box::new(e))),
                    };
                    match &result {
                        Ok(_) => {
                            let updated_at = self.item.audit().updated_at();
                            info!(entity_type, %id, %updated_at, "Action ok");
                        }
                        Err(e) => warn!(entity_type, %id, error = %e, "Action failed"),
                    }
                    let _ = respond_to.send(result);
                }
                EntityRequest::Delete { respond_to, .. } => {
                    debug!(entity_type, %id, "Delete");
                    let result = match self.item.on_delete(&context).await {
                        Ok(()) => self.store.remove(id).await.map_err(FrameworkError::from),
                        Err(e) => Err(FrameworkError::EntityError(Box::new(e))),
                    };
                    if let Err(e) = result {
                        warn!(entity_type, %id, error = %e, "Delete failed");
                        let _ = respond_to.send(Err(e));
                        continue;
                    }

                    // Closed before replying: a caller that sees Ok must find the id free.
                    self.receiver.close();
                    info!(entity_type, %id, "Deleted");
                    let _ = respond_to.send(Ok(()));
                    while let Some(late) = self.receiver.recv().await {
                        late.reject(FrameworkError::NotFound(id.to_string()));
                    }
                    return;
                }
            }
        }

        debug!(entity_type, %id, "Stopped");
    }

    /// Stamps the draft, persists it and makes it the live entity.
    async fn commit(&mut self, mut draft: T) -> Result<&T, FrameworkError> {
        draft.audit_mut().touch(self.clock.now());
        self.store.update(&draft).await?;
        self.item = draft;
        Ok(&self.item)
    }
}
