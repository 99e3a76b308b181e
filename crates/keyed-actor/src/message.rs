//! # Generic Messages
//!
//! Message types exchanged between the `ResourceClient`, the registry `ResourceActor` and
//! the per-entity actors.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Request sent to the registry actor.
///
/// `Create` and `List` are answered by the registry itself. Everything addressed to one
/// entity is wrapped in [`ResourceRequest::Entity`] and forwarded, unopened, to that
/// entity's mailbox.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
    Entity(EntityRequest<T>),
}

/// Request handled by the actor that owns a single entity.
///
/// # The CRUD Pattern
/// - **Get (Read)**: Fetches the committed state.
/// - **Update**: Applies [`ActorEntity::Update`] to a draft and commits it.
/// - **Delete**: Removes the entity and retires its actor.
/// - **Action**: Applies a custom [`ActorEntity::Action`] to a draft and commits it.
#[derive(Debug)]
pub enum EntityRequest<T: ActorEntity> {
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
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

impl<T: ActorEntity> EntityRequest<T> {
    /// The entity this request is addressed to.
    pub fn id(&self) -> T::Id {
        match self {
            EntityRequest::Get { id, .. }
            | EntityRequest::Update { id, .. }
            | EntityRequest::Delete { id, .. }
            | EntityRequest::Action { id, .. } => *id,
        }
    }

    /// Answers the request with `error` without handling it.
    pub fn reject(self, error: FrameworkError) {
        match self {
            EntityRequest::Get { respond_to, .. } => {
                let _ = respond_to.send(Err(error));
            }
            EntityRequest::Update { respond_to, .. } => {
                let _ = respond_to.send(Err(error));
            }
            EntityRequest::Delete { respond_to, .. } => {
                let _ = respond_to.send(Err(error));
            }
            EntityRequest::Action { respond_to, .. } => {
                let _ = respond_to.send(Err(error));
            }
        }
    }
}
