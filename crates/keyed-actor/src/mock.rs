//! # Mock Helpers & Testing Guide
//!
//! Testing a client wrapper does not require a running registry. [`create_mock_client`]
//! returns a real [`ResourceClient`] together with the receiving end of its channel, so a
//! test can inspect each request and answer it however it likes: success, a domain error,
//! or a storage failure that would be hard to provoke with a real store.
//!
//! ## When to use Mocks vs Real Actors
//!
//! | Feature | Mock channel | Real Actor |
//! |---------|--------------|------------|
//! | **Determinism** | 100% Deterministic | Subject to scheduler |
//! | **State** | None (you answer) | Real state and store |
//! | **Use Case** | Logic *around* the client | The actor itself, concurrency |
//! | **Error Injection** | Easy | Needs a failing store |
//!
//! ```rust,ignore
//! let (client, mut receiver) = create_mock_client::<Item>(10);
//! let wrapper = ItemClient::new(client);
//! let task = tokio::spawn(async move { wrapper.withdraw(ItemCode(1), dec!(5)).await });
//!
//! let (id, action, responder) = expect_action(&mut receiver).await.unwrap();
//! responder.send(Ok(outcome)).unwrap();
//! assert!(task.await.unwrap().is_ok());
//! ```

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::{EntityRequest, ResourceRequest};
use tokio::sync::{mpsc, oneshot};

/// Creates a client and the receiver its requests arrive on.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Create request.
pub async fn expect_create<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Create, oneshot::Sender<Result<T::Id, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a List request.
pub async fn expect_list<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<oneshot::Sender<Result<Vec<T>, FrameworkError>>> {
    match receiver.recv().await {
        Some(ResourceRequest::List { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Helper to verify that the next message is addressed to a single entity.
pub async fn expect_entity<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<EntityRequest<T>> {
    match receiver.recv().await {
        Some(ResourceRequest::Entity(request)) => Some(request),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request.
pub async fn expect_get<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, oneshot::Sender<Result<Option<T>, FrameworkError>>)> {
    match expect_entity(receiver).await {
        Some(EntityRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Update request.
pub async fn expect_update<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Update, oneshot::Sender<Result<T, FrameworkError>>)> {
    match expect_entity(receiver).await {
        Some(EntityRequest::Update {
            id,
            update,
            respond_to,
        }) => Some((id, update, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request.
pub async fn expect_action<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    T::Id,
    T::Action,
    oneshot::Sender<Result<T::ActionResult, FrameworkError>>,
)> {
    match expect_entity(receiver).await {
        Some(EntityRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}
