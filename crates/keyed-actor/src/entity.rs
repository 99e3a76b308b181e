//! # ActorEntity Trait
//!
//! The `ActorEntity` trait is the contract a resource must satisfy to be managed by the
//! [`ResourceActor`](crate::ResourceActor). It names the associated types for identity, DTOs,
//! actions, context and errors, and provides the lifecycle hooks (`on_create`, `on_update`,
//! `on_delete`, `handle_action`).
//!
//! # Mutation Semantics
//! Hooks that take `&mut self` never run against the live entity. The runtime hands them a
//! *draft* clone; the draft only replaces the live entity after the audit stamp has been
//! refreshed and the [`Store`](crate::Store) accepted the write. An `Err` from a hook, or a
//! failed write, throws the draft away.
//!
//! # Provided Methods (Hooks)
//! - [`ActorEntity::requested_id`]
//! - [`ActorEntity::on_create`]
//! - [`ActorEntity::on_delete`]
//!
//! The defaults do nothing.

use crate::audit::AuditStamp;
use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any resource entity must implement to be managed by `ResourceActor`.
///
/// # Async & Context
/// The trait is `#[async_trait]` so hooks may await (e.g. calling other actors). The `Context`
/// is shared by every entity of the type and injected into each hook, which keeps
/// dependencies out of the constructors ("late binding").
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The unique identifier for this entity.
    ///
    /// Converts to and from `u64` so the runtime can allocate sequential identifiers and
    /// track the highest one ever issued.
    type Id: Eq + Hash + Copy + Send + Sync + Display + Debug + From<u64> + Into<u64> + 'static;

    /// The data required to create a new instance (DTO - Data Transfer Object).
    type Create: Send + Sync + Debug;

    /// The data required to update an existing instance.
    type Update: Send + Sync + Debug;

    /// Enum of resource-specific mutations (e.g. `Withdraw`).
    type Action: Send + Sync + Debug;

    /// The result type returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// The runtime context (dependencies) shared by all entities of this type.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync + 'static;

    /// The error type for this entity.
    ///
    /// One enum per actor rather than one per message: clients match on a single type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// The identifier this entity is stored under.
    fn id(&self) -> Self::Id;

    /// The audit timestamps of this entity.
    fn audit(&self) -> &AuditStamp;

    /// Mutable access to the audit timestamps, used by the runtime on every write.
    fn audit_mut(&mut self) -> &mut AuditStamp;

    /// An identifier supplied by the caller at creation time.
    ///
    /// When this returns `Some`, the allocator is not consulted and the value is used as-is.
    fn requested_id(_params: &Self::Create) -> Option<Self::Id> {
        None
    }

    /// Construct the full entity from its identifier, payload and creation stamp.
    ///
    /// This is where creation payloads are validated. It runs before anything is stored.
    fn from_create_params(
        id: Self::Id,
        params: Self::Create,
        stamp: AuditStamp,
    ) -> Result<Self, Self::Error>;

    // --- Lifecycle Hooks (Async) ---

    /// Called after the entity is constructed and before it is inserted into the store.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies an update to a draft of the entity.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Called before the entity is removed from the store.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Action Handler (Async) ---

    /// Applies a resource-specific action to a draft of the entity.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
