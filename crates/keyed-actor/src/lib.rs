//! # Keyed Actor
//!
//! Building blocks for keeping stateful records behind actors, one actor per record.
//! It follows a **Resource-Oriented** shape (Create, Read, Update, Delete plus custom Actions)
//! on top of the **Actor Model** with Tokio tasks and channels.
//!
//! ## Concurrency Model
//!
//! - A registry actor ([`ResourceActor`]) per entity type. It creates entities one at a
//!   time, so identifier allocation and insertion happen as one step.
//! - An entity actor per record. Its mailbox serialises every read-validate-write against
//!   that record, which is what a row lock gives a relational store.
//! - No lock spans more than one record: two records never wait on each other.
//!
//! ## Write Path
//!
//! Mutations are applied to a draft clone. The draft is stamped ([`AuditStamp::touch`]),
//! written to the [`Store`], and only then becomes the live record. If the hook or the store
//! fails, nothing changes and the caller gets the error.
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`ActorEntity`]) - Your business rules and domain model
//! 2. **Runtime Layer** ([`ResourceActor`]) - Routing, identifiers, auditing, persistence
//! 3. **Interface Layer** ([`ResourceClient`], [`ActorClient`]) - Type-safe communication
//! 4. **Storage Layer** ([`Store`], [`MemoryStore`]) - Durable rows and the id high-water mark
//!
//! ## Context Injection Pattern
//!
//! Dependencies are injected when the registry starts (`run(context)`), not at construction
//! time. The context is shared with every entity actor of the type.
//!
//! ## Testing
//!
//! See [`mock`] for helpers that exercise client wrappers without a running registry, and
//! [`ManualClock`] for deterministic timestamps.

pub mod actor;
pub mod allocator;
pub mod audit;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod store;

pub use actor::ResourceActor;
pub use allocator::IdAllocator;
pub use audit::{AuditStamp, Clock, ManualClock, SystemClock};
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{EntityRequest, ResourceRequest, Response};
pub use store::{MemoryStore, Store, StoreError};
