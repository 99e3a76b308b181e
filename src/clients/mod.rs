//! Type-safe wrappers around [`ResourceClient`](keyed_actor::ResourceClient).

pub mod inventory_client;

pub use inventory_client::*;
pub use keyed_actor::ActorClient;
