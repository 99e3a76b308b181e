use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use keyed_actor::{
    ActorEntity, AuditStamp, FrameworkError, ManualClock, MemoryStore, ResourceActor, Store,
    StoreError,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

// --- Test Entity ---

#[derive(Clone, Debug, PartialEq)]
struct Counter {
    id: u64,
    label: String,
    value: i64,
    stamp: AuditStamp,
}

#[derive(Debug)]
struct CounterCreate {
    id: Option<u64>,
    label: String,
}

#[derive(Debug)]
struct CounterUpdate {
    label: String,
}

#[derive(Debug)]
enum CounterAction {
    Add(i64),
    /// Waits for the gate in the context before adding.
    AddAfterGate(i64),
}

#[derive(Debug, thiserror::Error, PartialEq)]
enum CounterError {
    #[error("label must not be empty")]
    EmptyLabel,
    #[error("value would go negative")]
    Negative,
}

#[async_trait]
impl ActorEntity for Counter {
    type Id = u64;
    type Create = CounterCreate;
    type Update = CounterUpdate;
    type Action = CounterAction;
    type ActionResult = i64;
    type Context = Arc<Notify>;
    type Error = CounterError;

    fn id(&self) -> u64 {
        self.id
    }

    fn audit(&self) -> &AuditStamp {
        &self.stamp
    }

    fn audit_mut(&mut self) -> &mut AuditStamp {
        &mut self.stamp
    }

    fn requested_id(params: &CounterCreate) -> Option<u64> {
        params.id
    }

    fn from_create_params(
        id: u64,
        params: CounterCreate,
        stamp: AuditStamp,
    ) -> Result<Self, Self::Error> {
        if params.label.is_empty() {
            return Err(CounterError::EmptyLabel);
        }
        Ok(Self {
            id,
            label: params.label,
            value: 0,
            stamp,
        })
    }

    async fn on_update(
        &mut self,
        update: CounterUpdate,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error> {
        if update.label.is_empty() {
            return Err(CounterError::EmptyLabel);
        }
        self.label = update.label;
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: CounterAction,
        gate: &Self::Context,
    ) -> Result<i64, Self::Error> {
        let delta = match action {
            CounterAction::Add(delta) => delta,
            CounterAction::AddAfterGate(delta) => {
                gate.notified().await;
                delta
            }
        };
        if self.value + delta < 0 {
            return Err(CounterError::Negative);
        }
        self.value += delta;
        Ok(self.value)
    }
}

/// Memory store whose writes can be switched off.
struct FlakyStore {
    inner: MemoryStore<Counter>,
    broken: AtomicBool,
}

impl FlakyStore {
    fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            broken: AtomicBool::new(false),
        }
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.broken.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("disk on fire".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Store<Counter> for FlakyStore {
    async fn insert(&self, row: &Counter, last_issued: u64) -> Result<(), StoreError> {
        self.check()?;
        self.inner.insert(row, last_issued).await
    }

    async fn update(&self, row: &Counter) -> Result<(), StoreError> {
        self.check()?;
        self.inner.update(row).await
    }

    async fn list(&self) -> Result<Vec<Counter>, StoreError> {
        self.inner.list().await
    }

    async fn remove(&self, id: u64) -> Result<(), StoreError> {
        self.check()?;
        self.inner.remove(id).await
    }

    async fn last_issued(&self) -> Result<u64, StoreError> {
        self.inner.last_issued().await
    }
}

fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
    ))
}

fn memory() -> Arc<MemoryStore<Counter>> {
    Arc::new(MemoryStore::new())
}

fn create(label: &str) -> CounterCreate {
    CounterCreate {
        id: None,
        label: label.into(),
    }
}

#[tokio::test]
async fn test_resource_actor_crud_and_actions() {
    let clock = clock();
    let (actor, client) = ResourceActor::<Counter>::new(10, memory(), clock.clone());
    tokio::spawn(actor.run(Arc::new(Notify::new())));

    // 1. Create
    let id = client.create(create("apples")).await.unwrap();
    assert_eq!(id, 1);

    // 2. Action
    clock.advance(Duration::seconds(5));
    let value = client.perform_action(id, CounterAction::Add(3)).await.unwrap();
    assert_eq!(value, 3);

    let counter = client.get(id).await.unwrap().unwrap();
    assert_eq!(counter.value, 3);
    assert!(counter.stamp.updated_at() > counter.stamp.created_at());

    // 3. Update
    let renamed = client
        .update(
            id,
            CounterUpdate {
                label: "pears".into(),
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.label, "pears");

    // 4. Delete
    client.delete(id).await.unwrap();
    assert!(client.get(id).await.unwrap().is_none());
    assert!(matches!(
        client.perform_action(id, CounterAction::Add(1)).await,
        Err(FrameworkError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_failed_hook_leaves_entity_and_stamp_unchanged() {
    let (actor, client) = ResourceActor::<Counter>::new(10, memory(), clock());
    tokio::spawn(actor.run(Arc::new(Notify::new())));

    let id = client.create(create("apples")).await.unwrap();
    let before = client.get(id).await.unwrap().unwrap();

    let err = client
        .perform_action(id, CounterAction::Add(-1))
        .await
        .unwrap_err();
    assert_eq!(
        err.into_entity_error::<CounterError>().unwrap(),
        CounterError::Negative
    );

    let after = client.get(id).await.unwrap().unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_ids_are_not_reused_after_delete() {
    let (actor, client) = ResourceActor::<Counter>::new(10, memory(), clock());
    tokio::spawn(actor.run(Arc::new(Notify::new())));

    let first = client.create(create("a")).await.unwrap();
    let second = client.create(create("b")).await.unwrap();
    client.delete(second).await.unwrap();
    let third = client.create(create("c")).await.unwrap();

    assert_eq!((first, second, third), (1, 2, 3));
}

#[tokio::test]
async fn test_rejected_create_does_not_consume_an_id() {
    let (actor, client) = ResourceActor::<Counter>::new(10, memory(), clock());
    tokio::spawn(actor.run(Arc::new(Notify::new())));

    assert!(client.create(create("")).await.is_err());
    assert_eq!(client.create(create("ok")).await.unwrap(), 1);
}

#[tokio::test]
async fn test_explicit_ids_conflict_and_raise_the_mark() {
    let (actor, client) = ResourceActor::<Counter>::new(10, memory(), clock());
    tokio::spawn(actor.run(Arc::new(Notify::new())));

    let explicit = CounterCreate {
        id: Some(7),
        label: "seven".into(),
    };
    assert_eq!(client.create(explicit).await.unwrap(), 7);

    let duplicate = CounterCreate {
        id: Some(7),
        label: "again".into(),
    };
    assert!(matches!(
        client.create(duplicate).await,
        Err(FrameworkError::Conflict(_))
    ));

    assert_eq!(client.create(create("next")).await.unwrap(), 8);
}

#[tokio::test]
async fn test_exhausted_ids_keep_the_registry_alive() {
    let (actor, client) = ResourceActor::<Counter>::new(10, memory(), clock());
    tokio::spawn(actor.run(Arc::new(Notify::new())));

    let last = CounterCreate {
        id: Some(u64::MAX),
        label: "last".into(),
    };
    assert_eq!(client.create(last).await.unwrap(), u64::MAX);

    assert!(matches!(
        client.create(create("overflow")).await,
        Err(FrameworkError::Exhausted)
    ));

    let low = CounterCreate {
        id: Some(3),
        label: "low".into(),
    };
    assert_eq!(client.create(low).await.unwrap(), 3);
    assert_eq!(client.list().await.unwrap().len(), 2);
    assert_eq!(client.get(u64::MAX).await.unwrap().unwrap().label, "last");
}

#[tokio::test]
async fn test_storage_failure_rolls_back() {
    let store = Arc::new(FlakyStore::new());
    let (actor, client) = ResourceActor::<Counter>::new(10, store.clone(), clock());
    tokio::spawn(actor.run(Arc::new(Notify::new())));

    let id = client.create(create("apples")).await.unwrap();
    client.perform_action(id, CounterAction::Add(10)).await.unwrap();

    store.broken.store(true, Ordering::SeqCst);
    let err = client
        .perform_action(id, CounterAction::Add(5))
        .await
        .unwrap_err();
    assert!(matches!(err, FrameworkError::Storage(_)));
    assert!(client.create(create("pears")).await.is_err());

    store.broken.store(false, Ordering::SeqCst);
    assert_eq!(client.get(id).await.unwrap().unwrap().value, 10);
    let stored = store.list().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].value, 10);
    assert_eq!(client.create(create("pears")).await.unwrap(), 2);
}

#[tokio::test]
async fn test_busy_entity_does_not_block_others() {
    let gate = Arc::new(Notify::new());
    let (actor, client) = ResourceActor::<Counter>::new(10, memory(), clock());
    tokio::spawn(actor.run(gate.clone()));

    let slow = client.create(create("slow")).await.unwrap();
    let fast = client.create(create("fast")).await.unwrap();

    let blocked = {
        let client = client.clone();
        tokio::spawn(async move {
            client
                .perform_action(slow, CounterAction::AddAfterGate(1))
                .await
        })
    };

    // The slow entity is parked on the gate; the fast one must still answer.
    let value = tokio::time::timeout(
        std::time::Duration::from_secs(1),
        client.perform_action(fast, CounterAction::Add(2)),
    )
    .await
    .expect("fast entity was blocked")
    .unwrap();
    assert_eq!(value, 2);

    gate.notify_one();
    assert_eq!(blocked.await.unwrap().unwrap(), 1);
}

#[tokio::test]
async fn test_registry_restores_rows_from_store() {
    let stamp = AuditStamp::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    let rows = vec![
        Counter {
            id: 4,
            label: "restored".into(),
            value: 9,
            stamp,
        },
    ];
    let store = Arc::new(MemoryStore::with_rows(rows, 6));
    let (actor, client) = ResourceActor::<Counter>::new(10, store, clock());
    tokio::spawn(actor.run(Arc::new(Notify::new())));

    assert_eq!(client.get(4).await.unwrap().unwrap().value, 9);
    assert_eq!(client.create(create("new")).await.unwrap(), 7);
    assert_eq!(client.list().await.unwrap().len(), 2);
}
