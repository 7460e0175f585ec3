use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use studyplan::{
    config::WizardConfig,
    core::store::{FileStore, KeyValueStore, MemoryStore, StorageError},
    project::ProjectWire,
    wizard::{
        WizardController, WizardFlow,
        step::{StepDescriptor, WizardStep, non_empty_text, one_of},
    },
};

pub const SCENARIO_KEY: &str = "scenario-draft";

/// Three steps: `name`, optional `purpose`, `goal`.
pub fn scenario_flow() -> WizardFlow {
    WizardFlow::new("scenario", "Scenario")
        .add_step(WizardStep::new(
            StepDescriptor::new("name", "Name"),
            non_empty_text("project_name"),
        ))
        .add_step(WizardStep::new(
            StepDescriptor::new("purpose", "Purpose").optional(),
            one_of("purpose", &["exam_prep", "curiosity"]),
        ))
        .add_step(WizardStep::new(
            StepDescriptor::new("goal", "Goal"),
            non_empty_text("goal_description"),
        ))
}

/// Scenario wizard without persistence.
pub fn in_memory_wizard() -> WizardController {
    WizardController::builder(scenario_flow())
        .build()
        .expect("Failed to build scenario wizard")
}

/// Scenario wizard auto-saving to `store` under `SCENARIO_KEY`.
pub fn persisted_wizard(store: Arc<dyn KeyValueStore>) -> WizardController {
    WizardController::builder(scenario_flow())
        .with_config(WizardConfig::persisted(SCENARIO_KEY))
        .with_store(store)
        .build()
        .expect("Failed to build persisted scenario wizard")
}

pub fn memory_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

/// Creates a FileStore in a temporary directory.
/// Returns both the store and the directory (which must be kept alive).
pub fn file_store() -> (Arc<FileStore>, tempfile::TempDir) {
    let dir = tempfile::TempDir::new().expect("Failed to create temp directory");
    let store = FileStore::open(dir.path().join("drafts")).expect("Failed to open file store");
    (Arc::new(store), dir)
}

/// Exit handler that counts its invocations.
pub fn exit_counter() -> (Arc<AtomicUsize>, impl FnMut() + Send + 'static) {
    let count = Arc::new(AtomicUsize::new(0));
    let handle = count.clone();
    (count, move || {
        handle.fetch_add(1, Ordering::SeqCst);
    })
}

/// Store whose every operation fails, like a browser with storage disabled.
#[derive(Debug, Default)]
pub struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Poisoned)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Err(StorageError::QuotaExceeded {
            key: key.to_string(),
            len: value.len(),
            limit: 0,
        })
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Poisoned)
    }
}

/// Wire project with only the required fields.
pub fn make_wire(id: &str, name: &str, project_type: &str) -> ProjectWire {
    ProjectWire::new(id, name, project_type, "2024-01-01")
}

/// Memory store whose next `get` fails once, like a transient read error.
#[derive(Debug, Default)]
pub struct FlakyReadStore {
    inner: MemoryStore,
    fail_next_get: AtomicBool,
}

impl FlakyReadStore {
    pub fn fail_next_get(&self) {
        self.fail_next_get.store(true, Ordering::SeqCst);
    }
}

impl KeyValueStore for FlakyReadStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_next_get.swap(false, Ordering::SeqCst) {
            return Err(StorageError::Poisoned);
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key)
    }
}
