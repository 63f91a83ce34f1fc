use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::model::{ApplicationState, StatePatch};
use crate::normalize::normalize;
use crate::presets::find_preset;
use crate::storage::StorageHandle;
use crate::summary::{planner_summary, PlannerSummary};
use crate::wizard::WizardForm;

type Callback = Arc<dyn Fn(&ApplicationState) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    entries: Vec<(SubscriptionId, Callback)>,
}

/// Single authority over the persisted [`ApplicationState`].
///
/// Construct one per application and share it by reference. Every mutation
/// is written to the storage slot before the in-memory snapshot changes, and
/// subscribers are told about the new snapshot before the call returns.
pub struct StateStore {
    storage: StorageHandle,
    snapshot: Mutex<Option<ApplicationState>>,
    // Bumped on every committed write; a broadcast stops once it is stale.
    generation: AtomicU64,
    subscribers: Mutex<Subscribers>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl StateStore {
    pub fn new(storage: StorageHandle) -> Self {
        Self {
            storage,
            snapshot: Mutex::new(None),
            generation: AtomicU64::new(0),
            subscribers: Mutex::new(Subscribers::default()),
        }
    }

    pub fn storage(&self) -> &StorageHandle {
        &self.storage
    }

    /// Current snapshot, loading it from storage on first use.
    pub fn get_state(&self) -> ApplicationState {
        let mut guard = lock(&self.snapshot);
        if let Some(state) = guard.as_ref() {
            return state.clone();
        }
        let loaded = self.load();
        *guard = Some(loaded.clone());
        loaded
    }

    fn load(&self) -> ApplicationState {
        let raw = match self.storage.read_slot() {
            Ok(raw) => raw,
            Err(err) => {
                warn!(
                    target: "budget_forge",
                    event = "state_load_failed",
                    error = %err
                );
                return ApplicationState::default();
            }
        };

        let Some(raw) = raw else {
            return self.seed("missing");
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => {
                debug!(target: "budget_forge", event = "state_loaded", bytes = raw.len());
                normalize(&value)
            }
            Err(err) => {
                warn!(
                    target: "budget_forge",
                    event = "state_parse_failed",
                    error = %err
                );
                self.seed("corrupt")
            }
        }
    }

    fn seed(&self, reason: &'static str) -> ApplicationState {
        let seeded = ApplicationState::default();
        if let Err(err) = self.persist(&seeded) {
            warn!(
                target: "budget_forge",
                event = "state_seed_save_failed",
                reason,
                error = %err
            );
        } else {
            info!(target: "budget_forge", event = "state_seeded", reason);
        }
        seeded
    }

    fn persist(&self, state: &ApplicationState) -> AppResult<()> {
        let serialized = serde_json::to_string(state)?;
        self.storage.write_slot(&serialized)?;
        Ok(())
    }

    /// Store `state` as-is. The caller is responsible for passing a
    /// normalized value.
    pub fn set_state(&self, state: ApplicationState) -> AppResult<()> {
        let generation = {
            let mut guard = lock(&self.snapshot);
            self.persist(&state).map_err(|err| {
                warn!(target: "budget_forge", event = "state_save_failed", error = %err);
                err
            })?;
            *guard = Some(state.clone());
            self.generation.fetch_add(1, Ordering::SeqCst) + 1
        };
        debug!(target: "budget_forge", event = "state_saved", generation);
        self.notify(&state, generation);
        Ok(())
    }

    pub fn update_state(&self, patch: StatePatch) -> AppResult<ApplicationState> {
        let next = patch.merge_into(self.get_state());
        self.set_state(next.clone())?;
        Ok(next)
    }

    pub fn reset(&self) -> AppResult<ApplicationState> {
        let seeded = ApplicationState::default();
        self.set_state(seeded.clone())?;
        info!(target: "budget_forge", event = "state_reset");
        Ok(seeded)
    }

    /// Pretty-printed JSON of the current state.
    pub fn export_state(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(&self.get_state())?)
    }

    pub fn import_state(&self, payload: &str) -> AppResult<ApplicationState> {
        let parsed: Value = serde_json::from_str(payload).map_err(|err| {
            warn!(
                target: "budget_forge",
                event = "state_import_rejected",
                reason = "parse",
                error = %err
            );
            AppError::malformed_payload("Import file is not valid JSON.").with_cause(err)
        })?;
        if !parsed.is_object() {
            warn!(
                target: "budget_forge",
                event = "state_import_rejected",
                reason = "not_object"
            );
            return Err(AppError::malformed_payload(
                "Import file must contain a JSON object.",
            ));
        }

        let normalized = normalize(&parsed);
        self.set_state(normalized.clone())?;
        info!(target: "budget_forge", event = "state_imported");
        Ok(normalized)
    }

    /// Pre-fills the planner answers from a preset. Onboarding is left as is;
    /// [`StateStore::complete_wizard`] is what marks a household onboarded.
    pub fn apply_preset(&self, id: &str) -> AppResult<ApplicationState> {
        let preset = find_preset(id)?;
        self.update_state(preset.form().answers_patch())
    }

    /// Validates the wizard answers, stores them and marks the household onboarded.
    pub fn complete_wizard(&self, form: WizardForm) -> AppResult<ApplicationState> {
        form.validate()?;
        self.update_state(form.into_patch())
    }

    pub fn summary(&self) -> PlannerSummary {
        planner_summary(&self.get_state())
    }

    /// Register a callback that receives every new snapshot, in
    /// registration order.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&ApplicationState) + Send + Sync + 'static,
    {
        let callback: Callback = Arc::new(callback);
        let mut subs = lock(&self.subscribers);
        let id = SubscriptionId(subs.next_id);
        subs.next_id += 1;
        subs.entries.push((id, callback));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subs = lock(&self.subscribers);
        let before = subs.entries.len();
        subs.entries.retain(|(entry, _)| *entry != id);
        subs.entries.len() != before
    }

    // Callbacks run without any store lock held so they may read (or write)
    // the store. A write from inside a callback broadcasts the newer state to
    // everyone, so the older broadcast must not continue after it.
    fn notify(&self, state: &ApplicationState, generation: u64) {
        let callbacks: Vec<Callback> = lock(&self.subscribers)
            .entries
            .iter()
            .map(|(_, callback)| callback.clone())
            .collect();
        for callback in callbacks {
            if self.generation.load(Ordering::SeqCst) != generation {
                debug!(target: "budget_forge", event = "broadcast_superseded", generation);
                return;
            }
            callback(state);
        }
    }
}
