use tracing::{error, info};

use crate::app_state::{Action, AppState, Effect, Notice};
use crate::store::{JournalStore, KeyValueStore};

/// Owns the state and the store, and keeps the two in step.
///
/// Storage effects run synchronously inside [`Journal::dispatch`], so the
/// persisted collection always matches memory once dispatch returns.
/// Effects that need the network or the filesystem are handed back to the
/// caller to run in the background.
#[derive(Debug)]
pub struct Journal<S> {
    state: AppState,
    store: JournalStore<S>,
}

impl<S: KeyValueStore> Journal<S> {
    pub fn open(store: JournalStore<S>) -> Self {
        let state = AppState::new(store.load_entries(), store.load_password());
        info!(
            entries = state.entries().len(),
            locked = state.screen.is_locked(),
            "journal opened"
        );

        Journal { state, store }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Applies `action` and returns any background work it requires.
    pub fn dispatch(&mut self, action: Action) -> Option<Effect> {
        match self.state.dispatch(action)? {
            Effect::PersistEntries => {
                if let Err(e) = self.store.save_entries(self.state.entries()) {
                    error!(error = %e, "failed to persist entries");
                    self.state.notice = Some(Notice::error(format!("Could not save your journal: {e}")));
                }
                None
            }
            Effect::PersistPassword(password) => {
                if let Err(e) = self.store.save_password(&password) {
                    error!(error = %e, "failed to persist password");
                    self.state.notice = Some(Notice::error(format!("Could not save the password: {e}")));
                }
                None
            }
            effect @ (Effect::Analyze { .. } | Effect::LoadPhoto { .. }) => Some(effect),
        }
    }

    #[cfg(test)]
    pub fn into_store(self) -> JournalStore<S> {
        self.store
    }
}
