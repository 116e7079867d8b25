use async_trait::async_trait;
use log::{debug, warn};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::positions_model::{
    CryptoPosition, DebtItem, ForeignEquityPosition, Identified, LocalEquityPosition,
    PositionKind, PositionState,
};
use super::positions_traits::{PositionServiceTrait, StateMutation, StateRepositoryTrait};
use crate::errors::{Error, Result};
use crate::risk::{self, AnalysisResult};
use crate::settings::SettingsUpdate;

/// Owns the position store. Every reader gets a cloned, immutable view.
///
/// Writers take `write_gate` first and hold it until their state is
/// persisted, so saves reach the repository in version order.
pub struct PositionService {
    state: Arc<RwLock<PositionState>>,
    write_gate: Mutex<()>,
    repository: Arc<dyn StateRepositoryTrait>,
}

impl PositionService {
    /// Loads the persisted state (or the empty default) and takes ownership of it.
    pub fn new(repository: Arc<dyn StateRepositoryTrait>) -> Self {
        let mut initial = repository.load_state();
        initial.sync_loans();
        debug!(
            "Position store loaded at version {} ({} local, {} foreign, {} crypto, {} debts)",
            initial.version,
            initial.local_equities.len(),
            initial.foreign_equities.len(),
            initial.crypto_positions.len(),
            initial.debts.len()
        );
        Self {
            state: Arc::new(RwLock::new(initial)),
            write_gate: Mutex::new(()),
            repository,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, PositionState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, PositionState> {
        self.state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn ensure_id<T: Identified>(item: &mut T) {
        if item.id().trim().is_empty() {
            item.set_id(Uuid::new_v4().to_string());
        }
    }

    /// Persists a committed state. Failures are logged, never surfaced:
    /// the in-memory store stays authoritative.
    async fn persist(&self, state: &PositionState) {
        if let Err(e) = self.repository.save_state(state).await {
            warn!(
                "Failed to persist position state version {}: {}",
                state.version, e
            );
        }
    }

    /// Runs `f` under the write lock and persists the result before the
    /// next writer may start.
    async fn commit<T, F>(&self, f: F) -> T
    where
        F: FnOnce(&mut PositionState) -> T,
    {
        let _gate = self.write_gate.lock().await;
        let (out, snapshot) = {
            let mut guard = self.write();
            let out = f(&mut guard);
            (out, guard.clone())
        };
        self.persist(&snapshot).await;
        out
    }
}

#[async_trait]
impl PositionServiceTrait for PositionService {
    fn get_state(&self) -> PositionState {
        self.read().clone()
    }

    fn analyze(&self) -> AnalysisResult {
        let state = self.get_state();
        risk::analyze(&state)
    }

    async fn upsert_local_equity(
        &self,
        mut position: LocalEquityPosition,
    ) -> Result<LocalEquityPosition> {
        Self::ensure_id(&mut position);
        Ok(self.commit(|s| s.upsert_local_equity(position)).await)
    }

    async fn upsert_foreign_equity(
        &self,
        mut position: ForeignEquityPosition,
    ) -> Result<ForeignEquityPosition> {
        Self::ensure_id(&mut position);
        Ok(self.commit(|s| s.upsert_foreign_equity(position)).await)
    }

    async fn upsert_crypto(&self, mut position: CryptoPosition) -> Result<CryptoPosition> {
        Self::ensure_id(&mut position);
        Ok(self.commit(|s| s.upsert_crypto(position)).await)
    }

    async fn upsert_debt(&self, mut debt: DebtItem) -> Result<DebtItem> {
        Self::ensure_id(&mut debt);
        Ok(self.commit(|s| s.upsert_debt(debt)).await)
    }

    async fn delete(&self, kind: PositionKind, id: &str) -> Result<()> {
        let _gate = self.write_gate.lock().await;
        let removed = {
            let mut guard = self.write();
            guard.remove(kind, id).then(|| guard.clone())
        };
        match removed {
            Some(snapshot) => {
                self.persist(&snapshot).await;
                Ok(())
            }
            None => Err(Error::NotFound(format!("{:?} {}", kind, id))),
        }
    }

    async fn update_settings(&self, update: SettingsUpdate) -> Result<PositionState> {
        Ok(self
            .commit(|s| {
                s.update_settings(&update);
                s.clone()
            })
            .await)
    }

    async fn replace_state(&self, state: PositionState) -> Result<PositionState> {
        Ok(self
            .commit(|s| {
                s.replace_with(state);
                s.clone()
            })
            .await)
    }

    async fn mutate(&self, mutation: StateMutation) -> Result<PositionState> {
        Ok(self
            .commit(|s| {
                mutation(s);
                s.sync_loans();
                s.version += 1;
                s.clone()
            })
            .await)
    }
}
