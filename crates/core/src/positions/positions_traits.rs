use async_trait::async_trait;

use super::positions_model::{
    CryptoPosition, DebtItem, ForeignEquityPosition, LocalEquityPosition, PositionKind,
    PositionState,
};
use crate::errors::Result;
use crate::risk::AnalysisResult;
use crate::settings::SettingsUpdate;

/// A mutation produced outside the store (price refresh), applied under its
/// write lock.
pub type StateMutation = Box<dyn for<'a> FnOnce(&'a mut PositionState) + Send>;

/// Persistence contract for the position store.
///
/// `load_state` must never fail on absent or corrupt data: implementations
/// fall back to `PositionState::default()` and log the problem.
#[async_trait]
pub trait StateRepositoryTrait: Send + Sync {
    fn load_state(&self) -> PositionState;
    async fn save_state(&self, state: &PositionState) -> Result<()>;
}

/// Trait for the position service (the single writer of the store).
#[async_trait]
pub trait PositionServiceTrait: Send + Sync {
    /// Immutable copy of the current state.
    fn get_state(&self) -> PositionState;

    /// Analysis of the current state.
    fn analyze(&self) -> AnalysisResult;

    async fn upsert_local_equity(&self, position: LocalEquityPosition)
        -> Result<LocalEquityPosition>;
    async fn upsert_foreign_equity(
        &self,
        position: ForeignEquityPosition,
    ) -> Result<ForeignEquityPosition>;
    async fn upsert_crypto(&self, position: CryptoPosition) -> Result<CryptoPosition>;
    async fn upsert_debt(&self, debt: DebtItem) -> Result<DebtItem>;
    async fn delete(&self, kind: PositionKind, id: &str) -> Result<()>;
    async fn update_settings(&self, update: SettingsUpdate) -> Result<PositionState>;

    /// Replaces the whole state (import, remote pull).
    async fn replace_state(&self, state: PositionState) -> Result<PositionState>;

    /// Applies a mutation produced elsewhere (price refresh) under the write lock.
    async fn mutate(&self, mutation: StateMutation) -> Result<PositionState>;
}
