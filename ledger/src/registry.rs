//! Token set registry: owns every [`TokenSet`] record and enforces the
//! legal lifecycle transitions.
//!
//! Mutations are two-phase: a `stage_*` method validates a whole batch against
//! the current records and returns [`StagedSets`] without touching the
//! registry; [`Registry::commit`] then installs the staged records and cannot
//! fail. This is what lets a mint reject late (e.g. on fee settlement) with no
//! registry change.

use std::collections::BTreeMap;

use epoxy_types::{Address, SetId};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::token_set::{SetState, TokenSet};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Registry {
    sets: BTreeMap<SetId, TokenSet>,
}

/// Validated registry writes for one operation.
#[derive(Clone, Debug, Default)]
pub struct StagedSets {
    /// Final record for every id the operation touches.
    records: BTreeMap<SetId, TokenSet>,
    /// Ids this operation creates, in first-appearance order.
    created: Vec<SetId>,
    /// Override writes in request order (duplicates included).
    uri_writes: Vec<(SetId, String)>,
}

impl StagedSets {
    pub fn created(&self) -> &[SetId] {
        &self.created
    }

    pub fn uri_writes(&self) -> &[(SetId, String)] {
        &self.uri_writes
    }

    pub fn record(&self, id: &SetId) -> Option<&TokenSet> {
        self.records.get(id)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn set_uri(&mut self, id: &SetId, uri: &str) {
        if let Some(record) = self.records.get_mut(id) {
            record.uri = if uri.is_empty() {
                None
            } else {
                Some(uri.to_owned())
            };
            self.uri_writes.push((id.clone(), uri.to_owned()));
        }
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &SetId) -> Option<&TokenSet> {
        self.sets.get(id)
    }

    pub fn state(&self, id: &SetId) -> SetState {
        self.sets
            .get(id)
            .map(|s| s.state)
            .unwrap_or(SetState::Uninitialized)
    }

    pub fn uri_override(&self, id: &SetId) -> Option<&str> {
        self.sets.get(id).and_then(|s| s.uri.as_deref())
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SetId, &TokenSet)> {
        self.sets.iter()
    }

    /// Stage the registry side of a mint.
    ///
    /// Each distinct id passes through the state machine exactly once, at its
    /// first appearance: an unknown id is created (frozen unless a manager is
    /// proposed), an existing id must be unfrozen and managed by `caller`.
    /// The proposed manager is ignored for ids that already exist. Non-empty
    /// `uris[i]` then overwrite the override of `ids[i]`, later positions
    /// winning. `uris` must already be validated to match `ids` in length.
    pub fn stage_mint(
        &self,
        caller: &Address,
        ids: &[SetId],
        uris: &[String],
        proposed_manager: Option<Address>,
    ) -> Result<StagedSets, LedgerError> {
        let mut staged = StagedSets::default();
        for id in ids {
            if staged.records.contains_key(id) {
                continue;
            }
            let record = match self.sets.get(id) {
                None => {
                    staged.created.push(id.clone());
                    TokenSet::new(SetState::on_creation(proposed_manager))
                }
                Some(existing) => {
                    existing.state.require_manager(id, caller)?;
                    existing.clone()
                }
            };
            staged.records.insert(id.clone(), record);
        }
        for (id, uri) in ids.iter().zip(uris) {
            if !uri.is_empty() {
                staged.set_uri(id, uri);
            }
        }
        Ok(staged)
    }

    /// Stage a manager-only operation over `ids`.
    ///
    /// Every id is checked against its staged record if an earlier position
    /// already touched it, so e.g. freezing the same id twice in one call is
    /// rejected like freezing it in two calls.
    pub fn stage_managed<M>(
        &self,
        caller: &Address,
        ids: &[SetId],
        mut mutate: M,
    ) -> Result<StagedSets, LedgerError>
    where
        M: FnMut(usize, &SetId, &mut StagedSets),
    {
        let mut staged = StagedSets::default();
        for (index, id) in ids.iter().enumerate() {
            let state = staged
                .records
                .get(id)
                .map(|r| r.state)
                .unwrap_or_else(|| self.state(id));
            state.require_manager(id, caller)?;
            if !staged.records.contains_key(id) {
                if let Some(existing) = self.sets.get(id) {
                    staged.records.insert(id.clone(), existing.clone());
                }
            }
            mutate(index, id, &mut staged);
        }
        Ok(staged)
    }

    /// Stage `setURI`: `uris[i]` becomes the override of `ids[i]`; an empty
    /// string clears it.
    pub fn stage_set_uri(
        &self,
        caller: &Address,
        ids: &[SetId],
        uris: &[String],
    ) -> Result<StagedSets, LedgerError> {
        if ids.len() != uris.len() {
            return Err(LedgerError::invalid_input(format!(
                "{} ids but {} uris",
                ids.len(),
                uris.len()
            )));
        }
        self.stage_managed(caller, ids, |index, id, staged| {
            staged.set_uri(id, &uris[index]);
        })
    }

    /// Stage `setManager`. The zero address is refused so an unfrozen set can
    /// never end up without a manager.
    pub fn stage_set_manager(
        &self,
        caller: &Address,
        ids: &[SetId],
        new_manager: Address,
    ) -> Result<StagedSets, LedgerError> {
        if new_manager.is_zero() {
            return Err(LedgerError::invalid_input("new manager is the zero address"));
        }
        self.stage_managed(caller, ids, |_, id, staged| {
            if let Some(record) = staged.records.get_mut(id) {
                record.state = SetState::Unfrozen {
                    manager: new_manager,
                };
            }
        })
    }

    /// Stage `freeze`: one-way transition to `Frozen`, keeping the manager on
    /// record.
    pub fn stage_freeze(&self, caller: &Address, ids: &[SetId]) -> Result<StagedSets, LedgerError> {
        self.stage_managed(caller, ids, |_, id, staged| {
            if let Some(record) = staged.records.get_mut(id) {
                record.state = SetState::Frozen {
                    manager: record.state.manager(),
                };
            }
        })
    }

    /// Load records captured by a snapshot. Only created sets are ever stored.
    pub(crate) fn restore(
        &mut self,
        sets: impl IntoIterator<Item = (SetId, TokenSet)>,
    ) -> Result<(), LedgerError> {
        for (id, set) in sets {
            if !set.state.is_created() {
                return Err(LedgerError::Snapshot(format!(
                    "token set {id} stored as uninitialized"
                )));
            }
            self.sets.insert(id, set);
        }
        Ok(())
    }

    /// Install staged records.
    pub fn commit(&mut self, staged: StagedSets) {
        for (id, record) in staged.records {
            self.sets.insert(id, record);
        }
    }
}
