// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The update-collection context stack.
//!
//! Every store operation takes an `&mut UpdateCtx` explicitly rather than
//! reaching for a thread-local — per §9's guidance, the stack is modeled as
//! an explicit value the caller threads through, not ambient global state.

use indexmap::IndexMap;
use tsc_core::{Oid, Otype};

use crate::waveobjupdate::WaveObjUpdate;

type ScopeKey = (Otype, Oid);

/// Collects [`WaveObjUpdate`] records emitted by store operations into a
/// stack of scopes, so a caller can batch a transaction's net changes into
/// one coherent set of events on commit.
pub struct UpdateCtx {
    stack: Vec<IndexMap<ScopeKey, WaveObjUpdate>>,
}

impl Default for UpdateCtx {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateCtx {
    pub fn new() -> Self {
        Self { stack: vec![IndexMap::new()] }
    }

    /// Push a new, empty scope. Pair with [`UpdateCtx::commit_tx`] or
    /// [`UpdateCtx::rollback_tx`].
    pub fn begin_tx(&mut self) {
        self.stack.push(IndexMap::new());
    }

    /// Merge the innermost scope into its parent, later values (the scope
    /// being committed) winning on key collision. Panics if there is no open
    /// inner scope — a nested-transaction imbalance is a programmer error.
    #[allow(clippy::expect_used)]
    pub fn commit_tx(&mut self) {
        assert!(self.stack.len() > 1, "CommitTx called with no open inner scope");
        let inner = self.stack.pop().expect("length just checked above");
        let parent = self.stack.last_mut().expect("length just checked above");
        for (key, update) in inner {
            parent.insert(key, update);
        }
    }

    /// Discard the innermost scope entirely. Panics under the same condition
    /// as [`UpdateCtx::commit_tx`].
    pub fn rollback_tx(&mut self) {
        assert!(self.stack.len() > 1, "RollbackTx called with no open inner scope");
        self.stack.pop();
    }

    /// Record an update into the innermost scope, overwriting any prior
    /// record for the same `(otype, oid)` in that scope.
    #[allow(clippy::expect_used)]
    pub fn record(&mut self, update: WaveObjUpdate) {
        let scope = self.stack.last_mut().expect("UpdateCtx always has at least one scope");
        scope.insert((update.otype, update.oid), update);
    }

    /// Flatten the entire stack (root first, innermost last) into a single
    /// set of updates, later scopes winning on key collision.
    pub fn flatten(&self) -> Vec<WaveObjUpdate> {
        let mut merged: IndexMap<ScopeKey, WaveObjUpdate> = IndexMap::new();
        for scope in &self.stack {
            for (key, update) in scope {
                merged.insert(*key, update.clone());
            }
        }
        merged.into_values().collect()
    }

    /// Depth of the scope stack, 1 meaning "no nested transaction open".
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsc_core::WaveObj;

    fn update_for(otype: Otype, oid: Oid) -> WaveObjUpdate {
        WaveObjUpdate::deleted(otype, oid)
    }

    #[test]
    fn flatten_merges_the_single_root_scope() {
        let mut ctx = UpdateCtx::new();
        let oid = Oid::new();
        ctx.record(update_for(Otype::Tab, oid));
        assert_eq!(ctx.flatten().len(), 1);
    }

    #[test]
    fn nested_commit_merges_with_later_wins() {
        let mut ctx = UpdateCtx::new();
        let oid = Oid::new();
        ctx.record(WaveObjUpdate::updated(WaveObj::Tab(tsc_core::Tab::new())));
        ctx.begin_tx();
        ctx.record(update_for(Otype::Tab, oid));
        ctx.commit_tx();
        assert_eq!(ctx.depth(), 1);
        // Two distinct oids recorded across the two scopes; both survive.
        assert_eq!(ctx.flatten().len(), 2);
    }

    #[test]
    fn rollback_discards_the_inner_scope_entirely() {
        let mut ctx = UpdateCtx::new();
        ctx.begin_tx();
        ctx.record(update_for(Otype::Tab, Oid::new()));
        ctx.rollback_tx();
        assert_eq!(ctx.depth(), 1);
        assert!(ctx.flatten().is_empty());
    }

    #[test]
    #[should_panic(expected = "no open inner scope")]
    fn commit_without_nesting_panics() {
        let mut ctx = UpdateCtx::new();
        ctx.commit_tx();
    }

    #[test]
    #[should_panic(expected = "no open inner scope")]
    fn rollback_without_nesting_panics() {
        let mut ctx = UpdateCtx::new();
        ctx.rollback_tx();
    }
}
