// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cancellable deadline timers for hover and leave intent.
//!
//! The menu tree never sleeps: intents are deadline entries the host drives
//! by asking for [`IntentTimers::next_deadline`] and calling
//! [`IntentTimers::advance`] once that time has passed. Cancelling an entry
//! removes it, so a cancelled intent can never fire — the cancellation *is*
//! the token invalidation. Scheduling over a pending entry restarts it.
//!
//! Each entry carries a monotonically increasing token so that entries due
//! in the same `advance` call fire in a deterministic order (deadline first,
//! then scheduling order).

use alloc::vec::Vec;
use hashbrown::HashMap;

use crate::types::MenuId;

/// The two intent kinds a menu node can have pending.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum IntentKind {
    /// Hover intent: open transiently when it fires.
    Open,
    /// Leave intent: close a transient menu when it fires.
    Close,
}

#[derive(Copy, Clone, Debug)]
struct Entry {
    deadline: u64,
    token: u64,
}

/// Pending intent entries for a whole menu tree.
#[derive(Debug, Default)]
pub(crate) struct IntentTimers {
    entries: HashMap<(MenuId, IntentKind), Entry>,
    next_token: u64,
}

impl IntentTimers {
    /// Schedule (or restart) an intent.
    pub(crate) fn schedule(&mut self, id: MenuId, kind: IntentKind, deadline: u64) {
        let token = self.next_token;
        self.next_token += 1;
        self.entries.insert((id, kind), Entry { deadline, token });
    }

    /// Cancel a pending intent. Returns whether one was pending.
    pub(crate) fn cancel(&mut self, id: MenuId, kind: IntentKind) -> bool {
        self.entries.remove(&(id, kind)).is_some()
    }

    /// Cancel both intents of a node.
    pub(crate) fn cancel_all(&mut self, id: MenuId) {
        self.entries.remove(&(id, IntentKind::Open));
        self.entries.remove(&(id, IntentKind::Close));
    }

    /// Deadline of a pending intent, if any.
    pub(crate) fn pending(&self, id: MenuId, kind: IntentKind) -> Option<u64> {
        self.entries.get(&(id, kind)).map(|e| e.deadline)
    }

    /// The earliest pending deadline across all entries.
    pub(crate) fn next_deadline(&self) -> Option<u64> {
        self.entries.values().map(|e| e.deadline).min()
    }

    /// Remove and return every entry due at `now`, ordered by deadline and
    /// then scheduling order.
    pub(crate) fn advance(&mut self, now: u64) -> Vec<(MenuId, IntentKind)> {
        let mut due: Vec<((MenuId, IntentKind), Entry)> = self
            .entries
            .iter()
            .filter(|(_, e)| e.deadline <= now)
            .map(|(k, e)| (*k, *e))
            .collect();
        due.sort_by_key(|(_, e)| (e.deadline, e.token));
        for (key, _) in &due {
            self.entries.remove(key);
        }
        due.into_iter().map(|(key, _)| key).collect()
    }
}
