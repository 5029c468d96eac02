// Scribe
// Copyright (C) 2025 Synerthink

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Cancellable one-shot timers on a tokio runtime.
//!
//! A timer is pending from [`TimerRegistry::schedule`] until its delay
//! elapses. At that point it claims its slot in the registry and starts its
//! work; from then on it can no longer be cancelled and always runs to
//! completion.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

/// Identifies a scheduled timer within its registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Tracks pending timers so they can be cancelled before they fire
#[derive(Debug, Clone)]
pub struct TimerRegistry {
    handle: Handle,
    next_id: Arc<AtomicU64>,
    pending: Arc<Mutex<HashMap<TimerId, JoinHandle<()>>>>,
}

impl TimerRegistry {
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            next_id: Arc::new(AtomicU64::new(1)),
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Runs `work` once `delay` has elapsed, unless cancelled first
    pub fn schedule<F>(&self, delay: Duration, work: F) -> TimerId
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let id = TimerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let pending = Arc::clone(&self.pending);

        // Held until the handle is stored so the task cannot claim its slot early.
        let mut slots = self.pending.lock();
        let task = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            if pending.lock().remove(&id).is_none() {
                return;
            }
            work.await;
        });
        slots.insert(id, task);

        id
    }

    /// Cancels a pending timer.
    ///
    /// Returns `false` if the timer is unknown, was already cancelled or has
    /// already started.
    pub fn cancel(&self, id: TimerId) -> bool {
        match self.pending.lock().remove(&id) {
            Some(task) => {
                task.abort();
                debug!(timer = id.0, "timer cancelled");
                true
            }
            None => false,
        }
    }

    /// Cancels every pending timer, returning how many were cancelled
    pub fn cancel_all(&self) -> usize {
        let drained: Vec<_> = self.pending.lock().drain().collect();
        for (_, task) in &drained {
            task.abort();
        }
        drained.len()
    }

    /// Number of timers that have not fired yet
    pub fn pending(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.lock().contains_key(&id)
    }
}
