// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::{
    sync::{Arc, Condvar, Mutex},
    time::Duration,
};

/// Shared between the Ctrl-C handler and the thread talking to the lamp. The sender looks at
/// it before each command and sleeps on it between the colours of a sequence.
#[derive(Clone)]
pub struct CancelHandle {
    stopped: Arc<Mutex<bool>>,
    wakeup: Arc<Condvar>,
}

impl CancelHandle {
    pub fn new() -> CancelHandle {
        CancelHandle {
            stopped: Arc::new(Mutex::new(false)),
            wakeup: Arc::new(Condvar::new()),
        }
    }

    /// Whether a stop has been requested.
    pub fn is_cancelled(&self) -> bool {
        *self.stopped.lock().expect("cancel flag poisoned")
    }

    /// Sleeps for `timeout`, returning early with true once a stop is requested.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        if timeout.is_zero() {
            return self.is_cancelled();
        }

        let stopped = self.stopped.lock().expect("cancel flag poisoned");
        let (stopped, _) = self
            .wakeup
            .wait_timeout_while(stopped, timeout, |stopped| !*stopped)
            .expect("cancel flag poisoned");
        *stopped
    }

    /// Requests a stop and wakes any sleeping sender. Repeated calls are no-ops.
    pub fn cancel(&self) {
        let mut stopped = self.stopped.lock().expect("cancel flag poisoned");
        if !*stopped {
            *stopped = true;
            self.wakeup.notify_all();
        }
    }
}

impl Default for CancelHandle {
    fn default() -> Self {
        Self::new()
    }
}
