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
    fmt,
    sync::{Arc, Mutex},
};

use tracing::info;

use super::LampError;
use crate::command::Function;

/// A mock lamp. Doesn't talk to the cloud, just records the calls it gets.
#[derive(Clone)]
pub struct Lamp {
    name: String,
    calls: Arc<Mutex<Vec<(Function, String)>>>,
    result: i32,
    fail_after: Option<usize>,
}

impl Lamp {
    /// Gets the given mock lamp.
    pub fn get(name: &str) -> Lamp {
        Lamp {
            name: name.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
            result: 0,
            fail_after: None,
        }
    }

    #[cfg(test)]
    /// Makes every call return the given firmware result.
    pub fn with_result(mut self, result: i32) -> Lamp {
        self.result = result;
        self
    }

    #[cfg(test)]
    /// Fails every call once the given number of calls have succeeded.
    pub fn failing_after(mut self, calls: usize) -> Lamp {
        self.fail_after = Some(calls);
        self
    }

    #[cfg(test)]
    /// Gets the calls made so far, in order.
    pub fn calls(&self) -> Vec<(Function, String)> {
        self.calls.lock().expect("unable to get calls lock").clone()
    }

    #[cfg(test)]
    /// Gets the arguments of the calls made to the given function.
    pub fn arguments(&self, function: Function) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|(f, _)| *f == function)
            .map(|(_, argument)| argument)
            .collect()
    }
}

impl super::Lamp for Lamp {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn is_connected(&self) -> bool {
        true
    }

    fn call(&self, function: Function, argument: &str) -> Result<i32, LampError> {
        let mut calls = self.calls.lock().expect("unable to get calls lock");
        if self.fail_after.is_some_and(|limit| calls.len() >= limit) {
            return Err(LampError::Failed(format!(
                "mock lamp {} failed {}({})",
                self.name, function, argument
            )));
        }

        info!(lamp = self.name, %function, argument, "Mock call.");
        calls.push((function, argument.to_string()));
        Ok(self.result)
    }
}

impl fmt::Display for Lamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Mock)", self.name)
    }
}
