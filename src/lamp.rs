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
use std::{fmt, sync::Arc};

use tracing::warn;

use crate::command::{Command, Function};

mod mock;
mod particle;

pub use particle::{Account, Cloud, DeviceInfo};

/// Errors talking to a lamp.
#[derive(Debug, thiserror::Error)]
pub enum LampError {
    #[error("cloud request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("cloud API returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("could not find device {device} in this account, check the naming of your lamp")]
    NotFound { device: String },
    #[error("lamp {device} found in this account, but it is not online so it can't be controlled")]
    Offline { device: String },
    #[error("{0}")]
    Failed(String),
}

/// A lamp that accepts firmware function calls.
pub trait Lamp: fmt::Display + Send + Sync {
    /// Returns the name of the lamp.
    fn name(&self) -> String;

    /// Returns true if the lamp is online.
    fn is_connected(&self) -> bool;

    /// Calls a firmware function with the given argument and returns the firmware's result.
    fn call(&self, function: Function, argument: &str) -> Result<i32, LampError>;

    /// Sends a command to the lamp. The firmware answers commands it doesn't understand with
    /// a negative result, which is reported but not treated as an error.
    fn send(&self, command: &Command) -> Result<i32, LampError> {
        let result = self.call(command.function(), command.argument())?;
        if result < 0 {
            warn!(
                lamp = self.name(),
                command = %command,
                result,
                "Lamp did not accept command."
            );
        }
        Ok(result)
    }
}

/// Gets the lamp with the given name. Names starting with "mock" get a lamp that only
/// records what it's sent.
pub fn get(name: &str, account: &Account) -> Result<Arc<dyn Lamp>, LampError> {
    if name.starts_with("mock") {
        return Ok(Arc::new(mock::Lamp::get(name)));
    }

    let device = Cloud::new(account)?.device(name)?;

    // A device can be registered to the account without being online.
    if !device.is_connected() {
        return Err(LampError::Offline {
            device: name.to_string(),
        });
    }

    Ok(Arc::new(device))
}

/// Lists the devices registered to the account.
pub fn list_devices(account: &Account) -> Result<Vec<DeviceInfo>, LampError> {
    Cloud::new(account)?.devices()
}

#[cfg(test)]
pub mod test {
    pub use super::mock::Lamp;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_mock_lamp() {
        let account = Account::new("http://localhost:1", "token", None);
        let lamp = get("mock-lamp", &account).expect("mock lamp");
        assert_eq!("mock-lamp", lamp.name());
        assert!(lamp.is_connected());
    }

    #[test]
    fn test_send_uses_command_function() {
        let lamp = test::Lamp::get("mock");
        assert_eq!(0, lamp.send(&Command::reboot()).unwrap());
        assert_eq!(0, lamp.send(&Command::pulse("3")).unwrap());
        assert_eq!(
            vec![
                (Function::Admin, "reboot".to_string()),
                (Function::Pulse, "PERIOD 3".to_string()),
            ],
            lamp.calls()
        );
    }

    #[test]
    fn test_send_tolerates_rejected_commands() {
        let lamp = test::Lamp::get("mock").with_result(-1);
        assert_eq!(-1, lamp.send(&Command::Colour("BOGUS".into())).unwrap());
    }

    #[test]
    fn test_send_propagates_failures() {
        let lamp = test::Lamp::get("mock").failing_after(0);
        assert!(matches!(
            lamp.send(&Command::reboot()),
            Err(LampError::Failed(_))
        ));
    }
}
