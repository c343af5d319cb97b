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
use std::{fmt, str::FromStr};

use crate::color::Color;

/// Errors raised while turning user input into lamp commands.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unrecognized command '{0}', expected COLOUR, PULSE or ADMIN")]
    Unrecognized(String),
    #[error("colour must be given as R G B (three numbers), got {0} value(s)")]
    ColourArity(usize),
    #[error("invalid value '{0}'")]
    InvalidValue(String),
}

/// A function exposed by the lamp firmware through the cloud.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Colour,
    Pulse,
    Admin,
}

impl Function {
    /// The cloud name of the function.
    pub fn as_str(&self) -> &'static str {
        match self {
            Function::Colour => "colour",
            Function::Pulse => "pulse",
            Function::Admin => "admin",
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single call into the lamp firmware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Colour(String),
    Pulse(String),
    Admin(String),
}

impl Command {
    /// Sets the lamp to the given colour.
    pub fn set(color: Color) -> Command {
        Command::Colour(format!("SET {}", color))
    }

    /// A numeric value changes the pulse period in seconds, anything else (ON, OFF) is passed
    /// through to the firmware as is.
    pub fn pulse(value: &str) -> Command {
        let value = value.trim();
        if value.parse::<f64>().is_ok() {
            Command::Pulse(format!("PERIOD {}", value))
        } else {
            Command::Pulse(value.to_string())
        }
    }

    /// Manual mode lets the cloud set the colour; auto mode hands the LED back to the system
    /// firmware, which is mostly useful to watch the status colours while flashing.
    pub fn led_control(manual: bool) -> Command {
        if manual {
            Command::Admin("led manual".to_string())
        } else {
            Command::Admin("led auto".to_string())
        }
    }

    pub fn reboot() -> Command {
        Command::Admin("reboot".to_string())
    }

    /// Sets the maximum brightness as a percentage.
    pub fn level(percent: u32) -> Command {
        Command::Colour(format!("LEVEL SET {}", percent))
    }

    /// Adjusts the maximum brightness by the given number of percentage points.
    pub fn dim(delta: i32) -> Command {
        Command::Colour(format!("LEVEL DIM {}", delta))
    }

    pub fn function(&self) -> Function {
        match self {
            Command::Colour(_) => Function::Colour,
            Command::Pulse(_) => Function::Pulse,
            Command::Admin(_) => Function::Admin,
        }
    }

    pub fn argument(&self) -> &str {
        match self {
            Command::Colour(arg) | Command::Pulse(arg) | Command::Admin(arg) => arg,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.function(), self.argument())
    }
}

/// Parses a raw command line such as `colour SET 10 20 30` or `admin reboot`. The first word
/// picks the firmware function and the rest of the line is its argument.
impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (name, argument) = match s.split_once(char::is_whitespace) {
            Some((name, argument)) => (name, argument.trim().to_string()),
            None => (s, String::new()),
        };

        if name.is_empty() {
            return Err(CommandError::Empty);
        }

        match name.to_uppercase().as_str() {
            "COLOUR" | "COLOR" => Ok(Command::Colour(argument)),
            "PULSE" => Ok(Command::Pulse(argument)),
            "ADMIN" => Ok(Command::Admin(argument)),
            _ => Err(CommandError::Unrecognized(name.to_string())),
        }
    }
}
