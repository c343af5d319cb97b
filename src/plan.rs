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
use std::{fmt, time::Duration};

use clap::Args;
use rand::Rng;
use tracing::{info, span, Level};

use crate::{
    color::Color,
    command::{Command, CommandError},
    lamp::{Lamp, LampError},
    playsync::CancelHandle,
    sequence::Pattern,
};

/// What to do with the lamp.
#[derive(Args, Debug, Default, Clone)]
pub struct Options {
    /// Run the lamp through random colours.
    #[arg(long)]
    pub random: bool,
    /// Run the lamp through random pastel colours.
    #[arg(long)]
    pub pastel: bool,
    /// Walk the lamp through the RGB colour space.
    #[arg(long)]
    pub walk: bool,
    /// Walk the lamp through the RGB colour space at low intensity.
    #[arg(long)]
    pub dimwalk: bool,
    /// Fade the lamp colour in and out. A number sets the pulse period in seconds, 0 stops
    /// pulsing; ON and OFF are passed through.
    #[arg(short, long)]
    pub pulse: Option<String>,
    /// Allow manual control of the lamp colour (normal operation, the default).
    #[arg(long, conflicts_with = "auto")]
    pub manual: bool,
    /// Hand the lamp colour back to the system firmware (debug operation).
    #[arg(long)]
    pub auto: bool,
    /// Turn the lamp on at full white.
    #[arg(long, conflicts_with = "off")]
    pub on: bool,
    /// Turn the lamp off.
    #[arg(long)]
    pub off: bool,
    /// Set the lamp colour to a specific R G B value (0-4095 each).
    #[arg(short, long, num_args = 1.., value_name = "VALUE")]
    pub colour: Option<Vec<String>>,
    /// Set the lamp colour from hue (degrees), saturation and brightness (0.0-1.0).
    #[arg(
        long,
        num_args = 3,
        allow_negative_numbers = true,
        value_names = ["HUE", "SATURATION", "BRIGHTNESS"]
    )]
    pub hsb: Option<Vec<f64>>,
    /// Set the maximum brightness as a percentage.
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=100))]
    pub level: Option<u32>,
    /// Adjust the maximum brightness by this many percentage points.
    #[arg(long, allow_hyphen_values = true)]
    pub dim: Option<i32>,
    /// Send a verbatim command, e.g. "admin reboot" or "colour SET 10 20 30".
    #[arg(long)]
    pub raw: Option<String>,
    /// Reboot the lamp.
    #[arg(short = 'x', long)]
    pub reset: bool,
    /// Seed for the random sequences, to repeat a previous run.
    #[arg(long)]
    pub seed: Option<u64>,
}

/// A single thing to do to the lamp.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Run through a colour sequence.
    Sequence(Pattern),
    /// Send one command.
    Send(Command),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Sequence(pattern) => write!(f, "sequence {}", pattern),
            Step::Send(command) => write!(f, "{}", command),
        }
    }
}

/// The outcome of running a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// The number of commands the lamp received.
    pub sent: usize,
    /// True if the run stopped early because it was cancelled.
    pub cancelled: bool,
}

/// The ordered steps requested on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    steps: Vec<Step>,
}

impl Plan {
    /// Builds the plan from the options. All user input is checked here so that nothing is
    /// sent to the lamp if any of it is malformed.
    pub fn from_options(options: &Options) -> Result<Plan, CommandError> {
        let mut steps = Vec::new();

        let patterns = [
            (options.random, Pattern::Random),
            (options.pastel, Pattern::Pastel),
            (options.dimwalk, Pattern::DimWalk),
            (options.walk, Pattern::Walk),
        ];
        steps.extend(
            patterns
                .into_iter()
                .filter(|(enabled, _)| *enabled)
                .map(|(_, pattern)| Step::Sequence(pattern)),
        );

        if let Some(pulse) = &options.pulse {
            steps.push(Step::Send(Command::pulse(pulse)));
        }

        // LED control is always set, manual unless asked otherwise.
        steps.push(Step::Send(Command::led_control(
            options.manual || !options.auto,
        )));

        if options.on {
            steps.push(Step::Send(Command::set(Color::WHITE)));
        }
        if options.off {
            steps.push(Step::Send(Command::set(Color::BLACK)));
        }
        if let Some(colour) = &options.colour {
            steps.push(Step::Send(Command::set(Color::from_args(colour)?)));
        }
        if let Some(hsb) = &options.hsb {
            let &[hue, saturation, brightness] = hsb.as_slice() else {
                return Err(CommandError::ColourArity(hsb.len()));
            };
            steps.push(Step::Send(Command::set(Color::from_hsb(
                hue, saturation, brightness,
            ))));
        }
        if let Some(level) = options.level {
            steps.push(Step::Send(Command::level(level)));
        }
        if let Some(dim) = options.dim {
            steps.push(Step::Send(Command::dim(dim)));
        }
        if let Some(raw) = &options.raw {
            steps.push(Step::Send(raw.parse()?));
        }
        if options.reset {
            steps.push(Step::Send(Command::reboot()));
        }

        Ok(Plan { steps })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Runs every step against the lamp in order. The first error from the lamp stops the
    /// run. Cancellation is checked before every command, so an in-flight command always
    /// completes.
    pub fn run<R: Rng>(
        &self,
        lamp: &dyn Lamp,
        rng: &mut R,
        cancel_handle: &CancelHandle,
        delay: Duration,
    ) -> Result<Summary, LampError> {
        let mut summary = Summary {
            sent: 0,
            cancelled: false,
        };

        for step in self.steps.iter() {
            if cancel_handle.is_cancelled() {
                summary.cancelled = true;
                return Ok(summary);
            }

            match step {
                Step::Sequence(pattern) => {
                    let span = span!(Level::INFO, "sequence", %pattern);
                    let _enter = span.enter();
                    info!("Starting sequence.");

                    for color in pattern.colors(rng) {
                        if cancel_handle.is_cancelled() {
                            summary.cancelled = true;
                            return Ok(summary);
                        }

                        info!(red = color.r, green = color.g, blue = color.b, "RGB");
                        lamp.send(&Command::set(color))?;
                        summary.sent += 1;

                        if cancel_handle.wait_timeout(delay) {
                            summary.cancelled = true;
                            return Ok(summary);
                        }
                    }
                }
                Step::Send(command) => {
                    info!(%command, "Sending command.");
                    lamp.send(command)?;
                    summary.sent += 1;
                }
            }
        }

        Ok(summary)
    }
}
