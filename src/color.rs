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
use std::fmt;

use crate::command::CommandError;

/// The largest value the lamp's 12-bit PWM channels accept.
pub const CHANNEL_MAX: u32 = 4095;

/// Every channel of a pastel colour is mixed half way towards this value.
const PASTEL_MIX: u32 = CHANNEL_MAX;

/// A colour as sent to the lamp. Channels are nominally in `0..=CHANNEL_MAX`, but nothing
/// here clamps them: the cube walks deliberately step past the top of the range and the
/// firmware clamps on its side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u32,
    pub g: u32,
    pub b: u32,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(CHANNEL_MAX, CHANNEL_MAX, CHANNEL_MAX);

    pub const fn new(r: u32, g: u32, b: u32) -> Self {
        Self { r, g, b }
    }

    /// Parses a colour from exactly three decimal command line values.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self, CommandError> {
        if args.len() != 3 {
            return Err(CommandError::ColourArity(args.len()));
        }

        let channel = |value: &S| -> Result<u32, CommandError> {
            let value = value.as_ref().trim();
            value
                .parse::<u32>()
                .map_err(|_| CommandError::InvalidValue(value.to_string()))
        };

        Ok(Self {
            r: channel(&args[0])?,
            g: channel(&args[1])?,
            b: channel(&args[2])?,
        })
    }

    /// Converts hue (degrees), saturation and brightness (both 0.0 to 1.0) to a lamp colour.
    pub fn from_hsb(hue: f64, saturation: f64, brightness: f64) -> Self {
        let hue = hue.rem_euclid(360.0);
        let s = saturation.clamp(0.0, 1.0);
        let v = brightness.clamp(0.0, 1.0);

        // Each sector of the colour wheel is 60 degrees wide.
        let h = hue / 60.0;
        let sector = h.floor();
        let f = h - sector;
        let p = v * (1.0 - s);
        let q = v * (1.0 - f * s);
        let t = v * (1.0 - (1.0 - f) * s);

        let (r, g, b) = match sector as u8 % 6 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };

        let scale = |c: f64| (c * CHANNEL_MAX as f64).floor() as u32;
        Self {
            r: scale(r),
            g: scale(g),
            b: scale(b),
        }
    }

    /// Lightens the colour by averaging every channel with full intensity.
    pub fn pastel(self) -> Self {
        Self {
            r: (self.r + PASTEL_MIX) / 2,
            g: (self.g + PASTEL_MIX) / 2,
            b: (self.b + PASTEL_MIX) / 2,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.r, self.g, self.b)
    }
}
