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
use crate::color::Color;

/// Exclusive bound and step of the full intensity walk. The bound sits above the channel
/// maximum, so upward sweeps end on 4096 and downward sweeps start on 4100.
const FULL_BOUND: u32 = 4100;
const FULL_STEP: u32 = 128;

/// Bound of the dim walk. It is swept in twenty steps.
const DIM_BOUND: u32 = 400;
const DIM_STEPS: u32 = 20;

#[derive(Debug, Clone, Copy)]
enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    fn set(&self, color: &mut Color, value: u32) {
        match self {
            Channel::Red => color.r = value,
            Channel::Green => color.g = value,
            Channel::Blue => color.b = value,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    /// 0, step, 2 * step, ... while below the bound.
    Up,
    /// bound, bound - step, ... while above zero.
    Down,
}

/// The path through the colour cube. Channels that aren't being swept keep wherever their
/// last sweep left them.
const SWEEPS: [(Channel, Direction); 7] = [
    (Channel::Blue, Direction::Up),
    (Channel::Green, Direction::Up),
    (Channel::Blue, Direction::Down),
    (Channel::Red, Direction::Up),
    (Channel::Green, Direction::Down),
    (Channel::Blue, Direction::Up),
    (Channel::Green, Direction::Up),
];

/// Walks one channel at a time along the edges of the RGB cube, starting from black.
#[derive(Debug, Clone)]
pub struct Walk {
    bound: u32,
    step: u32,
    color: Color,
    sweep: usize,
    value: Option<u32>,
}

impl Walk {
    fn new(bound: u32, step: u32) -> Walk {
        Walk {
            bound,
            step: step.max(1),
            color: Color::BLACK,
            sweep: 0,
            value: None,
        }
    }

    /// The walk across the full 12-bit range.
    pub fn full() -> Walk {
        Walk::new(FULL_BOUND, FULL_STEP)
    }

    /// The same path at roughly a tenth of the intensity.
    pub fn dim() -> Walk {
        Walk::new(DIM_BOUND, DIM_BOUND / DIM_STEPS)
    }
}

impl Iterator for Walk {
    type Item = Color;

    fn next(&mut self) -> Option<Color> {
        loop {
            let (channel, direction) = *SWEEPS.get(self.sweep)?;

            let value = match (self.value, direction) {
                (None, Direction::Up) => Some(0).filter(|_| self.bound > 0),
                (None, Direction::Down) => Some(self.bound).filter(|v| *v > 0),
                (Some(v), Direction::Up) => v.checked_add(self.step).filter(|v| *v < self.bound),
                (Some(v), Direction::Down) => v.checked_sub(self.step).filter(|v| *v > 0),
            };

            match value {
                Some(value) => {
                    self.value = Some(value);
                    channel.set(&mut self.color, value);
                    return Some(self.color);
                }
                None => {
                    self.sweep += 1;
                    self.value = None;
                }
            }
        }
    }
}
