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

use rand::Rng;

use crate::color::{Color, CHANNEL_MAX};

mod walk;

pub use walk::Walk;

/// The number of colours produced by the random patterns.
pub const RANDOM_COUNT: usize = 256;

/// A colour sequence the lamp can be driven through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Independent uniformly random colours.
    Random,
    /// Random colours lightened towards white.
    Pastel,
    /// A walk along the edges of the full RGB cube.
    Walk,
    /// The same walk at low intensity.
    DimWalk,
}

impl Pattern {
    /// Returns the colours of the pattern in emission order. Colours are computed lazily, one
    /// per call to `next`.
    pub fn colors<'a, R: Rng>(&self, rng: &'a mut R) -> Box<dyn Iterator<Item = Color> + 'a> {
        match self {
            Pattern::Random => Box::new((0..RANDOM_COUNT).map(move |_| random_color(rng))),
            Pattern::Pastel => {
                Box::new((0..RANDOM_COUNT).map(move |_| random_color(rng).pastel()))
            }
            Pattern::Walk => Box::new(Walk::full()),
            Pattern::DimWalk => Box::new(Walk::dim()),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Pattern::Random => "random",
            Pattern::Pastel => "pastel",
            Pattern::Walk => "walk",
            Pattern::DimWalk => "dimwalk",
        };
        f.write_str(name)
    }
}

fn random_color<R: Rng>(rng: &mut R) -> Color {
    Color::new(
        rng.gen_range(0..=CHANNEL_MAX),
        rng.gen_range(0..=CHANNEL_MAX),
        rng.gen_range(0..=CHANNEL_MAX),
    )
}

#[cfg(test)]
mod test {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn collect(pattern: Pattern, seed: u64) -> Vec<Color> {
        let mut rng = StdRng::seed_from_u64(seed);
        pattern.colors(&mut rng).collect()
    }

    #[test]
    fn test_random() {
        let colors = collect(Pattern::Random, 1);
        assert_eq!(RANDOM_COUNT, colors.len());
        assert!(colors
            .iter()
            .all(|c| c.r <= CHANNEL_MAX && c.g <= CHANNEL_MAX && c.b <= CHANNEL_MAX));

        // Not all the same colour.
        assert!(colors.iter().any(|c| *c != colors[0]));
    }

    #[test]
    fn test_pastel() {
        let colors = collect(Pattern::Pastel, 2);
        assert_eq!(RANDOM_COUNT, colors.len());
        for c in colors.iter() {
            for channel in [c.r, c.g, c.b] {
                assert!(
                    (2047..=CHANNEL_MAX).contains(&channel),
                    "pastel channel {} out of range",
                    channel
                );
            }
        }
    }

    #[test]
    fn test_pastel_mixes_the_random_colour() {
        let mut random_rng = StdRng::seed_from_u64(3);
        let mut pastel_rng = StdRng::seed_from_u64(3);

        let random: Vec<Color> = Pattern::Random.colors(&mut random_rng).collect();
        let pastel: Vec<Color> = Pattern::Pastel.colors(&mut pastel_rng).collect();
        for (random, pastel) in random.iter().zip(pastel.iter()) {
            assert_eq!(random.pastel(), *pastel);
        }
    }

    #[test]
    fn test_seeded_sequences_repeat() {
        assert_eq!(collect(Pattern::Random, 42), collect(Pattern::Random, 42));
        assert_eq!(collect(Pattern::Pastel, 42), collect(Pattern::Pastel, 42));
        assert_ne!(collect(Pattern::Random, 42), collect(Pattern::Random, 43));
    }

    #[test]
    fn test_walks_ignore_randomness() {
        assert_eq!(collect(Pattern::Walk, 1), collect(Pattern::Walk, 2));
        assert_eq!(collect(Pattern::DimWalk, 1), collect(Pattern::DimWalk, 2));
        assert_eq!(231, collect(Pattern::Walk, 1).len());
        assert_eq!(140, collect(Pattern::DimWalk, 1).len());
    }

    #[test]
    fn test_display() {
        assert_eq!("dimwalk", Pattern::DimWalk.to_string());
    }
}
