//! Cell colours and random palette generation.
//! Colours for one batch are spread around the hue wheel with the golden
//! ratio, so neighbouring positions in a sequence never look alike.

use super::rng::Rng;

/// 24-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Colour {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from HSV, all components in [0, 1].
    pub fn from_hsv(h: f32, s: f32, v: f32) -> Self {
        let h = h.rem_euclid(1.0) * 6.0;
        let i = h.floor();
        let f = h - i;
        let p = v * (1.0 - s);
        let q = v * (1.0 - f * s);
        let t = v * (1.0 - (1.0 - f) * s);
        let (r, g, b) = match i as u32 % 6 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        let to_u8 = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::rgb(to_u8(r), to_u8(g), to_u8(b))
    }

    /// Channels as floats in [0, 1], for the cell buffer.
    pub fn to_f32(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

/// The visual token applied to a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tint {
    /// Cleared back to the grid's background.
    #[default]
    Neutral,
    Colour(Colour),
}

impl Tint {
    pub fn is_neutral(&self) -> bool {
        matches!(self, Tint::Neutral)
    }
}

impl From<Colour> for Tint {
    fn from(colour: Colour) -> Self {
        Tint::Colour(colour)
    }
}

const GOLDEN_RATIO_CONJUGATE: f32 = 0.618_034;

/// Random colour source.
#[derive(Debug, Clone)]
pub struct Palette {
    rng: Rng,
}

impl Palette {
    pub fn new(seed: u64) -> Self {
        Self { rng: Rng::new(seed) }
    }

    /// `count` bright colours starting from a random hue.
    pub fn random_colours(&mut self, count: usize) -> Vec<Colour> {
        let mut hue = self.rng.next_f32();
        (0..count)
            .map(|_| {
                let saturation = 0.65 + self.rng.next_f32() * 0.2;
                let colour = Colour::from_hsv(hue, saturation, 0.95);
                hue = (hue + GOLDEN_RATIO_CONJUGATE).fract();
                colour
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hsv_primaries() {
        assert_eq!(Colour::from_hsv(0.0, 1.0, 1.0), Colour::rgb(255, 0, 0));
        assert_eq!(Colour::from_hsv(1.0 / 3.0, 1.0, 1.0), Colour::rgb(0, 255, 0));
        assert_eq!(Colour::from_hsv(2.0 / 3.0, 1.0, 1.0), Colour::rgb(0, 0, 255));
    }

    #[test]
    fn random_colours_count_and_distinct() {
        let mut palette = Palette::new(42);
        let colours = palette.random_colours(12);
        assert_eq!(colours.len(), 12);
        for (i, a) in colours.iter().enumerate() {
            for b in &colours[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn random_colours_are_bright() {
        let mut palette = Palette::new(3);
        for colour in palette.random_colours(50) {
            let max = colour.r.max(colour.g).max(colour.b);
            assert!(max >= 240, "too dark: {:?}", colour);
        }
    }

    #[test]
    fn same_seed_same_colours() {
        let mut a = Palette::new(9);
        let mut b = Palette::new(9);
        assert_eq!(a.random_colours(5), b.random_colours(5));
    }

    #[test]
    fn tint_default_is_neutral() {
        assert!(Tint::default().is_neutral());
        assert!(!Tint::from(Colour::rgb(1, 2, 3)).is_neutral());
    }
}
