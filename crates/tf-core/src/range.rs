use rand::Rng;
use serde::{Deserialize, Serialize};

/// An inclusive `[min, max]` range of floats.
///
/// Serialized as a two-element array so definition files can write
/// `"damage": [5, 10]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct FloatRange {
    /// Lower bound.
    pub min: f32,
    /// Upper bound.
    pub max: f32,
}

impl FloatRange {
    /// Create a range; bounds are reordered if given backwards.
    pub fn new(min: f32, max: f32) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// A range containing a single value.
    pub fn constant(value: f32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// Whether `value` lies inside the range, bounds included.
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Draw a uniformly distributed value from the range.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.max <= self.min {
            return self.min;
        }
        rng.random_range(self.min..=self.max)
    }
}

impl From<[f32; 2]> for FloatRange {
    fn from([a, b]: [f32; 2]) -> Self {
        Self::new(a, b)
    }
}

impl From<FloatRange> for [f32; 2] {
    fn from(range: FloatRange) -> Self {
        [range.min, range.max]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn samples_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let range = FloatRange::new(5.0, 10.0);
        for _ in 0..100 {
            assert!(range.contains(range.sample(&mut rng)));
        }
    }

    #[test]
    fn constant_range_returns_value() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!((FloatRange::constant(3.0).sample(&mut rng) - 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn reversed_bounds_are_normalized() {
        let range = FloatRange::new(4.0, 1.0);
        assert!((range.min - 1.0).abs() < f32::EPSILON);
        assert!((range.max - 4.0).abs() < f32::EPSILON);
    }

    #[test]
    fn deserializes_from_pair() {
        let range: FloatRange = serde_json::from_str("[2, 8]").unwrap();
        assert_eq!(range, FloatRange::new(2.0, 8.0));
        assert_eq!(serde_json::to_string(&range).unwrap(), "[2.0,8.0]");
    }
}
