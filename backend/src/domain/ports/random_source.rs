//! Port for uniform random draws.

/// Source of uniformly distributed values in `[0, 1)`.
///
/// No seeding or reproducibility is required of production adapters; tests
/// substitute fixed or seeded sources.
///
/// ```rust
/// use backend::domain::ports::{FixedRandomSource, RandomSource};
///
/// let source = FixedRandomSource::new(0.25);
/// assert_eq!(source.next_unit(), 0.25);
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait RandomSource: Send + Sync {
    /// Return the next value in `[0, 1)`.
    fn next_unit(&self) -> f64;
}

/// Fixture source that returns the same value on every draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedRandomSource {
    value: f64,
}

impl FixedRandomSource {
    /// Create a source that always yields `value`.
    pub const fn new(value: f64) -> Self {
        Self { value }
    }
}

impl RandomSource for FixedRandomSource {
    fn next_unit(&self) -> f64 {
        self.value
    }
}
