//! Person name synthesis.

use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of realistic human names. No uniqueness is implied.
pub trait NameProvider {
    fn first_name(&mut self) -> String;
    fn last_name(&mut self) -> String;
}

/// [`NameProvider`] backed by the `fake` crate's English name lists.
#[derive(Debug, Clone)]
pub struct FakeNameProvider<R = StdRng> {
    rng: R,
}

impl FakeNameProvider<StdRng> {
    /// Provider seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Provider with a fixed seed, for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> FakeNameProvider<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> NameProvider for FakeNameProvider<R> {
    fn first_name(&mut self) -> String {
        FirstName().fake_with_rng(&mut self.rng)
    }

    fn last_name(&mut self) -> String {
        LastName().fake_with_rng(&mut self.rng)
    }
}
