use core::hash::BuildHasher;

pub use lccc_siphash::SipHasher;

use crate::rand::Rand;

/// Hasher builder used by [`RawStore`](crate::store::RawStore) unless another is supplied.
pub type DefaultHashBuilder = RandomState<2, 4>;

/// Builds SipHash-`C`-`D` hashers keyed with a per-instance random pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RandomState<const C: usize, const D: usize>(u64, u64);

impl<const C: usize, const D: usize> Default for RandomState<C, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const C: usize, const D: usize> RandomState<C, D> {
    pub fn new() -> RandomState<C, D> {
        let mut rand = Rand::init();

        Self::from_generator(&mut rand)
    }

    pub(crate) fn from_generator(gen: &mut Rand) -> RandomState<C, D> {
        Self(gen.gen(), gen.gen())
    }

    /// Fixed keys, for hashing that is reproducible across runs.
    pub const fn with_keys(k0: u64, k1: u64) -> RandomState<C, D> {
        Self(k0, k1)
    }

    pub const fn keys(&self) -> (u64, u64) {
        (self.0, self.1)
    }
}

impl<const C: usize, const D: usize> BuildHasher for RandomState<C, D> {
    type Hasher = SipHasher<C, D>;

    fn build_hasher(&self) -> Self::Hasher {
        SipHasher::new_with_keys(self.0, self.1)
    }
}
