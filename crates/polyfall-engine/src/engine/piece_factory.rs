use std::{
    fmt::{self, Write as _},
    str::FromStr,
};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom as _,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    UnknownPieceTypeError,
    core::{
        family::PieceFamily,
        piece::{Piece, PieceKind},
    },
};

/// Builds pieces of one family and supplies them fairly.
///
/// # Bag Supply
///
/// [`Self::create_from_bag`] draws from a bag holding one of every registered
/// kind. When the bag runs dry it is refilled and shuffled (Fisher–Yates), so any
/// run of `N` draws aligned to a bag boundary contains each of the `N` kinds
/// exactly once, and at most `2 * (N - 1)` other pieces come between two draws
/// of the same kind.
///
/// # Example
///
/// ```
/// use std::collections::HashSet;
///
/// use polyfall_engine::{PieceFactory, PieceFamily};
///
/// let mut factory = PieceFactory::new(&PieceFamily::TETROMINO);
/// let kinds: HashSet<_> = (0..7).map(|_| factory.create_from_bag().kind()).collect();
/// assert_eq!(kinds.len(), 7);
/// ```
#[derive(Debug, Clone)]
pub struct PieceFactory {
    family: &'static PieceFamily,
    rng: Pcg32,
    bag: Vec<PieceKind>,
}

impl PieceFactory {
    /// Creates a factory with a random seed.
    ///
    /// For a reproducible piece sequence, use [`Self::with_seed`] instead.
    #[must_use]
    pub fn new(family: &'static PieceFamily) -> Self {
        Self::with_seed(family, rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic supply.
    #[must_use]
    pub fn with_seed(family: &'static PieceFamily, seed: PieceSeed) -> Self {
        Self {
            family,
            rng: Pcg32::from_seed(seed.0),
            bag: Vec::with_capacity(family.len()),
        }
    }

    #[must_use]
    pub fn family(&self) -> &'static PieceFamily {
        self.family
    }

    /// Kinds left in the current bag; the last one is drawn next.
    #[must_use]
    pub fn bag(&self) -> &[PieceKind] {
        &self.bag
    }

    /// Builds a piece of `kind` at the family's spawn position.
    pub fn create(&self, kind: PieceKind) -> Result<Piece, UnknownPieceTypeError> {
        let template = self
            .family
            .template(kind)
            .ok_or(UnknownPieceTypeError {
                kind,
                family: self.family.name(),
            })?;
        Ok(template.instantiate(self.family.spawn_position()))
    }

    /// Builds a piece of a kind chosen uniformly at random, with no fairness
    /// guarantee between draws.
    ///
    /// # Panics
    ///
    /// Panics if the family registers no kinds.
    pub fn create_uniform_random(&mut self) -> Piece {
        let templates = self.family.templates();
        assert!(!templates.is_empty(), "piece family has no kinds");
        let template = &templates[self.rng.random_range(0..templates.len())];
        template.instantiate(self.family.spawn_position())
    }

    /// Draws the next piece from the bag, refilling it when empty.
    ///
    /// # Panics
    ///
    /// Panics if the family registers no kinds.
    pub fn create_from_bag(&mut self) -> Piece {
        if self.bag.is_empty() {
            self.refill_bag();
        }
        let kind = self.bag.pop().expect("piece family has no kinds");
        self.create(kind)
            .expect("bag only holds kinds registered in the family")
    }

    fn refill_bag(&mut self) {
        self.bag.extend(self.family.kinds());
        self.bag.shuffle(&mut self.rng);
        log::trace!(
            "refilled {} bag: {}",
            self.family.name(),
            self.bag.iter().map(|kind| kind.as_char()).collect::<String>()
        );
    }
}

/// Seed for deterministic piece supply.
///
/// A 128-bit seed serialized as 32 hexadecimal digits. The same seed always
/// produces the same sequence of pieces.
///
/// # Example
///
/// ```
/// use polyfall_engine::{PieceFactory, PieceFamily, PieceSeed};
/// use rand::Rng as _;
///
/// let seed: PieceSeed = rand::rng().random();
/// let mut a = PieceFactory::with_seed(&PieceFamily::TETROMINO, seed);
/// let mut b = PieceFactory::with_seed(&PieceFamily::TETROMINO, seed);
/// for _ in 0..14 {
///     assert_eq!(a.create_from_bag(), b.create_from_bag());
/// }
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut hex_str = String::with_capacity(2 * self.0.len());
        write!(&mut hex_str, "{self}").map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&hex_str)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

impl FromStr for PieceSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseSeedError {
                input: s.to_owned(),
            });
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| ParseSeedError {
            input: s.to_owned(),
        })?;
        Ok(Self(num.to_be_bytes()))
    }
}

/// A seed string was not exactly 32 hexadecimal digits.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex: expected 32 hexadecimal digits, got {input:?}")]
pub struct ParseSeedError {
    input: String,
}

impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}
