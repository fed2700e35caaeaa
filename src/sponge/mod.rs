//! Sponge Interface
//!
//! This module defines the [`SpongeInterface`] trait, the capability set
//! the random-distribution layer and the evaluator depend on, together
//! with the width-generic [`CrcSponge`] implementation and the
//! width-tagged [`Draupnir`] wrapper.

pub mod builder;
pub mod crc;
pub mod table;
pub mod word;

use rand_core::RngCore;

use crate::dump;
use crate::errors::Error;

pub use builder::{crc8, crc16, crc32, crc64, CrcSpongeBuilder};
pub use crc::CrcSponge;
pub use word::Word;

/// The behavior of a byte-oriented cryptographic-style sponge.
///
/// A sponge allows for:
/// - **Soaking** input data into the sponge state
/// - **Squeezing** output bytes from the sponge state
/// - **Stepping** the permutation an arbitrary number of rounds
/// - **Resetting** to the initial state
/// - **Dumping** the full state as a restorable one-line serialization
///
/// The output byte stream is a deterministic function of the construction
/// parameters and the ordered interleaving of these calls.
pub trait SpongeInterface: Clone {
    /// Squeezes a single byte out of the sponge.
    fn squeeze(&mut self) -> u8;

    /// Soaks a byte string into the sponge.
    fn soak(&mut self, data: &[u8]) -> &mut Self;

    /// Applies `n` rounds of the permutation.
    fn step(&mut self, n: usize) -> &mut Self;

    /// Resets the sponge to its initial state.
    fn reset(&mut self) -> &mut Self;

    /// Serializes the sponge state, draining the output buffer first.
    fn dump(&mut self, delimiter: char) -> String;
}

/// A CRC sponge of any supported width.
///
/// The four widths share one algorithm; this wrapper makes heterogeneous
/// collections (an evaluator stack, the output of a width-agnostic load)
/// first-class without trait objects.
#[derive(Clone, Debug)]
pub enum Draupnir {
    /// An 8-bit sponge.
    Crc8(CrcSponge<u8>),
    /// A 16-bit sponge.
    Crc16(CrcSponge<u16>),
    /// A 32-bit sponge.
    Crc32(CrcSponge<u32>),
    /// A 64-bit sponge.
    Crc64(CrcSponge<u64>),
}

macro_rules! dispatch {
    ($value:expr, $sponge:ident => $body:expr) => {
        match $value {
            Draupnir::Crc8($sponge) => $body,
            Draupnir::Crc16($sponge) => $body,
            Draupnir::Crc32($sponge) => $body,
            Draupnir::Crc64($sponge) => $body,
        }
    };
}

impl Draupnir {
    /// Restores a sponge of whichever width the dump declares.
    pub fn load(text: &str, delimiter: char) -> Result<Self, Error> {
        dump::parse(text, delimiter)
    }

    /// The sponge width in bits.
    pub fn width(&self) -> usize {
        match self {
            Draupnir::Crc8(_) => 8,
            Draupnir::Crc16(_) => 16,
            Draupnir::Crc32(_) => 32,
            Draupnir::Crc64(_) => 64,
        }
    }
}

impl SpongeInterface for Draupnir {
    fn squeeze(&mut self) -> u8 {
        dispatch!(self, sponge => sponge.squeeze())
    }

    fn soak(&mut self, data: &[u8]) -> &mut Self {
        dispatch!(&mut *self, sponge => { sponge.soak(data); });
        self
    }

    fn step(&mut self, n: usize) -> &mut Self {
        dispatch!(&mut *self, sponge => { sponge.step(n); });
        self
    }

    fn reset(&mut self) -> &mut Self {
        dispatch!(&mut *self, sponge => { sponge.reset(); });
        self
    }

    fn dump(&mut self, delimiter: char) -> String {
        dispatch!(self, sponge => sponge.dump(delimiter))
    }
}

impl RngCore for Draupnir {
    fn next_u32(&mut self) -> u32 {
        dispatch!(self, sponge => sponge.next_u32())
    }

    fn next_u64(&mut self) -> u64 {
        dispatch!(self, sponge => sponge.next_u64())
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dispatch!(self, sponge => sponge.fill_bytes(dest))
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        dispatch!(self, sponge => sponge.try_fill_bytes(dest))
    }
}

impl From<CrcSponge<u8>> for Draupnir {
    fn from(sponge: CrcSponge<u8>) -> Self {
        Draupnir::Crc8(sponge)
    }
}

impl From<CrcSponge<u16>> for Draupnir {
    fn from(sponge: CrcSponge<u16>) -> Self {
        Draupnir::Crc16(sponge)
    }
}

impl From<CrcSponge<u32>> for Draupnir {
    fn from(sponge: CrcSponge<u32>) -> Self {
        Draupnir::Crc32(sponge)
    }
}

impl From<CrcSponge<u64>> for Draupnir {
    fn from(sponge: CrcSponge<u64>) -> Self {
        Draupnir::Crc64(sponge)
    }
}
