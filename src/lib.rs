//! # Draupnir
//!
//! A family of pseudo-random generators built as variable-width CRC-based
//! sponges, together with the random distributions they drive and a
//! stack-oriented evaluator composing them.
//!
//! The construction absorbs input and extracts output along coupled bit
//! diagonals of a W×W bit state, W ∈ {8, 16, 32, 64}; the permutation in
//! between CRCs the whole state with a configurable generator polynomial
//! and bit-transposes the result. Output streams are a deterministic
//! function of the construction parameters and the operation sequence,
//! and a one-line checksummed dump restores an instance so streams can be
//! resumed exactly.
//!
//! ```rust
//! use draupnir::{crc64, random};
//!
//! # fn main() -> Result<(), draupnir::Error> {
//! let mut sponge = crc64().build()?;
//! sponge.soak(b"seed material");
//! let byte = sponge.squeeze();
//! let die = random::natural_bounded(&mut sponge, 5) + 1;
//! let shuffled = random::permutation(&mut sponge, 52);
//! # let _ = (byte, die, shuffled);
//! # Ok(())
//! # }
//! ```
//!
//! This is not a cryptographically analyzed primitive; treat the output
//! as high-quality deterministic randomness, not as a vetted cipher.

#![deny(missing_docs)]
#![deny(unused_mut)]

pub mod constants;
pub mod dump;
pub mod env;
pub mod errors;
pub mod random;
pub mod sponge;

pub use dump::{checksum, DEFAULT_DELIMITER, VERSION};
pub use errors::Error;
pub use sponge::{crc16, crc32, crc64, crc8, CrcSponge, CrcSpongeBuilder, Draupnir, SpongeInterface, Word};
