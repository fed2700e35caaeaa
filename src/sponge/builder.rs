//! Named-parameter construction of CRC sponges.
//!
//! Every unset option takes the width's default; [`build`] validates the
//! result and is the only way to obtain a [`CrcSponge`]. The free
//! functions [`crc8`], [`crc16`], [`crc32`] and [`crc64`] are the named
//! constructor heads for the four widths.
//!
//! [`build`]: CrcSpongeBuilder::build

use crate::constants;
use crate::errors::Error;

use super::crc::CrcSponge;
use super::table;
use super::word::Word;

/// Default generator polynomial for a width.
///
/// 64 bits: ECMA-182; 32 bits: ANSI; 16 bits: CCITT; 8 bits: 0x9b.
pub fn default_generator<T: Word>() -> T {
    match T::BITS {
        8 => T::from_u64(0x9b),
        16 => T::from_u64(0x1021),
        32 => T::from_u64(0x04c1_1db7),
        _ => T::from_u64(0x42f0_e1eb_a9ea_3693),
    }
}

/// Default number of transformation rounds applied after each soaked block.
pub const DEFAULT_SOAKING_ROUNDS: usize = 8;

/// Default number of transformation rounds applied after each squeezed block.
pub const DEFAULT_SQUEEZING_ROUNDS: usize = 1;

/// Builder for a [`CrcSponge`] of width `T::BITS`.
#[derive(Clone, Debug)]
pub struct CrcSpongeBuilder<T: Word> {
    generator: T,
    initial_value: T,
    xor_value: T,
    initial_state: Box<[T]>,
    soaking_rounds: usize,
    squeezing_rounds: usize,
}

impl<T: Word> CrcSpongeBuilder<T> {
    /// Creates a builder with every option at its width default:
    /// generator per [`default_generator`], all-ones initial and XOR
    /// values, 8 soaking rounds, 1 squeezing round, and the first
    /// `T::BITS`² bits of pi as initial state.
    pub fn new() -> Self {
        CrcSpongeBuilder {
            generator: default_generator::<T>(),
            initial_value: T::MAX,
            xor_value: T::MAX,
            initial_state: words_from_bytes::<T>(&constants::PI),
            soaking_rounds: DEFAULT_SOAKING_ROUNDS,
            squeezing_rounds: DEFAULT_SQUEEZING_ROUNDS,
        }
    }

    /// Sets the generator polynomial, in non-reversed form with its
    /// implicit top bit omitted.
    pub fn generator(mut self, generator: T) -> Self {
        self.generator = generator;
        self
    }

    /// Sets the initial value of the running CRC register.
    pub fn initial_value(mut self, initial_value: T) -> Self {
        self.initial_value = initial_value;
        self
    }

    /// Sets the mask XOR-ed into each temporary row during the
    /// permutation.
    pub fn xor_value(mut self, xor_value: T) -> Self {
        self.xor_value = xor_value;
        self
    }

    /// Sets the number of rounds applied after each soaked block.
    pub fn soaking_rounds(mut self, soaking_rounds: usize) -> Self {
        self.soaking_rounds = soaking_rounds;
        self
    }

    /// Sets the number of rounds applied after each squeezed block.
    pub fn squeezing_rounds(mut self, squeezing_rounds: usize) -> Self {
        self.squeezing_rounds = squeezing_rounds;
        self
    }

    /// Sets the initial state from words; exactly `T::BITS` are required
    /// at build time.
    pub fn initial_state(mut self, initial_state: &[T]) -> Self {
        self.initial_state = initial_state.into();
        self
    }

    /// Sets the initial state from a byte stream, assembled into
    /// little-endian words. A catalogue entry from [`constants`] works
    /// for every width; only the first `T::BITS`²/8 bytes are consumed.
    pub fn initial_state_bytes(mut self, bytes: &[u8]) -> Self {
        if bytes.len() < T::BITS * T::BYTES {
            // Too short to fill the state; let build() report the length.
            self.initial_state = vec![T::ZERO; 0].into();
            return self;
        }
        self.initial_state = words_from_bytes::<T>(bytes);
        self
    }

    /// Validates the options and constructs the sponge.
    pub fn build(self) -> Result<CrcSponge<T>, Error> {
        if (self.generator & T::LOW_BIT) == T::ZERO {
            return Err(Error::EvenGenerator {
                generator: self.generator.to_u64(),
            });
        }
        if self.soaking_rounds == 0 {
            return Err(Error::ZeroSoakingRounds);
        }
        if self.squeezing_rounds == 0 {
            return Err(Error::ZeroSqueezingRounds);
        }
        if self.initial_state.len() != T::BITS {
            return Err(Error::InvalidStateLength {
                expected: T::BITS,
                actual: self.initial_state.len(),
            });
        }
        let table = table::shared_table(self.generator);
        Ok(CrcSponge::new(
            self.generator,
            self.initial_value,
            self.xor_value,
            self.initial_state,
            self.soaking_rounds,
            self.squeezing_rounds,
            table,
        ))
    }
}

impl<T: Word> Default for CrcSpongeBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Assembles the first `T::BITS` little-endian words of a byte stream.
pub(crate) fn words_from_bytes<T: Word>(bytes: &[u8]) -> Box<[T]> {
    bytes
        .chunks_exact(T::BYTES)
        .take(T::BITS)
        .map(|chunk| {
            let mut word = 0u64;
            for (k, &byte) in chunk.iter().enumerate() {
                word |= (byte as u64) << (8 * k);
            }
            T::from_u64(word)
        })
        .collect()
}

/// Named constructor head for an 8-bit sponge.
pub fn crc8() -> CrcSpongeBuilder<u8> {
    CrcSpongeBuilder::new()
}

/// Named constructor head for a 16-bit sponge.
pub fn crc16() -> CrcSpongeBuilder<u16> {
    CrcSpongeBuilder::new()
}

/// Named constructor head for a 32-bit sponge.
pub fn crc32() -> CrcSpongeBuilder<u32> {
    CrcSpongeBuilder::new()
}

/// Named constructor head for a 64-bit sponge.
pub fn crc64() -> CrcSpongeBuilder<u64> {
    CrcSpongeBuilder::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_the_width() {
        assert_eq!(default_generator::<u8>(), 0x9b);
        assert_eq!(default_generator::<u16>(), 0x1021);
        assert_eq!(default_generator::<u32>(), 0x04c1_1db7);
        assert_eq!(default_generator::<u64>(), 0x42f0_e1eb_a9ea_3693);
    }

    #[test]
    fn even_generator_is_rejected() {
        let result = crc16().generator(0x1020).build();
        assert!(matches!(
            result,
            Err(Error::EvenGenerator { generator: 0x1020 })
        ));
    }

    #[test]
    fn zero_rounds_are_rejected() {
        assert!(matches!(
            crc64().soaking_rounds(0).build(),
            Err(Error::ZeroSoakingRounds)
        ));
        assert!(matches!(
            crc64().squeezing_rounds(0).build(),
            Err(Error::ZeroSqueezingRounds)
        ));
    }

    #[test]
    fn short_state_is_rejected() {
        let result = crc64().initial_state(&[0u64; 63]).build();
        assert!(matches!(
            result,
            Err(Error::InvalidStateLength {
                expected: 64,
                actual: 63
            })
        ));
    }

    #[test]
    fn pi_words_assemble_little_endian() {
        let words = words_from_bytes::<u64>(&constants::PI);
        assert_eq!(words.len(), 64);
        // First eight bytes of pi are c9 0f da a2 21 68 c2 34.
        assert_eq!(words[0], 0x34c2_6821_a2da_0fc9);
    }

    #[test]
    fn catalogue_entries_fit_every_width() {
        assert!(crc8().initial_state_bytes(&constants::E).build().is_ok());
        assert!(crc32().initial_state_bytes(&constants::GAMMA).build().is_ok());
        assert!(crc64()
            .initial_state_bytes(&constants::SQRT_2)
            .build()
            .is_ok());
    }
}
