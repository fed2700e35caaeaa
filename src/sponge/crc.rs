//! The CRC sponge proper.
//!
//! The state is a square bit matrix held as `W` words of `W` bits. One
//! permutation round CRCs the whole state (viewed as its little-endian
//! flat byte image) into a temporary column of words, then bit-transposes
//! that column back into the state. Input blocks are injected along the
//! even-row diagonals; output blocks are gathered from the odd-row
//! diagonals, so consecutive rounds alternate row-wise diffusion with
//! column-wise re-gathering.

use std::sync::Arc;

use rand_core::RngCore;

use crate::dump;
use crate::errors::Error;

use super::word::Word;
use super::SpongeInterface;

/// A CRC-based sponge of width `T::BITS`.
///
/// Instances behave as values: [`Clone`] duplicates every mutable field
/// and shares only the immutable lookup table. A single instance is
/// sequential; clone it for independent streams.
#[derive(Clone, Debug)]
pub struct CrcSponge<T: Word> {
    soaking_rounds: usize,
    squeezing_rounds: usize,
    remaining: usize,
    table: Arc<[T; 256]>,
    initial_state: Box<[T]>,
    state: Box<[T]>,
    generator: T,
    initial_value: T,
    xor_value: T,
    crc: T,
    // Only the first `T::BYTES` slots are ever used.
    buffer: [u8; 8],
}

impl<T: Word> CrcSponge<T> {
    pub(crate) fn new(
        generator: T,
        initial_value: T,
        xor_value: T,
        initial_state: Box<[T]>,
        soaking_rounds: usize,
        squeezing_rounds: usize,
        table: Arc<[T; 256]>,
    ) -> Self {
        let state = initial_state.clone();
        CrcSponge {
            soaking_rounds,
            squeezing_rounds,
            remaining: 0,
            table,
            initial_state,
            state,
            generator,
            initial_value,
            xor_value,
            crc: initial_value,
            buffer: [0; 8],
        }
    }

    /// Rebuilds an instance from a parsed dump; `crc` and `state` replace
    /// the freshly reset values.
    pub(crate) fn restore(
        generator: T,
        initial_value: T,
        xor_value: T,
        initial_state: Box<[T]>,
        soaking_rounds: usize,
        squeezing_rounds: usize,
        table: Arc<[T; 256]>,
        crc: T,
        state: Box<[T]>,
    ) -> Self {
        let mut sponge = Self::new(
            generator,
            initial_value,
            xor_value,
            initial_state,
            soaking_rounds,
            squeezing_rounds,
            table,
        );
        sponge.crc = crc;
        sponge.state = state;
        sponge
    }

    /// Squeezes a single byte out of the sponge.
    pub fn squeeze(&mut self) -> u8 {
        if self.remaining == 0 {
            self.squeeze_block();
        }
        self.remaining -= 1;
        self.buffer[self.remaining]
    }

    /// Soaks a byte string into the sponge under multi-rate padding.
    ///
    /// Full blocks are read as little-endian words; the trailing bytes are
    /// packed high-first, followed by the `0x80` padding header and a
    /// `0x01` tail in the lowest byte, so the final block is never empty
    /// and distinct messages always pad distinctly.
    pub fn soak(&mut self, data: &[u8]) -> &mut Self {
        let mut chunks = data.chunks_exact(T::BYTES);
        for chunk in &mut chunks {
            let mut block = 0u64;
            for (k, &byte) in chunk.iter().enumerate() {
                block |= (byte as u64) << (8 * k);
            }
            self.soak_block(T::from_u64(block));
        }

        let tail = chunks.remainder();
        let mut block = 0u64;
        for &byte in tail {
            block = (block | byte as u64) << 8;
        }
        block |= 0x80;
        if tail.len() < T::BYTES - 1 {
            block <<= 8 * ((T::BYTES - 1) - tail.len());
        }
        block |= 0x01;
        self.soak_block(T::from_u64(block));

        self
    }

    /// Applies `n` rounds of the permutation.
    pub fn step(&mut self, n: usize) -> &mut Self {
        for _ in 0..n {
            self.transform();
        }
        self
    }

    /// Restores the initial state and CRC register and drains the output
    /// buffer.
    pub fn reset(&mut self) -> &mut Self {
        self.state.copy_from_slice(&self.initial_state);
        self.crc = self.initial_value;
        self.remaining = 0;
        self
    }

    /// Serializes the instance as a one-line textual dump.
    ///
    /// Dumping drains the pending output buffer first, so a dump is always
    /// a block boundary: the dumped instance and its reload continue with
    /// identical streams.
    pub fn dump(&mut self, delimiter: char) -> String {
        self.remaining = 0;
        dump::render(self, delimiter)
    }

    /// Restores an instance from a textual dump produced by [`dump`].
    ///
    /// Fails unless the dump declares width `T::BITS`.
    ///
    /// [`dump`]: CrcSponge::dump
    pub fn load(text: &str, delimiter: char) -> Result<Self, Error> {
        dump::parse_for_width(text, delimiter)
    }

    /// Soaks one padded block along the even-row corner diagonals.
    fn soak_block(&mut self, block: T) {
        let state = &mut self.state;
        state[0] = state[0] ^ ((state[0] ^ block) & (T::HIGH_BIT | T::LOW_BIT));
        let mut i = 2;
        while i < T::BITS {
            let mask = T::from_u64((T::HIGH_BIT.to_u64() >> i) | (T::LOW_BIT.to_u64() << i));
            state[i] = state[i] ^ ((state[i] ^ block) & mask);
            i += 2;
        }
        self.remaining = 0;
        self.step(self.soaking_rounds);
    }

    /// Gathers one block from the odd-row diagonals into the output
    /// buffer, MSB first.
    fn squeeze_block(&mut self) {
        let mut diag = 0u64;
        let mut i = 1;
        while i < T::BITS {
            let mask = (T::HIGH_BIT.to_u64() >> i) | (T::LOW_BIT.to_u64() << i);
            diag |= self.state[i].to_u64() & mask;
            i += 2;
        }
        self.step(self.squeezing_rounds);

        for k in 0..T::BYTES {
            self.buffer[k] = (diag >> (8 * (T::BYTES - 1 - k))) as u8;
        }
        self.remaining = T::BYTES;
    }

    /// One permutation round: CRC the whole state, then transpose.
    fn transform(&mut self) {
        let mut temp = [T::ZERO; 64];

        for i in 0..T::BITS {
            let bytes = self.state[i].to_u64().to_le_bytes();
            for &byte in bytes.iter().take(T::BYTES) {
                let index = ((self.crc.to_u64() ^ byte as u64) & 0xff) as usize;
                self.crc = self.table[index] ^ T::from_u64(self.crc.to_u64() >> 8);
            }
            temp[i] = self.crc ^ self.xor_value;
            self.state[i] = T::ZERO;
        }

        for (i, row) in temp.iter().take(T::BITS).enumerate() {
            let row = row.to_u64();
            for (j, word) in self.state.iter_mut().enumerate() {
                if row & (1u64 << (T::BITS - 1 - j)) != 0 {
                    *word = *word | T::from_u64(1u64 << (T::BITS - 1 - i));
                }
            }
        }
    }

    /// The configured generator polynomial.
    pub fn generator(&self) -> T {
        self.generator
    }

    /// The CRC register value a reset restores.
    pub fn initial_value(&self) -> T {
        self.initial_value
    }

    /// The mask XOR-ed into each temporary row during the permutation.
    pub fn xor_value(&self) -> T {
        self.xor_value
    }

    /// The number of rounds applied after each soaked block.
    pub fn soaking_rounds(&self) -> usize {
        self.soaking_rounds
    }

    /// The number of rounds applied after each squeezed block.
    pub fn squeezing_rounds(&self) -> usize {
        self.squeezing_rounds
    }

    pub(crate) fn initial_state(&self) -> &[T] {
        &self.initial_state
    }

    pub(crate) fn state(&self) -> &[T] {
        &self.state
    }

    pub(crate) fn crc(&self) -> T {
        self.crc
    }

    #[cfg(test)]
    pub(crate) fn remaining(&self) -> usize {
        self.remaining
    }
}

impl<T: Word> SpongeInterface for CrcSponge<T> {
    fn squeeze(&mut self) -> u8 {
        CrcSponge::squeeze(self)
    }

    fn soak(&mut self, data: &[u8]) -> &mut Self {
        CrcSponge::soak(self, data)
    }

    fn step(&mut self, n: usize) -> &mut Self {
        CrcSponge::step(self, n)
    }

    fn reset(&mut self) -> &mut Self {
        CrcSponge::reset(self)
    }

    fn dump(&mut self, delimiter: char) -> String {
        CrcSponge::dump(self, delimiter)
    }
}

/// Lets a sponge drive anything in the `rand` ecosystem. Byte order
/// matches the distribution layer: multi-byte draws are big-endian
/// concatenations of squeezed bytes.
impl<T: Word> RngCore for CrcSponge<T> {
    fn next_u32(&mut self) -> u32 {
        let mut bytes = [0u8; 4];
        self.fill_bytes(&mut bytes);
        u32::from_be_bytes(bytes)
    }

    fn next_u64(&mut self) -> u64 {
        let mut bytes = [0u8; 8];
        self.fill_bytes(&mut bytes);
        u64::from_be_bytes(bytes)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for slot in dest.iter_mut() {
            *slot = self.squeeze();
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::sponge::builder::crc64;

    #[test]
    fn stepping_and_soaking_perturb_the_stream() {
        let mut plain = crc64().build().unwrap();
        let mut stepped = crc64().build().unwrap();
        let mut soaked = crc64().build().unwrap();
        stepped.step(1);
        soaked.soak(b"");
        let draw = |s: &mut crate::CrcSponge<u64>| -> Vec<u8> {
            (0..8).map(|_| s.squeeze()).collect()
        };
        let baseline = draw(&mut plain);
        assert_ne!(draw(&mut stepped), baseline);
        assert_ne!(draw(&mut soaked), baseline);
    }

    #[test]
    fn reset_drains_the_buffer() {
        let mut sponge = crc64().build().unwrap();
        sponge.squeeze();
        assert_eq!(sponge.remaining(), 7);
        sponge.reset();
        assert_eq!(sponge.remaining(), 0);
    }

    #[test]
    fn step_has_no_effect_on_the_buffer() {
        let mut sponge = crc64().build().unwrap();
        sponge.squeeze();
        let before = sponge.remaining();
        sponge.step(3);
        assert_eq!(sponge.remaining(), before);
    }
}
