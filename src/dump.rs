//! The versioned textual state-dump protocol.
//!
//! A dump is a single line of delimited, fixed-width, lowercase hex
//! fields followed by an ECMA CRC-64 checksum over everything before it
//! (trailing delimiters included). Version 1 carries eleven fields:
//!
//! | # | field | hex chars |
//! |---|---|---|
//! | 0 | version | 4 |
//! | 1 | soakingRounds | 4 |
//! | 2 | squeezingRounds | 4 |
//! | 3 | width | 4 |
//! | 4 | generator | W/4 |
//! | 5 | xorValue | W/4 |
//! | 6 | initialValue | W/4 |
//! | 7 | initialState | W·W/4 |
//! | 8 | crc | W/4 |
//! | 9 | state | W·W/4 |
//! | 10 | checksum | 16 |
//!
//! Loading validates, in order: field count, checksum, version, round
//! counts, generator parity, and the declared width.

use once_cell::sync::Lazy;

use crate::errors::Error;
use crate::sponge::word::Word;
use crate::sponge::{table, CrcSponge, Draupnir};

/// The only dump layout version this crate reads or writes.
pub const VERSION: u64 = 1;

/// The default field delimiter.
pub const DEFAULT_DELIMITER: char = ':';

const FIELD_COUNT: usize = 11;

// ECMA-182 polynomial, reversed for the byte-reflected schedule.
const ECMA_REFLECTED: u64 = 0xc96c_5795_d787_0f42;

static CHECKSUM_TABLE: Lazy<[u64; 256]> = Lazy::new(|| {
    let mut table = [0u64; 256];
    for (i, entry) in table.iter_mut().enumerate() {
        let mut value = i as u64;
        for _ in 0..8 {
            value = if value & 1 != 0 {
                (value >> 1) ^ ECMA_REFLECTED
            } else {
                value >> 1
            };
        }
        *entry = value;
    }
    table
});

/// ECMA CRC-64 with all-ones initial value and XOR-out, reflected byte
/// schedule.
pub fn checksum(data: &[u8]) -> u64 {
    let mut crc = u64::MAX;
    for &byte in data {
        crc = CHECKSUM_TABLE[((crc ^ byte as u64) & 0xff) as usize] ^ (crc >> 8);
    }
    crc ^ u64::MAX
}

/// Serializes a sponge into a version-1 dump line.
pub(crate) fn render<T: Word>(sponge: &CrcSponge<T>, delimiter: char) -> String {
    let width = T::BITS / 4;
    let fields = [
        format!("{:04x}", VERSION),
        format!("{:04x}", sponge.soaking_rounds()),
        format!("{:04x}", sponge.squeezing_rounds()),
        format!("{:04x}", T::BITS),
        format!("{:0width$x}", sponge.generator()),
        format!("{:0width$x}", sponge.xor_value()),
        format!("{:0width$x}", sponge.initial_value()),
        concat_words(sponge.initial_state()),
        format!("{:0width$x}", sponge.crc()),
        concat_words(sponge.state()),
    ];
    let mut body = String::new();
    for field in &fields {
        body.push_str(field);
        body.push(delimiter);
    }
    let check = checksum(body.as_bytes());
    format!("{body}{check:016x}")
}

fn concat_words<T: Word>(words: &[T]) -> String {
    let width = T::BITS / 4;
    let mut out = String::with_capacity(words.len() * width);
    for word in words {
        out.push_str(&format!("{word:0width$x}"));
    }
    out
}

/// Restores a sponge of whichever width the dump declares.
pub(crate) fn parse(text: &str, delimiter: char) -> Result<Draupnir, Error> {
    let raw = RawDump::parse(text, delimiter)?;
    match raw.width {
        8 => Ok(Draupnir::Crc8(raw.restore())),
        16 => Ok(Draupnir::Crc16(raw.restore())),
        32 => Ok(Draupnir::Crc32(raw.restore())),
        _ => Ok(Draupnir::Crc64(raw.restore())),
    }
}

/// Restores a sponge, requiring the dump to declare width `T::BITS`.
pub(crate) fn parse_for_width<T: Word>(text: &str, delimiter: char) -> Result<CrcSponge<T>, Error> {
    let raw = RawDump::parse(text, delimiter)?;
    if raw.width != T::BITS {
        return Err(Error::WidthMismatch {
            declared: raw.width,
            expected: T::BITS,
        });
    }
    Ok(raw.restore())
}

struct RawDump {
    soaking_rounds: usize,
    squeezing_rounds: usize,
    width: usize,
    generator: u64,
    xor_value: u64,
    initial_value: u64,
    initial_state: Vec<u64>,
    crc: u64,
    state: Vec<u64>,
}

impl RawDump {
    fn parse(text: &str, delimiter: char) -> Result<Self, Error> {
        if text.contains(char::is_whitespace) {
            return Err(Error::MalformedField { field: "dump" });
        }
        let fields: Vec<&str> = text.split(delimiter).collect();
        if fields.len() != FIELD_COUNT {
            return Err(Error::DumpFieldCount {
                expected: FIELD_COUNT,
                actual: fields.len(),
            });
        }

        let declared = hex_field(fields[10], "checksum", 16)?;
        let body = &text[..text.len() - fields[10].len()];
        if checksum(body.as_bytes()) != declared {
            return Err(Error::ChecksumMismatch);
        }

        let version = hex_field(fields[0], "version", 4)?;
        if version != VERSION {
            return Err(Error::UnknownVersion { version });
        }
        let soaking_rounds = hex_field(fields[1], "soakingRounds", 4)? as usize;
        if soaking_rounds == 0 {
            return Err(Error::ZeroSoakingRounds);
        }
        let squeezing_rounds = hex_field(fields[2], "squeezingRounds", 4)? as usize;
        if squeezing_rounds == 0 {
            return Err(Error::ZeroSqueezingRounds);
        }
        let width = hex_field(fields[3], "width", 4)? as usize;
        if !matches!(width, 8 | 16 | 32 | 64) {
            return Err(Error::UnknownWidth { width });
        }
        let word_chars = width / 4;
        let generator = hex_field(fields[4], "generator", word_chars)?;
        if generator & 1 == 0 {
            return Err(Error::EvenGenerator { generator });
        }
        let xor_value = hex_field(fields[5], "xorValue", word_chars)?;
        let initial_value = hex_field(fields[6], "initialValue", word_chars)?;
        let initial_state = word_field(fields[7], "initialState", width)?;
        let crc = hex_field(fields[8], "crc", word_chars)?;
        let state = word_field(fields[9], "state", width)?;

        Ok(RawDump {
            soaking_rounds,
            squeezing_rounds,
            width,
            generator,
            xor_value,
            initial_value,
            initial_state,
            crc,
            state,
        })
    }

    fn restore<T: Word>(&self) -> CrcSponge<T> {
        let generator = T::from_u64(self.generator);
        let initial_state: Box<[T]> = self
            .initial_state
            .iter()
            .map(|&word| T::from_u64(word))
            .collect();
        let state: Box<[T]> = self.state.iter().map(|&word| T::from_u64(word)).collect();
        let table = table::shared_table(generator);
        CrcSponge::restore(
            generator,
            T::from_u64(self.initial_value),
            T::from_u64(self.xor_value),
            initial_state,
            self.soaking_rounds,
            self.squeezing_rounds,
            table,
            T::from_u64(self.crc),
            state,
        )
    }
}

fn hex_field(text: &str, field: &'static str, width: usize) -> Result<u64, Error> {
    if text.len() != width || !text.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
        return Err(Error::MalformedField { field });
    }
    u64::from_str_radix(text, 16).map_err(|_| Error::MalformedField { field })
}

fn word_field(text: &str, field: &'static str, width: usize) -> Result<Vec<u64>, Error> {
    let word_chars = width / 4;
    if text.len() != width * word_chars {
        return Err(Error::MalformedField { field });
    }
    (0..width)
        .map(|i| hex_field(&text[i * word_chars..(i + 1) * word_chars], field, word_chars))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sponge::builder::{crc8, crc64};
    use crate::SpongeInterface;

    #[test]
    fn checksum_matches_the_ecma_check_value() {
        assert_eq!(checksum(b"123456789"), 0x995d_c9bb_df19_39fa);
    }

    #[test]
    fn fresh_default_crc8_dump_is_stable() {
        let mut sponge = crc8().build().unwrap();
        assert_eq!(
            sponge.dump(DEFAULT_DELIMITER),
            "0001:0008:0001:0008:9b:ff:ff:c90fdaa22168c234:ff:c90fdaa22168c234:e7dcaa1d42c0b87b"
        );
    }

    #[test]
    fn dump_declares_the_width() {
        let mut sponge = crc64().build().unwrap();
        let dump = sponge.dump(DEFAULT_DELIMITER);
        assert_eq!(dump.split(':').nth(3), Some("0040"));
    }

    #[test]
    fn alternate_delimiters_round_trip() {
        let mut sponge = crc64().build().unwrap();
        sponge.soak(b"delimited").step(3);
        let dump = sponge.dump('/');
        let mut reloaded = Draupnir::load(&dump, '/').unwrap();
        assert_eq!(reloaded.dump('/'), dump);
    }

    #[test]
    fn load_rejects_a_wrong_field_count() {
        let mut sponge = crc8().build().unwrap();
        let dump = sponge.dump(':');
        let truncated = dump.rsplit_once(':').unwrap().0;
        assert!(matches!(
            Draupnir::load(truncated, ':'),
            Err(Error::DumpFieldCount {
                expected: 11,
                actual: 10
            })
        ));
    }
}
