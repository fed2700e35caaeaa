//! Error types for sponge construction, state restoration, and sampling.
//!
//! All runtime sponge operations (`squeeze`, `soak`, `step`, `reset`) are
//! infallible by contract; errors arise only when building a sponge from
//! parameters or a serialized dump, and when a distribution routine is
//! handed ill-formed bounds.

/// Represents an error raised while constructing, restoring, or sampling
/// from a sponge.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The generator polynomial has its low bit clear.
    #[error("generator polynomial {generator:#x} is even")]
    EvenGenerator {
        /// The rejected generator value, widened to 64 bits.
        generator: u64,
    },
    /// The soaking round count is zero.
    #[error("soaking round count must be positive")]
    ZeroSoakingRounds,
    /// The squeezing round count is zero.
    #[error("squeezing round count must be positive")]
    ZeroSqueezingRounds,
    /// The initial state does not hold exactly one word per state row.
    #[error("initial state holds {actual} words, expected {expected}")]
    InvalidStateLength {
        /// Number of words the width calls for.
        expected: usize,
        /// Number of words actually supplied.
        actual: usize,
    },
    /// A dump does not split into the version-1 field count.
    #[error("dump holds {actual} fields, expected {expected}")]
    DumpFieldCount {
        /// Field count of the supported layout.
        expected: usize,
        /// Field count found in the input.
        actual: usize,
    },
    /// A dump field is the wrong length or contains non-hex characters.
    #[error("malformed dump field `{field}`")]
    MalformedField {
        /// Name of the offending field.
        field: &'static str,
    },
    /// The dump checksum does not match its fields.
    #[error("dump checksum mismatch")]
    ChecksumMismatch,
    /// The dump declares an unsupported layout version.
    #[error("unknown dump version {version}")]
    UnknownVersion {
        /// The declared version.
        version: u64,
    },
    /// The dump declares a width outside {8, 16, 32, 64}.
    #[error("unknown sponge width {width}")]
    UnknownWidth {
        /// The declared width in bits.
        width: usize,
    },
    /// The dump declares a width other than the reader's.
    #[error("dump declares width {declared}, reader expects {expected}")]
    WidthMismatch {
        /// Width declared by the dump.
        declared: usize,
        /// Width the reading sponge type was configured for.
        expected: usize,
    },
    /// A sample was requested from an empty population.
    #[error("cannot sample from an empty population")]
    EmptyPopulation,
    /// A sample of size zero was requested.
    #[error("sample size must be positive")]
    ZeroSampleSize,
    /// A without-replacement sample larger than its population was requested.
    #[error("sample of {size} exceeds population of {total}")]
    SampleExceedsPopulation {
        /// Requested sample size.
        size: usize,
        /// Population size.
        total: usize,
    },
    /// Weighted sampling was requested with no part weights.
    #[error("part weights must not be empty")]
    EmptyParts,
    /// Weighted sampling was requested with all part weights zero.
    #[error("part weights must not sum to zero")]
    ZeroTotalWeight,
    /// A derangement of a single element was requested; none exists.
    #[error("no derangement of a single element exists")]
    NoDerangement,
}
