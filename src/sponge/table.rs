//! Byte-sliced polynomial-division lookup tables.
//!
//! A table is a pure function of (width, generator) and is immutable once
//! built, so equal-generator sponges of the same width share one allocation
//! through a process-local cache.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;

use super::word::Word;

/// Builds the 256-entry lookup table for `generator`.
///
/// Entry `i` is the result of eight polynomial-division steps applied to
/// `i` placed in the top byte of a word, using `generator` in non-reversed
/// form with its implicit top bit omitted.
pub fn build_table<T: Word>(generator: T) -> [T; 256] {
    let mut table = [T::ZERO; 256];
    for (i, entry) in table.iter_mut().enumerate() {
        let mut value = T::from_u64((i as u64) << (T::BITS - 8));
        for _ in 0..8 {
            let shifted = T::from_u64(value.to_u64() << 1);
            value = if (value & T::HIGH_BIT) != T::ZERO {
                shifted ^ generator
            } else {
                shifted
            };
        }
        *entry = value;
    }
    table
}

type CacheKey = (usize, u64);

static CACHE: Lazy<Mutex<HashMap<CacheKey, Arc<dyn Any + Send + Sync>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Returns the interned table for `generator`, building it on first use.
pub fn shared_table<T: Word>(generator: T) -> Arc<[T; 256]> {
    let mut cache = CACHE.lock().unwrap_or_else(|e| e.into_inner());
    let entry = cache
        .entry((T::BITS, generator.to_u64()))
        .or_insert_with(|| Arc::new(build_table(generator)) as Arc<dyn Any + Send + Sync>);
    match Arc::clone(entry).downcast::<[T; 256]>() {
        Ok(table) => table,
        // The key carries the width, so the entry's type always matches.
        Err(_) => Arc::new(build_table(generator)),
    }
}
