//! Luminance bucket lookup table
//!
//! The luminance range [0, 255] is split into N buckets with evenly spaced
//! lower thresholds, and each bucket is given one symbol sampled evenly from
//! a ranked alphabet. With few buckets most of the alphabet goes unused.

use crate::error::{Error, Result};
use crate::rank::RankedAlphabet;

pub const MIN_LUMINANCE: u32 = 0;
pub const MAX_LUMINANCE: u32 = 255;

/// Bucket thresholds paired with their symbols, plus a precomputed
/// luminance -> bucket index table
#[derive(Debug, Clone)]
pub struct BucketTable {
    thresholds: Vec<u8>,
    symbols: Vec<String>,
    lut: [usize; 256],
}

impl BucketTable {
    /// Build a table of `num_buckets` buckets over `ranked`.
    ///
    /// # Arguments
    /// * `ranked` - Symbols ordered by coverage
    /// * `num_buckets` - Number of luminance buckets, at most `ranked.len()`
    ///
    /// # Returns
    /// The table, or a configuration error if `num_buckets` is zero or
    /// exceeds the alphabet length
    pub fn build(ranked: &RankedAlphabet, num_buckets: usize) -> Result<Self> {
        if num_buckets == 0 {
            return Err(Error::config("bucket count must be at least 1"));
        }
        if num_buckets > ranked.len() {
            return Err(Error::config(format!(
                "bucket count {} exceeds the {} symbols available",
                num_buckets,
                ranked.len()
            )));
        }

        let thresholds = thresholds(num_buckets);
        let symbols = symbol_indices(ranked.len(), num_buckets)
            .into_iter()
            .filter_map(|i| ranked.get(i).map(|e| e.symbol.clone()))
            .collect();

        let mut lut = [0usize; 256];
        for (luminance, slot) in lut.iter_mut().enumerate() {
            *slot = digitize(&thresholds, luminance as u8);
        }

        Ok(Self {
            thresholds,
            symbols,
            lut,
        })
    }

    pub fn thresholds(&self) -> &[u8] {
        &self.thresholds
    }

    /// The symbols actually used, one per bucket
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }

    /// Index of the bucket `luminance` falls into
    pub fn bucket_for(&self, luminance: u8) -> usize {
        self.lut[luminance as usize]
    }

    /// Symbol of the bucket `luminance` falls into
    pub fn symbol_for(&self, luminance: u8) -> &str {
        &self.symbols[self.bucket_for(luminance)]
    }
}

/// Lower thresholds `round(i * 255 / n)` for `i` in `0..n`, capped at 254.
///
/// The first is always 0 and the last is always below 255, so the top
/// bucket extends to 255 inclusive. Without the cap, rounding reaches 255
/// once `n` exceeds 510.
fn thresholds(n: usize) -> Vec<u8> {
    let span = (MAX_LUMINANCE - MIN_LUMINANCE) as usize;
    let top = (MAX_LUMINANCE - 1) as usize;
    (0..n)
        .map(|i| (MIN_LUMINANCE as usize + (2 * i * span + n) / (2 * n)).min(top) as u8)
        .collect()
}

/// `n` indices spread across `0..len`, both ends included, truncated
fn symbol_indices(len: usize, n: usize) -> Vec<usize> {
    if n == 1 {
        return vec![0];
    }
    (0..n).map(|i| i * (len - 1) / (n - 1)).collect()
}

/// Index of the last threshold that is <= `value`
fn digitize(thresholds: &[u8], value: u8) -> usize {
    thresholds
        .partition_point(|&t| t <= value)
        .saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> RankedAlphabet {
        RankedAlphabet::from_scores(vec![(".", 1), ("o", 5), ("O", 9), ("@", 20)], false)
    }

    fn ramp(len: usize) -> RankedAlphabet {
        RankedAlphabet::from_scores((0..len).map(|i| (format!("s{}", i), i as u32)), false)
    }

    #[test]
    fn test_two_buckets() {
        let table = BucketTable::build(&scenario(), 2).unwrap();
        assert_eq!(table.thresholds(), &[0, 128]);
        assert_eq!(table.symbols(), &[".", "@"]);
        assert_eq!(table.symbol_for(50), ".");
        assert_eq!(table.symbol_for(200), "@");
    }

    #[test]
    fn test_bucket_boundaries() {
        let table = BucketTable::build(&scenario(), 2).unwrap();
        assert_eq!(table.symbol_for(127), ".");
        assert_eq!(table.symbol_for(128), "@");
    }

    #[test]
    fn test_one_bucket() {
        let table = BucketTable::build(&scenario(), 1).unwrap();
        assert_eq!(table.thresholds(), &[0]);
        assert_eq!(table.symbols(), &["."]);
        assert_eq!(table.symbol_for(255), ".");
    }

    #[test]
    fn test_all_symbols_used_when_buckets_match() {
        let table = BucketTable::build(&scenario(), 4).unwrap();
        assert_eq!(table.symbols(), &[".", "o", "O", "@"]);
        assert_eq!(table.thresholds(), &[0, 64, 128, 191]);
    }

    #[test]
    fn test_too_many_buckets() {
        let err = BucketTable::build(&scenario(), 5).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_zero_buckets() {
        assert!(BucketTable::build(&scenario(), 0).is_err());
    }

    #[test]
    fn test_threshold_properties() {
        for len in [1, 2, 7, 94, 300] {
            let ranked = ramp(len);
            for n in 1..=len.min(256) {
                let table = BucketTable::build(&ranked, n).unwrap();
                let t = table.thresholds();
                assert_eq!(t.len(), n);
                assert_eq!(t[0], 0);
                assert!(t.windows(2).all(|w| w[0] <= w[1]));
                assert_eq!(table.symbols().len(), n);

                assert_eq!(table.bucket_for(0), 0);
                assert_eq!(table.bucket_for(255), n - 1);
                assert_eq!(table.symbol_for(0), table.symbols()[0]);
                assert_eq!(table.symbol_for(255), table.symbols()[n - 1]);
            }
        }
    }

    #[test]
    fn test_large_alphabet_keeps_top_bucket_open() {
        for n in [510, 511, 600, 1000] {
            let table = BucketTable::build(&ramp(n), n).unwrap();
            let t = table.thresholds();
            assert_eq!(t.len(), n);
            assert_eq!(t[0], 0);
            assert!(t.windows(2).all(|w| w[0] <= w[1]));
            assert!(*t.last().unwrap() < 255, "n = {}", n);
            assert_eq!(table.bucket_for(255), n - 1);
            assert_eq!(table.symbol_for(255), table.symbols()[n - 1]);
        }
    }

    #[test]
    fn test_every_luminance_maps_to_a_bucket() {
        let table = BucketTable::build(&ramp(94), 80).unwrap();
        let mut previous = 0;
        for l in 0..=255u8 {
            let bucket = table.bucket_for(l);
            assert!(bucket < table.len());
            assert!(bucket >= previous);
            assert!(table.thresholds()[bucket] <= l);
            previous = bucket;
        }
    }

    #[test]
    fn test_sparse_sampling_endpoints() {
        let table = BucketTable::build(&ramp(94), 3).unwrap();
        assert_eq!(table.symbols(), &["s0", "s46", "s93"]);
    }

    #[test]
    fn test_digitize_with_duplicates_takes_last() {
        assert_eq!(digitize(&[0, 5, 5, 9], 5), 2);
        assert_eq!(digitize(&[0, 5, 5, 9], 4), 0);
        assert_eq!(digitize(&[0, 5, 5, 9], 200), 3);
    }
}
