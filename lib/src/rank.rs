//! Symbol ranking by ink coverage, with a persistent rank cache
//!
//! Ranking renders every symbol of an alphabet and sorts the alphabet by how
//! many canvas pixels the glyph fills. Rendering a full alphabet is the
//! slowest part of a luminance conversion, so the result is stored in a
//! [`RankCache`] and reused for any later alphabet that is a subset of the
//! one that was ranked.

use crate::alphabet::Alphabet;
use crate::error::{Error, Result};
use crate::glyph::GlyphRasterizer;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A symbol together with its coverage score
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedSymbol {
    pub symbol: String,
    pub coverage: u32,
}

/// An alphabet ordered by coverage score
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedAlphabet {
    entries: Vec<RankedSymbol>,
}

impl RankedAlphabet {
    /// Sort scored symbols by coverage, ascending or (if `reverse`) descending.
    ///
    /// The sort is stable: equal scores keep their input order in both
    /// directions.
    pub fn from_scores<I, S>(scores: I, reverse: bool) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let mut entries: Vec<RankedSymbol> = scores
            .into_iter()
            .map(|(symbol, coverage)| RankedSymbol {
                symbol: symbol.into(),
                coverage,
            })
            .collect();

        if reverse {
            entries.sort_by(|a, b| b.coverage.cmp(&a.coverage));
        } else {
            entries.sort_by_key(|e| e.coverage);
        }

        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&RankedSymbol> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RankedSymbol> {
        self.entries.iter()
    }

    /// Symbols in rank order
    pub fn symbols(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.symbol.as_str()).collect()
    }
}

/// The persisted shape of a ranking.
///
/// Field names are kept stable so a record written by one run can be read by
/// the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankRecord {
    /// Alphabet that was ranked, in its original order
    pub original_symbol_list: Vec<String>,
    /// Coverage per symbol, in original order
    pub intensity_values_unsorted: Vec<(String, u32)>,
    /// Symbols in rank order
    pub sorted_symbols: Vec<String>,
    /// Direction the ranking was sorted in
    #[serde(default)]
    pub reverse: bool,
}

impl RankRecord {
    fn from_scores(
        alphabet: &Alphabet,
        scores: Vec<(String, u32)>,
        ranked: &RankedAlphabet,
        reverse: bool,
    ) -> Self {
        Self {
            original_symbol_list: alphabet.symbols().to_vec(),
            intensity_values_unsorted: scores,
            sorted_symbols: ranked.iter().map(|e| e.symbol.clone()).collect(),
            reverse,
        }
    }

    /// Check that the record describes an actual ranking of its alphabet
    pub fn check(&self) -> Result<()> {
        let original: HashSet<&str> = self
            .original_symbol_list
            .iter()
            .map(String::as_str)
            .collect();
        if original.len() != self.original_symbol_list.len() {
            return Err(Error::CacheInconsistency(
                "original symbol list has duplicates".into(),
            ));
        }

        let sorted: HashSet<&str> = self.sorted_symbols.iter().map(String::as_str).collect();
        if sorted.len() != self.sorted_symbols.len() || sorted != original {
            return Err(Error::CacheInconsistency(
                "sorted symbols are not a permutation of the original list".into(),
            ));
        }

        let scored: HashSet<&str> = self
            .intensity_values_unsorted
            .iter()
            .map(|(s, _)| s.as_str())
            .collect();
        if !original.is_subset(&scored) {
            return Err(Error::CacheInconsistency(
                "some symbols have no stored coverage".into(),
            ));
        }

        Ok(())
    }

    /// The stored ranking restricted to `alphabet`, if this record covers it
    fn restrict(&self, alphabet: &Alphabet, reverse: bool) -> Option<RankedAlphabet> {
        if self.reverse != reverse || !alphabet.is_subset_of(&self.original_symbol_list) {
            return None;
        }

        let scores: HashMap<&str, u32> = self
            .intensity_values_unsorted
            .iter()
            .map(|(s, c)| (s.as_str(), *c))
            .collect();

        let entries = self
            .sorted_symbols
            .iter()
            .filter(|s| alphabet.contains(s))
            .map(|s| RankedSymbol {
                symbol: s.clone(),
                coverage: scores.get(s.as_str()).copied().unwrap_or_default(),
            })
            .collect();

        Some(RankedAlphabet { entries })
    }
}

/// Storage backend for the rank cache
pub trait CacheStore: Send + Sync {
    /// Read the stored record, `Ok(None)` if nothing has been stored yet
    fn load(&self) -> Result<Option<RankRecord>>;

    /// Replace the stored record
    fn save(&self, record: &RankRecord) -> Result<()>;
}

/// Keeps the record as a JSON file at a fixed path
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CacheStore for FileStore {
    fn load(&self) -> Result<Option<RankRecord>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let record = serde_json::from_slice(&bytes)
            .map_err(|e| Error::CacheInconsistency(format!("{}: {}", self.path.display(), e)))?;
        Ok(Some(record))
    }

    fn save(&self, record: &RankRecord) -> Result<()> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        // Write next to the target and rename, so readers never see half a record
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer(&mut tmp, record)?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }
}

/// Keeps the record in memory; useful for tests and one-shot runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    record: Mutex<Option<RankRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: RankRecord) -> Self {
        Self {
            record: Mutex::new(Some(record)),
        }
    }

    pub fn record(&self) -> Option<RankRecord> {
        self.record
            .lock()
            .map(|guard| guard.as_ref().cloned())
            .unwrap_or_default()
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> Error {
    Error::CacheInconsistency("memory store lock poisoned".into())
}

impl CacheStore for MemoryStore {
    fn load(&self) -> Result<Option<RankRecord>> {
        let slot = self.record.lock().map_err(poisoned)?;
        Ok(slot.clone())
    }

    fn save(&self, record: &RankRecord) -> Result<()> {
        let mut slot = self.record.lock().map_err(poisoned)?;
        *slot = Some(record.clone());
        Ok(())
    }
}

/// A rank cache backed by some [`CacheStore`].
///
/// A stored record is reused when it was ranked in the same direction and
/// its alphabet contains every requested symbol. Anything else, including
/// unreadable or inconsistent records, counts as a miss.
#[derive(Debug)]
pub struct RankCache<S> {
    store: S,
}

impl<S: CacheStore> RankCache<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Look up a ranking of `alphabet`; problems with the stored record are
    /// logged and reported as a miss
    pub fn lookup(&self, alphabet: &Alphabet, reverse: bool) -> Option<RankedAlphabet> {
        let record = match self.store.load().and_then(|r| {
            if let Some(record) = &r {
                record.check()?;
            }
            Ok(r)
        }) {
            Ok(Some(record)) => record,
            Ok(None) => {
                log::info!("no rank cache found");
                return None;
            }
            Err(e) => {
                log::warn!("ignoring rank cache: {}", e);
                return None;
            }
        };

        match record.restrict(alphabet, reverse) {
            Some(ranked) => {
                log::info!("rank cache covers the requested alphabet, reusing it");
                Some(ranked)
            }
            None => {
                log::info!("rank cache does not match the requested alphabet");
                None
            }
        }
    }

    /// Overwrite the stored record. Failures are logged, not returned: the
    /// ranking itself is still valid.
    pub fn update(&self, record: &RankRecord) {
        if let Err(e) = self.store.save(record) {
            log::warn!("failed to write rank cache: {}", e);
        }
    }
}

/// Orders alphabets by glyph coverage, consulting a [`RankCache`] first
pub struct SymbolRanker<S, G> {
    cache: RankCache<S>,
    rasterizer: G,
}

impl<S: CacheStore, G: GlyphRasterizer> SymbolRanker<S, G> {
    pub fn new(cache: RankCache<S>, rasterizer: G) -> Self {
        Self { cache, rasterizer }
    }

    pub fn cache(&self) -> &RankCache<S> {
        &self.cache
    }

    /// Rank `alphabet` by ascending coverage, or descending if `reverse`.
    ///
    /// On a cache miss every symbol is rendered and the cache is overwritten
    /// with the new ranking. Nothing is written if any glyph fails to render.
    ///
    /// # Arguments
    /// * `alphabet` - Symbols to rank
    /// * `reverse` - Sort by descending coverage instead
    ///
    /// # Returns
    /// A permutation of `alphabet`; ties keep alphabet order
    pub fn rank(&self, alphabet: &Alphabet, reverse: bool) -> Result<RankedAlphabet> {
        if let Some(ranked) = self.cache.lookup(alphabet, reverse) {
            return Ok(ranked);
        }

        log::info!("ranking {} symbols by coverage", alphabet.len());
        let scores = self.score(alphabet)?;
        let ranked = RankedAlphabet::from_scores(scores.iter().cloned(), reverse);

        self.cache
            .update(&RankRecord::from_scores(alphabet, scores, &ranked, reverse));
        Ok(ranked)
    }

    /// Coverage of every symbol, in alphabet order
    fn score(&self, alphabet: &Alphabet) -> Result<Vec<(String, u32)>> {
        alphabet
            .symbols()
            .par_iter()
            .map(|symbol| -> Result<(String, u32)> {
                let coverage = self.rasterizer.coverage(symbol)?;
                Ok((symbol.clone(), coverage))
            })
            .collect()
    }
}
