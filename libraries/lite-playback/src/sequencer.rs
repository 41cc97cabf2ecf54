//! Next/previous selection over the catalog
//!
//! The sequencer owns the current index and the shuffle flag. It performs
//! no I/O: callers that want audible output hand the resulting track to the
//! engine adapter.

use crate::error::{PlaybackError, Result};
use crate::types::ShuffleNotice;
use lite_core::{Catalog, Track};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Current position and shuffle mode over a `Catalog`
///
/// `current_index` is `Some` exactly when the catalog is non-empty, and is
/// always in range.
#[derive(Debug, Clone)]
pub struct Sequencer {
    catalog: Catalog,
    current_index: Option<usize>,
    shuffle_enabled: bool,
    rng: StdRng,
}

impl Sequencer {
    /// Start at the first track with shuffle off
    pub fn new(catalog: Catalog) -> Self {
        Self::with_rng(catalog, StdRng::from_entropy())
    }

    /// Deterministic shuffle draws, for tests and reproducible sessions
    pub fn with_seed(catalog: Catalog, seed: u64) -> Self {
        Self::with_rng(catalog, StdRng::seed_from_u64(seed))
    }

    fn with_rng(catalog: Catalog, rng: StdRng) -> Self {
        let current_index = if catalog.is_empty() { None } else { Some(0) };
        Self {
            catalog,
            current_index,
            shuffle_enabled: false,
            rng,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current_index.and_then(|i| self.catalog.get(i))
    }

    pub fn shuffle_enabled(&self) -> bool {
        self.shuffle_enabled
    }

    /// Swap in a new catalog
    ///
    /// The current index survives when it is still in range, otherwise it
    /// falls back to the first track. The shuffle flag is kept.
    pub fn replace_catalog(&mut self, catalog: Catalog) {
        self.current_index = match self.current_index {
            _ if catalog.is_empty() => None,
            Some(i) if i < catalog.len() => Some(i),
            _ => Some(0),
        };
        self.catalog = catalog;
    }

    /// Record `index` as current; does not start playback
    pub fn select(&mut self, index: usize) -> Result<usize> {
        if index >= self.catalog.len() {
            return Err(PlaybackError::IndexOutOfBounds {
                index,
                len: self.catalog.len(),
            });
        }

        self.current_index = Some(index);
        Ok(index)
    }

    /// Move to the next track
    ///
    /// Sequential mode wraps from the last index to 0. Shuffle mode draws
    /// uniformly until the draw differs from the current index; a single
    /// track catalog replays that track. Returns `None` on an empty catalog.
    pub fn advance(&mut self) -> Option<usize> {
        let current = self.current_index?;
        let len = self.catalog.len();

        let next = if self.shuffle_enabled {
            if len == 1 {
                current
            } else {
                loop {
                    let candidate = self.rng.gen_range(0..len);
                    if candidate != current {
                        break candidate;
                    }
                }
            }
        } else if current + 1 >= len {
            0
        } else {
            current + 1
        };

        self.current_index = Some(next);
        Some(next)
    }

    /// Move to the previous track, wrapping to the last index
    ///
    /// Always sequential, whatever the shuffle flag says.
    pub fn retreat(&mut self) -> Option<usize> {
        let current = self.current_index?;

        let previous = if current == 0 {
            self.catalog.len() - 1
        } else {
            current - 1
        };

        self.current_index = Some(previous);
        Some(previous)
    }

    /// Flip the shuffle flag
    pub fn toggle_shuffle(&mut self) -> ShuffleNotice {
        self.shuffle_enabled = !self.shuffle_enabled;
        ShuffleNotice {
            enabled: self.shuffle_enabled,
        }
    }
}
