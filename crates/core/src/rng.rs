//! RNG module - piece selection policies
//!
//! Three ways to choose the next piece kind:
//! - **Uniform**: independent draws over the shape table's kinds
//! - **Bag**: every kind once per shuffled bag, then a fresh bag
//! - **Sequence**: a fixed list replayed in a cycle, for tests and debugging
//!
//! Random policies use a seeded `StdRng`, so a seed reproduces a game exactly.
//! The same generator also hands out color tags.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::types::PieceKind;

/// How the next piece kind is picked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "mode")]
pub enum PieceSelection {
    Uniform { seed: u64 },
    Bag { seed: u64 },
    Sequence { kinds: Vec<PieceKind> },
}

impl Default for PieceSelection {
    fn default() -> Self {
        PieceSelection::Bag { seed: 1 }
    }
}

impl PieceSelection {
    /// Same policy with a different seed; sequences are unaffected
    pub fn reseeded(&self, seed: u64) -> Self {
        match self {
            PieceSelection::Uniform { .. } => PieceSelection::Uniform { seed },
            PieceSelection::Bag { .. } => PieceSelection::Bag { seed },
            PieceSelection::Sequence { kinds } => PieceSelection::Sequence {
                kinds: kinds.clone(),
            },
        }
    }

    fn seed(&self) -> u64 {
        match self {
            PieceSelection::Uniform { seed } | PieceSelection::Bag { seed } => *seed,
            PieceSelection::Sequence { .. } => 0,
        }
    }
}

/// Stateful piece generator
#[derive(Debug, Clone)]
pub struct PieceQueue {
    selection: PieceSelection,
    /// Kinds available from the shape table, in table order
    kinds: Vec<PieceKind>,
    /// Current bag (Bag) or the fixed list (Sequence)
    bag: Vec<PieceKind>,
    bag_index: usize,
    rng: StdRng,
}

impl PieceQueue {
    /// Config validation guarantees `kinds` is non-empty
    pub fn new(selection: PieceSelection, kinds: Vec<PieceKind>) -> Self {
        let rng = StdRng::seed_from_u64(selection.seed());
        let mut queue = Self {
            selection,
            kinds,
            bag: Vec::new(),
            bag_index: 0,
            rng,
        };
        queue.refill_bag();
        queue
    }

    fn refill_bag(&mut self) {
        self.bag_index = 0;
        match &self.selection {
            PieceSelection::Uniform { .. } => self.bag.clear(),
            PieceSelection::Bag { .. } => {
                self.bag = self.kinds.clone();
                self.bag.shuffle(&mut self.rng);
            }
            PieceSelection::Sequence { kinds } => self.bag = kinds.clone(),
        }
    }

    /// Draw the next piece kind; `None` only when there is nothing to draw from
    pub fn draw(&mut self) -> Option<PieceKind> {
        if let PieceSelection::Uniform { .. } = self.selection {
            return self.kinds.choose(&mut self.rng).copied();
        }

        if self.bag_index >= self.bag.len() {
            self.refill_bag();
        }
        let kind = self.bag.get(self.bag_index).copied()?;
        self.bag_index += 1;
        Some(kind)
    }

    /// Pick a color tag in `0..palette_size`
    pub fn draw_color(&mut self, palette_size: u8) -> u8 {
        if palette_size <= 1 {
            return 0;
        }
        self.rng.gen_range(0..palette_size)
    }

    /// Start over from the configured seed
    pub fn reset(&mut self) {
        self.rng = StdRng::seed_from_u64(self.selection.seed());
        self.refill_bag();
    }

    pub fn selection(&self) -> &PieceSelection {
        &self.selection
    }

    /// Remaining kinds in the current bag or sequence cycle
    #[cfg(test)]
    pub fn current_bag(&self) -> &[PieceKind] {
        &self.bag[self.bag_index.min(self.bag.len())..]
    }
}
