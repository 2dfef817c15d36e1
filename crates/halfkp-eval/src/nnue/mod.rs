//! HalfKP evaluation: `(41024 -> 256) x 2 -> 32 -> 32 -> 1`.
//!
//! The [`Evaluator`] pairs a shared [`WeightStore`] with the three ways of
//! scoring a position: from a FEN string, from a piece list, and from a
//! piece list plus the caller's ply history.

mod accumulator;
mod features;
mod network;

use std::path::Path;
use std::sync::Arc;

use halfkp_core::{Color, FenError, PieceList, PieceListError, Position, decode_fen};

pub use self::accumulator::{
    Accumulator, DirtyPiece, DirtyPieces, MAX_DIRTY, PlyChain, PlyState, UpdateKind,
};
pub use self::features::{PS_END, feature_index, orient};
pub use self::network::propagate;

use crate::error::LoadError;
use crate::weights::WeightStore;

/// Scores positions with one loaded network.
///
/// Cloning is cheap and every clone shares the same weights, so each search
/// thread can hold its own.
#[derive(Debug, Clone)]
pub struct Evaluator {
    store: Arc<WeightStore>,
}

impl Evaluator {
    pub fn new(store: Arc<WeightStore>) -> Self {
        Self { store }
    }

    /// Load a weight file and wrap it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        Ok(Self::new(Arc::new(WeightStore::load(path)?)))
    }

    pub fn store(&self) -> &Arc<WeightStore> {
        &self.store
    }

    /// Decode `fen` and score it from scratch.
    pub fn evaluate_fen(&self, fen: &str) -> Result<i32, FenError> {
        let decoded = decode_fen(fen)?;
        Ok(self.evaluate(&decoded.position))
    }

    /// Score `pos` from scratch, relative to the side to move.
    pub fn evaluate(&self, pos: &Position) -> i32 {
        let mut acc = Accumulator::new();
        acc.refresh(&pos.pieces, &self.store);
        propagate(&acc, pos.side_to_move, &self.store)
    }

    /// Score from raw probe arrays: piece codes 1..=12 terminated by 0,
    /// squares 0..=63, kings in the first two slots.
    pub fn evaluate_codes(&self, side_to_move: Color, pieces: &[u8], squares: &[u8]) -> Result<i32, PieceListError> {
        let pieces = PieceList::from_codes(pieces, squares)?;
        Ok(self.evaluate(&Position::new(side_to_move, pieces)))
    }

    /// Score `pos`, reusing an earlier ply's accumulator when the chain
    /// allows it. The result is written into the chain's current ply.
    ///
    /// The chain's dirty lists must describe every change between the
    /// reused ply and `pos`; this is not checked.
    pub fn evaluate_incremental(&self, pos: &Position, mut chain: PlyChain<'_>) -> i32 {
        chain.update(&pos.pieces, &self.store);
        propagate(chain.accumulator(), pos.side_to_move, &self.store)
    }
}
