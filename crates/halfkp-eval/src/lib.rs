//! Incremental HalfKP network evaluation over a memory-mapped weight file.
//!
//! Load a [`WeightStore`] once, wrap it in an [`Evaluator`], then score
//! positions either from scratch or by patching the accumulator of an
//! earlier ply. The [`probe`] module offers the same operations over a
//! process-wide store for callers that prefer free functions.

pub mod decode;
pub mod error;
pub mod mapper;
pub mod nnue;
pub mod play;
pub mod probe;
pub mod weights;

pub use error::{FileError, LoadError, MapError, MapperError};
pub use nnue::{
    Accumulator, DirtyPiece, DirtyPieces, Evaluator, PlyChain, PlyState, UpdateKind, feature_index,
};
pub use play::{SimpleMove, play};
pub use weights::WeightStore;
