//! Board-level types consumed by the evaluator: colors, probe piece codes,
//! squares, fixed-capacity piece lists, and a FEN decoder.

mod color;
mod error;
mod fen;
mod piece;
mod piece_kind;
mod piece_list;
mod square;

pub use color::Color;
pub use error::{FenError, PieceListError};
pub use fen::{DecodedFen, STARTING_FEN, decode_fen};
pub use piece::Piece;
pub use piece_kind::PieceKind;
pub use piece_list::{MAX_PIECES, PieceList, Position};
pub use square::Square;
