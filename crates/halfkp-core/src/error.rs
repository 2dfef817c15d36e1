//! Error types for FEN decoding and piece-list construction.

use crate::color::Color;

/// Errors from [`decode_fen`](crate::decode_fen).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FenError {
    /// The string has no piece-placement field at all.
    #[error("empty FEN string")]
    Empty,
    /// The piece placement section does not have exactly 8 ranks.
    #[error("expected 8 ranks in piece placement, found {found}")]
    WrongRankCount {
        /// Number of ranks found.
        found: usize,
    },
    /// A rank describes more or fewer than 8 squares.
    #[error("rank {rank_index} describes {length} squares, expected 8")]
    BadRankLength {
        /// Zero-based rank index as written (0 = rank 8).
        rank_index: usize,
        /// Number of squares described.
        length: usize,
    },
    /// An unrecognized character appeared in the piece placement.
    #[error("invalid piece character: '{character}'")]
    InvalidPieceChar {
        /// The invalid character.
        character: char,
    },
    /// The active color field is not "w" or "b".
    #[error("invalid active color: \"{found}\"")]
    InvalidColor {
        /// The invalid color string.
        found: String,
    },
    /// A move counter is not a valid number.
    #[error("invalid {field}: \"{found}\"")]
    InvalidMoveCounter {
        /// "halfmove clock" or "fullmove number".
        field: &'static str,
        /// The invalid string.
        found: String,
    },
    /// The placement cannot be turned into a kings-first piece list.
    #[error("invalid piece placement: {source}")]
    InvalidPlacement {
        /// The underlying piece-list error.
        #[from]
        source: PieceListError,
    },
}

/// Errors from building a [`PieceList`](crate::PieceList).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PieceListError {
    /// A side has no king.
    #[error("no {color:?} king")]
    MissingKing {
        /// Side without a king.
        color: Color,
    },
    /// A side has more than one king.
    #[error("more than one {color:?} king")]
    DuplicateKing {
        /// Side with the extra king.
        color: Color,
    },
    /// More than [`MAX_PIECES`](crate::MAX_PIECES) pieces.
    #[error("more than {max} pieces")]
    TooManyPieces {
        /// The capacity that was exceeded.
        max: usize,
    },
    /// A raw piece code outside 1..=12.
    #[error("invalid piece code {code} at index {index}")]
    InvalidPieceCode {
        /// Position in the raw array.
        index: usize,
        /// The offending code.
        code: u8,
    },
    /// A raw square code outside 0..=63, or 0..=64 where a square may be absent.
    #[error("invalid square code {code} at index {index}")]
    InvalidSquareCode {
        /// Position in the raw array.
        index: usize,
        /// The offending code.
        code: u8,
    },
    /// The raw square array is shorter than the piece array.
    #[error("piece array has {pieces} entries but square array only {squares}")]
    LengthMismatch {
        /// Pieces before the terminator.
        pieces: usize,
        /// Squares supplied.
        squares: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::{FenError, PieceListError};
    use crate::color::Color;

    #[test]
    fn fen_error_display() {
        let err = FenError::WrongRankCount { found: 7 };
        assert_eq!(format!("{err}"), "expected 8 ranks in piece placement, found 7");
    }

    #[test]
    fn piece_list_error_display() {
        let err = PieceListError::MissingKing { color: Color::Black };
        assert_eq!(format!("{err}"), "no Black king");
    }

    #[test]
    fn fen_error_from_piece_list_error() {
        let err: FenError = PieceListError::TooManyPieces { max: 32 }.into();
        assert!(matches!(err, FenError::InvalidPlacement { .. }));
    }
}
