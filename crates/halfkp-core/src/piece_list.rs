//! Fixed-capacity piece lists and the position snapshot handed to the evaluator.

use std::fmt;

use crate::color::Color;
use crate::error::PieceListError;
use crate::piece::Piece;
use crate::square::Square;

/// Maximum number of pieces on a chess board.
pub const MAX_PIECES: usize = 32;

/// The pieces on a board with their squares, kings first.
///
/// Entry 0 is always the white king and entry 1 the black king; the
/// remaining entries are in no particular order. Storage is inline, so a
/// list is `Copy` and never allocates.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PieceList {
    pieces: [Piece; MAX_PIECES],
    squares: [Square; MAX_PIECES],
    len: u8,
}

impl PieceList {
    /// A list holding only the two kings.
    pub const fn new(white_king: Square, black_king: Square) -> PieceList {
        let mut pieces = [Piece::WHITE_KING; MAX_PIECES];
        let mut squares = [Square::A1; MAX_PIECES];
        pieces[1] = Piece::BLACK_KING;
        squares[0] = white_king;
        squares[1] = black_king;
        PieceList {
            pieces,
            squares,
            len: 2,
        }
    }

    /// Build a list from `(piece, square)` pairs in any order.
    ///
    /// Exactly one king per side is required.
    pub fn from_pairs<I>(pairs: I) -> Result<PieceList, PieceListError>
    where
        I: IntoIterator<Item = (Piece, Square)>,
    {
        let mut kings: [Option<Square>; 2] = [None, None];
        let mut others: Vec<(Piece, Square)> = Vec::with_capacity(MAX_PIECES);

        for (piece, sq) in pairs {
            if piece.is_king() {
                let slot = &mut kings[piece.color().index()];
                if slot.is_some() {
                    return Err(PieceListError::DuplicateKing {
                        color: piece.color(),
                    });
                }
                *slot = Some(sq);
            } else {
                others.push((piece, sq));
            }
        }

        let white_king = kings[0].ok_or(PieceListError::MissingKing {
            color: Color::White,
        })?;
        let black_king = kings[1].ok_or(PieceListError::MissingKing {
            color: Color::Black,
        })?;

        let mut list = PieceList::new(white_king, black_king);
        for (piece, sq) in others {
            list.push(piece, sq)?;
        }
        Ok(list)
    }

    /// Build a list from raw probe arrays.
    ///
    /// `pieces` is read up to the first 0 code (or its end); `squares` must
    /// have an entry for every piece read. Entries 0 and 1 must be the white
    /// and black kings.
    pub fn from_codes(pieces: &[u8], squares: &[u8]) -> Result<PieceList, PieceListError> {
        let count = pieces.iter().position(|&c| c == 0).unwrap_or(pieces.len());
        if squares.len() < count {
            return Err(PieceListError::LengthMismatch {
                pieces: count,
                squares: squares.len(),
            });
        }
        if count > MAX_PIECES {
            return Err(PieceListError::TooManyPieces { max: MAX_PIECES });
        }

        let mut list = PieceList::new(Square::A1, Square::A1);
        list.len = 0;
        for (index, (&pc, &sq)) in pieces[..count].iter().zip(squares).enumerate() {
            let piece = Piece::from_code(pc).ok_or(PieceListError::InvalidPieceCode { index, code: pc })?;
            let square =
                Square::from_index(sq).ok_or(PieceListError::InvalidSquareCode { index, code: sq })?;
            list.pieces[index] = piece;
            list.squares[index] = square;
            list.len += 1;
        }

        for color in Color::ALL {
            let idx = color.index();
            if list.len() <= idx || list.pieces[idx] != Piece::king(color) {
                return Err(PieceListError::MissingKing { color });
            }
        }
        if let Some(extra) = list.non_kings().find(|(p, _)| p.is_king()) {
            return Err(PieceListError::DuplicateKing {
                color: extra.0.color(),
            });
        }
        Ok(list)
    }

    /// Append a non-king piece.
    pub fn push(&mut self, piece: Piece, sq: Square) -> Result<(), PieceListError> {
        if piece.is_king() {
            return Err(PieceListError::DuplicateKing {
                color: piece.color(),
            });
        }
        let len = self.len();
        if len == MAX_PIECES {
            return Err(PieceListError::TooManyPieces { max: MAX_PIECES });
        }
        self.pieces[len] = piece;
        self.squares[len] = sq;
        self.len += 1;
        Ok(())
    }

    /// Number of entries, kings included.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    /// Always false for a well-formed list; kept for API symmetry with `len`.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub const fn king_square(&self, color: Color) -> Square {
        self.squares[color.index()]
    }

    /// Every `(piece, square)` entry, kings first.
    pub fn iter(&self) -> impl Iterator<Item = (Piece, Square)> + '_ {
        self.pieces[..self.len()]
            .iter()
            .copied()
            .zip(self.squares[..self.len()].iter().copied())
    }

    /// Every entry except the two kings.
    pub fn non_kings(&self) -> impl Iterator<Item = (Piece, Square)> + '_ {
        self.iter().skip(2)
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.iter().find(|&(_, s)| s == sq).map(|(p, _)| p)
    }

    fn index_of(&self, sq: Square) -> Option<usize> {
        self.squares[..self.len()].iter().position(|&s| s == sq)
    }

    /// Remove the non-king piece on `sq`. Kings cannot be removed.
    pub fn remove(&mut self, sq: Square) -> Option<Piece> {
        let idx = self.index_of(sq).filter(|&i| i >= 2)?;
        let piece = self.pieces[idx];
        let last = self.len() - 1;
        self.pieces.swap(idx, last);
        self.squares.swap(idx, last);
        self.len -= 1;
        Some(piece)
    }

    /// Move whatever stands on `from` to `to`, kings included.
    ///
    /// Does not capture: the caller removes any piece on `to` first.
    pub fn move_piece(&mut self, from: Square, to: Square) -> Option<Piece> {
        let idx = self.index_of(from)?;
        self.squares[idx] = to;
        Some(self.pieces[idx])
    }

    /// Swap the identity of the non-king piece on `sq`, e.g. for a promotion.
    pub fn replace(&mut self, sq: Square, piece: Piece) -> Option<Piece> {
        if piece.is_king() {
            return None;
        }
        let idx = self.index_of(sq).filter(|&i| i >= 2)?;
        Some(std::mem::replace(&mut self.pieces[idx], piece))
    }
}

impl fmt::Debug for PieceList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter().map(|(p, s)| (s, p))).finish()
    }
}

/// One board as the evaluator sees it: side to move plus its pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub side_to_move: Color,
    pub pieces: PieceList,
}

impl Position {
    pub const fn new(side_to_move: Color, pieces: PieceList) -> Position {
        Position {
            side_to_move,
            pieces,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MAX_PIECES, PieceList};
    use crate::color::Color;
    use crate::error::PieceListError;
    use crate::piece::Piece;
    use crate::square::Square;

    #[test]
    fn kings_occupy_first_two_slots() {
        let list = PieceList::from_pairs([
            (Piece::WHITE_PAWN, Square::E2),
            (Piece::BLACK_KING, Square::E8),
            (Piece::WHITE_KING, Square::E1),
        ])
        .unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list.king_square(Color::White), Square::E1);
        assert_eq!(list.king_square(Color::Black), Square::E8);
        assert_eq!(list.non_kings().collect::<Vec<_>>(), vec![(Piece::WHITE_PAWN, Square::E2)]);
    }

    #[test]
    fn from_pairs_requires_both_kings() {
        let err = PieceList::from_pairs([(Piece::WHITE_KING, Square::E1)]).unwrap_err();
        assert_eq!(err, PieceListError::MissingKing { color: Color::Black });

        let err = PieceList::from_pairs([
            (Piece::WHITE_KING, Square::E1),
            (Piece::BLACK_KING, Square::E8),
            (Piece::WHITE_KING, Square::A1),
        ])
        .unwrap_err();
        assert_eq!(err, PieceListError::DuplicateKing { color: Color::White });
    }

    #[test]
    fn from_codes_reads_until_terminator() {
        let pieces = [1, 7, 6, 12, 0, 3];
        let squares = [4, 60, 12, 52, 0, 0];
        let list = PieceList::from_codes(&pieces, &squares).unwrap();
        assert_eq!(list.len(), 4);
        assert_eq!(list.piece_at(Square::E7), Some(Piece::BLACK_PAWN));
        assert_eq!(list.piece_at(Square::A1), None);
    }

    #[test]
    fn from_codes_rejects_bad_input() {
        assert_eq!(
            PieceList::from_codes(&[7, 1, 0], &[60, 4]),
            Err(PieceListError::MissingKing { color: Color::White })
        );
        assert_eq!(
            PieceList::from_codes(&[1, 7, 13, 0], &[4, 60, 12]),
            Err(PieceListError::InvalidPieceCode { index: 2, code: 13 })
        );
        assert_eq!(
            PieceList::from_codes(&[1, 7, 6, 0], &[4, 60, 64]),
            Err(PieceListError::InvalidSquareCode { index: 2, code: 64 })
        );
        assert_eq!(
            PieceList::from_codes(&[1, 7, 6], &[4, 60]),
            Err(PieceListError::LengthMismatch { pieces: 3, squares: 2 })
        );
        assert_eq!(
            PieceList::from_codes(&[1, 7, 1, 0], &[4, 60, 5]),
            Err(PieceListError::DuplicateKing { color: Color::White })
        );
    }

    #[test]
    fn push_respects_capacity() {
        let mut list = PieceList::new(Square::E1, Square::E8);
        for idx in 0..(MAX_PIECES - 2) as u8 {
            list.push(Piece::WHITE_PAWN, Square::from_index(idx).unwrap()).unwrap();
        }
        assert_eq!(
            list.push(Piece::WHITE_PAWN, Square::H8),
            Err(PieceListError::TooManyPieces { max: MAX_PIECES })
        );
    }

    #[test]
    fn remove_move_replace() {
        let mut list = PieceList::new(Square::E1, Square::E8);
        list.push(Piece::WHITE_PAWN, Square::B7).unwrap();
        list.push(Piece::BLACK_ROOK, Square::A8).unwrap();

        assert_eq!(list.remove(Square::A8), Some(Piece::BLACK_ROOK));
        assert_eq!(list.move_piece(Square::B7, Square::A8), Some(Piece::WHITE_PAWN));
        assert_eq!(list.replace(Square::A8, Piece::WHITE_QUEEN), Some(Piece::WHITE_PAWN));
        assert_eq!(list.piece_at(Square::A8), Some(Piece::WHITE_QUEEN));
        assert_eq!(list.len(), 3);

        assert_eq!(list.remove(Square::E1), None, "kings stay in the list");
        assert_eq!(list.move_piece(Square::E1, Square::G1), Some(Piece::WHITE_KING));
        assert_eq!(list.king_square(Color::White), Square::G1);
    }
}
