//! Colored pieces using the probe's integer piece codes.

use std::fmt;

use crate::color::Color;
use crate::piece_kind::PieceKind;

/// A colored piece, stored as its probe code.
///
/// Codes:
/// - white: king 1, queen 2, rook 3, bishop 4, knight 5, pawn 6
/// - black: king 7, queen 8, rook 9, bishop 10, knight 11, pawn 12
///
/// Code 0 is reserved as the end-of-list marker in raw piece arrays and is
/// never a valid `Piece`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece(u8);

impl Piece {
    /// Number of distinct pieces.
    pub const COUNT: usize = 12;

    pub const WHITE_KING: Piece = Piece::new(PieceKind::King, Color::White);
    pub const WHITE_QUEEN: Piece = Piece::new(PieceKind::Queen, Color::White);
    pub const WHITE_ROOK: Piece = Piece::new(PieceKind::Rook, Color::White);
    pub const WHITE_BISHOP: Piece = Piece::new(PieceKind::Bishop, Color::White);
    pub const WHITE_KNIGHT: Piece = Piece::new(PieceKind::Knight, Color::White);
    pub const WHITE_PAWN: Piece = Piece::new(PieceKind::Pawn, Color::White);
    pub const BLACK_KING: Piece = Piece::new(PieceKind::King, Color::Black);
    pub const BLACK_QUEEN: Piece = Piece::new(PieceKind::Queen, Color::Black);
    pub const BLACK_ROOK: Piece = Piece::new(PieceKind::Rook, Color::Black);
    pub const BLACK_BISHOP: Piece = Piece::new(PieceKind::Bishop, Color::Black);
    pub const BLACK_KNIGHT: Piece = Piece::new(PieceKind::Knight, Color::Black);
    pub const BLACK_PAWN: Piece = Piece::new(PieceKind::Pawn, Color::Black);

    /// All 12 pieces in code order (1..=12).
    pub const ALL: [Piece; 12] = [
        Self::WHITE_KING,
        Self::WHITE_QUEEN,
        Self::WHITE_ROOK,
        Self::WHITE_BISHOP,
        Self::WHITE_KNIGHT,
        Self::WHITE_PAWN,
        Self::BLACK_KING,
        Self::BLACK_QUEEN,
        Self::BLACK_ROOK,
        Self::BLACK_BISHOP,
        Self::BLACK_KNIGHT,
        Self::BLACK_PAWN,
    ];

    #[inline]
    pub const fn new(kind: PieceKind, color: Color) -> Piece {
        Piece(1 + color as u8 * 6 + kind as u8)
    }

    /// The king of `color`.
    #[inline]
    pub const fn king(color: Color) -> Piece {
        Piece::new(PieceKind::King, color)
    }

    /// Validate a raw probe code. Returns `None` for 0 and anything above 12.
    #[inline]
    pub const fn from_code(code: u8) -> Option<Piece> {
        if code >= 1 && code <= 12 {
            Some(Piece(code))
        } else {
            None
        }
    }

    /// Parse a FEN letter: uppercase is white, lowercase black.
    pub fn from_fen_char(c: char) -> Option<Piece> {
        let kind = PieceKind::from_fen_char(c)?;
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Piece::new(kind, color))
    }

    /// The probe code (1..=12).
    #[inline]
    pub const fn code(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn color(self) -> Color {
        if self.0 <= 6 { Color::White } else { Color::Black }
    }

    #[inline]
    pub const fn kind(self) -> PieceKind {
        match (self.0 - 1) % 6 {
            0 => PieceKind::King,
            1 => PieceKind::Queen,
            2 => PieceKind::Rook,
            3 => PieceKind::Bishop,
            4 => PieceKind::Knight,
            _ => PieceKind::Pawn,
        }
    }

    #[inline]
    pub const fn is_king(self) -> bool {
        self.0 == 1 || self.0 == 7
    }

    pub fn fen_char(self) -> char {
        let c = self.kind().fen_char();
        match self.color() {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fen_char())
    }
}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = match self.color() {
            Color::White => 'W',
            Color::Black => 'B',
        };
        write!(f, "{}{}", side, self.kind().fen_char().to_ascii_uppercase())
    }
}
