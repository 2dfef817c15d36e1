//! HalfKP feature index mapping.

use halfkp_core::{Color, Piece, PieceKind, Square};

/// Feature slots per king square: one unused slot plus 10 piece types × 64.
pub const PS_END: usize = 641;

/// Offset of each piece kind belonging to the perspective side, by
/// [`PieceKind::index`]. Kings have no feature.
const OWN_OFFSET: [usize; PieceKind::COUNT] = [0, 513, 385, 257, 129, 1];

/// Offset of each opponent piece kind.
const THEIR_OFFSET: [usize; PieceKind::COUNT] = [0, 577, 449, 321, 193, 65];

/// Square as seen from `perspective`: black views the board rotated 180°.
#[inline]
pub fn orient(perspective: Color, sq: Square) -> usize {
    match perspective {
        Color::White => sq.index(),
        Color::Black => sq.rotate().index(),
    }
}

/// Row of the feature-transformer matrix for `piece` on `sq`, seen from
/// `perspective` whose king stands on `king_sq`.
///
/// `piece` must not be a king. The result is always below `64 * PS_END`.
#[inline]
pub fn feature_index(perspective: Color, king_sq: Square, piece: Piece, sq: Square) -> usize {
    debug_assert!(!piece.is_king(), "kings are not features");
    let offset = if piece.color() == perspective {
        OWN_OFFSET[piece.kind().index()]
    } else {
        THEIR_OFFSET[piece.kind().index()]
    };
    orient(perspective, sq) + offset + PS_END * orient(perspective, king_sq)
}
