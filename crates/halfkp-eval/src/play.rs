//! Applying a move to a [`Position`] and recording its dirty pieces.
//!
//! This is not move generation: the move is trusted, and only the piece
//! list bookkeeping an evaluator needs is done. Captures, en passant,
//! castling (king moving two files) and promotions are recognised from the
//! squares involved.

use halfkp_core::{Piece, PieceKind, Position, Square};

use crate::nnue::{DirtyPiece, DirtyPieces};

/// A move given by its squares, as in UCI notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimpleMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

impl SimpleMove {
    pub const fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    /// Parse UCI long algebraic notation: "e2e4", "e7e8q".
    pub fn parse_uci(s: &str) -> Option<Self> {
        let from = Square::from_algebraic(s.get(0..2)?)?;
        let to = Square::from_algebraic(s.get(2..4)?)?;
        let promotion = match s.get(4..) {
            None | Some("") => None,
            Some(p) if p.len() == 1 => {
                let kind = PieceKind::from_fen_char(p.chars().next()?)?;
                if matches!(kind, PieceKind::King | PieceKind::Pawn) {
                    return None;
                }
                Some(kind)
            }
            Some(_) => return None,
        };
        Some(Self { from, to, promotion })
    }
}

/// Play `mv` on `pos`, flip the side to move, and return what changed.
///
/// Returns `None`, leaving `pos` untouched, when no piece stands on the
/// origin square.
pub fn play(pos: &mut Position, mv: SimpleMove) -> Option<DirtyPieces> {
    let list = &mut pos.pieces;
    let mover = list.piece_at(mv.from)?;
    let mut dirty = DirtyPieces::new();

    let captured = match list.piece_at(mv.to) {
        Some(victim) => Some((victim, mv.to)),
        None if mover.kind() == PieceKind::Pawn && mv.from.file() != mv.to.file() => {
            let ep_sq = Square::from_coords(mv.to.file(), mv.from.rank())?;
            list.piece_at(ep_sq).map(|victim| (victim, ep_sq))
        }
        None => None,
    };

    let promoted = mv
        .promotion
        .filter(|_| mover.kind() == PieceKind::Pawn)
        .map(|kind| Piece::new(kind, mover.color()));

    match promoted {
        Some(_) => dirty.push(DirtyPiece::removed(mover, mv.from)),
        None => dirty.push(DirtyPiece::moved(mover, mv.from, mv.to)),
    }

    if let Some((victim, sq)) = captured {
        list.remove(sq);
        dirty.push(DirtyPiece::removed(victim, sq));
    }

    list.move_piece(mv.from, mv.to);

    if let Some(piece) = promoted {
        list.replace(mv.to, piece);
        dirty.push(DirtyPiece::added(piece, mv.to));
    }

    if mover.kind() == PieceKind::King && mv.from.file().abs_diff(mv.to.file()) == 2 {
        let rank = mv.from.rank();
        let (rook_from, rook_to) = if mv.to.file() > mv.from.file() {
            (Square::from_coords(7, rank)?, Square::from_coords(5, rank)?)
        } else {
            (Square::from_coords(0, rank)?, Square::from_coords(3, rank)?)
        };
        if let Some(rook) = list.move_piece(rook_from, rook_to) {
            dirty.push(DirtyPiece::moved(rook, rook_from, rook_to));
        }
    }

    pos.side_to_move = !pos.side_to_move;
    Some(dirty)
}
