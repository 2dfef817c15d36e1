//! FEN decoding into the kings-first piece lists the evaluator consumes.

use tracing::debug;

use crate::color::Color;
use crate::error::FenError;
use crate::piece::Piece;
use crate::piece_list::{PieceList, Position};
use crate::square::Square;

/// The FEN string for the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Everything a FEN string carries that the evaluator's callers may want.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFen {
    pub position: Position,
    /// Castling field as written ("-" when absent).
    pub castling: String,
    pub halfmove_clock: u16,
    pub fullmove_number: u16,
}

/// Decode a FEN string.
///
/// Only the placement field is mandatory; a missing side to move defaults
/// to white, missing castling to "-", and missing counters to 0 and 1. The
/// en passant field is skipped since it has no bearing on evaluation.
pub fn decode_fen(fen: &str) -> Result<DecodedFen, FenError> {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    let placement = fields.first().ok_or(FenError::Empty)?;

    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::WrongRankCount { found: ranks.len() });
    }

    let mut pairs: Vec<(Piece, Square)> = Vec::with_capacity(32);
    for (rank_index, rank_str) in ranks.iter().enumerate() {
        // FEN lists rank 8 first.
        let rank = 7 - rank_index as u8;
        let mut file: u8 = 0;

        for c in rank_str.chars() {
            if let Some(digit) = c.to_digit(10) {
                if !(1..=8).contains(&digit) {
                    return Err(FenError::InvalidPieceChar { character: c });
                }
                file += digit as u8;
                if file > 8 {
                    return Err(FenError::BadRankLength {
                        rank_index,
                        length: file as usize,
                    });
                }
            } else {
                let piece = Piece::from_fen_char(c).ok_or(FenError::InvalidPieceChar { character: c })?;
                let sq = Square::from_coords(file, rank).ok_or(FenError::BadRankLength {
                    rank_index,
                    length: file as usize + 1,
                })?;
                pairs.push((piece, sq));
                file += 1;
            }
        }

        if file != 8 {
            return Err(FenError::BadRankLength {
                rank_index,
                length: file as usize,
            });
        }
    }

    if fields.len() < 6 {
        debug!(fields = fields.len(), "FEN has missing trailing fields, using defaults");
    }

    let side_to_move = match fields.get(1) {
        Some(s) => Color::from_fen(s).ok_or_else(|| FenError::InvalidColor {
            found: s.to_string(),
        })?,
        None => Color::White,
    };

    let castling = fields.get(2).copied().unwrap_or("-").to_string();
    let halfmove_clock = parse_counter(fields.get(4), "halfmove clock", 0)?;
    let fullmove_number = parse_counter(fields.get(5), "fullmove number", 1)?;

    let pieces = PieceList::from_pairs(pairs)?;

    Ok(DecodedFen {
        position: Position::new(side_to_move, pieces),
        castling,
        halfmove_clock,
        fullmove_number,
    })
}

fn parse_counter(field: Option<&&str>, name: &'static str, default: u16) -> Result<u16, FenError> {
    match field {
        Some(s) => s.parse::<u16>().map_err(|_| FenError::InvalidMoveCounter {
            field: name,
            found: s.to_string(),
        }),
        None => Ok(default),
    }
}
