//! Accumulators, dirty-piece records, and the per-ply chain used to update
//! an accumulator from an earlier ply instead of rebuilding it.

use halfkp_core::{Color, Piece, PieceList, PieceListError, Square};

use super::features::feature_index;
use crate::weights::{HALF_DIMS, LeI16s, WeightStore};

/// Feature-transformer output for one position, one half per perspective.
///
/// Arithmetic wraps like the 16-bit lanes it models, so a replayed delta
/// always lands on exactly the value a full refresh would produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C, align(64))]
pub struct Accumulator {
    halves: [[i16; HALF_DIMS]; Color::COUNT],
    computed: bool,
}

impl Accumulator {
    /// A zeroed accumulator that still needs computing.
    pub const fn new() -> Self {
        Self {
            halves: [[0; HALF_DIMS]; Color::COUNT],
            computed: false,
        }
    }

    #[inline]
    pub fn is_computed(&self) -> bool {
        self.computed
    }

    /// Mark stale. Callers must do this before reusing a ply slot for a new
    /// position.
    #[inline]
    pub fn invalidate(&mut self) {
        self.computed = false;
    }

    /// The half seen from `perspective`.
    #[inline]
    pub fn half(&self, perspective: Color) -> &[i16; HALF_DIMS] {
        &self.halves[perspective.index()]
    }

    /// Rebuild both halves from the biases and every non-king piece.
    pub fn refresh(&mut self, pieces: &PieceList, store: &WeightStore) {
        for perspective in Color::ALL {
            self.refresh_half(perspective, pieces, store);
        }
        self.computed = true;
    }

    fn refresh_half(&mut self, perspective: Color, pieces: &PieceList, store: &WeightStore) {
        let king = pieces.king_square(perspective);
        let half = &mut self.halves[perspective.index()];
        for (acc, b) in half.iter_mut().zip(store.ft_biases().iter()) {
            *acc = b;
        }
        for (piece, sq) in pieces.non_kings() {
            add_row(half, store.ft_row(feature_index(perspective, king, piece, sq)));
        }
    }
}

impl Default for Accumulator {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn add_row(half: &mut [i16; HALF_DIMS], row: LeI16s<'_>) {
    for (acc, w) in half.iter_mut().zip(row.iter()) {
        *acc = acc.wrapping_add(w);
    }
}

#[inline]
fn sub_row(half: &mut [i16; HALF_DIMS], row: LeI16s<'_>) {
    for (acc, w) in half.iter_mut().zip(row.iter()) {
        *acc = acc.wrapping_sub(w);
    }
}

/// One piece that changed between a ply and its parent.
///
/// `from: None` means the piece appeared (promotion), `to: None` that it
/// vanished (captured, or a pawn that promoted).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyPiece {
    pub piece: Piece,
    pub from: Option<Square>,
    pub to: Option<Square>,
}

impl DirtyPiece {
    pub const fn moved(piece: Piece, from: Square, to: Square) -> Self {
        Self {
            piece,
            from: Some(from),
            to: Some(to),
        }
    }

    pub const fn removed(piece: Piece, from: Square) -> Self {
        Self {
            piece,
            from: Some(from),
            to: None,
        }
    }

    pub const fn added(piece: Piece, to: Square) -> Self {
        Self {
            piece,
            from: None,
            to: Some(to),
        }
    }
}

/// Most pieces one move can change: mover, captured piece, and a castling
/// rook or promoted piece.
pub const MAX_DIRTY: usize = 3;

/// The dirty pieces of one ply, in a fixed-capacity list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyPieces {
    entries: [DirtyPiece; MAX_DIRTY],
    len: u8,
}

impl DirtyPieces {
    pub const fn new() -> Self {
        Self {
            entries: [DirtyPiece::removed(Piece::WHITE_PAWN, Square::A1); MAX_DIRTY],
            len: 0,
        }
    }

    /// Build a list from raw probe arrays.
    ///
    /// `pieces` is read up to the first 0 code (or its end); `from` and `to`
    /// hold a square code per piece, with [`Square::NONE_CODE`] for a piece
    /// that appeared or vanished.
    pub fn from_codes(pieces: &[u8], from: &[u8], to: &[u8]) -> Result<DirtyPieces, PieceListError> {
        let count = pieces.iter().position(|&c| c == 0).unwrap_or(pieces.len());
        let squares = from.len().min(to.len());
        if squares < count {
            return Err(PieceListError::LengthMismatch {
                pieces: count,
                squares,
            });
        }
        if count > MAX_DIRTY {
            return Err(PieceListError::TooManyPieces { max: MAX_DIRTY });
        }

        let mut list = DirtyPieces::new();
        for (index, ((&pc, &f), &t)) in pieces[..count].iter().zip(from).zip(to).enumerate() {
            let piece = Piece::from_code(pc).ok_or(PieceListError::InvalidPieceCode { index, code: pc })?;
            let from = Square::from_code(f).map_err(|code| PieceListError::InvalidSquareCode { index, code })?;
            let to = Square::from_code(t).map_err(|code| PieceListError::InvalidSquareCode { index, code })?;
            list.push(DirtyPiece { piece, from, to });
        }
        Ok(list)
    }

    /// Append an entry.
    ///
    /// # Panics
    ///
    /// Panics if the list already holds [`MAX_DIRTY`] entries.
    pub fn push(&mut self, entry: DirtyPiece) {
        if let Err(rejected) = self.try_push(entry) {
            panic!("more than {MAX_DIRTY} dirty pieces in one ply: {rejected:?}");
        }
    }

    /// Append an entry, handing it back if the list is full.
    pub fn try_push(&mut self, entry: DirtyPiece) -> Result<(), DirtyPiece> {
        let len = self.len();
        if len == MAX_DIRTY {
            return Err(entry);
        }
        self.entries[len] = entry;
        self.len += 1;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[DirtyPiece] {
        &self.entries[..self.len()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &DirtyPiece> {
        self.as_slice().iter()
    }

    /// True when `color`'s king moved, which invalidates every feature of
    /// that perspective.
    #[inline]
    pub fn moves_king(&self, color: Color) -> bool {
        self.iter().any(|d| d.piece == Piece::king(color))
    }
}

impl Default for DirtyPieces {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<DirtyPiece> for DirtyPieces {
    /// # Panics
    ///
    /// Panics on more than [`MAX_DIRTY`] entries.
    fn from_iter<I: IntoIterator<Item = DirtyPiece>>(iter: I) -> Self {
        let mut list = DirtyPieces::new();
        for entry in iter {
            list.push(entry);
        }
        list
    }
}

/// Per-ply evaluation state owned by the caller's search stack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlyState {
    pub accumulator: Accumulator,
    /// Pieces that changed going from the parent ply to this one.
    pub dirty: DirtyPieces,
}

impl PlyState {
    pub const fn new() -> Self {
        Self {
            accumulator: Accumulator::new(),
            dirty: DirtyPieces::new(),
        }
    }

    /// Prepare this slot for a new child position reached via `dirty`.
    pub fn enter(&mut self, dirty: DirtyPieces) {
        self.accumulator.invalidate();
        self.dirty = dirty;
    }
}

/// How [`PlyChain::update`] produced the current accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    /// Already computed; nothing was done.
    Cached,
    /// Patched from the ancestor `plies` back.
    Incremental { plies: usize },
    /// No usable ancestor; rebuilt from scratch.
    Refreshed,
}

/// The current ply plus up to two earlier plies, newest first.
///
/// The current ply is borrowed mutably, so one chain can only be driven by
/// one thread at a time.
#[derive(Debug)]
pub struct PlyChain<'a> {
    current: &'a mut PlyState,
    previous: [Option<&'a PlyState>; 2],
}

impl<'a> PlyChain<'a> {
    /// A chain with no history; evaluation always refreshes.
    pub fn new(current: &'a mut PlyState) -> Self {
        Self {
            current,
            previous: [None, None],
        }
    }

    /// A chain over `current`, its parent, and its grandparent.
    pub fn with_history(
        current: &'a mut PlyState,
        parent: Option<&'a PlyState>,
        grandparent: Option<&'a PlyState>,
    ) -> Self {
        Self {
            current,
            previous: [parent, grandparent],
        }
    }

    /// Borrow `stack[ply]` as current with the two slots below it as history.
    ///
    /// # Panics
    ///
    /// Panics if `ply >= stack.len()`.
    pub fn from_stack(stack: &'a mut [PlyState], ply: usize) -> Self {
        let (older, rest) = stack.split_at_mut(ply);
        let parent = older.last();
        let grandparent = ply.checked_sub(2).map(|i| &older[i]);
        Self::with_history(&mut rest[0], parent, grandparent)
    }

    pub fn current(&self) -> &PlyState {
        self.current
    }

    /// Bring the current accumulator up to date for `pieces`.
    ///
    /// Uses the nearest computed ancestor when one is reachable through
    /// consecutive plies, replaying the dirty lists in between; a perspective
    /// whose king moved in that span is rebuilt instead.
    pub fn update(&mut self, pieces: &PieceList, store: &WeightStore) -> UpdateKind {
        if self.current.accumulator.computed {
            return UpdateKind::Cached;
        }

        let (base, skipped): (&PlyState, Option<&DirtyPieces>) = match self.previous {
            [Some(parent), _] if parent.accumulator.computed => (parent, None),
            [Some(parent), Some(grand)] if grand.accumulator.computed => (grand, Some(&parent.dirty)),
            _ => {
                self.current.accumulator.refresh(pieces, store);
                return UpdateKind::Refreshed;
            }
        };

        let current = &mut *self.current;
        let acc = &mut current.accumulator;
        let dirty = &current.dirty;
        let plies = if skipped.is_some() { 2 } else { 1 };

        for perspective in Color::ALL {
            let reset = dirty.moves_king(perspective) || skipped.is_some_and(|d| d.moves_king(perspective));
            if reset {
                acc.refresh_half(perspective, pieces, store);
                continue;
            }

            let king = pieces.king_square(perspective);
            let half = &mut acc.halves[perspective.index()];
            *half = *base.accumulator.half(perspective);

            // Oldest ply first.
            for entry in skipped.into_iter().flat_map(|d| d.iter()).chain(dirty.iter()) {
                if entry.piece.is_king() {
                    continue;
                }
                if let Some(from) = entry.from {
                    sub_row(half, store.ft_row(feature_index(perspective, king, entry.piece, from)));
                }
                if let Some(to) = entry.to {
                    add_row(half, store.ft_row(feature_index(perspective, king, entry.piece, to)));
                }
            }
        }

        acc.computed = true;
        UpdateKind::Incremental { plies }
    }

    /// The current ply's accumulator.
    pub fn accumulator(&self) -> &Accumulator {
        &self.current.accumulator
    }
}
