//! Process-wide evaluation over a single loaded network.
//!
//! [`init`] loads a weight file into a global slot; the free functions then
//! evaluate against it. Loading happens before the slot is touched, so a
//! failed reload leaves the previous network in place. Replacing a network
//! while other threads are evaluating is memory safe (they finish on the
//! old weights, which are unmapped once the last user lets go) but callers
//! should still quiesce their search threads first.

use std::path::Path;

use parking_lot::RwLock;
use tracing::{debug, warn};

use halfkp_core::{FenError, Position};

use crate::error::LoadError;
use crate::nnue::{Evaluator, PlyChain};

static GLOBAL: RwLock<Option<Evaluator>> = RwLock::new(None);

/// Load `path` and make it the process-wide network.
pub fn init(path: impl AsRef<Path>) -> Result<(), LoadError> {
    let evaluator = Evaluator::load(path.as_ref())?;
    let previous = GLOBAL.write().replace(evaluator);
    if let Some(previous) = previous {
        warn!(
            old = ?previous.store().source(),
            new = %path.as_ref().display(),
            "replacing loaded weight file"
        );
    }
    Ok(())
}

/// Drop the process-wide network. Returns whether one was loaded.
pub fn release() -> bool {
    let previous = GLOBAL.write().take();
    if previous.is_some() {
        debug!("released process-wide weights");
    }
    previous.is_some()
}

pub fn is_initialized() -> bool {
    GLOBAL.read().is_some()
}

/// A handle to the current network, for callers that want to skip the
/// global lock on their hot path.
pub fn evaluator() -> Option<Evaluator> {
    GLOBAL.read().clone()
}

fn with_global<R>(f: impl FnOnce(&Evaluator) -> R) -> R {
    let guard = GLOBAL.read();
    match guard.as_ref() {
        Some(evaluator) => f(evaluator),
        None => panic!("halfkp_eval::probe::init must succeed before evaluating"),
    }
}

/// See [`Evaluator::evaluate_fen`].
///
/// # Panics
///
/// Panics if no network is loaded.
pub fn evaluate_fen(fen: &str) -> Result<i32, FenError> {
    with_global(|e| e.evaluate_fen(fen))
}

/// See [`Evaluator::evaluate`].
///
/// # Panics
///
/// Panics if no network is loaded.
pub fn evaluate(pos: &Position) -> i32 {
    with_global(|e| e.evaluate(pos))
}

/// See [`Evaluator::evaluate_incremental`].
///
/// # Panics
///
/// Panics if no network is loaded.
pub fn evaluate_incremental(pos: &Position, chain: PlyChain<'_>) -> i32 {
    with_global(|e| e.evaluate_incremental(pos, chain))
}
