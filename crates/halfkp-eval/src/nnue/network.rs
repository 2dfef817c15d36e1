//! Forward pass from a computed accumulator to a centipawn score.
//!
//! Layers: clipped accumulator (2 × 256) -> 32 -> 32 -> 1, all integer.

use halfkp_core::Color;

use super::accumulator::Accumulator;
use crate::weights::{HALF_DIMS, HIDDEN, L1_INPUTS, WeightStore};

/// Right shift applied to hidden-layer sums before clipping.
const SHIFT: u32 = 6;

/// Divisor from raw network output to centipawns.
const FV_SCALE: i32 = 16;

/// Upper bound of the clipped ReLU.
const CLIP_MAX: i32 = 127;

/// Score `acc` from `side_to_move`'s point of view.
///
/// The side to move's half goes first in the layer-1 input.
pub fn propagate(acc: &Accumulator, side_to_move: Color, store: &WeightStore) -> i32 {
    debug_assert!(acc.is_computed(), "propagating a stale accumulator");

    let mut input = [0u8; L1_INPUTS];
    for (chunk, perspective) in input
        .chunks_exact_mut(HALF_DIMS)
        .zip([side_to_move, !side_to_move])
    {
        for (out, &v) in chunk.iter_mut().zip(acc.half(perspective)) {
            *out = i32::from(v).clamp(0, CLIP_MAX) as u8;
        }
    }

    let mut hidden1 = [0u8; HIDDEN];
    affine_clipped(&input, store.hidden1_weights(), store.hidden1_biases(), &mut hidden1);

    let mut hidden2 = [0u8; HIDDEN];
    affine_clipped(&hidden1, store.hidden2_weights(), store.hidden2_biases(), &mut hidden2);

    let output = store.output_bias().wrapping_add(dot(store.output_weights(), &hidden2));
    output / FV_SCALE
}

/// `out[o] = clip((bias[o] + weights[o] · input) >> SHIFT)` for each output.
///
/// Sums wrap at 32 bits like the integer lanes they model.
fn affine_clipped(input: &[u8], weights: &[i8], biases: &[i32; HIDDEN], out: &mut [u8; HIDDEN]) {
    debug_assert_eq!(weights.len(), HIDDEN * input.len());
    for ((o, row), &bias) in out.iter_mut().zip(weights.chunks_exact(input.len())).zip(biases) {
        let sum = bias.wrapping_add(dot(row, input));
        *o = (sum >> SHIFT).clamp(0, CLIP_MAX) as u8;
    }
}

#[inline]
fn dot(weights: &[i8], input: &[u8]) -> i32 {
    weights
        .iter()
        .zip(input)
        .fold(0i32, |acc, (&w, &x)| acc.wrapping_add(i32::from(w) * i32::from(x)))
}
