//! Shared fixtures: deterministic synthetic weight files and a few helpers
//! for walking positions forward.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use halfkp_core::{Position, decode_fen};
use halfkp_eval::weights::{
    ARCH_LEN, FILE_HASH, FT_INPUTS, HALF_DIMS, HIDDEN, L1_INPUTS, LAYERS_HASH, NET_FILE_SIZE,
    TRANSFORMER_HASH, VERSION,
};
use halfkp_eval::{Evaluator, WeightStore};

pub const ARCH_TEXT: &[u8] = b"Features=HalfKP(Friend)[41024->256x2],Network=AffineTransform[1<-32](ClippedReLU[32](AffineTransform[32<-32](ClippedReLU[32](AffineTransform[32<-512](InputSlice[512(0:512)])))))";

const FT_BIASES: usize = 12 + ARCH_LEN as usize + 4;
const FT_WEIGHTS: usize = FT_BIASES + 2 * HALF_DIMS;
const LAYERS: usize = FT_WEIGHTS + 2 * HALF_DIMS * FT_INPUTS;

fn put_u32(bytes: &mut [u8], at: usize, v: u32) {
    bytes[at..at + 4].copy_from_slice(&v.to_le_bytes());
}

fn put_i32s(bytes: &mut [u8], at: usize, rng: &mut StdRng, n: usize, lo: i32, hi: i32) -> usize {
    for i in 0..n {
        put_u32(bytes, at + 4 * i, rng.gen_range(lo..hi) as u32);
    }
    at + 4 * n
}

fn put_i8s(bytes: &mut [u8], at: usize, rng: &mut StdRng, n: usize, lo: i8, hi: i8) -> usize {
    for b in &mut bytes[at..at + n] {
        *b = rng.gen_range(lo..hi) as u8;
    }
    at + n
}

/// A valid weight file with pseudo-random small weights.
pub fn random_net(seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut bytes = vec![0u8; NET_FILE_SIZE];

    put_u32(&mut bytes, 0, VERSION);
    put_u32(&mut bytes, 4, FILE_HASH);
    put_u32(&mut bytes, 8, ARCH_LEN);
    let arch_len = ARCH_TEXT.len().min(ARCH_LEN as usize);
    bytes[12..12 + arch_len].copy_from_slice(&ARCH_TEXT[..arch_len]);
    put_u32(&mut bytes, FT_BIASES - 4, TRANSFORMER_HASH);

    for i in 0..HALF_DIMS {
        let v: i16 = rng.gen_range(-40..40);
        bytes[FT_BIASES + 2 * i..FT_BIASES + 2 * i + 2].copy_from_slice(&v.to_le_bytes());
    }

    // Transformer weights in -32..32: random low bytes, sign-extended.
    let table = &mut bytes[FT_WEIGHTS..LAYERS];
    rng.fill_bytes(table);
    for pair in table.chunks_exact_mut(2) {
        let v = i16::from((pair[0] as i8) >> 2);
        pair.copy_from_slice(&v.to_le_bytes());
    }

    put_u32(&mut bytes, LAYERS, LAYERS_HASH);
    let at = put_i32s(&mut bytes, LAYERS + 4, &mut rng, HIDDEN, -3000, 3000);
    let at = put_i8s(&mut bytes, at, &mut rng, HIDDEN * L1_INPUTS, -40, 40);
    let at = put_i32s(&mut bytes, at, &mut rng, HIDDEN, -500, 500);
    let at = put_i8s(&mut bytes, at, &mut rng, HIDDEN * HIDDEN, -60, 60);
    let at = put_i32s(&mut bytes, at, &mut rng, 1, -200, 200);
    let at = put_i8s(&mut bytes, at, &mut rng, HIDDEN, -100, 100);
    assert_eq!(at, NET_FILE_SIZE);

    bytes
}

/// A random net whose transformer is symmetric under mirroring both the
/// king and the piece across the d/e file boundary.
pub fn mirrored_net(seed: u64) -> Vec<u8> {
    const PS_END: usize = 641;
    let mut bytes = random_net(seed);
    let row_bytes = 2 * HALF_DIMS;
    for king in 0..64usize {
        if king % 8 < 4 {
            continue;
        }
        for block in 0..10usize {
            let base = 1 + 64 * block;
            for sq in 0..64usize {
                let dst = king * PS_END + base + sq;
                let src = (king ^ 7) * PS_END + base + (sq ^ 7);
                let src_at = FT_WEIGHTS + src * row_bytes;
                let dst_at = FT_WEIGHTS + dst * row_bytes;
                bytes.copy_within(src_at..src_at + row_bytes, dst_at);
            }
        }
    }
    bytes
}

/// The random net shared by every test in a binary.
pub fn shared_store() -> Arc<WeightStore> {
    static STORE: OnceLock<Arc<WeightStore>> = OnceLock::new();
    STORE
        .get_or_init(|| Arc::new(WeightStore::from_bytes(random_net(0x5EED)).unwrap()))
        .clone()
}

pub fn evaluator() -> Evaluator {
    Evaluator::new(shared_store())
}

pub fn position(fen: &str) -> Position {
    decode_fen(fen).unwrap().position
}

/// A file under the system temp dir, removed on drop.
pub struct TempNet {
    path: PathBuf,
}

impl TempNet {
    pub fn write(name: &str, bytes: &[u8]) -> TempNet {
        let path = std::env::temp_dir().join(format!("halfkp-{}-{name}.bin", std::process::id()));
        std::fs::write(&path, bytes).unwrap();
        TempNet { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempNet {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}
