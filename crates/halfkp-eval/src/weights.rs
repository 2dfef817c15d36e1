//! The weight store: a validated weight file plus typed views into it.
//!
//! File layout (all little-endian):
//!
//! | Section | Contents |
//! |---------|----------|
//! | header | version, file hash, architecture length, architecture text |
//! | transformer | hash, 256 × i16 biases, 41024 × 256 × i16 weights |
//! | layers | hash, then for each of hidden1 (32×512), hidden2 (32×32), output (1×32): i32 biases followed by i8 weights, row-major `[out][in]` |
//!
//! The large tables are never copied: views decode straight from the mapped
//! bytes. Only the handful of i32 layer biases are decoded into arrays.

use std::borrow::Cow;
use std::fmt;
use std::ops::Range;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::decode::Reader;
use crate::error::LoadError;
use crate::mapper::{Mapping, NetFile};

/// Accumulator width per perspective.
pub const HALF_DIMS: usize = 256;

/// Rows in the feature-transformer weight matrix (64 king squares × 641).
pub const FT_INPUTS: usize = 64 * 641;

/// Width of both hidden layers.
pub const HIDDEN: usize = 32;

/// Inputs to the first hidden layer: both accumulator halves.
pub const L1_INPUTS: usize = 2 * HALF_DIMS;

/// First header word of a supported file.
pub const VERSION: u32 = 0x7AF3_2F16;
/// Whole-network hash stored after the version.
pub const FILE_HASH: u32 = 0x3E5A_A6EE;
/// Length of the architecture description.
pub const ARCH_LEN: u32 = 177;
/// Hash preceding the feature transformer.
pub const TRANSFORMER_HASH: u32 = 0x5D69_D7B8;
/// Hash preceding the dense layers.
pub const LAYERS_HASH: u32 = 0x6333_7156;

/// Exact size of a supported weight file.
pub const NET_FILE_SIZE: usize = 3 * 4
    + ARCH_LEN as usize
    + 4
    + 2 * HALF_DIMS
    + 2 * HALF_DIMS * FT_INPUTS
    + 4
    + 4 * HIDDEN
    + HIDDEN * L1_INPUTS
    + 4 * HIDDEN
    + HIDDEN * HIDDEN
    + 4
    + HIDDEN;

/// A run of little-endian `i16` values borrowed from the weight bytes.
///
/// The transformer tables start at an odd file offset, so they cannot be
/// reinterpreted as `&[i16]`; this view decodes each element on access.
#[derive(Clone, Copy)]
pub struct LeI16s<'a> {
    bytes: &'a [u8],
}

impl<'a> LeI16s<'a> {
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len() / 2
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> i16 {
        let i = 2 * index;
        i16::from_le_bytes([self.bytes[i], self.bytes[i + 1]])
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = i16> + 'a {
        self.bytes
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
    }
}

impl fmt::Debug for LeI16s<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Where the weight bytes live.
enum Backing {
    Mapped(Mapping),
    Owned(Vec<u8>),
}

impl Backing {
    #[inline]
    fn bytes(&self) -> &[u8] {
        match self {
            Backing::Mapped(m) => m.as_bytes(),
            Backing::Owned(v) => v,
        }
    }
}

/// Byte ranges of every table, fixed once the header checks pass.
#[derive(Debug, Clone)]
struct Layout {
    architecture: Range<usize>,
    ft_biases: Range<usize>,
    ft_weights: Range<usize>,
    hidden1_weights: Range<usize>,
    hidden2_weights: Range<usize>,
    output_weights: Range<usize>,
}

/// A loaded, validated network. Immutable and shareable across threads.
pub struct WeightStore {
    backing: Backing,
    source: Option<PathBuf>,
    layout: Layout,
    hidden1_biases: [i32; HIDDEN],
    hidden2_biases: [i32; HIDDEN],
    output_bias: i32,
}

impl WeightStore {
    /// Open, size-check, map, and validate a weight file.
    ///
    /// The size is checked before mapping, and any mapping made is released
    /// before an error is returned.
    pub fn load(path: impl AsRef<Path>) -> Result<WeightStore, LoadError> {
        let path = path.as_ref();
        let file = NetFile::open(path)?;

        let found = file.size();
        if found != NET_FILE_SIZE as u64 {
            return Err(LoadError::SizeMismatch {
                expected: NET_FILE_SIZE as u64,
                found,
            });
        }

        let mapping = file.map()?;
        drop(file);

        let mut store = Self::parse(Backing::Mapped(mapping))?;
        store.source = Some(path.to_path_buf());
        info!(
            path = %path.display(),
            bytes = NET_FILE_SIZE,
            architecture = %store.architecture(),
            "loaded weight file"
        );
        Ok(store)
    }

    /// Validate weights already held in memory.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<WeightStore, LoadError> {
        if bytes.len() != NET_FILE_SIZE {
            return Err(LoadError::SizeMismatch {
                expected: NET_FILE_SIZE as u64,
                found: bytes.len() as u64,
            });
        }
        Self::parse(Backing::Owned(bytes))
    }

    fn parse(backing: Backing) -> Result<WeightStore, LoadError> {
        let mut hidden1_biases = [0i32; HIDDEN];
        let mut hidden2_biases = [0i32; HIDDEN];

        let (layout, output_bias) = {
            let mut r = Reader::new(backing.bytes());

            expect(r.u32(), VERSION, "version")?;
            expect(r.u32(), FILE_HASH, "file hash")?;
            expect(r.u32(), ARCH_LEN, "architecture length")?;
            let architecture = r.skip(ARCH_LEN as usize);

            expect(r.u32(), TRANSFORMER_HASH, "transformer hash")?;
            let ft_biases = r.skip(2 * HALF_DIMS);
            let ft_weights = r.skip(2 * HALF_DIMS * FT_INPUTS);

            expect(r.u32(), LAYERS_HASH, "layers hash")?;
            r.i32s(&mut hidden1_biases);
            let hidden1_weights = r.skip(HIDDEN * L1_INPUTS);
            r.i32s(&mut hidden2_biases);
            let hidden2_weights = r.skip(HIDDEN * HIDDEN);
            let output_bias = r.i32();
            let output_weights = r.skip(HIDDEN);
            debug_assert_eq!(r.offset(), NET_FILE_SIZE);

            let layout = Layout {
                architecture,
                ft_biases,
                ft_weights,
                hidden1_weights,
                hidden2_weights,
                output_weights,
            };
            (layout, output_bias)
        };

        Ok(WeightStore {
            backing,
            source: None,
            layout,
            hidden1_biases,
            hidden2_biases,
            output_bias,
        })
    }

    #[inline]
    fn bytes(&self) -> &[u8] {
        self.backing.bytes()
    }

    /// The path this store was loaded from, if it came from a file.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// True when the weights are served from a memory mapping.
    pub fn is_mapped(&self) -> bool {
        matches!(self.backing, Backing::Mapped(_))
    }

    /// The architecture description embedded in the header.
    pub fn architecture(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes()[self.layout.architecture.clone()])
    }

    /// Feature-transformer biases, [`HALF_DIMS`] values.
    #[inline]
    pub fn ft_biases(&self) -> LeI16s<'_> {
        LeI16s {
            bytes: &self.bytes()[self.layout.ft_biases.clone()],
        }
    }

    /// Row `feature` of the feature-transformer matrix, [`HALF_DIMS`] values.
    ///
    /// # Panics
    ///
    /// Panics if `feature >= FT_INPUTS`.
    #[inline]
    pub fn ft_row(&self, feature: usize) -> LeI16s<'_> {
        let table = &self.bytes()[self.layout.ft_weights.clone()];
        let start = feature * 2 * HALF_DIMS;
        LeI16s {
            bytes: &table[start..start + 2 * HALF_DIMS],
        }
    }

    /// Number of rows in the feature-transformer matrix.
    #[inline]
    pub const fn ft_rows(&self) -> usize {
        FT_INPUTS
    }

    /// First hidden layer weights, `HIDDEN × L1_INPUTS`, row-major.
    #[inline]
    pub fn hidden1_weights(&self) -> &[i8] {
        as_i8(&self.bytes()[self.layout.hidden1_weights.clone()])
    }

    #[inline]
    pub fn hidden1_biases(&self) -> &[i32; HIDDEN] {
        &self.hidden1_biases
    }

    /// Second hidden layer weights, `HIDDEN × HIDDEN`, row-major.
    #[inline]
    pub fn hidden2_weights(&self) -> &[i8] {
        as_i8(&self.bytes()[self.layout.hidden2_weights.clone()])
    }

    #[inline]
    pub fn hidden2_biases(&self) -> &[i32; HIDDEN] {
        &self.hidden2_biases
    }

    /// Output layer weights, [`HIDDEN`] values.
    #[inline]
    pub fn output_weights(&self) -> &[i8] {
        as_i8(&self.bytes()[self.layout.output_weights.clone()])
    }

    #[inline]
    pub fn output_bias(&self) -> i32 {
        self.output_bias
    }
}

impl fmt::Debug for WeightStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeightStore")
            .field("source", &self.source)
            .field("mapped", &self.is_mapped())
            .field("bytes", &self.bytes().len())
            .finish()
    }
}

fn expect(found: u32, expected: u32, field: &'static str) -> Result<(), LoadError> {
    if found == expected {
        Ok(())
    } else {
        Err(LoadError::BadHeader {
            field,
            expected,
            found,
        })
    }
}

#[inline]
fn as_i8(bytes: &[u8]) -> &[i8] {
    // SAFETY: u8 and i8 have identical size and alignment, and every bit
    // pattern is a valid i8.
    unsafe { std::slice::from_raw_parts(bytes.as_ptr().cast::<i8>(), bytes.len()) }
}
