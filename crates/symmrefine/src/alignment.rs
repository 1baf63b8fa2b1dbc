//! Blocked two-row alignments and their conversion to and from a
//! [`Correspondence`].
//!
//! An alignment is a list of blocks; each block pairs `left[i]` with
//! `right[i]`. Within a block both rows ascend. A block boundary marks a
//! discontinuity in the right row, e.g. a circular-permutation break.

use std::collections::BTreeSet;

use crate::correspondence::{Correspondence, Position};

// ── Error type ─────────────────────────────────────────────────────────────

/// Errors raised while reading an externally supplied alignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlignmentError {
    /// The two rows of a block differ in length.
    RowLengthMismatch {
        /// Block index.
        block: usize,
        /// Length of the left row.
        left: usize,
        /// Length of the right row.
        right: usize,
    },
    /// A left-row position is aligned more than once.
    DuplicatePosition {
        /// Repeated position.
        position: Position,
    },
}

impl std::fmt::Display for AlignmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RowLengthMismatch { block, left, right } => write!(
                f,
                "block {} has rows of different length: {} vs {}",
                block, left, right
            ),
            Self::DuplicatePosition { position } => {
                write!(f, "position {} is aligned more than once", position)
            }
        }
    }
}

impl std::error::Error for AlignmentError {}

// ── Types ──────────────────────────────────────────────────────────────────

/// One aligned block: `left[i]` corresponds to `right[i]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AlignedBlock {
    /// Positions in the first structural copy.
    pub left: Vec<Position>,
    /// Corresponding positions in the second structural copy.
    pub right: Vec<Position>,
}

impl AlignedBlock {
    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Aligned pairs in row order.
    pub fn pairs(&self) -> impl Iterator<Item = (Position, Position)> + '_ {
        self.left.iter().copied().zip(self.right.iter().copied())
    }

    fn push(&mut self, left: Position, right: Position) {
        self.left.push(left);
        self.right.push(right);
    }
}

/// Blocked two-row alignment, as exchanged with the alignment and
/// superposition collaborators.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BlockedAlignment {
    pub blocks: Vec<AlignedBlock>,
}

impl BlockedAlignment {
    /// Wrap pairs into a single block, in the given order.
    pub fn single_block<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Position, Position)>,
    {
        let mut block = AlignedBlock::default();
        for (l, r) in pairs {
            block.push(l, r);
        }
        Self {
            blocks: vec![block],
        }
    }

    /// Check row lengths and that no left position repeats.
    pub fn validate(&self) -> Result<(), AlignmentError> {
        let mut seen = BTreeSet::new();
        for (block_index, block) in self.blocks.iter().enumerate() {
            if block.left.len() != block.right.len() {
                return Err(AlignmentError::RowLengthMismatch {
                    block: block_index,
                    left: block.left.len(),
                    right: block.right.len(),
                });
            }
            for &position in &block.left {
                if !seen.insert(position) {
                    return Err(AlignmentError::DuplicatePosition { position });
                }
            }
        }
        Ok(())
    }

    /// Total number of aligned pairs.
    pub fn aligned_len(&self) -> usize {
        self.blocks.iter().map(AlignedBlock::len).sum()
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn block_lengths(&self) -> Vec<usize> {
        self.blocks.iter().map(AlignedBlock::len).collect()
    }

    /// All aligned pairs, block by block.
    pub fn pairs(&self) -> impl Iterator<Item = (Position, Position)> + '_ {
        self.blocks.iter().flat_map(|b| b.pairs())
    }

    /// Alignment as a functional mapping `left -> right`.
    pub fn to_correspondence(&self) -> Result<Correspondence, AlignmentError> {
        self.validate()?;
        Correspondence::from_pairs(self.pairs())
    }

    /// Rebuild blocks from a mapping.
    ///
    /// Keys are taken in ascending order; a new block starts whenever the
    /// image does not strictly increase. An empty mapping yields no blocks.
    pub fn from_correspondence(mapping: &Correspondence) -> Self {
        let mut blocks: Vec<AlignedBlock> = Vec::new();
        let mut last_right: Option<Position> = None;
        for (left, right) in mapping.iter() {
            if !last_right.is_some_and(|prev| prev < right) {
                blocks.push(AlignedBlock::default());
            }
            if let Some(block) = blocks.last_mut() {
                block.push(left, right);
            }
            last_right = Some(right);
        }
        Self { blocks }
    }
}
