//! Fixed-width cells packed back to back in a `u32` word array.
//!
//! ```text
//! width = 3
//! word 0: |c0 |c1 |c2 | ... |c9 |c10.lo|
//! word 1: |c10.hi|c11 | ...
//! ```
//!
//! Cells never pad to word boundaries; a cell may start in one word and end
//! in the next.

use crate::error::SilhouetteError;

/// Bits per storage word.
pub const WORD_BITS: u32 = u32::BITS;

/// Widest supported cell.
pub const MAX_BITS_PER_CELL: u32 = 32;

/// Packed array of `num_cells` cells, each `bits_per_cell` wide.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MultiBitArray {
  words: Vec<u32>,
  bits_per_cell: u32,
  num_cells: usize,
}

/// Mask with the low `n` bits set (`n <= 32`).
#[inline]
fn low_mask(n: u32) -> u32 {
  if n >= WORD_BITS {
    u32::MAX
  } else {
    (1u32 << n) - 1
  }
}

impl MultiBitArray {
  /// Zero-filled array.
  pub fn new(bits_per_cell: u32, num_cells: usize) -> Result<Self, SilhouetteError> {
    if bits_per_cell == 0 || bits_per_cell > MAX_BITS_PER_CELL {
      return Err(SilhouetteError::InvalidCellWidth(bits_per_cell));
    }
    let mut array = Self {
      words: Vec::new(),
      bits_per_cell,
      num_cells: 0,
    };
    array.resize(num_cells);
    Ok(array)
  }

  #[inline]
  pub fn bits_per_cell(&self) -> u32 {
    self.bits_per_cell
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.num_cells
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.num_cells == 0
  }

  /// Storage actually held, in bytes.
  #[inline]
  pub fn size_bytes(&self) -> usize {
    self.words.len() * std::mem::size_of::<u32>()
  }

  /// Grow or shrink the cell count, keeping the content of surviving cells.
  /// New cells read as zero.
  pub fn resize(&mut self, num_cells: usize) {
    let total_bits = num_cells * self.bits_per_cell as usize;
    let num_words = total_bits.div_ceil(WORD_BITS as usize);

    if num_cells < self.num_cells {
      // Clear the tail so a later grow sees zeros again.
      for index in num_cells..self.num_cells {
        self.write(index, 0);
      }
    }
    self.words.resize(num_words, 0);
    self.num_cells = num_cells;
  }

  /// `(word index, bit offset within word)` of a cell's first bit.
  #[inline]
  fn locate(&self, index: usize) -> (usize, u32) {
    let bit = index * self.bits_per_cell as usize;
    (bit / WORD_BITS as usize, (bit % WORD_BITS as usize) as u32)
  }

  /// Read a cell. `None` when `index` is out of range.
  pub fn get(&self, index: usize) -> Option<u32> {
    if index >= self.num_cells {
      return None;
    }
    let (word, offset) = self.locate(index);
    let width = self.bits_per_cell;
    let first_bits = width.min(WORD_BITS - offset);

    let mut value = (self.words[word] >> offset) & low_mask(first_bits);
    if first_bits < width {
      let rest = width - first_bits;
      value |= (self.words[word + 1] & low_mask(rest)) << first_bits;
    }
    Some(value)
  }

  /// Write `value & mask(bits_per_cell)` into a cell.
  ///
  /// Out-of-range writes are a caller bug: they assert in debug builds and
  /// are ignored otherwise.
  pub fn set(&mut self, index: usize, value: u32) {
    debug_assert!(
      index < self.num_cells,
      "cell {} out of range for {} cells",
      index,
      self.num_cells
    );
    if index >= self.num_cells {
      return;
    }
    self.write(index, value);
  }

  fn write(&mut self, index: usize, value: u32) {
    let (word, offset) = self.locate(index);
    let width = self.bits_per_cell;
    let value = value & low_mask(width);
    let first_bits = width.min(WORD_BITS - offset);

    let mask = low_mask(first_bits) << offset;
    self.words[word] = (self.words[word] & !mask) | ((value << offset) & mask);

    if first_bits < width {
      let rest = width - first_bits;
      let mask = low_mask(rest);
      self.words[word + 1] = (self.words[word + 1] & !mask) | ((value >> first_bits) & mask);
    }
  }

  /// Set every cell to the same value.
  pub fn fill(&mut self, value: u32) {
    for index in 0..self.num_cells {
      self.write(index, value);
    }
  }

  /// Iterate all cell values in order.
  pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
    (0..self.num_cells).filter_map(move |i| self.get(i))
  }

  /// Drop all storage.
  pub fn clear(&mut self) {
    self.words = Vec::new();
    self.num_cells = 0;
  }
}

#[cfg(test)]
#[path = "bit_array_test.rs"]
mod bit_array_test;
