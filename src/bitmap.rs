#![forbid(unsafe_code)]

//! Provides the heap-allocated image type that the decoders output.

use alloc::vec::Vec;
use bytemuck::Pod;

use crate::pixels::RGBA8;

/// Converts an `(x,y)` position within a given `width` 2D space into a linear
/// index.
///
/// You don't ever need to call this function yourself, but it's how the image
/// container converts 2d coordinates into index values within its payload
/// vector. If you'd like to use the exact same function it does for some
/// reason, you can.
#[inline]
#[must_use]
pub const fn xy_width_to_index(x: u32, y: u32, width: u32) -> usize {
  y.wrapping_mul(width).wrapping_add(x) as usize
}

/// An owned direct-color image.
///
/// Rows are stored left to right, top row first, with no padding between
/// rows: `pixels.len()` is `width * height`. The fields are public, but if
/// you put them together weirdly the methods of this type might panic.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
#[cfg_attr(docs_rs, doc(cfg(feature = "alloc")))]
pub struct Bitmap<P = RGBA8> {
  pub width: u32,
  pub height: u32,
  pub pixels: Vec<P>,
}
impl<P> Bitmap<P> {
  /// Gets the pixel at the position, or `None` if the position is out of
  /// bounds.
  #[inline]
  #[must_use]
  pub fn get(&self, x: u32, y: u32) -> Option<&P> {
    if x < self.width && y < self.height {
      self.pixels.get(xy_width_to_index(x, y, self.width))
    } else {
      None
    }
  }

  /// Gets the pixel at the position, or `None` if the position is out of
  /// bounds.
  #[inline]
  #[must_use]
  pub fn get_mut(&mut self, x: u32, y: u32) -> Option<&mut P> {
    if x < self.width && y < self.height {
      self.pixels.get_mut(xy_width_to_index(x, y, self.width))
    } else {
      None
    }
  }

  /// Flips the image top to bottom.
  #[inline]
  pub fn vertical_flip(&mut self) {
    let mut data: &mut [P] = self.pixels.as_mut_slice();
    let mut temp_height = self.height;
    while temp_height > 1 {
      let (low, mid) = data.split_at_mut(self.width as usize);
      let (mid, high) = mid.split_at_mut(mid.len() - self.width as usize);
      low.swap_with_slice(high);
      data = mid;
      temp_height -= 2;
    }
  }
}
impl<P: Pod> Bitmap<P> {
  /// Views the pixel data as one flat byte slice.
  ///
  /// For a `Bitmap<RGBA8>` this is a standard interleaved RGBA buffer
  /// (`R,G,B,A` per pixel, row-major, top row first), suitable for handing
  /// straight to a raster surface or an encoder.
  #[inline]
  #[must_use]
  pub fn pixel_bytes(&self) -> &[u8] {
    bytemuck::cast_slice(&self.pixels)
  }
}
