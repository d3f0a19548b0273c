#![forbid(unsafe_code)]

//! Module for working with QOI ("Quite OK Image") data.
//!
//! * [The Quite OK Image Format Specification][qoi-spec]
//!
//! [qoi-spec]: https://qoiformat.org/qoi-specification.pdf
//!
//! A QOI stream is a 14 byte header, then a sequence of variable length
//! opcodes, then an 8 byte end marker. Every opcode is relative to the pixel
//! that came before it: it either restates the previous pixel some number of
//! times, nudges its channels by small deltas, replaces it outright, or
//! recalls an earlier pixel from a 64 slot cache keyed on a hash of the
//! pixel's own channel values. Decoding is one forward pass with no
//! backtracking, so the whole decoder state is the previous pixel, the
//! cache, and the output position.
//!
//! Use [`qoi_get_header`] if you only want the declared dimensions, or
//! [`qoi_try_bitmap_rgba`] to decode the pixels (requires the `alloc`
//! feature). A buffer that doesn't open with the `qoif` magic gives
//! [`ImagoError::NotThisFormat`], so a caller can move on and try some other
//! decoder.

use crate::{parser_helpers::*, ImagoError};

#[cfg(feature = "alloc")]
use crate::{bitmap::Bitmap, pixels::RGBA8};
#[cfg(feature = "alloc")]
use alloc::vec::Vec;
#[cfg(feature = "alloc")]
use bitfrob::u8_get_value;

/// The four bytes that open every QOI file.
pub const QOI_MAGIC: [u8; 4] = *b"qoif";

/// Size of the fixed QOI header.
pub const QOI_HEADER_SIZE: usize = 14;

/// The byte sequence that closes every QOI stream.
pub const QOI_END_MARKER: [u8; 8] = [0, 0, 0, 0, 0, 0, 0, 1];

const QOI_OP_RGB: u8 = 0b1111_1110;
const QOI_OP_RGBA: u8 = 0b1111_1111;

/// Header data from a QOI file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QoiHeader {
  /// Image width in pixels.
  pub width: u32,

  /// Image height in pixels.
  pub height: u32,

  /// Declared channel count: 3 (RGB) or 4 (RGBA).
  ///
  /// Purely informative. The opcode stream decodes the same way either way,
  /// and this decoder always outputs RGBA.
  pub channels: u8,

  /// 0 = sRGB channels with linear alpha, 1 = all channels linear.
  ///
  /// Also purely informative: channel values pass through undisturbed.
  pub colorspace: u8,
}

/// Checks if the bytes open with the QOI magic.
#[inline]
#[must_use]
pub fn qoi_signature_is_correct(bytes: &[u8]) -> bool {
  bytes.len() >= QOI_MAGIC.len() && bytes[..QOI_MAGIC.len()] == QOI_MAGIC
}

/// Pulls the header off the front of a QOI data stream.
///
/// On success you get the header and the rest of the bytes (the opcode
/// stream). Beyond the magic, header fields are *not* validated: QOI
/// reserves that job for the decode loop's bounds handling.
///
/// ## Failure
/// * [`ImagoError::NotThisFormat`] when the magic isn't there.
/// * [`ImagoError::Truncated`] when the magic is there but the buffer is
///   less than 14 bytes.
#[inline]
pub fn qoi_get_header(bytes: &[u8]) -> Result<(QoiHeader, &[u8]), ImagoError> {
  if !qoi_signature_is_correct(bytes) {
    return Err(ImagoError::NotThisFormat);
  }
  let (a, rest) = try_pull_byte_array::<QOI_HEADER_SIZE>(bytes)?;
  let header = QoiHeader {
    width: u32_be(&a[4..8]),
    height: u32_be(&a[8..12]),
    channels: a[12],
    colorspace: a[13],
  };
  Ok((header, rest))
}

/// The cache slot that a pixel hashes to.
#[cfg(feature = "alloc")]
#[inline]
#[must_use]
const fn qoi_index_position(p: RGBA8) -> usize {
  (p.r as usize * 3 + p.g as usize * 5 + p.b as usize * 7 + p.a as usize * 11) % 64
}

/// Decodes QOI bytes into an RGBA bitmap.
///
/// The output is always 4 channels, regardless of the channel count the
/// header declares (a 3 channel stream just never changes the alpha away
/// from its starting 255).
///
/// The output buffer starts zeroed and the stream writes into it, so a
/// stream that ends cleanly before covering `width * height` pixels leaves
/// the remainder as transparent black. Only a read that would run *past the
/// end of the buffer* mid-opcode is an error.
///
/// ## Failure
/// * [`ImagoError::NotThisFormat`] when the magic isn't there.
/// * [`ImagoError::Truncated`] when an opcode claims payload bytes the
///   buffer doesn't have.
/// * [`ImagoError::DimensionsTooLarge`] when either dimension exceeds
///   17,000.
#[cfg(feature = "alloc")]
#[cfg_attr(docs_rs, doc(cfg(feature = "alloc")))]
pub fn qoi_try_bitmap_rgba(bytes: &[u8]) -> Result<Bitmap<RGBA8>, ImagoError> {
  let (header, mut rest) = qoi_get_header(bytes)?;
  if header.width > MAX_DIMENSION || header.height > MAX_DIMENSION {
    return Err(ImagoError::DimensionsTooLarge);
  }
  let pixel_count = (header.width as usize) * (header.height as usize);
  let mut pixels: Vec<RGBA8> = Vec::new();
  pixels.try_reserve_exact(pixel_count)?;
  pixels.resize(pixel_count, RGBA8::default());
  //
  let mut index_cache = [RGBA8::default(); 64];
  let mut prev = RGBA8::OPAQUE_BLACK;
  let mut idx = 0_usize;
  while idx < pixel_count {
    // The previous pixel enters the cache before each opcode, so an INDEX op
    // can recall the pixel emitted just before it.
    index_cache[qoi_index_position(prev)] = prev;
    let (tag, tail) = match rest {
      [tag, tail @ ..] => (*tag, tail),
      [] => break,
    };
    // A 0x00 tag is a run of 1 *unless* it opens the end marker, so look at
    // the 8 bytes starting right here before consuming anything.
    if tag == 0x00 && rest.starts_with(&QOI_END_MARKER) {
      break;
    }
    rest = tail;
    match tag {
      QOI_OP_RGB => {
        let ([r, g, b], tail) = try_pull_byte_array::<3>(rest)?;
        rest = tail;
        // alpha carries forward, it's not in the payload.
        prev = RGBA8 { r, g, b, a: prev.a };
        pixels[idx] = prev;
        idx += 1;
      }
      QOI_OP_RGBA => {
        let ([r, g, b, a], tail) = try_pull_byte_array::<4>(rest)?;
        rest = tail;
        prev = RGBA8 { r, g, b, a };
        pixels[idx] = prev;
        idx += 1;
      }
      _ => match u8_get_value(6, 7, tag) {
        0b00 => {
          // INDEX
          prev = index_cache[usize::from(u8_get_value(0, 5, tag))];
          pixels[idx] = prev;
          idx += 1;
        }
        0b01 => {
          // DIFF: three 2-bit deltas, each biased by 2.
          let dr = u8_get_value(4, 5, tag);
          let dg = u8_get_value(2, 3, tag);
          let db = u8_get_value(0, 1, tag);
          prev = RGBA8 {
            r: prev.r.wrapping_add(dr).wrapping_sub(2),
            g: prev.g.wrapping_add(dg).wrapping_sub(2),
            b: prev.b.wrapping_add(db).wrapping_sub(2),
            a: prev.a,
          };
          pixels[idx] = prev;
          idx += 1;
        }
        0b10 => {
          // LUMA: 6-bit green delta biased by 32, then one payload byte with
          // 4-bit red-minus-green and blue-minus-green deltas biased by 8.
          let ([payload], tail) = try_pull_byte_array::<1>(rest)?;
          rest = tail;
          let dg = u8_get_value(0, 5, tag).wrapping_sub(32);
          let dr_dg = u8_get_value(4, 7, payload).wrapping_sub(8);
          let db_dg = u8_get_value(0, 3, payload).wrapping_sub(8);
          prev = RGBA8 {
            r: prev.r.wrapping_add(dg).wrapping_add(dr_dg),
            g: prev.g.wrapping_add(dg),
            b: prev.b.wrapping_add(dg).wrapping_add(db_dg),
            a: prev.a,
          };
          pixels[idx] = prev;
          idx += 1;
        }
        0b11 => {
          // RUN: previous pixel repeats, clamped to the declared pixel count.
          let count = usize::from(u8_get_value(0, 5, tag)) + 1;
          let n = count.min(pixel_count - idx);
          pixels[idx..idx + n].fill(prev);
          idx += n;
        }
        _ => unreachable!(),
      },
    }
  }
  Ok(Bitmap { width: header.width, height: header.height, pixels })
}
