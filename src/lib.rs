#![no_std]
#![cfg_attr(docs_rs, feature(doc_cfg))]
#![warn(missing_docs)]

//! A crate for image data decoding.
//!
//! Currently supports the [QOI](https://qoiformat.org/) format and the
//! Truevision TGA ("Targa") format. Both decoders turn a fully loaded byte
//! buffer into a [`Bitmap`] of [`RGBA8`] pixels: row-major, top row first,
//! which is exactly the layout a raster surface wants for direct blitting.
//!
//! ## Picking A Decoder
//!
//! If you already know what format your bytes are, call
//! [`qoi_try_bitmap_rgba`](qoi::qoi_try_bitmap_rgba) or
//! [`tga_try_bitmap_rgba`](tga::tga_try_bitmap_rgba) directly. If you don't,
//! [`try_bitmap_rgba`] sniffs the formats in sequence: each decoder reports
//! [`ImagoError::NotThisFormat`] when the bytes clearly aren't its format,
//! which is an invitation to try the next one rather than a decode failure.
//!
//! ## Library Design Assumptions
//!
//! * The entire encoded data stream is a single byte slice. There is no
//!   support for "stream" decoding of partial input.
//! * A decode call runs to completion or fails; all decoder state lives in
//!   locals of that one call. Decoding different buffers on different threads
//!   needs no locking because nothing is shared.

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(target_pointer_width = "16")]
compile_error!("this crate assumes 32-bit or bigger pointers!");

pub mod pixels;
pub use pixels::*;

mod error;
pub use error::*;

#[cfg(feature = "alloc")]
pub mod bitmap;
#[cfg(feature = "alloc")]
pub use bitmap::*;

mod parser_helpers;
pub(crate) use parser_helpers::*;

#[cfg(feature = "qoi")]
pub mod qoi;

#[cfg(feature = "tga")]
pub mod tga;

/// Attempts to decode the bytes as any format this crate understands.
///
/// The decoders are tried in sequence (QOI first, then TGA). A decoder that
/// answers [`ImagoError::NotThisFormat`] simply passes the turn to the next
/// one; any other outcome, success or failure, is final. If every decoder
/// declines you get `NotThisFormat` back.
#[cfg(all(feature = "alloc", any(feature = "qoi", feature = "tga")))]
#[cfg_attr(
  docs_rs,
  doc(cfg(all(feature = "alloc", any(feature = "qoi", feature = "tga"))))
)]
#[inline]
pub fn try_bitmap_rgba(bytes: &[u8]) -> Result<Bitmap<RGBA8>, ImagoError> {
  #[cfg(feature = "qoi")]
  match qoi::qoi_try_bitmap_rgba(bytes) {
    Err(ImagoError::NotThisFormat) => (),
    other => return other,
  }
  #[cfg(feature = "tga")]
  match tga::tga_try_bitmap_rgba(bytes) {
    Err(ImagoError::NotThisFormat) => (),
    other => return other,
  }
  Err(ImagoError::NotThisFormat)
}
