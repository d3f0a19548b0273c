/// An error from the `imago` crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImagoError {
  /// The bytes given don't look like this format at all.
  ///
  /// This is the "soft" failure: a caller holding bytes of unknown origin
  /// should take it as a cue to try the next decoder, not as a sign that the
  /// data is damaged.
  NotThisFormat,

  /// The data ran out in the middle of a decoding step.
  ///
  /// The header claimed more pixel data than the buffer actually holds. No
  /// partial image is produced in this case.
  Truncated,

  /// The header parsed fine, but it describes something this crate doesn't
  /// decode (eg: a TGA "no image data" file).
  Unsupported,

  /// The image is too large.
  ///
  /// The decoders limit the width and height of images they process to be
  /// 17,000 or less to prevent accidental out-of-memory problems.
  DimensionsTooLarge,

  /// The allocator couldn't give us enough space.
  #[cfg(feature = "alloc")]
  #[cfg_attr(docs_rs, doc(cfg(feature = "alloc")))]
  Alloc,
}

#[cfg(feature = "alloc")]
impl From<alloc::collections::TryReserveError> for ImagoError {
  #[inline]
  fn from(_: alloc::collections::TryReserveError) -> Self {
    Self::Alloc
  }
}
