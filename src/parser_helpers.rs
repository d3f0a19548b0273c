use crate::ImagoError;

/// Both decoders refuse to process declared dimensions above this, as a
/// guard against allocating wild amounts of memory for a hostile header.
pub(crate) const MAX_DIMENSION: u32 = 17_000;

#[inline]
pub(crate) fn try_pull_byte_array<const N: usize>(
  bytes: &[u8],
) -> Result<([u8; N], &[u8]), ImagoError> {
  if bytes.len() >= N {
    let (head, tail) = bytes.split_at(N);
    let a: [u8; N] = head.try_into().unwrap();
    Ok((a, tail))
  } else {
    Err(ImagoError::Truncated)
  }
}

#[inline]
#[must_use]
pub(crate) fn u16_le(bytes: &[u8]) -> u16 {
  u16::from_le_bytes(bytes.try_into().unwrap())
}

#[inline]
#[must_use]
pub(crate) fn u32_le(bytes: &[u8]) -> u32 {
  u32::from_le_bytes(bytes.try_into().unwrap())
}

#[inline]
#[must_use]
pub(crate) fn u32_be(bytes: &[u8]) -> u32 {
  u32::from_be_bytes(bytes.try_into().unwrap())
}
