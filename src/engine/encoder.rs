//! Rank Encoder
//!
//! Turns a usage count into a fixed-width sort key whose ascending byte order
//! is the descending order of the count. The key is the big-endian two's
//! complement encoding of `-count`; it is only ever compared, never decoded.

/// Key width in bytes for a given maximum count.
///
/// `floor(log2(max_count) / 8) + 2`: one byte more than the smallest signed
/// encoding that can hold `-max_count`. Counts below 1 are treated as 1.
pub fn key_width(max_count: i64) -> usize {
    let max_count = max_count.max(1) as u64;
    let floor_log2 = (u64::BITS - 1 - max_count.leading_zeros()) as usize;
    floor_log2 / 8 + 2
}

/// Encode `count` into exactly `width` bytes.
///
/// Values of `-count` that do not fit in `width` bytes saturate to the
/// nearest representable value instead of wrapping, so an oversized count
/// still sorts at the extreme rather than jumping to the other end.
pub fn encode(count: i64, width: usize) -> Vec<u8> {
    if width == 0 {
        return Vec::new();
    }

    let value = -i128::from(count);
    let value = if width < 16 {
        let bits = (width * 8) as u32;
        let min = -(1i128 << (bits - 1));
        let max = (1i128 << (bits - 1)) - 1;
        value.clamp(min, max)
    } else {
        value
    };

    let full = value.to_be_bytes();
    if width <= full.len() {
        full[full.len() - width..].to_vec()
    } else {
        let fill = if value < 0 { 0xFF } else { 0x00 };
        let mut bytes = vec![fill; width - full.len()];
        bytes.extend_from_slice(&full);
        bytes
    }
}
