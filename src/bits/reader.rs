/*
# Bits Reader Module

 Little-endian integer readers over byte slices for fixed-layout binary
 formats. All readers are bounds-checked and return `None` instead of
 panicking when the slice is too short.

 Key components:
 - Positional readers: `read_u32_le()`, `read_u32_pair_le()` advancing a cursor
 - Absolute reader: `u32_le_at()` for fixed header fields
 - Writer: `write_u32_le()` for encoders
*/

/// Read a 32-bit little endian value at an absolute offset.
pub fn u32_le_at(data: &[u8], offset: usize) -> Option<u32> {
    let end = offset.checked_add(4)?;
    let bytes = data.get(offset..end)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Read a 32-bit little endian value from a byte slice advancing the position.
pub fn read_u32_le(data: &[u8], pos: &mut usize) -> Option<u32> {
    let v = u32_le_at(data, *pos)?;
    *pos += 4;
    Some(v)
}

/// Read a pair of 32-bit little endian values (one 8-byte record) advancing the position.
pub fn read_u32_pair_le(data: &[u8], pos: &mut usize) -> Option<(u32, u32)> {
    if pos.checked_add(8)? > data.len() {
        return None;
    }
    let first = read_u32_le(data, pos)?;
    let second = read_u32_le(data, pos)?;
    Some((first, second))
}

/// Append a 32-bit little endian value to a vector.
pub fn write_u32_le(output: &mut Vec<u8>, value: u32) {
    output.extend_from_slice(&value.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::{read_u32_le, read_u32_pair_le, u32_le_at, write_u32_le};

    #[test]
    fn test_read_le_values() {
        let data = [0x01u8, 0x00, 0x00, 0x00, 0xff, 0xff, 0xff, 0xff, 0x02];
        let mut pos = 0;
        assert_eq!(read_u32_le(&data, &mut pos), Some(1));
        assert_eq!(read_u32_le(&data, &mut pos), Some(u32::MAX));
        assert_eq!(pos, 8);
        // only one byte left
        assert_eq!(read_u32_le(&data, &mut pos), None);
        assert_eq!(pos, 8);
    }

    #[test]
    fn test_u32_at_out_of_bounds() {
        let data = [0u8; 6];
        assert_eq!(u32_le_at(&data, 2), Some(0));
        assert_eq!(u32_le_at(&data, 3), None);
        assert_eq!(u32_le_at(&data, usize::MAX), None);
    }

    #[test]
    fn test_pair_requires_full_record() {
        let mut data = Vec::new();
        write_u32_le(&mut data, 7);
        write_u32_le(&mut data, 0x1234);
        data.extend_from_slice(&[1, 2, 3]);

        let mut pos = 0;
        assert_eq!(read_u32_pair_le(&data, &mut pos), Some((7, 0x1234)));
        assert_eq!(read_u32_pair_le(&data, &mut pos), None);
        assert_eq!(pos, 8);
    }
}
