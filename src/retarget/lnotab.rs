//! Line-number table codec: packed run-length `(byte_delta, line_delta)`
//! byte pairs, decoded to absolute `(byte_offset, line)` pairs and back.

use crate::error::RetargetError;

/// Decode a packed `lnotab` into absolute `(byte_offset, line)` pairs,
/// relative to `firstlineno`. Only emits a pair when the line number
/// actually changes (or at the final accumulated position), mirroring the
/// original table's sparse representation.
pub fn decode(lnotab: &[u8], firstlineno: i32) -> Vec<(i64, i64)> {
    let mut pairs = Vec::new();
    let mut last_line: Option<i64> = None;
    let mut cur_byte: i64 = 0;
    let mut cur_line: i64 = firstlineno as i64;

    for chunk in lnotab.chunks_exact(2) {
        let byte_delta = chunk[0] as i64;
        let line_delta = chunk[1] as i64;
        if byte_delta != 0 {
            if Some(cur_line) != last_line {
                pairs.push((cur_byte, cur_line));
                last_line = Some(cur_line);
            }
            cur_byte += byte_delta;
        }
        cur_line += line_delta;
    }
    if Some(cur_line) != last_line {
        pairs.push((cur_byte, cur_line));
    }
    pairs
}

/// Re-encode absolute `(byte_offset, line)` pairs into a packed `lnotab`,
/// relative to `firstlineno`. Deltas larger than 255 are split into repeated
/// `(255, 0)` steps before the remainder.
pub fn encode(pairs: &[(i64, i64)], firstlineno: i32) -> Result<Vec<u8>, RetargetError> {
    let mut out = Vec::new();
    let mut cur_byte: i64 = 0;
    let mut cur_line: i64 = firstlineno as i64;

    for (index, &(byte_off, line_off)) in pairs.iter().enumerate() {
        let mut byte_delta = byte_off - cur_byte;
        let mut line_delta = line_off - cur_line;
        if byte_delta < 0 || line_delta < 0 {
            return Err(RetargetError::NonMonotonicLnotab {
                index,
                byte_delta,
                line_delta,
            });
        }
        while byte_delta > 255 {
            out.push(255);
            out.push(0);
            byte_delta -= 255;
        }
        out.push(byte_delta as u8);
        // Mirrors the byte-delta loop's (255, 0) emission order, not (0, 255):
        // the pair boundary here falls mid-sequence (the byte slot just
        // written above pairs with this loop's first 255), so emitting 0
        // first would shift every subsequent pair by one slot.
        while line_delta > 255 {
            out.push(255);
            out.push(0);
            line_delta -= 255;
        }
        out.push(line_delta as u8);
        cur_byte = byte_off;
        cur_line = line_off;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_then_encode_round_trips() {
        let lnotab = vec![0u8, 1, 4, 1, 2, 2];
        let pairs = decode(&lnotab, 10);
        let re_encoded = encode(&pairs, 10).unwrap();
        assert_eq!(decode(&re_encoded, 10), pairs);
    }

    #[test]
    fn large_deltas_split_into_255_steps() {
        let pairs = vec![(600, 10)];
        let encoded = encode(&pairs, 0).unwrap();
        assert_eq!(encoded, vec![255, 0, 255, 0, 90, 10]);
        // decode() inserts a leading (0, firstlineno) entry because the very
        // first chunk already carries a nonzero byte delta: everything
        // before byte 0 is implicitly firstlineno, same as the original's
        // lnotab_numbers.
        assert_eq!(decode(&encoded, 0), vec![(0, 0), (600, 10)]);
    }

    #[test]
    fn large_line_delta_splits_without_corrupting_byte_slot() {
        // byte_delta=5, line_delta=600: matches the original tool's
        // gen_lnotab exactly (a naive (0, 255) split here would misalign
        // every later pair).
        let pairs = vec![(5, 600)];
        let encoded = encode(&pairs, 0).unwrap();
        assert_eq!(encoded, vec![5, 255, 0, 255, 0, 90]);
        assert_eq!(decode(&encoded, 0), vec![(0, 0), (5, 600)]);
    }

    #[test]
    fn non_monotonic_byte_delta_errors() {
        let pairs = vec![(5, 1), (2, 2)];
        assert!(matches!(
            encode(&pairs, 0),
            Err(RetargetError::NonMonotonicLnotab { index: 1, .. })
        ));
    }
}
