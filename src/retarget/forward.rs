//! Forward pass: walks the original Messiah code stream, remapping plain
//! opcodes and expanding superinstructions, recording the old→new offset map
//! as it goes.

use std::collections::HashMap;

use crate::error::RetargetError;
use crate::opcode::{self, ExpansionItem};

use super::offsets::OffsetMap;
use super::FailurePolicy;

pub fn expand_and_remap(
    original: &[u8],
    opmap: &HashMap<u8, u8>,
    expansion_for: impl Fn(u8) -> Option<&'static [ExpansionItem]>,
) -> Result<(Vec<u8>, OffsetMap), RetargetError> {
    expand_and_remap_with_policy(original, opmap, expansion_for, FailurePolicy::default())
}

pub fn expand_and_remap_with_policy(
    original: &[u8],
    opmap: &HashMap<u8, u8>,
    expansion_for: impl Fn(u8) -> Option<&'static [ExpansionItem]>,
    policy: FailurePolicy,
) -> Result<(Vec<u8>, OffsetMap), RetargetError> {
    let mut out = Vec::with_capacity(original.len());
    let mut offsets = OffsetMap::new(original.len());
    let mut c = 0usize;

    while c < original.len() {
        offsets.record(c, out.len());
        let raw = original[c];

        let n = match opmap.get(&raw) {
            Some(mapped) => *mapped,
            None => {
                if expansion_for(raw).is_none() {
                    if policy.abort_on_unknown_opcode {
                        return Err(RetargetError::UnknownOpcode { opcode: raw, offset: c });
                    }
                    tracing::warn!(
                        opcode = %hex::encode([raw]),
                        offset = c,
                        "unknown messiah opcode, emitting unchanged"
                    );
                }
                raw
            }
        };

        if let Some(items) = expansion_for(n) {
            // Starts true only when the superinstruction opcode itself is
            // >= HAVE_ARGUMENT, which is how `SKIP_CONST` ends up always
            // carrying a 2-byte argument despite having no expansion entry.
            let mut had_arg = opcode::has_argument(n);
            for item in items {
                match *item {
                    ExpansionItem::Literal(op, literal) => {
                        out.push(op);
                        out.extend_from_slice(&literal);
                    }
                    ExpansionItem::Opcode(op) => {
                        out.push(op);
                        if opcode::has_argument(op) {
                            had_arg = true;
                            debug_assert!(raw == opcode::SKIP_CONST || raw == n);
                            let arg = original.get(c + 1..c + 3).ok_or(
                                RetargetError::TruncatedInstruction { offset: c },
                            )?;
                            out.extend_from_slice(arg);
                        }
                    }
                }
            }
            c += if had_arg { 3 } else { 1 };
        } else {
            out.push(n);
            if opcode::has_argument(n) {
                let arg = original
                    .get(c + 1..c + 3)
                    .ok_or(RetargetError::TruncatedInstruction { offset: c })?;
                out.extend_from_slice(arg);
                c += 3;
            } else {
                c += 1;
            }
        }
    }

    offsets.build_reverse(out.len());
    Ok((out, offsets))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::tables;

    #[test]
    fn pop_three_expands_to_three_pop_tops() {
        let pop_three = tables::messiah_number("POP_THREE").unwrap();
        let pop_top = tables::canonical_number("POP_TOP").unwrap();
        let (code, offsets) =
            expand_and_remap(&[pop_three], tables::opcode_map(), crate::opcode::expansion_for).unwrap();
        assert_eq!(code, vec![pop_top, pop_top, pop_top]);
        assert_eq!(offsets.get(0), Some(0));
    }

    #[test]
    fn return_const_expands_with_carried_argument() {
        let return_const = tables::messiah_number("RETURN_CONST").unwrap();
        let original = vec![return_const, 0x00, 0x00];
        let (code, _) =
            expand_and_remap(&original, tables::opcode_map(), crate::opcode::expansion_for).unwrap();
        let load_const = tables::canonical_number("LOAD_CONST").unwrap();
        let return_value = tables::canonical_number("RETURN_VALUE").unwrap();
        assert_eq!(code, vec![load_const, 0x00, 0x00, return_value]);
    }

    #[test]
    fn load_fast_zero_load_const_uses_literal_then_original_argument() {
        let op = tables::messiah_number("LOAD_FAST_ZERO_LOAD_CONST").unwrap();
        let original = vec![op, 0x05, 0x00];
        let (code, _) =
            expand_and_remap(&original, tables::opcode_map(), crate::opcode::expansion_for).unwrap();
        let load_fast = tables::canonical_number("LOAD_FAST").unwrap();
        let load_const = tables::canonical_number("LOAD_CONST").unwrap();
        assert_eq!(code, vec![load_fast, 0x00, 0x00, load_const, 0x05, 0x00]);
    }

    #[test]
    fn truncated_argument_errors() {
        let return_const = tables::messiah_number("RETURN_CONST").unwrap();
        let original = vec![return_const, 0x00];
        let err = expand_and_remap(&original, tables::opcode_map(), crate::opcode::expansion_for)
            .unwrap_err();
        assert!(matches!(err, RetargetError::TruncatedInstruction { offset: 0 }));
    }

    #[test]
    fn empty_code_produces_empty_output() {
        let (code, _) = expand_and_remap(&[], tables::opcode_map(), crate::opcode::expansion_for).unwrap();
        assert!(code.is_empty());
    }
}
