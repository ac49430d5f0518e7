//! Backward pass: walks the rewritten code stream fixing up every jump
//! argument to the new byte offsets.

use std::sync::OnceLock;

use crate::error::RetargetError;
use crate::opcode::{self, tables};

use super::offsets::OffsetMap;
use super::FailurePolicy;

fn absolute_jump_opcodes() -> &'static [u8; 5] {
    static OPS: OnceLock<[u8; 5]> = OnceLock::new();
    OPS.get_or_init(|| {
        [
            tables::canonical_number("JUMP_ABSOLUTE").unwrap(),
            tables::canonical_number("POP_JUMP_IF_FALSE").unwrap(),
            tables::canonical_number("POP_JUMP_IF_TRUE").unwrap(),
            tables::canonical_number("JUMP_IF_FALSE_OR_POP").unwrap(),
            tables::canonical_number("JUMP_IF_TRUE_OR_POP").unwrap(),
        ]
    })
}

fn relative_jump_opcodes() -> &'static [u8; 6] {
    static OPS: OnceLock<[u8; 6]> = OnceLock::new();
    OPS.get_or_init(|| {
        [
            tables::canonical_number("JUMP_FORWARD").unwrap(),
            tables::canonical_number("FOR_ITER").unwrap(),
            tables::canonical_number("SETUP_LOOP").unwrap(),
            tables::canonical_number("SETUP_EXCEPT").unwrap(),
            tables::canonical_number("SETUP_FINALLY").unwrap(),
            tables::canonical_number("SETUP_WITH").unwrap(),
        ]
    })
}

fn is_absolute_jump(op: u8) -> bool {
    absolute_jump_opcodes().contains(&op)
}

fn is_relative_jump(op: u8) -> bool {
    relative_jump_opcodes().contains(&op)
}

fn read_arg(code: &[u8], c: usize) -> i16 {
    i16::from_le_bytes([code[c + 1], code[c + 2]])
}

fn write_arg(code: &mut [u8], c: usize, value: i16) {
    let bytes = value.to_le_bytes();
    code[c + 1] = bytes[0];
    code[c + 2] = bytes[1];
}

/// Fix up jump arguments in place. An argument that cannot be resolved
/// through `offsets` is left untouched (logged, not fatal).
pub fn fixup_jumps(code: &mut [u8], offsets: &OffsetMap) {
    fixup_jumps_with_policy(code, offsets, FailurePolicy::default())
        .expect("default policy never aborts");
}

/// Same as [`fixup_jumps`], but honoring a [`FailurePolicy`]: when
/// `abort_on_unresolved_jump` is set, an unresolvable jump target fails the
/// whole file instead of being logged and left untouched.
pub fn fixup_jumps_with_policy(
    code: &mut [u8],
    offsets: &OffsetMap,
    policy: FailurePolicy,
) -> Result<(), RetargetError> {
    let mut c = 0usize;
    let mut prev_op = 0u8;

    while c < code.len() {
        let op = code[c];
        if !opcode::has_argument(op) {
            c += 1;
            prev_op = op;
            continue;
        }

        if is_absolute_jump(op) {
            let old_arg = read_arg(code, c) as i64;
            match usize::try_from(old_arg).ok().and_then(|old| offsets.get(old)) {
                Some(new_target) => write_arg(code, c, new_target as i16),
                None => {
                    if policy.abort_on_unresolved_jump {
                        return Err(RetargetError::UnresolvedJumpTarget { offset: c, target: old_arg });
                    }
                    tracing::warn!(offset = c, target = old_arg, "absolute jump target outside offset map");
                }
            }
        } else if is_relative_jump(op) {
            let old_arg = read_arg(code, c) as i64;
            let old_c = offsets
                .get_reverse(c)
                .or_else(|| {
                    // `c` has no pre-image: this instruction was introduced
                    // by an expansion that injected a `POP_TOP` immediately
                    // before it. Fall back to the instruction one slot back.
                    debug_assert_eq!(prev_op, tables::canonical_number("POP_TOP").unwrap());
                    c.checked_sub(1).and_then(|prev| offsets.get_reverse(prev))
                });
            match old_c {
                Some(old_c) => {
                    let old_target = old_c as i64 + old_arg + 3;
                    match usize::try_from(old_target).ok().and_then(|t| offsets.get(t)) {
                        Some(new_target) => {
                            let new_arg = new_target as i64 - c as i64 - 3;
                            write_arg(code, c, new_arg as i16);
                        }
                        None => {
                            if policy.abort_on_unresolved_jump {
                                return Err(RetargetError::UnresolvedJumpTarget { offset: c, target: old_target });
                            }
                            tracing::warn!(offset = c, target = old_target, "relative jump target outside offset map");
                        }
                    }
                }
                None => {
                    if policy.abort_on_unresolved_jump {
                        return Err(RetargetError::UnresolvedJumpTarget { offset: c, target: old_arg });
                    }
                    tracing::warn!(offset = c, "relative jump has no pre-image offset");
                }
            }
        }

        prev_op = op;
        c += 3;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::tables::canonical_number;

    #[test]
    fn absolute_jump_retargets_through_offset_map() {
        let jump_absolute = canonical_number("JUMP_ABSOLUTE").unwrap();
        let mut code = vec![jump_absolute, 0, 0];
        let mut offsets = OffsetMap::new(1);
        offsets.record(0, 0);
        offsets.build_reverse(3);
        fixup_jumps(&mut code, &offsets);
        assert_eq!(read_arg(&code, 0), 0);
    }

    #[test]
    fn relative_jump_uses_reverse_map_and_instruction_length() {
        // Original: FOR_ITER at offset 6 with arg 10, target = 6+10+3=19.
        // offset_map[19] = 23; this FOR_ITER now lives at output offset 8.
        let for_iter = canonical_number("FOR_ITER").unwrap();
        let mut code = vec![0u8; 11];
        code[8] = for_iter;
        write_arg(&mut code, 8, 10);
        let mut offsets = OffsetMap::new(20);
        offsets.record(6, 8);
        offsets.record(19, 23);
        offsets.build_reverse(26);
        fixup_jumps(&mut code, &offsets);
        assert_eq!(read_arg(&code, 8), 23 - 8 - 3);
    }
}
