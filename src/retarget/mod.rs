//! The opcode retargeter: the core of the conversion. Given an original
//! code-byte sequence and its line table, produces rewritten code bytes, the
//! old→new offset map, and a rewritten line table.

mod backward;
mod forward;
mod lnotab;
mod offsets;

use std::collections::HashMap;

use crate::error::Error;
use crate::opcode::ExpansionItem;

pub use offsets::OffsetMap;

/// Result of retargeting a single code object's `code`/`lnotab` payloads.
pub struct RetargetedCode {
    pub code: Vec<u8>,
    pub lnotab: Vec<u8>,
}

/// Recovery policy for the two conditions spec.md §4.E.4 allows recovering
/// from locally: an unknown source opcode and an unresolvable jump target.
/// Both default to "log and continue"; [`crate::config::RecoveryPolicy::Abort`]
/// flips the corresponding flag to fail the whole file instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailurePolicy {
    pub abort_on_unknown_opcode: bool,
    pub abort_on_unresolved_jump: bool,
}

/// Retarget one code object's byte payloads, driven from
/// [`crate::marshal::writer`] whenever it emits a `Code` value.
pub fn retarget_code(
    code: &[u8],
    original_lnotab: &[u8],
    firstlineno: i32,
    opmap: &HashMap<u8, u8>,
    expansion_for: impl Fn(u8) -> Option<&'static [ExpansionItem]>,
) -> Result<RetargetedCode, Error> {
    retarget_code_with_policy(
        code,
        original_lnotab,
        firstlineno,
        opmap,
        expansion_for,
        FailurePolicy::default(),
    )
}

/// Same as [`retarget_code`], but honoring a [`FailurePolicy`] for the two
/// recoverable conditions instead of always logging and continuing.
pub fn retarget_code_with_policy(
    code: &[u8],
    original_lnotab: &[u8],
    firstlineno: i32,
    opmap: &HashMap<u8, u8>,
    expansion_for: impl Fn(u8) -> Option<&'static [ExpansionItem]>,
    policy: FailurePolicy,
) -> Result<RetargetedCode, Error> {
    let (mut new_code, offsets) =
        forward::expand_and_remap_with_policy(code, opmap, expansion_for, policy)?;
    backward::fixup_jumps_with_policy(&mut new_code, &offsets, policy)?;

    let line_pairs = lnotab::decode(original_lnotab, firstlineno);
    let remapped_pairs: Vec<(i64, i64)> = line_pairs
        .into_iter()
        .filter_map(|(byte_off, line)| {
            let old = usize::try_from(byte_off).ok()?;
            offsets.get(old).map(|new_off| (new_off as i64, line))
        })
        .collect();
    let new_lnotab = lnotab::encode(&remapped_pairs, firstlineno)?;

    Ok(RetargetedCode {
        code: new_code,
        lnotab: new_lnotab,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::{expansion_for, tables};

    #[test]
    fn empty_code_retargets_to_empty_output() {
        let result = retarget_code(&[], &[], 1, tables::opcode_map(), expansion_for).unwrap();
        assert!(result.code.is_empty());
        assert!(result.lnotab.is_empty());
    }

    #[test]
    fn identity_tables_preserve_a_plain_instruction_stream() {
        let pop_top = tables::canonical_number("POP_TOP").unwrap();
        let identity: HashMap<u8, u8> = [(pop_top, pop_top)].into_iter().collect();
        let result = retarget_code(&[pop_top], &[], 1, &identity, |_| None).unwrap();
        assert_eq!(result.code, vec![pop_top]);
    }

    #[test]
    fn unknown_opcode_is_recovered_by_default_but_fatal_under_abort_policy() {
        let empty: HashMap<u8, u8> = HashMap::new();
        // Below HAVE_ARGUMENT so the single byte is a complete instruction.
        let unknown = vec![80u8];

        let recovered = retarget_code(&unknown, &[], 1, &empty, |_| None).unwrap();
        assert_eq!(recovered.code, unknown);

        let policy = FailurePolicy {
            abort_on_unknown_opcode: true,
            abort_on_unresolved_jump: false,
        };
        let err = retarget_code_with_policy(&unknown, &[], 1, &empty, |_| None, policy).unwrap_err();
        assert!(matches!(
            err,
            Error::Retarget(crate::error::RetargetError::UnknownOpcode { opcode: 80, offset: 0 })
        ));
    }

    #[test]
    fn unresolved_jump_is_recovered_by_default_but_fatal_under_abort_policy() {
        let jump_absolute = tables::canonical_number("JUMP_ABSOLUTE").unwrap();
        let identity: HashMap<u8, u8> = [(jump_absolute, jump_absolute)].into_iter().collect();
        // Arg points at offset 9, well outside the one-instruction stream.
        let code = vec![jump_absolute, 9, 0];

        let recovered = retarget_code(&code, &[], 1, &identity, |_| None).unwrap();
        assert_eq!(recovered.code, code, "unresolved jump left untouched by default");

        let policy = FailurePolicy {
            abort_on_unknown_opcode: false,
            abort_on_unresolved_jump: true,
        };
        let err = retarget_code_with_policy(&code, &[], 1, &identity, |_| None, policy).unwrap_err();
        assert!(matches!(
            err,
            Error::Retarget(crate::error::RetargetError::UnresolvedJumpTarget { offset: 0, target: 9 })
        ));
    }
}
