//! Expansion table: each Messiah superinstruction unpacks into an ordered
//! sequence of canonical opcodes, transcribed verbatim from the original
//! tool's `opcode_expansion` table.
//!
//! Every item in an expansion is either a bare canonical opcode (its operand,
//! if any, copied through unchanged from the superinstruction's own operand)
//! or a canonical opcode paired with a fixed 2-byte little-endian literal
//! operand that replaces whatever operand bytes followed the
//! superinstruction in the Messiah stream.
//!
//! `SKIP_CONST` (163) has no entry: it falls through the forward pass as an
//! opcode unknown to both this table and [`super::tables::opcode_map`], and
//! is handled as a >= `HAVE_ARGUMENT` instruction copied through with its
//! own number (see [`crate::retarget::forward`]).

use std::collections::HashMap;
use std::sync::OnceLock;

use super::tables::{messiah_number, CANONICAL_OPCODES};

fn canonical(name: &str) -> u8 {
    canonical_number_lookup(name)
}

fn canonical_number_lookup(name: &str) -> u8 {
    CANONICAL_OPCODES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, number)| *number)
        .unwrap_or_else(|| panic!("unknown canonical opcode name {name}"))
}

/// One step of an expanded superinstruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionItem {
    /// Emit this canonical opcode, carrying through whatever operand the
    /// superinstruction itself had (if any).
    Opcode(u8),
    /// Emit this canonical opcode with a fixed 2-byte little-endian operand,
    /// ignoring the superinstruction's own operand bytes entirely.
    Literal(u8, [u8; 2]),
}

fn messiah(name: &str) -> u8 {
    messiah_number(name).unwrap_or_else(|| panic!("unknown messiah opcode name {name}"))
}

fn table() -> &'static HashMap<u8, Vec<ExpansionItem>> {
    static TABLE: OnceLock<HashMap<u8, Vec<ExpansionItem>>> = OnceLock::new();
    TABLE.get_or_init(|| {
        use ExpansionItem::Opcode as Op;
        let mut m: HashMap<u8, Vec<ExpansionItem>> = HashMap::new();

        m.insert(messiah("POP_THREE"), vec![Op(canonical("POP_TOP")), Op(canonical("POP_TOP")), Op(canonical("POP_TOP"))]);
        m.insert(messiah("RETURN_SUBSCR"), vec![Op(canonical("BINARY_SUBSCR")), Op(canonical("RETURN_VALUE"))]);
        m.insert(messiah("POP_TWO"), vec![Op(canonical("POP_TOP")), Op(canonical("POP_TOP"))]);
        m.insert(messiah("LOAD_LOCALS_RETURN_VALUE"), vec![Op(canonical("LOAD_LOCALS")), Op(canonical("RETURN_VALUE"))]);
        m.insert(messiah("POP_TOP_POP_BLOCK"), vec![Op(canonical("POP_TOP")), Op(canonical("POP_BLOCK"))]);
        m.insert(messiah("RETURN_CONST"), vec![Op(canonical("LOAD_CONST")), Op(canonical("RETURN_VALUE"))]);
        m.insert(messiah("POP_TOP_LOAD_GLOBAL"), vec![Op(canonical("POP_TOP")), Op(canonical("LOAD_GLOBAL"))]);
        m.insert(messiah("POP_TOP_JUMP_FORWARD"), vec![Op(canonical("POP_TOP")), Op(canonical("JUMP_FORWARD"))]);
        m.insert(messiah("LOAD_CONST_BINARY_SUBSCR"), vec![Op(canonical("LOAD_CONST")), Op(canonical("BINARY_SUBSCR"))]);
        m.insert(messiah("POP_TOP_LOAD_FAST"), vec![Op(canonical("POP_TOP")), Op(canonical("LOAD_FAST"))]);
        m.insert(messiah("LOAD_CONST_STORE_MAP"), vec![Op(canonical("LOAD_CONST")), Op(canonical("STORE_MAP"))]);
        m.insert(messiah("CALL_FUNCTION_POP_TOP"), vec![Op(canonical("CALL_FUNCTION")), Op(canonical("POP_TOP"))]);
        m.insert(messiah("POP_TOP_LOAD_CONST"), vec![Op(canonical("POP_TOP")), Op(canonical("LOAD_CONST"))]);
        m.insert(messiah("LOAD_CONST_LOAD_CONST"), vec![Op(canonical("LOAD_CONST")), Op(canonical("LOAD_CONST"))]);
        m.insert(messiah("STORE_FAST_LOAD_FAST"), vec![Op(canonical("STORE_FAST")), Op(canonical("LOAD_FAST"))]);
        m.insert(messiah("LOAD_ATTR_LOAD_GLOBAL"), vec![Op(canonical("LOAD_ATTR")), Op(canonical("LOAD_GLOBAL"))]);
        m.insert(messiah("LOAD_FAST_CALL_FUNCTION_POP_TOP"), vec![Op(canonical("LOAD_FAST")), Op(canonical("CALL_FUNCTION")), Op(canonical("POP_TOP"))]);
        m.insert(messiah("COMPARE_OP_JUMP_IF_FALSE"), vec![Op(canonical("COMPARE_OP")), Op(canonical("POP_JUMP_IF_FALSE"))]);
        m.insert(messiah("LOAD_CONST_CALL_FUNCTION"), vec![Op(canonical("LOAD_CONST")), Op(canonical("CALL_FUNCTION"))]);
        m.insert(messiah("LOAD_FAST_LOAD_CONST"), vec![Op(canonical("LOAD_FAST")), Op(canonical("LOAD_CONST"))]);
        m.insert(messiah("STORE_NAME_LOAD_CONST"), vec![Op(canonical("STORE_NAME")), Op(canonical("LOAD_CONST"))]);
        m.insert(messiah("LOAD_ATTR_LOAD_FAST"), vec![Op(canonical("LOAD_ATTR")), Op(canonical("LOAD_FAST"))]);
        m.insert(messiah("MAKE_FUNCTION_STORE_NAME"), vec![Op(canonical("MAKE_FUNCTION")), Op(canonical("STORE_NAME"))]);
        m.insert(messiah("LOAD_ATTR_CALL_FUNCTION"), vec![Op(canonical("LOAD_ATTR")), Op(canonical("CALL_FUNCTION"))]);
        m.insert(messiah("LOAD_CONST_COMPARE_OP"), vec![Op(canonical("LOAD_CONST")), Op(canonical("COMPARE_OP"))]);
        m.insert(messiah("LOAD_ATTR_LOAD_ATTR"), vec![Op(canonical("LOAD_ATTR")), Op(canonical("LOAD_ATTR"))]);
        // SKIP_CONST (163) intentionally has no entry.
        m.insert(messiah("LOAD_CONST_LOAD_CONST_BUILD_TUPLE"), vec![Op(canonical("LOAD_CONST")), Op(canonical("LOAD_CONST")), Op(canonical("BUILD_TUPLE"))]);
        m.insert(messiah("LOAD_GLOBAL_CALL_FUNCTION"), vec![Op(canonical("LOAD_GLOBAL")), Op(canonical("CALL_FUNCTION"))]);
        m.insert(messiah("LOAD_CONST_LOAD_FAST"), vec![Op(canonical("LOAD_CONST")), Op(canonical("LOAD_FAST"))]);
        m.insert(messiah("STORE_FAST_LOAD_GLOBAL"), vec![Op(canonical("STORE_FAST")), Op(canonical("LOAD_GLOBAL"))]);
        m.insert(messiah("LOAD_FAST_CALL_FUNCTION"), vec![Op(canonical("LOAD_FAST")), Op(canonical("CALL_FUNCTION"))]);
        m.insert(messiah("CALL_FUNCTION_STORE_FAST"), vec![Op(canonical("CALL_FUNCTION")), Op(canonical("STORE_FAST"))]);
        m.insert(messiah("LOAD_FAST_LOAD_ATTR"), vec![Op(canonical("LOAD_FAST")), Op(canonical("LOAD_ATTR"))]);
        m.insert(messiah("LOAD_ATTR_CALL_FUNCTION_POP_TOP"), vec![Op(canonical("LOAD_ATTR")), Op(canonical("CALL_FUNCTION")), Op(canonical("POP_TOP"))]);
        m.insert(messiah("LOAD_FAST_LOAD_FAST"), vec![Op(canonical("LOAD_FAST")), Op(canonical("LOAD_FAST"))]);
        m.insert(
            messiah("LOAD_FAST_ZERO_LOAD_CONST"),
            vec![ExpansionItem::Literal(canonical("LOAD_FAST"), [0, 0]), Op(canonical("LOAD_CONST"))],
        );
        m.insert(messiah("LOAD_FAST_STORE_ATTR"), vec![Op(canonical("LOAD_FAST")), Op(canonical("STORE_ATTR"))]);
        m.insert(messiah("LOAD_CONST_LOAD_CONST_STORE_MAP"), vec![Op(canonical("LOAD_CONST")), Op(canonical("LOAD_CONST")), Op(canonical("STORE_MAP"))]);
        m.insert(messiah("LOAD_GLOBAL_CALL_FUNCTION_POP_TOP"), vec![Op(canonical("LOAD_GLOBAL")), Op(canonical("CALL_FUNCTION")), Op(canonical("POP_TOP"))]);
        m.insert(messiah("LOAD_GLOBAL_LOAD_FAST"), vec![Op(canonical("LOAD_GLOBAL")), Op(canonical("LOAD_FAST"))]);
        m.insert(messiah("CALL_FUNCTION_POP_TOP_LOAD_FAST"), vec![Op(canonical("CALL_FUNCTION")), Op(canonical("POP_TOP")), Op(canonical("LOAD_FAST"))]);
        m.insert(messiah("CALL_FUNCTION_CALL_FUNCTION"), vec![Op(canonical("CALL_FUNCTION")), Op(canonical("CALL_FUNCTION"))]);
        m.insert(messiah("LOAD_CONST_MAKE_FUNCTION"), vec![Op(canonical("LOAD_CONST")), Op(canonical("MAKE_FUNCTION"))]);
        m.insert(messiah("LOAD_CONST_IMPORT_NAME"), vec![Op(canonical("LOAD_CONST")), Op(canonical("IMPORT_NAME"))]);
        m.insert(
            messiah("LOAD_FAST_LOAD_CONST_BINARY_SUBSCR_LOAD_FAST_LOAD_CONST_BINARY_SUBSCR_CALL_FUNCTION"),
            vec![
                Op(canonical("LOAD_FAST")), Op(canonical("LOAD_CONST")), Op(canonical("BINARY_SUBSCR")),
                Op(canonical("LOAD_FAST")), Op(canonical("LOAD_CONST")), Op(canonical("BINARY_SUBSCR")),
                Op(canonical("CALL_FUNCTION")),
            ],
        );
        m.insert(
            messiah("LOAD_GLOBAL_LOAD_ATTR_LOAD_FAST_LOAD_ATTR_LOAD_FAST_LOAD_FAST"),
            vec![
                Op(canonical("LOAD_GLOBAL")), Op(canonical("LOAD_ATTR")), Op(canonical("LOAD_FAST")),
                Op(canonical("LOAD_ATTR")), Op(canonical("LOAD_FAST")), Op(canonical("LOAD_FAST")),
            ],
        );
        m.insert(
            messiah("LOAD_GLOBAL_LOAD_ATTR_LOAD_ATTR_LOAD_GLOBAL_LOAD_ATTR_LOAD_ATTR"),
            vec![
                Op(canonical("LOAD_GLOBAL")), Op(canonical("LOAD_ATTR")), Op(canonical("LOAD_ATTR")),
                Op(canonical("LOAD_GLOBAL")), Op(canonical("LOAD_ATTR")), Op(canonical("LOAD_ATTR")),
            ],
        );
        m.insert(
            messiah("LOAD_FAST_LOAT_ATTR_LOAD_CONST_LOAD_CONST_CALL_FUNCTION"),
            vec![
                Op(canonical("LOAD_FAST")), Op(canonical("LOAD_ATTR")), Op(canonical("LOAD_CONST")),
                Op(canonical("LOAD_CONST")), Op(canonical("CALL_FUNCTION")),
            ],
        );
        m.insert(
            messiah("LOAD_GLOABL_LOAD_ATTR_LOAD_ATTR_COMPARE_OP_LOAD_FAST"),
            vec![
                Op(canonical("LOAD_GLOBAL")), Op(canonical("LOAD_ATTR")), Op(canonical("LOAD_ATTR")),
                Op(canonical("COMPARE_OP")), Op(canonical("LOAD_FAST")),
            ],
        );
        m.insert(
            messiah("LOAD_FAST_LOAD_ATTR_LOAD_FAST_CALL_FUNCTION"),
            vec![Op(canonical("LOAD_FAST")), Op(canonical("LOAD_ATTR")), Op(canonical("LOAD_FAST")), Op(canonical("CALL_FUNCTION"))],
        );
        m.insert(
            messiah("LOAD_FAST_LOAD_ATTR_LOAD_FAST_LOAD_ATTR"),
            vec![Op(canonical("LOAD_FAST")), Op(canonical("LOAD_ATTR")), Op(canonical("LOAD_FAST")), Op(canonical("LOAD_ATTR"))],
        );
        m.insert(
            messiah("LOAD_FAST_LOAD_FAST_LOAD_FAST_CALL_FUNCTION"),
            vec![Op(canonical("LOAD_FAST")), Op(canonical("LOAD_FAST")), Op(canonical("LOAD_FAST")), Op(canonical("CALL_FUNCTION"))],
        );
        m.insert(
            messiah("LOAD_ATTR_LOAD_FAST_LOAD_FAST_CALL_FUNCTION"),
            vec![Op(canonical("LOAD_ATTR")), Op(canonical("LOAD_FAST")), Op(canonical("LOAD_FAST")), Op(canonical("CALL_FUNCTION"))],
        );
        m.insert(messiah("LOAD_FAST_LOAD_ATTR_LOAD_ATTR"), vec![Op(canonical("LOAD_FAST")), Op(canonical("LOAD_ATTR")), Op(canonical("LOAD_ATTR"))]);
        m.insert(messiah("LOAD_FAST_LOAD_ATTR_CALL_FUNCTION"), vec![Op(canonical("LOAD_FAST")), Op(canonical("LOAD_ATTR")), Op(canonical("CALL_FUNCTION"))]);
        m.insert(messiah("LOAD_FAST_LOAD_ATTR_RETURN_VALUE"), vec![Op(canonical("LOAD_FAST")), Op(canonical("LOAD_ATTR")), Op(canonical("RETURN_VALUE"))]);
        m.insert(messiah("LOAD_FAST_LOAD_ATTR_JUMP_IF_FALSE"), vec![Op(canonical("LOAD_FAST")), Op(canonical("LOAD_ATTR")), Op(canonical("POP_JUMP_IF_FALSE"))]);
        m.insert(
            messiah("LOAD_FAST_LOAD_FAST_LOAD_FAST_LOAD_FAST_LOAD_FAST_LOAD_FAST"),
            vec![Op(canonical("LOAD_FAST")); 6],
        );
        m.insert(messiah("LOAD_FAST_LOAD_FAST_LOAD_FAST_LOAD_FAST"), vec![Op(canonical("LOAD_FAST")); 4]);
        m.insert(messiah("LOAD_FAST_LOAD_ATTR_LOAD_FAST"), vec![Op(canonical("LOAD_FAST")), Op(canonical("LOAD_ATTR")), Op(canonical("LOAD_FAST"))]);
        m.insert(messiah("LOAD_GLOBAL_LOAD_ATTR_LOAD_ATTR"), vec![Op(canonical("LOAD_GLOBAL")), Op(canonical("LOAD_ATTR")), Op(canonical("LOAD_ATTR"))]);
        m.insert(messiah("LOAD_FAST_LOAD_ATTR_LOAD_CONST"), vec![Op(canonical("LOAD_FAST")), Op(canonical("LOAD_ATTR")), Op(canonical("LOAD_CONST"))]);
        m.insert(messiah("LOAD_GLOBAL_LOAD_FAST_LOAD_CONST"), vec![Op(canonical("LOAD_GLOBAL")), Op(canonical("LOAD_FAST")), Op(canonical("LOAD_CONST"))]);
        m.insert(messiah("LOAD_FAST_LOAD_FAST_POP_JUMP_IF_FALSE"), vec![Op(canonical("LOAD_FAST")), Op(canonical("LOAD_FAST")), Op(canonical("POP_JUMP_IF_FALSE"))]);
        m.insert(
            messiah("STORE_FAST_LOAD_FAST_LOAD_CONST_COMPARE_OP"),
            vec![Op(canonical("STORE_FAST")), Op(canonical("LOAD_FAST")), Op(canonical("LOAD_CONST")), Op(canonical("COMPARE_OP"))],
        );
        m.insert(
            messiah("LOAD_FAST_LOAD_CONST_COMPARE_OP_LOAD_FAST"),
            vec![Op(canonical("LOAD_FAST")), Op(canonical("LOAD_CONST")), Op(canonical("COMPARE_OP")), Op(canonical("LOAD_FAST"))],
        );
        m.insert(
            messiah("LOAD_DEREF_LOAD_ATTR_LOAD_FAST_BINARY_SUBSCR"),
            vec![Op(canonical("LOAD_DEREF")), Op(canonical("LOAD_ATTR")), Op(canonical("LOAD_FAST")), Op(canonical("BINARY_SUBSCR"))],
        );
        m.insert(
            messiah("STORE_FAST_LOAD_FAST_POP_JUMP_IF_FALSE"),
            vec![Op(canonical("STORE_FAST")), Op(canonical("LOAD_FAST")), Op(canonical("POP_JUMP_IF_FALSE"))],
        );
        m.insert(messiah("LOAD_FAST_LOAD_CONST_BINARY_SUBSCR"), vec![Op(canonical("LOAD_FAST")), Op(canonical("LOAD_CONST")), Op(canonical("BINARY_SUBSCR"))]);
        m.insert(messiah("LOAD_ATTR_LOAD_FAST_CALL_FUNCTION"), vec![Op(canonical("LOAD_ATTR")), Op(canonical("LOAD_FAST")), Op(canonical("CALL_FUNCTION"))]);
        m.insert(messiah("POP_TOP_LOAD_CONST_RETURN_VALUE"), vec![Op(canonical("POP_TOP")), Op(canonical("LOAD_CONST")), Op(canonical("RETURN_VALUE"))]);
        m.insert(messiah("LOAD_GLOBAL_LOAD_ATTR_LOAD_FAST"), vec![Op(canonical("LOAD_GLOBAL")), Op(canonical("LOAD_ATTR")), Op(canonical("LOAD_FAST"))]);
        m.insert(messiah("CALL_FUNCTION_POP_TOP_JUMP_ABSOLUTE"), vec![Op(canonical("CALL_FUNCTION")), Op(canonical("POP_TOP")), Op(canonical("JUMP_ABSOLUTE"))]);
        m.insert(messiah("STORE_FAST_LOAD_FAST_LOAD_FAST"), vec![Op(canonical("STORE_FAST")), Op(canonical("LOAD_FAST")), Op(canonical("LOAD_FAST"))]);
        m.insert(messiah("LOAD_GLOBAL_LOAD_ATTR"), vec![Op(canonical("LOAD_GLOBAL")), Op(canonical("LOAD_ATTR"))]);
        m.insert(messiah("LOAD_DEREF_LOAD_ATTR"), vec![Op(canonical("LOAD_DEREF")), Op(canonical("LOAD_ATTR"))]);
        m.insert(messiah("LOAD_FAST_STORE_FAST"), vec![Op(canonical("LOAD_FAST")), Op(canonical("STORE_FAST"))]);
        m.insert(messiah("LOAD_FAST_POP_JUMP_IF_FALSE"), vec![Op(canonical("LOAD_FAST")), Op(canonical("POP_JUMP_IF_FALSE"))]);
        m.insert(messiah("LOAD_ATTR_COMPARE_OP"), vec![Op(canonical("LOAD_ATTR")), Op(canonical("COMPARE_OP"))]);
        m.insert(messiah("STORE_FAST_STORE_FAST"), vec![Op(canonical("STORE_FAST")), Op(canonical("STORE_FAST"))]);
        m.insert(messiah("POP_JUMP_IF_FALSE_2"), vec![Op(canonical("POP_JUMP_IF_FALSE"))]);
        m.insert(messiah("LOAD_FAST_POP_JUMP_IF_TRUE"), vec![Op(canonical("LOAD_FAST")), Op(canonical("POP_JUMP_IF_TRUE"))]);
        m.insert(messiah("LOAD_CONST_STORE_FAST"), vec![Op(canonical("LOAD_CONST")), Op(canonical("STORE_FAST"))]);
        m.insert(messiah("LOAD_FAST_RETURN_VALUE"), vec![Op(canonical("LOAD_FAST")), Op(canonical("RETURN_VALUE"))]);
        m.insert(messiah("LOAD_FAST_LOAD_GLOBAL"), vec![Op(canonical("LOAD_FAST")), Op(canonical("LOAD_GLOBAL"))]);
        m.insert(messiah("LOAD_GLOBAL_RETURN_VALUE"), vec![Op(canonical("LOAD_GLOBAL")), Op(canonical("RETURN_VALUE"))]);
        m.insert(messiah("LOAD_FAST_BUILD_TUPLE_STORE_FAST"), vec![Op(canonical("LOAD_FAST")), Op(canonical("BUILD_TUPLE")), Op(canonical("STORE_FAST"))]);
        m.insert(messiah("STORE_FAST_LOAD_FAST_LOAD_GLOBAL"), vec![Op(canonical("STORE_FAST")), Op(canonical("LOAD_FAST")), Op(canonical("LOAD_GLOBAL"))]);

        m
    })
}

/// The expansion for a Messiah opcode number, if it is a superinstruction.
/// Returns `None` for opcodes that map 1:1 through [`super::tables::opcode_map`]
/// (including `SKIP_CONST`, which has no expansion entry by design).
pub fn expansion_for(messiah_opcode: u8) -> Option<&'static [ExpansionItem]> {
    table().get(&messiah_opcode).map(Vec::as_slice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::tables::SKIP_CONST;

    #[test]
    fn skip_const_has_no_expansion() {
        assert!(expansion_for(SKIP_CONST).is_none());
    }

    #[test]
    fn load_fast_zero_load_const_uses_fixed_literal() {
        let items = expansion_for(messiah("LOAD_FAST_ZERO_LOAD_CONST")).unwrap();
        assert_eq!(items[0], ExpansionItem::Literal(canonical("LOAD_FAST"), [0, 0]));
        assert_eq!(items[1], ExpansionItem::Opcode(canonical("LOAD_CONST")));
    }

    #[test]
    fn pop_three_expands_to_three_pop_tops() {
        let items = expansion_for(messiah("POP_THREE")).unwrap();
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|i| *i == ExpansionItem::Opcode(canonical("POP_TOP"))));
    }

    #[test]
    fn expansion_table_has_no_entry_for_plain_opcodes() {
        assert!(expansion_for(messiah("POP_TOP")).is_none());
    }
}
