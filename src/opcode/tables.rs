//! Frozen opcode name/number tables for the Messiah dialect and canonical
//! CPython 2.7, plus the derived Messiah→canonical number map.
//!
//! The concrete numbering is taken verbatim from the original tool's
//! `get_messiah_opcodes`/`get_python_27_opcodes` definitions: every name
//! appears at most once per table and every number appears at most once per
//! table.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Opcode number at and above which an instruction carries a 2-byte argument,
/// in both the canonical and the Messiah stream.
pub const HAVE_ARGUMENT: u8 = 90;

/// Messiah opcode number of `SKIP_CONST`, the opcode explicitly treated as
/// "always carries a 2-byte argument" even though it has no expansion entry.
pub const SKIP_CONST: u8 = 163;

/// `(name, opcode number)` pairs for canonical CPython 2.7. Every name here
/// also exists in [`MESSIAH_OPCODES`] under (generally) a different number.
pub static CANONICAL_OPCODES: &[(&str, u8)] = &[
    ("POP_TOP", 1),
    ("ROT_TWO", 2),
    ("ROT_THREE", 3),
    ("DUP_TOP", 4),
    ("ROT_FOUR", 5),
    ("NOP", 9),
    ("UNARY_POSITIVE", 10),
    ("UNARY_NEGATIVE", 11),
    ("UNARY_NOT", 12),
    ("UNARY_CONVERT", 13),
    ("UNARY_INVERT", 15),
    ("BINARY_POWER", 19),
    ("BINARY_MULTIPLY", 20),
    ("BINARY_DIVIDE", 21),
    ("BINARY_MODULO", 22),
    ("BINARY_ADD", 23),
    ("BINARY_SUBTRACT", 24),
    ("BINARY_SUBSCR", 25),
    ("BINARY_FLOOR_DIVIDE", 26),
    ("BINARY_TRUE_DIVIDE", 27),
    ("INPLACE_FLOOR_DIVIDE", 28),
    ("INPLACE_TRUE_DIVIDE", 29),
    ("SLICE_0", 30),
    ("SLICE_1", 31),
    ("SLICE_2", 32),
    ("SLICE_3", 33),
    ("STORE_SLICE_0", 40),
    ("STORE_SLICE_1", 41),
    ("STORE_SLICE_2", 42),
    ("STORE_SLICE_3", 43),
    ("DELETE_SLICE_0", 50),
    ("DELETE_SLICE_1", 51),
    ("DELETE_SLICE_2", 52),
    ("DELETE_SLICE_3", 53),
    ("STORE_MAP", 54),
    ("INPLACE_ADD", 55),
    ("INPLACE_SUBTRACT", 56),
    ("INPLACE_MULTIPLY", 57),
    ("INPLACE_DIVIDE", 58),
    ("INPLACE_MODULO", 59),
    ("STORE_SUBSCR", 60),
    ("DELETE_SUBSCR", 61),
    ("BINARY_LSHIFT", 62),
    ("BINARY_RSHIFT", 63),
    ("BINARY_AND", 64),
    ("BINARY_XOR", 65),
    ("BINARY_OR", 66),
    ("INPLACE_POWER", 67),
    ("GET_ITER", 68),
    ("PRINT_EXPR", 70),
    ("PRINT_ITEM", 71),
    ("PRINT_NEWLINE", 72),
    ("PRINT_ITEM_TO", 73),
    ("PRINT_NEWLINE_TO", 74),
    ("INPLACE_LSHIFT", 75),
    ("INPLACE_RSHIFT", 76),
    ("INPLACE_AND", 77),
    ("INPLACE_XOR", 78),
    ("INPLACE_OR", 79),
    ("BREAK_LOOP", 80),
    ("WITH_CLEANUP", 81),
    ("LOAD_LOCALS", 82),
    ("RETURN_VALUE", 83),
    ("IMPORT_STAR", 84),
    ("EXEC_STMT", 85),
    ("YIELD_VALUE", 86),
    ("POP_BLOCK", 87),
    ("END_FINALLY", 88),
    ("BUILD_CLASS", 89),
    ("STORE_NAME", 90),
    ("DELETE_NAME", 91),
    ("UNPACK_SEQUENCE", 92),
    ("FOR_ITER", 93),
    ("LIST_APPEND", 94),
    ("STORE_ATTR", 95),
    ("DELETE_ATTR", 96),
    ("STORE_GLOBAL", 97),
    ("DELETE_GLOBAL", 98),
    ("DUP_TOPX", 99),
    ("LOAD_CONST", 100),
    ("LOAD_NAME", 101),
    ("BUILD_TUPLE", 102),
    ("BUILD_LIST", 103),
    ("BUILD_SET", 104),
    ("BUILD_MAP", 105),
    ("LOAD_ATTR", 106),
    ("COMPARE_OP", 107),
    ("IMPORT_NAME", 108),
    ("IMPORT_FROM", 109),
    ("JUMP_FORWARD", 110),
    ("JUMP_IF_FALSE_OR_POP", 111),
    ("JUMP_IF_TRUE_OR_POP", 112),
    ("JUMP_ABSOLUTE", 113),
    ("POP_JUMP_IF_FALSE", 114),
    ("POP_JUMP_IF_TRUE", 115),
    ("LOAD_GLOBAL", 116),
    ("CONTINUE_LOOP", 119),
    ("SETUP_LOOP", 120),
    ("SETUP_EXCEPT", 121),
    ("SETUP_FINALLY", 122),
    ("LOAD_FAST", 124),
    ("STORE_FAST", 125),
    ("DELETE_FAST", 126),
    ("RAISE_VARARGS", 130),
    ("CALL_FUNCTION", 131),
    ("MAKE_FUNCTION", 132),
    ("BUILD_SLICE", 133),
    ("MAKE_CLOSURE", 134),
    ("LOAD_CLOSURE", 135),
    ("LOAD_DEREF", 136),
    ("STORE_DEREF", 137),
    ("CALL_FUNCTION_VAR", 140),
    ("CALL_FUNCTION_KW", 141),
    ("CALL_FUNCTION_VAR_KW", 142),
    ("SETUP_WITH", 143),
    ("EXTENDED_ARG", 145),
    ("SET_ADD", 146),
    ("MAP_ADD", 147),
];

/// `(name, opcode number)` pairs for the Messiah dialect: the same core
/// opcode names as [`CANONICAL_OPCODES`] (scrambled to different numbers)
/// plus the fused superinstruction names consumed by
/// [`crate::opcode::expansion`].
pub static MESSIAH_OPCODES: &[(&str, u8)] = &[
    ("POP_TOP", 68),
    ("ROT_TWO", 58),
    ("ROT_THREE", 62),
    ("DUP_TOP", 84),
    ("ROT_FOUR", 56),
    ("NOP", 9),
    ("UNARY_POSITIVE", 10),
    ("UNARY_NEGATIVE", 11),
    ("UNARY_NOT", 12),
    ("UNARY_CONVERT", 13),
    ("UNARY_INVERT", 15),
    ("BINARY_POWER", 19),
    ("BINARY_MULTIPLY", 80),
    ("BINARY_DIVIDE", 22),
    ("BINARY_MODULO", 83),
    ("BINARY_ADD", 89),
    ("BINARY_SUBTRACT", 1),
    ("BINARY_SUBSCR", 24),
    ("BINARY_FLOOR_DIVIDE", 26),
    ("BINARY_TRUE_DIVIDE", 27),
    ("INPLACE_FLOOR_DIVIDE", 28),
    ("INPLACE_TRUE_DIVIDE", 29),
    ("SLICE_0", 30),
    ("SLICE_1", 31),
    ("SLICE_2", 32),
    ("SLICE_3", 33),
    ("STORE_SLICE_0", 40),
    ("STORE_SLICE_1", 41),
    ("STORE_SLICE_2", 42),
    ("STORE_SLICE_3", 43),
    ("DELETE_SLICE_0", 50),
    ("DELETE_SLICE_1", 51),
    ("DELETE_SLICE_2", 52),
    ("DELETE_SLICE_3", 53),
    ("STORE_MAP", 78),
    ("INPLACE_ADD", 2),
    ("INPLACE_SUBTRACT", 20),
    ("INPLACE_MULTIPLY", 60),
    ("INPLACE_DIVIDE", 23),
    ("INPLACE_MODULO", 63),
    ("STORE_SUBSCR", 3),
    ("DELETE_SUBSCR", 75),
    ("BINARY_LSHIFT", 61),
    ("BINARY_RSHIFT", 0),
    ("BINARY_AND", 57),
    ("BINARY_XOR", 65),
    ("BINARY_OR", 55),
    ("INPLACE_POWER", 64),
    ("GET_ITER", 59),
    ("PRINT_EXPR", 70),
    ("PRINT_ITEM", 71),
    ("PRINT_NEWLINE", 72),
    ("PRINT_ITEM_TO", 73),
    ("PRINT_NEWLINE_TO", 74),
    ("INPLACE_LSHIFT", 85),
    ("INPLACE_RSHIFT", 66),
    ("INPLACE_AND", 86),
    ("INPLACE_XOR", 21),
    ("INPLACE_OR", 4),
    ("BREAK_LOOP", 5),
    ("WITH_CLEANUP", 81),
    ("LOAD_LOCALS", 76),
    ("RETURN_VALUE", 88),
    ("IMPORT_STAR", 54),
    ("EXEC_STMT", 67),
    ("YIELD_VALUE", 79),
    ("POP_BLOCK", 82),
    ("END_FINALLY", 87),
    ("BUILD_CLASS", 77),
    ("STORE_NAME", 135),
    ("DELETE_NAME", 120),
    ("UNPACK_SEQUENCE", 92),
    ("FOR_ITER", 121),
    ("LIST_APPEND", 124),
    ("STORE_ATTR", 126),
    ("DELETE_ATTR", 107),
    ("STORE_GLOBAL", 106),
    ("DELETE_GLOBAL", 96),
    ("DUP_TOPX", 115),
    ("LOAD_CONST", 100),
    ("LOAD_NAME", 101),
    ("BUILD_TUPLE", 102),
    ("BUILD_LIST", 99),
    ("BUILD_SET", 134),
    ("BUILD_MAP", 93),
    ("LOAD_ATTR", 114),
    ("COMPARE_OP", 146),
    ("IMPORT_NAME", 108),
    ("IMPORT_FROM", 109),
    ("JUMP_FORWARD", 110),
    ("JUMP_IF_FALSE_OR_POP", 111),
    ("JUMP_IF_TRUE_OR_POP", 112),
    ("JUMP_ABSOLUTE", 113),
    ("POP_JUMP_IF_FALSE", 94),
    ("POP_JUMP_IF_TRUE", 104),
    ("LOAD_GLOBAL", 116),
    ("CONTINUE_LOOP", 90),
    ("SETUP_LOOP", 105),
    ("SETUP_EXCEPT", 137),
    ("SETUP_FINALLY", 147),
    ("LOAD_FAST", 95),
    ("STORE_FAST", 103),
    ("DELETE_FAST", 97),
    ("RAISE_VARARGS", 130),
    ("CALL_FUNCTION", 131),
    ("MAKE_FUNCTION", 132),
    ("BUILD_SLICE", 133),
    ("MAKE_CLOSURE", 119),
    ("LOAD_CLOSURE", 91),
    ("LOAD_DEREF", 125),
    ("STORE_DEREF", 136),
    ("CALL_FUNCTION_VAR", 140),
    ("CALL_FUNCTION_KW", 141),
    ("CALL_FUNCTION_VAR_KW", 142),
    ("SETUP_WITH", 143),
    ("EXTENDED_ARG", 145),
    ("SET_ADD", 98),
    ("MAP_ADD", 122),
    // Superinstructions (fused sequences, see `opcode::expansion`).
    ("POP_THREE", 6),
    ("RETURN_SUBSCR", 7),
    ("POP_TWO", 8),
    ("LOAD_LOCALS_RETURN_VALUE", 49),
    ("POP_TOP_POP_BLOCK", 69),
    ("RETURN_CONST", 117),
    ("POP_TOP_LOAD_GLOBAL", 118),
    ("POP_TOP_JUMP_FORWARD", 123),
    ("LOAD_CONST_BINARY_SUBSCR", 127),
    ("POP_TOP_LOAD_FAST", 128),
    ("LOAD_CONST_STORE_MAP", 129),
    ("CALL_FUNCTION_POP_TOP", 138),
    ("POP_TOP_LOAD_CONST", 139),
    ("LOAD_CONST_LOAD_CONST", 150),
    ("STORE_FAST_LOAD_FAST", 151),
    ("LOAD_ATTR_LOAD_GLOBAL", 152),
    ("LOAD_FAST_CALL_FUNCTION_POP_TOP", 153),
    ("COMPARE_OP_JUMP_IF_FALSE", 154),
    ("LOAD_CONST_CALL_FUNCTION", 155),
    ("LOAD_FAST_LOAD_CONST", 156),
    ("STORE_NAME_LOAD_CONST", 157),
    ("LOAD_ATTR_LOAD_FAST", 158),
    ("MAKE_FUNCTION_STORE_NAME", 159),
    ("LOAD_ATTR_CALL_FUNCTION", 160),
    ("LOAD_CONST_COMPARE_OP", 161),
    ("LOAD_ATTR_LOAD_ATTR", 162),
    ("SKIP_CONST", 163),
    ("LOAD_CONST_LOAD_CONST_BUILD_TUPLE", 164),
    ("LOAD_GLOBAL_CALL_FUNCTION", 165),
    ("LOAD_CONST_LOAD_FAST", 166),
    ("STORE_FAST_LOAD_GLOBAL", 167),
    ("LOAD_FAST_CALL_FUNCTION", 168),
    ("CALL_FUNCTION_STORE_FAST", 169),
    ("LOAD_FAST_LOAD_ATTR", 170),
    ("LOAD_ATTR_CALL_FUNCTION_POP_TOP", 171),
    ("LOAD_FAST_LOAD_FAST", 172),
    ("LOAD_FAST_ZERO_LOAD_CONST", 173),
    ("LOAD_FAST_STORE_ATTR", 174),
    ("LOAD_CONST_LOAD_CONST_STORE_MAP", 175),
    ("LOAD_GLOBAL_CALL_FUNCTION_POP_TOP", 176),
    ("LOAD_GLOBAL_LOAD_FAST", 177),
    ("CALL_FUNCTION_POP_TOP_LOAD_FAST", 178),
    ("CALL_FUNCTION_CALL_FUNCTION", 179),
    ("LOAD_CONST_MAKE_FUNCTION", 180),
    ("LOAD_CONST_IMPORT_NAME", 181),
    (
        "LOAD_FAST_LOAD_CONST_BINARY_SUBSCR_LOAD_FAST_LOAD_CONST_BINARY_SUBSCR_CALL_FUNCTION",
        182,
    ),
    (
        "LOAD_GLOBAL_LOAD_ATTR_LOAD_FAST_LOAD_ATTR_LOAD_FAST_LOAD_FAST",
        188,
    ),
    (
        "LOAD_GLOBAL_LOAD_ATTR_LOAD_ATTR_LOAD_GLOBAL_LOAD_ATTR_LOAD_ATTR",
        189,
    ),
    (
        "LOAD_FAST_LOAT_ATTR_LOAD_CONST_LOAD_CONST_CALL_FUNCTION",
        190,
    ),
    (
        "LOAD_GLOABL_LOAD_ATTR_LOAD_ATTR_COMPARE_OP_LOAD_FAST",
        191,
    ),
    ("LOAD_FAST_LOAD_ATTR_LOAD_FAST_CALL_FUNCTION", 193),
    ("LOAD_FAST_LOAD_ATTR_LOAD_FAST_LOAD_ATTR", 194),
    ("LOAD_FAST_LOAD_FAST_LOAD_FAST_CALL_FUNCTION", 195),
    ("LOAD_ATTR_LOAD_FAST_LOAD_FAST_CALL_FUNCTION", 196),
    ("LOAD_FAST_LOAD_ATTR_LOAD_ATTR", 197),
    ("LOAD_FAST_LOAD_ATTR_CALL_FUNCTION", 198),
    ("LOAD_FAST_LOAD_ATTR_RETURN_VALUE", 199),
    ("LOAD_FAST_LOAD_ATTR_JUMP_IF_FALSE", 200),
    (
        "LOAD_FAST_LOAD_FAST_LOAD_FAST_LOAD_FAST_LOAD_FAST_LOAD_FAST",
        201,
    ),
    ("LOAD_FAST_LOAD_FAST_LOAD_FAST_LOAD_FAST", 202),
    ("LOAD_FAST_LOAD_ATTR_LOAD_FAST", 203),
    ("LOAD_GLOBAL_LOAD_ATTR_LOAD_ATTR", 204),
    ("LOAD_FAST_LOAD_ATTR_LOAD_CONST", 205),
    ("LOAD_GLOBAL_LOAD_FAST_LOAD_CONST", 206),
    ("LOAD_FAST_LOAD_FAST_POP_JUMP_IF_FALSE", 207),
    ("STORE_FAST_LOAD_FAST_LOAD_CONST_COMPARE_OP", 208),
    ("LOAD_FAST_LOAD_CONST_COMPARE_OP_LOAD_FAST", 209),
    ("LOAD_DEREF_LOAD_ATTR_LOAD_FAST_BINARY_SUBSCR", 210),
    ("STORE_FAST_LOAD_FAST_POP_JUMP_IF_FALSE", 211),
    ("LOAD_FAST_LOAD_CONST_BINARY_SUBSCR", 212),
    ("LOAD_ATTR_LOAD_FAST_CALL_FUNCTION", 213),
    ("POP_TOP_LOAD_CONST_RETURN_VALUE", 215),
    ("LOAD_GLOBAL_LOAD_ATTR_LOAD_FAST", 216),
    ("CALL_FUNCTION_POP_TOP_JUMP_ABSOLUTE", 217),
    ("STORE_FAST_LOAD_FAST_LOAD_FAST", 218),
    ("LOAD_GLOBAL_LOAD_ATTR", 219),
    ("LOAD_DEREF_LOAD_ATTR", 220),
    ("LOAD_FAST_STORE_FAST", 221),
    ("LOAD_FAST_POP_JUMP_IF_FALSE", 222),
    ("LOAD_ATTR_COMPARE_OP", 223),
    ("STORE_FAST_STORE_FAST", 224),
    ("POP_JUMP_IF_FALSE_2", 225),
    ("LOAD_FAST_POP_JUMP_IF_TRUE", 226),
    ("LOAD_CONST_STORE_FAST", 227),
    ("LOAD_FAST_RETURN_VALUE", 228),
    ("LOAD_FAST_LOAD_GLOBAL", 229),
    ("LOAD_GLOBAL_RETURN_VALUE", 230),
    ("LOAD_FAST_BUILD_TUPLE_STORE_FAST", 231),
    ("STORE_FAST_LOAD_FAST_LOAD_GLOBAL", 232),
];

fn name_to_number(table: &'static [(&'static str, u8)]) -> &'static HashMap<&'static str, u8> {
    static CANONICAL: OnceLock<HashMap<&'static str, u8>> = OnceLock::new();
    static MESSIAH: OnceLock<HashMap<&'static str, u8>> = OnceLock::new();

    let cell = if std::ptr::eq(table, CANONICAL_OPCODES) {
        &CANONICAL
    } else {
        &MESSIAH
    };
    cell.get_or_init(|| table.iter().copied().collect())
}

/// Look up the canonical 2.7 opcode number for an opcode name.
pub fn canonical_number(name: &str) -> Option<u8> {
    name_to_number(CANONICAL_OPCODES).get(name).copied()
}

/// Look up the Messiah opcode number for an opcode name.
pub fn messiah_number(name: &str) -> Option<u8> {
    name_to_number(MESSIAH_OPCODES).get(name).copied()
}

/// The Messiah→canonical opcode number bijection, derived once from the two
/// name tables: for every name common to both tables, maps the Messiah
/// number to the canonical number. Superinstruction-only names (present only
/// in [`MESSIAH_OPCODES`]) have no entry here — they are resolved through
/// [`crate::opcode::expansion::expansion_for`] instead.
pub fn opcode_map() -> &'static HashMap<u8, u8> {
    static MAP: OnceLock<HashMap<u8, u8>> = OnceLock::new();
    MAP.get_or_init(|| {
        CANONICAL_OPCODES
            .iter()
            .filter_map(|(name, canonical)| messiah_number(name).map(|messiah| (messiah, *canonical)))
            .collect()
    })
}

/// Whether an opcode (interpreted under the given table's numbering) carries
/// a 2-byte argument.
pub fn has_argument(opcode: u8) -> bool {
    opcode >= HAVE_ARGUMENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_have_no_duplicate_names_or_numbers() {
        for table in [CANONICAL_OPCODES, MESSIAH_OPCODES] {
            let mut names = std::collections::HashSet::new();
            let mut numbers = std::collections::HashSet::new();
            for (name, number) in table {
                assert!(names.insert(name), "duplicate name {name}");
                assert!(numbers.insert(number), "duplicate number {number}");
            }
        }
    }

    #[test]
    fn opcode_map_round_trips_core_opcodes() {
        let map = opcode_map();
        assert_eq!(map[&messiah_number("JUMP_ABSOLUTE").unwrap()], canonical_number("JUMP_ABSOLUTE").unwrap());
        assert_eq!(map[&messiah_number("POP_TOP").unwrap()], canonical_number("POP_TOP").unwrap());
        // Superinstruction-only numbers never appear as keys.
        assert!(!map.contains_key(&messiah_number("POP_THREE").unwrap()));
    }

    #[test]
    fn have_argument_threshold_is_90() {
        assert!(has_argument(90));
        assert!(!has_argument(89));
    }
}
