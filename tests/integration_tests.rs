//! End-to-end conversions through [`pyc_retarget::container::retarget`],
//! covering the concrete scenarios a Messiah-dialect file actually exercises:
//! superinstruction expansion, jump fixup, and string-table degradation, all
//! wrapped in the real container header.

use pyc_retarget::container::{retarget, CANONICAL_HEADER};
use pyc_retarget::marshal::{self, Code, Value};
use pyc_retarget::opcode::tables;

fn code_object(code_bytes: Vec<u8>, lnotab: Vec<u8>, firstlineno: i32, consts: Vec<Value>) -> Value {
    Value::Code(Box::new(Code {
        argcount: 0,
        nlocals: 0,
        stacksize: 1,
        flags: 0,
        code: Value::Bytes(code_bytes),
        consts: Value::Tuple(consts),
        names: Value::Tuple(vec![]),
        varnames: Value::Tuple(vec![]),
        freevars: Value::Tuple(vec![]),
        cellvars: Value::Tuple(vec![]),
        filename: Value::Interned(b"module.py".to_vec()),
        name: Value::Interned(b"<module>".to_vec()),
        firstlineno,
        lnotab,
    }))
}

fn wrap_with_opaque_header(body: &[u8]) -> Vec<u8> {
    let mut input = vec![0u8; 8];
    input.extend_from_slice(body);
    input
}

#[test]
fn retarget_prepends_canonical_header_to_any_input_header() {
    let messiah_pop_top = tables::messiah_number("POP_TOP").unwrap();
    let value = code_object(vec![messiah_pop_top], vec![], 1, vec![]);
    let body = marshal::encode(&value).unwrap();
    let input = wrap_with_opaque_header(&body);

    let (filename, output) = retarget(&input).unwrap();
    assert_eq!(filename, "module.py");
    assert_eq!(&output[..8], &CANONICAL_HEADER);
}

#[test]
fn superinstruction_expands_inside_a_full_file_round_trip() {
    let pop_three = tables::messiah_number("POP_THREE").unwrap();
    let value = code_object(vec![pop_three], vec![], 1, vec![]);
    let body = marshal::encode(&value).unwrap();
    let input = wrap_with_opaque_header(&body);

    let (_, output) = retarget(&input).unwrap();
    let decoded = marshal::decode(&output[8..]).unwrap();
    let Value::Code(code) = decoded else { panic!("expected code object") };
    let Value::Bytes(code_bytes) = code.code else { panic!("expected bytes") };

    let pop_top = tables::canonical_number("POP_TOP").unwrap();
    assert_eq!(code_bytes, vec![pop_top, pop_top, pop_top]);
}

#[test]
fn absolute_jump_target_is_fixed_up_after_expansion_shifts_offsets() {
    // POP_THREE (expands to 3 bytes) then JUMP_ABSOLUTE targeting the
    // instruction right after POP_THREE in the *original* numbering.
    let pop_three = tables::messiah_number("POP_THREE").unwrap();
    let jump_absolute_messiah = tables::messiah_number("JUMP_ABSOLUTE").unwrap();
    let jump_absolute_canonical = tables::canonical_number("JUMP_ABSOLUTE").unwrap();

    let original = vec![pop_three, jump_absolute_messiah, 1, 0];
    let value = code_object(original, vec![], 1, vec![]);
    let body = marshal::encode(&value).unwrap();
    let input = wrap_with_opaque_header(&body);

    let (_, output) = retarget(&input).unwrap();
    let decoded = marshal::decode(&output[8..]).unwrap();
    let Value::Code(code) = decoded else { panic!("expected code object") };
    let Value::Bytes(code_bytes) = code.code else { panic!("expected bytes") };

    // POP_THREE -> 3 POP_TOPs (offsets 0,1,2), JUMP_ABSOLUTE now starts at 3.
    assert_eq!(code_bytes[3], jump_absolute_canonical);
    let target = u16::from_le_bytes([code_bytes[4], code_bytes[5]]);
    assert_eq!(target, 3, "original target byte 1 now lands on the jump instruction itself");
}

#[test]
fn dict_with_interned_and_stringref_keys_round_trips_through_a_file() {
    let key = Value::Interned(b"__name__".to_vec());
    let value_entry = Value::StringRef {
        index: 0,
        payload: b"__name__".to_vec(),
    };
    let dict = Value::Dict(vec![(key, value_entry)]);
    let value = code_object(vec![], vec![], 1, vec![dict]);
    let body = marshal::encode(&value).unwrap();
    let input = wrap_with_opaque_header(&body);

    let (_, output) = retarget(&input).unwrap();
    let decoded = marshal::decode(&output[8..]).unwrap();
    let Value::Code(code) = decoded else { panic!("expected code object") };
    let Value::Tuple(consts) = code.consts else { panic!("expected tuple") };
    let Value::Dict(pairs) = &consts[0] else { panic!("expected dict") };
    assert_eq!(pairs.len(), 1);
}

#[test]
fn abort_policy_fails_the_file_instead_of_logging_and_continuing() {
    use pyc_retarget::container::retarget_with_policy;
    use pyc_retarget::retarget::FailurePolicy;

    // 69 is unused by both MESSIAH_OPCODES and the expansion table, and below
    // HAVE_ARGUMENT, so it forms one complete instruction with no mapping.
    let value = code_object(vec![69], vec![], 1, vec![]);
    let body = marshal::encode(&value).unwrap();
    let input = wrap_with_opaque_header(&body);

    let lenient = retarget_with_policy(
        &input,
        tables::opcode_map(),
        pyc_retarget::opcode::expansion_for,
        FailurePolicy::default(),
    );
    assert!(lenient.is_ok(), "default policy recovers from an unknown opcode");

    let strict = retarget_with_policy(
        &input,
        tables::opcode_map(),
        pyc_retarget::opcode::expansion_for,
        FailurePolicy {
            abort_on_unknown_opcode: true,
            abort_on_unresolved_jump: false,
        },
    );
    assert!(strict.is_err(), "abort policy fails the file on an unknown opcode");
}

#[cfg(feature = "cli")]
mod cli {
    use assert_cmd::Command;
    use std::io::Write;

    #[test]
    fn retarget_subcommand_converts_a_minimal_file() {
        use pyc_retarget::marshal::{self, Code, Value};
        use pyc_retarget::opcode::tables;

        let pop_top = tables::messiah_number("POP_TOP").unwrap();
        let value = Value::Code(Box::new(Code {
            argcount: 0,
            nlocals: 0,
            stacksize: 1,
            flags: 0,
            code: Value::Bytes(vec![pop_top]),
            consts: Value::Tuple(vec![]),
            names: Value::Tuple(vec![]),
            varnames: Value::Tuple(vec![]),
            freevars: Value::Tuple(vec![]),
            cellvars: Value::Tuple(vec![]),
            filename: Value::Interned(b"m.py".to_vec()),
            name: Value::Interned(b"<module>".to_vec()),
            firstlineno: 1,
            lnotab: Value::Bytes(vec![]),
        }));
        let mut body = vec![0u8; 8];
        body.extend_from_slice(&marshal::encode(&value).unwrap());

        let input_dir = tempfile::tempdir().unwrap();
        let input_path = input_dir.path().join("in.pyc27");
        std::fs::File::create(&input_path).unwrap().write_all(&body).unwrap();
        let output_path = input_dir.path().join("out.pyc");

        Command::cargo_bin("pyc-retarget")
            .unwrap()
            .arg("retarget")
            .arg(&input_path)
            .arg(&output_path)
            .assert()
            .success();

        let output_bytes = std::fs::read(&output_path).unwrap();
        assert_eq!(&output_bytes[..8], &pyc_retarget::container::CANONICAL_HEADER);
    }
}
