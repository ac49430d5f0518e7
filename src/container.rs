//! File driver: strips/prepends the 8-byte container header around a
//! single marshalled top-level value.

use crate::error::Error;
use crate::marshal::{self, Value};
use crate::retarget::FailurePolicy;

/// Fixed canonical CPython 2.7 `.pyc` header this tool always emits,
/// regardless of the input file's own (opaque, discarded) header.
pub const CANONICAL_HEADER: [u8; 8] = [0x03, 0xF3, 0x0D, 0x0A, 0xFF, 0xFF, 0xFF, 0xFF];

const HEADER_LEN: usize = 8;

/// Strip the header, decode the body, re-encode with the default (identity)
/// tables, and prepend the canonical header. Returns the reconstructed
/// filename (from the top-level code object, backslashes converted to
/// forward slashes) and the output bytes.
pub fn retarget(input: &[u8]) -> Result<(String, Vec<u8>), Error> {
    retarget_with_tables(input, crate::opcode::opcode_map(), crate::opcode::expansion_for)
}

/// Same as [`retarget`] but with caller-supplied opcode tables, used by the
/// batch/single-file CLI commands once a [`crate::config::RetargetConfig`]
/// has resolved which tables to use.
pub fn retarget_with_tables(
    input: &[u8],
    opmap: &std::collections::HashMap<u8, u8>,
    expansion_for: impl Fn(u8) -> Option<&'static [crate::opcode::ExpansionItem]> + Copy,
) -> Result<(String, Vec<u8>), Error> {
    retarget_with_policy(input, opmap, expansion_for, FailurePolicy::default())
}

/// Same as [`retarget_with_tables`], but honoring a [`FailurePolicy`] for the
/// retargeter's recoverable conditions — used by the CLI once
/// [`crate::config::RetargetConfig::opcodes`] has resolved which conditions
/// should abort the file instead of logging and continuing.
pub fn retarget_with_policy(
    input: &[u8],
    opmap: &std::collections::HashMap<u8, u8>,
    expansion_for: impl Fn(u8) -> Option<&'static [crate::opcode::ExpansionItem]> + Copy,
    policy: FailurePolicy,
) -> Result<(String, Vec<u8>), Error> {
    let body = input.get(HEADER_LEN..).unwrap_or(&[]);
    let value = marshal::decode(body)?;
    let filename = extract_filename(&value);
    let encoded = marshal::encode_with_policy(&value, opmap, expansion_for, policy)?;

    let mut output = Vec::with_capacity(HEADER_LEN + encoded.len());
    output.extend_from_slice(&CANONICAL_HEADER);
    output.extend_from_slice(&encoded);
    Ok((filename, output))
}

fn extract_filename(value: &Value) -> String {
    let raw = match value {
        Value::Code(code) => match &code.filename {
            Value::Bytes(bytes) | Value::Interned(bytes) => Some(bytes.as_slice()),
            Value::Unicode { bytes } => Some(bytes.as_slice()),
            Value::StringRef { payload, .. } => Some(payload.as_slice()),
            _ => None,
        },
        _ => None,
    };
    let raw = raw.unwrap_or(b"");
    String::from_utf8_lossy(raw).replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marshal::Code;

    fn minimal_code_value(filename: &str) -> Value {
        Value::Code(Box::new(Code {
            argcount: 0,
            nlocals: 0,
            stacksize: 0,
            flags: 0,
            code: Value::Bytes(vec![]),
            consts: Value::Tuple(vec![]),
            names: Value::Tuple(vec![]),
            varnames: Value::Tuple(vec![]),
            freevars: Value::Tuple(vec![]),
            cellvars: Value::Tuple(vec![]),
            filename: Value::Bytes(filename.as_bytes().to_vec()),
            name: Value::Bytes(b"<module>".to_vec()),
            firstlineno: 1,
            lnotab: Value::Bytes(vec![]),
        }))
    }

    #[test]
    fn retarget_prepends_canonical_header_and_reports_filename() {
        let value = minimal_code_value("scripts\\main.py");
        let body = marshal::encode(&value).unwrap();
        let mut input = vec![0u8; 8];
        input.extend_from_slice(&body);

        let (filename, output) = retarget(&input).unwrap();
        assert_eq!(filename, "scripts/main.py");
        assert_eq!(&output[..8], &CANONICAL_HEADER);
    }
}
