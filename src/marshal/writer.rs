//! Marshal encoder: walks a [`Value`] tree back into bytes, degrading
//! unresolvable `StringRef`s to `Interned` and delegating code-byte rewriting
//! to the retargeter.

use crate::error::{Error, MarshalError};
use crate::opcode;
use crate::retarget::{self, FailurePolicy};

use super::interning::InterningTable;
use super::tags;
use super::value::{Code, Value};

type Result<T> = std::result::Result<T, Error>;

/// Encode `value` with the default (identity) opcode tables — used for
/// round-trip tests and for files that need no retargeting.
pub fn encode(value: &Value) -> Result<Vec<u8>> {
    encode_with_tables(value, opcode::opcode_map(), |n| opcode::expansion_for(n))
}

/// Encode `value`, rewriting any `Code` bytes found with the given
/// Messiah→canonical map and expansion table.
pub fn encode_with_tables<F>(
    value: &Value,
    opmap: &std::collections::HashMap<u8, u8>,
    expansion_for: F,
) -> Result<Vec<u8>>
where
    F: Fn(u8) -> Option<&'static [opcode::ExpansionItem]> + Copy,
{
    encode_with_policy(value, opmap, expansion_for, FailurePolicy::default())
}

/// Same as [`encode_with_tables`], but honoring a [`FailurePolicy`] for the
/// retargeter's recoverable conditions (unknown opcode, unresolved jump)
/// instead of always logging and continuing.
pub fn encode_with_policy<F>(
    value: &Value,
    opmap: &std::collections::HashMap<u8, u8>,
    expansion_for: F,
    policy: FailurePolicy,
) -> Result<Vec<u8>>
where
    F: Fn(u8) -> Option<&'static [opcode::ExpansionItem]> + Copy,
{
    let mut out = Vec::new();
    let mut table = InterningTable::new();
    write_value(&mut out, &mut table, value, opmap, expansion_for, policy)?;
    Ok(out)
}

fn write_u8(out: &mut Vec<u8>, byte: u8) {
    out.push(byte);
}

fn write_i32(out: &mut Vec<u8>, value: i32) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn write_i64(out: &mut Vec<u8>, value: i64) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn write_u32_len(out: &mut Vec<u8>, len: u32) {
    out.extend_from_slice(&len.to_le_bytes());
}

fn write_float_literal(out: &mut Vec<u8>, value: f64) {
    let text = format!("{value:?}");
    out.push(text.len() as u8);
    out.extend_from_slice(text.as_bytes());
}

fn write_binary_float(out: &mut Vec<u8>, value: f64) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn write_bytes_like(out: &mut Vec<u8>, tag: u8, payload: &[u8]) {
    write_u8(out, tag);
    write_u32_len(out, payload.len() as u32);
    out.extend_from_slice(payload);
}

fn write_value<F>(
    out: &mut Vec<u8>,
    table: &mut InterningTable,
    value: &Value,
    opmap: &std::collections::HashMap<u8, u8>,
    expansion_for: F,
    policy: FailurePolicy,
) -> Result<()>
where
    F: Fn(u8) -> Option<&'static [opcode::ExpansionItem]> + Copy,
{
    match value {
        Value::Null => write_u8(out, tags::NULL),
        Value::None => write_u8(out, tags::NONE),
        Value::True => write_u8(out, tags::TRUE),
        Value::False => write_u8(out, tags::FALSE),
        Value::StopIteration => write_u8(out, tags::STOPITER),
        Value::Ellipsis => write_u8(out, tags::ELLIPSIS),
        Value::Int32(v) => {
            write_u8(out, tags::INT);
            write_i32(out, *v);
        }
        Value::Int64(v) => {
            write_u8(out, tags::INT64);
            write_i64(out, *v);
        }
        Value::Long { negative, digits } => {
            write_u8(out, tags::LONG);
            let count = digits.len() as i32;
            write_i32(out, if *negative { -count } else { count });
            for digit in digits {
                out.extend_from_slice(&digit.to_le_bytes());
            }
        }
        Value::Float(v) => {
            write_u8(out, tags::FLOAT);
            write_float_literal(out, *v);
        }
        Value::BinaryFloat(v) => {
            write_u8(out, tags::BINARY_FLOAT);
            write_binary_float(out, *v);
        }
        Value::Complex { real, imag } => {
            write_u8(out, tags::COMPLEX);
            write_float_literal(out, *real);
            write_float_literal(out, *imag);
        }
        Value::BinaryComplex { real, imag } => {
            write_u8(out, tags::BINARY_COMPLEX);
            write_binary_float(out, *real);
            write_binary_float(out, *imag);
        }
        Value::Bytes(payload) => write_bytes_like(out, tags::STRING, payload),
        Value::Interned(payload) => {
            table.intern(payload.clone());
            write_bytes_like(out, tags::INTERNED, payload);
        }
        Value::StringRef { payload, .. } => match table.index_of(payload) {
            Some(index) => {
                write_u8(out, tags::STRINGREF);
                write_u32_len(out, index);
            }
            None => {
                // Degrade to `Interned`: the writer's own table (built by
                // walking this same tree) never saw this payload, so there
                // is no index to refer back to.
                table.intern(payload.clone());
                write_bytes_like(out, tags::INTERNED, payload);
            }
        },
        Value::Unicode { bytes } => write_bytes_like(out, tags::UNICODE, bytes),
        Value::Tuple(items) => write_value_seq(out, table, tags::TUPLE, items, opmap, expansion_for, policy)?,
        Value::List(items) => write_value_seq(out, table, tags::LIST, items, opmap, expansion_for, policy)?,
        Value::Set(items) => write_value_seq(out, table, tags::SET, items, opmap, expansion_for, policy)?,
        Value::FrozenSet(items) => {
            write_value_seq(out, table, tags::FROZENSET, items, opmap, expansion_for, policy)?
        }
        Value::Dict(entries) => {
            write_u8(out, tags::DICT);
            for (key, val) in entries {
                write_value(out, table, key, opmap, expansion_for, policy)?;
                write_value(out, table, val, opmap, expansion_for, policy)?;
            }
            write_u8(out, tags::NULL);
        }
        Value::Code(code) => write_code(out, table, code, opmap, expansion_for, policy)?,
    }
    Ok(())
}

fn write_value_seq<F>(
    out: &mut Vec<u8>,
    table: &mut InterningTable,
    tag: u8,
    items: &[Value],
    opmap: &std::collections::HashMap<u8, u8>,
    expansion_for: F,
    policy: FailurePolicy,
) -> Result<()>
where
    F: Fn(u8) -> Option<&'static [opcode::ExpansionItem]> + Copy,
{
    write_u8(out, tag);
    write_u32_len(out, items.len() as u32);
    for item in items {
        write_value(out, table, item, opmap, expansion_for, policy)?;
    }
    Ok(())
}

/// Resolve a `code`/`lnotab`-shaped value (`Bytes`, `Interned`, or
/// `StringRef`) to its underlying payload, reading (not mutating) the
/// writer's own interning table for `StringRef`.
fn bytes_like_payload<'a>(value: &'a Value, _table: &'a InterningTable) -> Result<std::borrow::Cow<'a, [u8]>> {
    match value {
        Value::Bytes(b) | Value::Interned(b) => Ok(std::borrow::Cow::Borrowed(b)),
        Value::StringRef { payload, .. } => Ok(std::borrow::Cow::Borrowed(payload)),
        other => Err(Error::from(MarshalError::UnregisteredEmitter {
            variant: other.variant_name(),
        })),
    }
}

fn write_code<F>(
    out: &mut Vec<u8>,
    table: &mut InterningTable,
    code: &Code,
    opmap: &std::collections::HashMap<u8, u8>,
    expansion_for: F,
    policy: FailurePolicy,
) -> Result<()>
where
    F: Fn(u8) -> Option<&'static [opcode::ExpansionItem]> + Copy,
{
    write_u8(out, tags::CODE);
    write_i32(out, code.argcount);
    write_i32(out, code.nlocals);
    write_i32(out, code.stacksize);
    write_i32(out, code.flags);

    let original_code = bytes_like_payload(&code.code, table)?.into_owned();
    let original_lnotab = bytes_like_payload(&code.lnotab, table)?.into_owned();

    let retargeted = retarget::retarget_code_with_policy(
        &original_code,
        &original_lnotab,
        code.firstlineno,
        opmap,
        expansion_for,
        policy,
    )?;

    write_value(out, table, &Value::Bytes(retargeted.code), opmap, expansion_for, policy)?;
    write_value(out, table, &code.consts, opmap, expansion_for, policy)?;
    write_value(out, table, &code.names, opmap, expansion_for, policy)?;
    write_value(out, table, &code.varnames, opmap, expansion_for, policy)?;
    write_value(out, table, &code.freevars, opmap, expansion_for, policy)?;
    write_value(out, table, &code.cellvars, opmap, expansion_for, policy)?;
    write_value(out, table, &code.filename, opmap, expansion_for, policy)?;
    write_value(out, table, &code.name, opmap, expansion_for, policy)?;
    write_i32(out, code.firstlineno);
    write_value(out, table, &Value::Bytes(retargeted.lnotab), opmap, expansion_for, policy)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marshal::reader::decode;

    #[test]
    fn encodes_none() {
        assert_eq!(encode(&Value::None).unwrap(), vec![b'N']);
    }

    #[test]
    fn round_trips_int32() {
        let value = Value::Int32(-7);
        let bytes = encode(&value).unwrap();
        assert_eq!(decode(&bytes).unwrap(), value);
    }

    #[test]
    fn interned_then_stringref_round_trips() {
        let value = Value::Tuple(vec![
            Value::Interned(b"a".to_vec()),
            Value::StringRef { index: 0, payload: b"a".to_vec() },
        ]);
        let bytes = encode(&value).unwrap();
        assert_eq!(decode(&bytes).unwrap(), value);
    }

    #[test]
    fn stringref_with_no_prior_interning_degrades_to_interned() {
        // A tree built by hand (not by `decode`) has no matching table
        // entry; the writer must still produce valid output.
        let value = Value::StringRef { index: 0, payload: b"z".to_vec() };
        let bytes = encode(&value).unwrap();
        assert_eq!(decode(&bytes).unwrap(), Value::Interned(b"z".to_vec()));
    }

    #[test]
    fn empty_dict_round_trips() {
        let value = Value::Dict(vec![]);
        let bytes = encode(&value).unwrap();
        assert_eq!(bytes, vec![b'{', b'0']);
        assert_eq!(decode(&bytes).unwrap(), value);
    }
}
