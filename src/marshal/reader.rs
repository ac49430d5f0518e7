//! Marshal decoder: one type tag byte, dispatch to a variant parser.

use crate::error::MarshalError;

use super::interning::InterningTable;
use super::tags;
use super::value::{Code, Value};

type Result<T> = std::result::Result<T, MarshalError>;

/// Decode exactly one top-level [`Value`] from `bytes`.
pub fn decode(bytes: &[u8]) -> Result<Value> {
    let mut table = InterningTable::new();
    let mut offset = 0usize;
    read_value(bytes, &mut offset, &mut table)
}

fn need(bytes: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    bytes
        .get(offset..offset + len)
        .ok_or(MarshalError::Truncated {
            offset,
            needed: len,
        })
}

fn read_u8(bytes: &[u8], offset: &mut usize) -> Result<u8> {
    let byte = need(bytes, *offset, 1)?[0];
    *offset += 1;
    Ok(byte)
}

fn read_i16(bytes: &[u8], offset: &mut usize) -> Result<i16> {
    let slice = need(bytes, *offset, 2)?;
    let value = i16::from_le_bytes(slice.try_into().unwrap());
    *offset += 2;
    Ok(value)
}

fn read_i32(bytes: &[u8], offset: &mut usize) -> Result<i32> {
    let slice = need(bytes, *offset, 4)?;
    let value = i32::from_le_bytes(slice.try_into().unwrap());
    *offset += 4;
    Ok(value)
}

fn read_i64(bytes: &[u8], offset: &mut usize) -> Result<i64> {
    let slice = need(bytes, *offset, 8)?;
    let value = i64::from_le_bytes(slice.try_into().unwrap());
    *offset += 8;
    Ok(value)
}

fn read_bytes(bytes: &[u8], offset: &mut usize, len: usize) -> Result<Vec<u8>> {
    let slice = need(bytes, *offset, len)?;
    let out = slice.to_vec();
    *offset += len;
    Ok(out)
}

fn read_u32_len(bytes: &[u8], offset: &mut usize) -> Result<u32> {
    let slice = need(bytes, *offset, 4)?;
    let value = u32::from_le_bytes(slice.try_into().unwrap());
    *offset += 4;
    Ok(value)
}

fn read_long(bytes: &[u8], offset: &mut usize) -> Result<Value> {
    let count = read_i32(bytes, offset)?;
    let negative = count < 0;
    let digit_count = count.unsigned_abs() as usize;
    let mut digits = Vec::with_capacity(digit_count);
    for _ in 0..digit_count {
        let slice = need(bytes, *offset, 2)?;
        digits.push(u16::from_le_bytes(slice.try_into().unwrap()));
        *offset += 2;
    }
    Ok(Value::Long { negative, digits })
}

fn read_float_literal(bytes: &[u8], offset: &mut usize) -> Result<f64> {
    let len = read_u8(bytes, offset)? as usize;
    let literal_offset = *offset;
    let raw = read_bytes(bytes, offset, len)?;
    let text = std::str::from_utf8(&raw)
        .map_err(|_| MarshalError::InvalidFloatLiteral { offset: literal_offset })?;
    text.parse::<f64>().map_err(|source| MarshalError::MalformedFloat {
        offset: literal_offset,
        source,
    })
}

fn read_binary_float(bytes: &[u8], offset: &mut usize) -> Result<f64> {
    let slice = need(bytes, *offset, 8)?;
    let value = f64::from_le_bytes(slice.try_into().unwrap());
    *offset += 8;
    Ok(value)
}

fn read_value(bytes: &[u8], offset: &mut usize, table: &mut InterningTable) -> Result<Value> {
    let tag_offset = *offset;
    let tag = read_u8(bytes, offset)?;
    match tag {
        tags::NULL => Ok(Value::Null),
        tags::NONE => Ok(Value::None),
        tags::TRUE => Ok(Value::True),
        tags::FALSE => Ok(Value::False),
        tags::STOPITER => Ok(Value::StopIteration),
        tags::ELLIPSIS => Ok(Value::Ellipsis),
        tags::INT => Ok(Value::Int32(read_i32(bytes, offset)?)),
        tags::INT64 => Ok(Value::Int64(read_i64(bytes, offset)?)),
        tags::LONG => read_long(bytes, offset),
        tags::FLOAT => Ok(Value::Float(read_float_literal(bytes, offset)?)),
        tags::BINARY_FLOAT => Ok(Value::BinaryFloat(read_binary_float(bytes, offset)?)),
        tags::COMPLEX => {
            let real = read_float_literal(bytes, offset)?;
            let imag = read_float_literal(bytes, offset)?;
            Ok(Value::Complex { real, imag })
        }
        tags::BINARY_COMPLEX => {
            let real = read_binary_float(bytes, offset)?;
            let imag = read_binary_float(bytes, offset)?;
            Ok(Value::BinaryComplex { real, imag })
        }
        tags::STRING => {
            let len = read_u32_len(bytes, offset)? as usize;
            Ok(Value::Bytes(read_bytes(bytes, offset, len)?))
        }
        tags::INTERNED => {
            let len = read_u32_len(bytes, offset)? as usize;
            let payload = read_bytes(bytes, offset, len)?;
            table.intern(payload.clone());
            Ok(Value::Interned(payload))
        }
        tags::STRINGREF => {
            let index = read_u32_len(bytes, offset)?;
            let payload = table.resolve(index)?.to_vec();
            Ok(Value::StringRef { index, payload })
        }
        tags::UNICODE => {
            let len = read_u32_len(bytes, offset)? as usize;
            let raw = read_bytes(bytes, offset, len)?;
            if let Err(err) = std::str::from_utf8(&raw) {
                tracing::warn!(
                    payload = %hex::encode(&raw),
                    %err,
                    "unicode value is not valid utf-8, carrying raw bytes through"
                );
            }
            Ok(Value::Unicode { bytes: raw })
        }
        tags::TUPLE => Ok(Value::Tuple(read_value_seq(bytes, offset, table)?)),
        tags::LIST => Ok(Value::List(read_value_seq(bytes, offset, table)?)),
        tags::SET => Ok(Value::Set(read_value_seq(bytes, offset, table)?)),
        tags::FROZENSET => Ok(Value::FrozenSet(read_value_seq(bytes, offset, table)?)),
        tags::DICT => {
            let mut entries = Vec::new();
            loop {
                let key = read_value(bytes, offset, table)?;
                if key == Value::Null {
                    break;
                }
                let value = read_value(bytes, offset, table)?;
                entries.push((key, value));
            }
            Ok(Value::Dict(entries))
        }
        tags::CODE => Ok(Value::Code(Box::new(read_code(bytes, offset, table)?))),
        other => Err(MarshalError::UnknownTag {
            tag: other,
            offset: tag_offset,
        }),
    }
}

fn read_value_seq(
    bytes: &[u8],
    offset: &mut usize,
    table: &mut InterningTable,
) -> Result<Vec<Value>> {
    let len = read_u32_len(bytes, offset)? as usize;
    let mut out = Vec::with_capacity(len);
    for _ in 0..len {
        out.push(read_value(bytes, offset, table)?);
    }
    Ok(out)
}

fn read_code(bytes: &[u8], offset: &mut usize, table: &mut InterningTable) -> Result<Code> {
    Ok(Code {
        argcount: read_i32(bytes, offset)?,
        nlocals: read_i32(bytes, offset)?,
        stacksize: read_i32(bytes, offset)?,
        flags: read_i32(bytes, offset)?,
        code: read_value(bytes, offset, table)?,
        consts: read_value(bytes, offset, table)?,
        names: read_value(bytes, offset, table)?,
        varnames: read_value(bytes, offset, table)?,
        freevars: read_value(bytes, offset, table)?,
        cellvars: read_value(bytes, offset, table)?,
        filename: read_value(bytes, offset, table)?,
        name: read_value(bytes, offset, table)?,
        firstlineno: read_i32(bytes, offset)?,
        lnotab: read_value(bytes, offset, table)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_none() {
        assert_eq!(decode(&[b'N']).unwrap(), Value::None);
    }

    #[test]
    fn decodes_int32() {
        let mut bytes = vec![b'i'];
        bytes.extend_from_slice(&42i32.to_le_bytes());
        assert_eq!(decode(&bytes).unwrap(), Value::Int32(42));
    }

    #[test]
    fn unknown_tag_errors() {
        assert!(matches!(
            decode(&[b'?']),
            Err(MarshalError::UnknownTag { tag: b'?', offset: 0 })
        ));
    }

    #[test]
    fn truncated_stream_errors() {
        assert!(matches!(decode(&[b'i', 1, 2]), Err(MarshalError::Truncated { .. })));
    }

    #[test]
    fn interned_then_stringref_resolves() {
        let mut bytes = vec![b'('];
        bytes.extend_from_slice(&2u32.to_le_bytes());
        bytes.push(b't');
        bytes.extend_from_slice(&1u32.to_le_bytes());
        bytes.push(b'a');
        bytes.push(b'R');
        bytes.extend_from_slice(&0u32.to_le_bytes());
        let value = decode(&bytes).unwrap();
        assert_eq!(
            value,
            Value::Tuple(vec![
                Value::Interned(vec![b'a']),
                Value::StringRef { index: 0, payload: vec![b'a'] }
            ])
        );
    }

    #[test]
    fn dangling_stringref_errors() {
        let mut bytes = vec![b'R'];
        bytes.extend_from_slice(&0u32.to_le_bytes());
        assert!(matches!(decode(&bytes), Err(MarshalError::BadStringRef { .. })));
    }

    #[test]
    fn empty_dict_decodes_to_no_entries() {
        assert_eq!(decode(&[b'{', b'0']).unwrap(), Value::Dict(vec![]));
    }

    #[test]
    fn long_zero_has_no_digits() {
        let mut bytes = vec![b'l'];
        bytes.extend_from_slice(&0i32.to_le_bytes());
        assert_eq!(
            decode(&bytes).unwrap(),
            Value::Long {
                negative: false,
                digits: vec![]
            }
        );
    }
}
