//! The `Value` sum type, one variant per marshal type tag.

/// A single marshalled value. The reader produces one tree of these per
/// top-level decode; the writer walks the same tree back into bytes.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Value {
    None,
    True,
    False,
    StopIteration,
    Ellipsis,
    /// Terminates a `Dict`'s key/value run; never appears as an ordinary
    /// value elsewhere in a tree produced by the reader.
    Null,

    Int32(i32),
    Int64(i64),
    /// Arbitrary-precision integer: count of base-2^15 digits (sign carries
    /// the value's sign) and the digits themselves, little-endian.
    Long { negative: bool, digits: Vec<u16> },

    /// Decimal-literal float, as decoded from its ASCII representation.
    Float(f64),
    /// IEEE-754 double, read directly from its 8 little-endian bytes.
    BinaryFloat(f64),
    Complex { real: f64, imag: f64 },
    BinaryComplex { real: f64, imag: f64 },

    Bytes(Vec<u8>),
    /// Payload that was, at decode time, also appended to the stream's
    /// interning table.
    Interned(Vec<u8>),
    /// Back-reference into the interning table. Carries the referenced
    /// payload alongside the index it was read at so the writer can relocate
    /// it (by value, not by original index) in its own table, or degrade to
    /// `Interned` if the payload was never interned on the way out.
    StringRef { index: u32, payload: Vec<u8> },
    /// Length-prefixed text, carried as raw bytes. A payload that fails to
    /// decode as UTF-8 is logged at decode time (see `marshal::reader`) and
    /// still stored here unchanged, matching `load_unicode`'s degrade-to-opaque-bytes
    /// behavior.
    Unicode { bytes: Vec<u8> },

    Tuple(Vec<Value>),
    List(Vec<Value>),
    Set(Vec<Value>),
    FrozenSet(Vec<Value>),
    /// Alternating key/value pairs, in encounter order.
    Dict(Vec<(Value, Value)>),

    Code(Box<Code>),
}

impl Value {
    /// Name of this variant, for diagnostics (`UnregisteredEmitter`, logs).
    pub fn variant_name(&self) -> &'static str {
        match self {
            Value::None => "None",
            Value::True => "True",
            Value::False => "False",
            Value::StopIteration => "StopIteration",
            Value::Ellipsis => "Ellipsis",
            Value::Null => "Null",
            Value::Int32(_) => "Int32",
            Value::Int64(_) => "Int64",
            Value::Long { .. } => "Long",
            Value::Float(_) => "Float",
            Value::BinaryFloat(_) => "BinaryFloat",
            Value::Complex { .. } => "Complex",
            Value::BinaryComplex { .. } => "BinaryComplex",
            Value::Bytes(_) => "Bytes",
            Value::Interned(_) => "Interned",
            Value::StringRef { .. } => "StringRef",
            Value::Unicode { .. } => "Unicode",
            Value::Tuple(_) => "Tuple",
            Value::List(_) => "List",
            Value::Set(_) => "Set",
            Value::FrozenSet(_) => "FrozenSet",
            Value::Dict(_) => "Dict",
            Value::Code(_) => "Code",
        }
    }

    /// The underlying bytes of a `Bytes`/`Interned` value, if this is one.
    /// `StringRef` has no *owned* payload here; callers resolve it against
    /// the interning table (`crate::marshal::InterningTable::resolve`).
    pub fn as_bytes_like(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) | Value::Interned(b) => Some(b),
            _ => None,
        }
    }
}

/// A code object. Field order here is the **wire order** used by the
/// reader; the writer re-emits most fields in a different order but must
/// still have *read* them in this order to populate this struct.
#[derive(Debug, Clone, PartialEq)]
pub struct Code {
    pub argcount: i32,
    pub nlocals: i32,
    pub stacksize: i32,
    pub flags: i32,
    pub code: Value,
    pub consts: Value,
    pub names: Value,
    pub varnames: Value,
    pub freevars: Value,
    pub cellvars: Value,
    pub filename: Value,
    pub name: Value,
    pub firstlineno: i32,
    pub lnotab: Value,
}
