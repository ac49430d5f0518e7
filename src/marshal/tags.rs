//! Single-byte type tags, matching CPython marshal's `TYPE_*` constants.

pub const NULL: u8 = b'0';
pub const NONE: u8 = b'N';
pub const FALSE: u8 = b'F';
pub const TRUE: u8 = b'T';
pub const STOPITER: u8 = b'S';
pub const ELLIPSIS: u8 = b'.';
pub const INT: u8 = b'i';
pub const INT64: u8 = b'I';
pub const FLOAT: u8 = b'f';
pub const BINARY_FLOAT: u8 = b'g';
pub const COMPLEX: u8 = b'x';
pub const BINARY_COMPLEX: u8 = b'y';
pub const LONG: u8 = b'l';
pub const STRING: u8 = b's';
pub const INTERNED: u8 = b't';
pub const STRINGREF: u8 = b'R';
pub const TUPLE: u8 = b'(';
pub const LIST: u8 = b'[';
pub const DICT: u8 = b'{';
pub const CODE: u8 = b'c';
pub const UNICODE: u8 = b'u';
pub const SET: u8 = b'<';
pub const FROZENSET: u8 = b'>';
