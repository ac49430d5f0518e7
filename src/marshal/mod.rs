//! The marshal codec: parses and re-emits the VM's object-serialization
//! format, maintaining a string-interning table across the stream.

mod interning;
mod reader;
mod tags;
mod value;
mod writer;

pub use interning::InterningTable;
pub use reader::decode;
pub use value::{Code, Value};
pub use writer::{encode, encode_with_policy, encode_with_tables};
