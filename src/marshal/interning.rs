//! The per-stream string interning table shared by `Interned`/`StringRef`.

use crate::error::MarshalError;

/// Ordered list of byte strings, append-only, indexed by position.
///
/// The reader and the writer each own one instance, local to a single file
/// conversion.
#[derive(Debug, Default)]
pub struct InterningTable {
    entries: Vec<Vec<u8>>,
}

impl InterningTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a payload, returning the index it was stored at.
    pub fn intern(&mut self, payload: Vec<u8>) -> u32 {
        let index = self.entries.len() as u32;
        self.entries.push(payload);
        index
    }

    pub fn resolve(&self, index: u32) -> Result<&[u8], MarshalError> {
        self.entries
            .get(index as usize)
            .map(Vec::as_slice)
            .ok_or(MarshalError::BadStringRef {
                index,
                table_len: self.entries.len(),
            })
    }

    /// Index of an existing entry equal to `payload`, if any. Used by the
    /// writer to decide between emitting `StringRef` and degrading to
    /// `Interned`.
    pub fn index_of(&self, payload: &[u8]) -> Option<u32> {
        self.entries
            .iter()
            .position(|entry| entry.as_slice() == payload)
            .map(|index| index as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_then_resolve_round_trips() {
        let mut table = InterningTable::new();
        let idx = table.intern(b"hello".to_vec());
        assert_eq!(table.resolve(idx).unwrap(), b"hello");
    }

    #[test]
    fn resolve_out_of_range_errors() {
        let table = InterningTable::new();
        assert!(matches!(
            table.resolve(0),
            Err(MarshalError::BadStringRef { index: 0, table_len: 0 })
        ));
    }

    #[test]
    fn index_of_finds_existing_entry_by_value() {
        let mut table = InterningTable::new();
        table.intern(b"a".to_vec());
        let idx = table.intern(b"b".to_vec());
        assert_eq!(table.index_of(b"b"), Some(idx));
        assert_eq!(table.index_of(b"c"), None);
    }
}
