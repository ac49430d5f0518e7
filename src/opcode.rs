//! Opcode tables and superinstruction expansion for the Messiah dialect.
//!
//! [`tables`] holds the frozen name/number mappings for both dialects and the
//! derived 1:1 remap; [`expansion`] holds the superinstruction unpacking
//! table. Together they are the static data the retargeter's forward pass
//! ([`crate::retarget::forward`]) walks over.

pub mod expansion;
pub mod tables;

pub use expansion::{expansion_for, ExpansionItem};
pub use tables::{canonical_number, has_argument, messiah_number, opcode_map, HAVE_ARGUMENT, SKIP_CONST};
