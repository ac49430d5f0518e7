//! Converts Messiah-dialect marshalled Python 2.7 bytecode into canonical
//! CPython 2.7 `.pyc` files.
//!
//! The crate is split into the same two subsystems the format itself forces
//! apart: [`marshal`] (parse/re-emit the serialized value tree, including its
//! string-interning table) and [`retarget`] (remap opcodes, expand
//! superinstructions, and fix up jump targets and the line-number table
//! inside a decoded `Code` object's byte payloads). [`container`] ties the
//! two together around a single file's 8-byte header; [`config`] and
//! [`cli`] are the batch-conversion driver built on top.

pub mod config;
pub mod container;
pub mod error;
pub mod marshal;
pub mod opcode;
pub mod retarget;

#[cfg(feature = "cli")]
pub mod cli;

pub use container::retarget as retarget_file;
pub use error::{Error, Result};
