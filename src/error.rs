//! Top-level error hierarchy.
//!
//! One umbrella [`Error`] that is `#[non_exhaustive]` and wraps each
//! subsystem's own error type via `#[from]`, so callers can match narrowly on
//! [`MarshalError`]/[`RetargetError`]/[`ConfigError`] without unwrapping the
//! umbrella first.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Marshal(#[from] MarshalError),

    #[error(transparent)]
    Retarget(#[from] RetargetError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Structural failures in the marshal codec's decode and encode passes.
/// These fail the whole file.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MarshalError {
    #[error("truncated marshal stream at offset {offset}: need {needed} more byte(s)")]
    Truncated {
        /// Byte offset in the stream the read was attempted at.
        offset: usize,
        /// Number of additional bytes the read needed.
        needed: usize,
    },

    #[error("unknown value type tag {tag:#04x} at offset {offset}")]
    UnknownTag {
        /// The unrecognized type tag byte.
        tag: u8,
        /// Byte offset the tag was read at.
        offset: usize,
    },

    #[error("string reference index {index} out of range (table has {table_len} entries)")]
    BadStringRef {
        /// The out-of-range index read from the stream.
        index: u32,
        /// Number of entries actually in the interning table.
        table_len: usize,
    },

    #[error("no emitter registered for value variant {variant}")]
    UnregisteredEmitter {
        /// Name of the `Value` variant with no writer-side handler.
        variant: &'static str,
    },

    #[error("float literal at offset {offset} is not valid ASCII/UTF-8")]
    InvalidFloatLiteral {
        /// Byte offset the float literal starts at.
        offset: usize,
    },

    #[error("malformed float literal at offset {offset}: {source}")]
    MalformedFloat {
        /// Byte offset the float literal starts at.
        offset: usize,
        #[source]
        source: std::num::ParseFloatError,
    },
}

/// Failures from the opcode retargeter. The `lnotab` monotonicity violation
/// and a truncated instruction stream are always fatal to the file. Unknown
/// opcodes and unresolvable jump targets are recovered locally (logged and
/// passed through/skipped) under the default [`crate::config::RecoveryPolicy::LogAndContinue`]
/// policy, and only raise `UnknownOpcode`/`UnresolvedJumpTarget` here when
/// [`crate::config::RecoveryPolicy::Abort`] is configured for that condition.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RetargetError {
    #[error("lnotab re-encoding produced a non-monotonic entry: byte_delta={byte_delta}, line_delta={line_delta} at pair index {index}")]
    NonMonotonicLnotab {
        /// Index of the offending pair in the re-encoded sequence.
        index: usize,
        /// Negative byte delta that triggered the violation.
        byte_delta: i64,
        /// Negative line delta that triggered the violation.
        line_delta: i64,
    },

    #[error("code byte stream ended mid-instruction at offset {offset}")]
    TruncatedInstruction {
        /// Byte offset the incomplete instruction started at.
        offset: usize,
    },

    /// Only raised when [`crate::config::RecoveryPolicy::Abort`] is configured
    /// for unknown opcodes; the default policy logs and emits the source byte
    /// unchanged instead (spec'd recovery path, §4.E.4).
    #[error("unknown messiah opcode {opcode:#04x} at offset {offset}")]
    UnknownOpcode {
        /// The unrecognized Messiah opcode byte.
        opcode: u8,
        /// Byte offset the opcode was read at.
        offset: usize,
    },

    /// Only raised when [`crate::config::RecoveryPolicy::Abort`] is configured
    /// for unresolved jumps; the default policy logs and skips the fixup.
    #[error("jump at offset {offset} targets unresolvable instruction {target}")]
    UnresolvedJumpTarget {
        /// Byte offset of the jump instruction itself.
        offset: usize,
        /// Original (pre-retarget) instruction offset the jump targeted.
        target: i64,
    },
}

/// Failures loading or validating [`crate::config::RetargetConfig`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path of the config file that failed to read.
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// Path of the config file that failed to parse.
        path: String,
        #[source]
        source: toml::de::Error,
    },
}
