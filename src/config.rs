//! Configuration for the retargeting pipeline and its CLI driver.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::retarget::FailurePolicy;

/// Top-level configuration. Only the `performance` and `output` sections
/// are consulted by the core; everything else is plumbing for the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetargetConfig {
    pub opcodes: OpcodePolicy,
    pub output: OutputConfig,
    pub performance: PerformanceConfig,
}

impl Default for RetargetConfig {
    fn default() -> Self {
        Self {
            opcodes: OpcodePolicy::default(),
            output: OutputConfig::default(),
            performance: PerformanceConfig::default(),
        }
    }
}

impl RetargetConfig {
    pub fn load_from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        ConfigLoader::load_from_file(path)
    }
}

/// Policy for the two recovered-error cases during retargeting: an unknown
/// source opcode and a jump argument outside the offset map. Both default to
/// "log and continue".
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OpcodePolicy {
    pub unknown_opcode: RecoveryPolicy,
    pub unresolved_jump: RecoveryPolicy,
}

impl Default for OpcodePolicy {
    fn default() -> Self {
        Self {
            unknown_opcode: RecoveryPolicy::LogAndContinue,
            unresolved_jump: RecoveryPolicy::LogAndContinue,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryPolicy {
    /// Emit a diagnostic and keep going (the default).
    LogAndContinue,
    /// Treat the condition as fatal to the single file being converted.
    Abort,
}

impl RecoveryPolicy {
    fn aborts(self) -> bool {
        matches!(self, RecoveryPolicy::Abort)
    }
}

impl From<OpcodePolicy> for FailurePolicy {
    fn from(policy: OpcodePolicy) -> Self {
        FailurePolicy {
            abort_on_unknown_opcode: policy.unknown_opcode.aborts(),
            abort_on_unresolved_jump: policy.unresolved_jump.aborts(),
        }
    }
}

/// Output file naming/placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Suffix appended to the reconstructed filename when no explicit
    /// output path is given in batch mode.
    pub extension: String,
    /// Overwrite an existing output file without prompting.
    pub overwrite: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            extension: "pyc".to_string(),
            overwrite: true,
        }
    }
}

/// Batch-mode worker tuning: the core may be driven in parallel across
/// files by an external caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceConfig {
    pub parallel: bool,
    /// `None` lets the thread pool pick a default (number of cores).
    pub worker_threads: Option<usize>,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            worker_threads: None,
        }
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load_from_file(path: &std::path::Path) -> Result<RetargetConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string_lossy().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_string_lossy().to_string(),
            source,
        })
    }

    /// Load from the first of the standard locations that exists, falling
    /// back to defaults, then apply environment overrides.
    pub fn load() -> Result<RetargetConfig, ConfigError> {
        let mut config = RetargetConfig::default();

        let candidate_paths = ["./pyc-retarget.toml", "./config/pyc-retarget.toml"];
        for path in candidate_paths {
            let path = std::path::Path::new(path);
            if path.exists() {
                config = Self::load_from_file(path)?;
                break;
            }
        }

        Ok(Self::apply_env_overrides(config))
    }

    fn apply_env_overrides(mut config: RetargetConfig) -> RetargetConfig {
        if let Ok(value) = std::env::var("PYC_RETARGET_PARALLEL") {
            config.performance.parallel = value.parse().unwrap_or(config.performance.parallel);
        }
        if let Ok(value) = std::env::var("PYC_RETARGET_THREADS") {
            config.performance.worker_threads = value.parse().ok();
        }
        if let Ok(value) = std::env::var("PYC_RETARGET_OVERWRITE") {
            config.output.overwrite = value.parse().unwrap_or(config.output.overwrite);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_enables_parallel_and_log_and_continue() {
        let config = RetargetConfig::default();
        assert!(config.performance.parallel);
        assert_eq!(config.opcodes.unknown_opcode, RecoveryPolicy::LogAndContinue);
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = RetargetConfig::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: RetargetConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(config.output.extension, deserialized.output.extension);
    }

    #[test]
    fn opcode_policy_converts_to_failure_policy() {
        let default_policy: FailurePolicy = OpcodePolicy::default().into();
        assert!(!default_policy.abort_on_unknown_opcode);
        assert!(!default_policy.abort_on_unresolved_jump);

        let aborting = OpcodePolicy {
            unknown_opcode: RecoveryPolicy::Abort,
            unresolved_jump: RecoveryPolicy::LogAndContinue,
        };
        let converted: FailurePolicy = aborting.into();
        assert!(converted.abort_on_unknown_opcode);
        assert!(!converted.abort_on_unresolved_jump);
    }
}
