//! CLI command execution.

use std::path::{Path, PathBuf};

use crate::config::RetargetConfig;
use crate::error::{Error, Result};

use super::args::{Cli, Command};

/// Outcome of a batch run. The process always exits 0; per-file failures
/// are surfaced only through these counters.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Number of paths the glob pattern matched.
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        let config = match &self.config {
            Some(path) => RetargetConfig::load_from_file(path)?,
            None => crate::config::ConfigLoader::load()?,
        };

        match &self.command {
            Command::Retarget { input, output } => self.run_retarget(input, output, &config),
            Command::Batch { pattern, output_dir } => {
                let report = self.run_batch(pattern, output_dir.as_deref(), &config);
                tracing::info!(
                    attempted = report.attempted,
                    succeeded = report.succeeded,
                    failed = report.failed,
                    "batch conversion complete"
                );
                Ok(())
            }
        }
    }

    fn run_retarget(&self, input: &Path, output: &Path, config: &RetargetConfig) -> Result<()> {
        let bytes = std::fs::read(input)?;
        let (_, retargeted) = crate::container::retarget_with_policy(
            &bytes,
            crate::opcode::opcode_map(),
            crate::opcode::expansion_for,
            config.opcodes.into(),
        )?;
        std::fs::write(output, retargeted)?;
        Ok(())
    }

    fn run_batch(&self, pattern: &str, output_dir: Option<&Path>, config: &RetargetConfig) -> BatchReport {
        let paths: Vec<PathBuf> = match glob::glob(pattern) {
            Ok(entries) => entries.filter_map(std::result::Result::ok).collect(),
            Err(err) => {
                tracing::error!(%err, pattern, "invalid glob pattern");
                return BatchReport::default();
            }
        };

        let outcomes: Vec<bool> = if cfg!(feature = "parallel") && config.performance.parallel {
            convert_all_parallel(&paths, output_dir, config)
        } else {
            paths
                .iter()
                .map(|path| convert_one(path, output_dir, config))
                .collect()
        };

        let succeeded = outcomes.iter().filter(|ok| **ok).count();
        BatchReport {
            attempted: paths.len(),
            succeeded,
            failed: outcomes.len() - succeeded,
        }
    }
}

#[cfg(feature = "parallel")]
fn convert_all_parallel(paths: &[PathBuf], output_dir: Option<&Path>, config: &RetargetConfig) -> Vec<bool> {
    use rayon::prelude::*;
    paths.par_iter().map(|path| convert_one(path, output_dir, config)).collect()
}

#[cfg(not(feature = "parallel"))]
fn convert_all_parallel(paths: &[PathBuf], output_dir: Option<&Path>, config: &RetargetConfig) -> Vec<bool> {
    paths.iter().map(|path| convert_one(path, output_dir, config)).collect()
}

fn convert_one(path: &Path, output_dir: Option<&Path>, config: &RetargetConfig) -> bool {
    match convert_one_inner(path, output_dir, config) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "failed to retarget file");
            false
        }
    }
}

fn convert_one_inner(path: &Path, output_dir: Option<&Path>, config: &RetargetConfig) -> Result<()> {
    let bytes = std::fs::read(path)?;
    let (_, retargeted) = crate::container::retarget_with_policy(
        &bytes,
        crate::opcode::opcode_map(),
        crate::opcode::expansion_for,
        config.opcodes.into(),
    )?;
    let output_path = output_path_for(path, output_dir, &config.output.extension);
    std::fs::write(&output_path, retargeted).map_err(Error::from)
}

fn output_path_for(input: &Path, output_dir: Option<&Path>, extension: &str) -> PathBuf {
    let file_name = input.file_name().map(PathBuf::from).unwrap_or_default();
    match output_dir {
        Some(dir) => dir.join(file_name).with_extension(extension),
        None => input.with_extension(extension),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_defaults_next_to_input() {
        let path = output_path_for(Path::new("scripts/main.pyc27"), None, "pyc");
        assert_eq!(path, PathBuf::from("scripts/main.pyc"));
    }

    #[test]
    fn output_path_honors_output_dir() {
        let path = output_path_for(Path::new("scripts/main.pyc27"), Some(Path::new("out")), "pyc");
        assert_eq!(path, PathBuf::from("out/main.pyc"));
    }
}
