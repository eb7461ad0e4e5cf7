/*! Language model estimation

[Lmplz] shells out to KenLM's `lmplz` (and `build_binary` when the `kenlm` feature is on).
Other [Estimator]s can be plugged in, which is how tests avoid the KenLM binaries.
!*/
use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use log::{debug, error, info};

use crate::error::Error;

/// Estimation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EstimateParams {
    pub order: usize,
    /// Fall back to default discounts when Kneser-Ney ones cannot be estimated
    /// (small corpora).
    pub discount_fallback: bool,
}

impl Default for EstimateParams {
    fn default() -> Self {
        Self {
            order: 7,
            discount_fallback: true,
        }
    }
}

pub trait Estimator {
    /// Estimate a model from a tokenized corpus (one sentence per line,
    /// tokens separated by spaces).
    ///
    /// `dst` is a path prefix: implementations may add an extension.
    /// Returns the path of the produced model.
    fn estimate(&self, corpus: &Path, params: &EstimateParams, dst: &Path)
        -> Result<PathBuf, Error>;
}

/// KenLM command line tools.
#[derive(Debug, Clone)]
pub struct Lmplz {
    lmplz: String,
    build_binary: Option<String>,
}

impl Default for Lmplz {
    fn default() -> Self {
        Self {
            lmplz: "lmplz".to_string(),
            build_binary: cfg!(feature = "kenlm").then(|| "build_binary".to_string()),
        }
    }
}

impl Lmplz {
    pub fn new(lmplz: String, build_binary: Option<String>) -> Self {
        Self {
            lmplz,
            build_binary,
        }
    }

    fn run(&self, command: &mut Command, name: &str) -> Result<Output, Error> {
        debug!("running {:?}", command);
        let output = command.output().map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::Config(format!(
                "`{name}` not found, is KenLM installed and in PATH?"
            )),
            _ => Error::Io(e),
        })?;

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.status.success() {
            error!("`{name}` failed:\n{stderr}");
            return Err(Error::Subprocess {
                command: name.to_string(),
                status: output.status,
                stderr,
            });
        }
        debug!("{name}:\n{stderr}");
        Ok(output)
    }
}

impl Estimator for Lmplz {
    fn estimate(
        &self,
        corpus: &Path,
        params: &EstimateParams,
        dst: &Path,
    ) -> Result<PathBuf, Error> {
        let arpa = dst.with_extension("arpa");
        info!(
            "estimating {}-gram model from {:?}",
            params.order, corpus
        );

        let mut lmplz = Command::new(&self.lmplz);
        lmplz
            .arg("-o")
            .arg(params.order.to_string())
            .stdin(Stdio::from(File::open(corpus)?))
            .stdout(Stdio::from(File::create(&arpa)?))
            .stderr(Stdio::piped());
        if params.discount_fallback {
            lmplz.arg("--discount_fallback");
        }
        self.run(&mut lmplz, &self.lmplz)?;

        match &self.build_binary {
            Some(build_binary) => {
                let binary = dst.with_extension("bin");
                let mut cmd = Command::new(build_binary);
                cmd.arg(&arpa).arg(&binary).stdout(Stdio::null());
                self.run(&mut cmd, build_binary)?;
                Ok(binary)
            }
            None => Ok(arpa),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_binary() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = dir.path().join("corpus.txt");
        std::fs::write(&corpus, "a b c\n").unwrap();

        let estimator = Lmplz::new("monoclean-no-such-lmplz".to_string(), None);
        let res = estimator.estimate(&corpus, &EstimateParams::default(), &dir.path().join("lm"));
        assert!(matches!(res, Err(Error::Config(_))));
    }

    #[test]
    #[cfg(unix)]
    fn failing_binary() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = dir.path().join("corpus.txt");
        std::fs::write(&corpus, "a b c\n").unwrap();

        let estimator = Lmplz::new("false".to_string(), None);
        let res = estimator.estimate(&corpus, &EstimateParams::default(), &dir.path().join("lm"));
        assert!(matches!(res, Err(Error::Subprocess { .. })));
    }
}
