//! # Structured Reference String
//!
//! PLONK keys are derived from a KZG reference string. The trusted setup
//! reads it from a cache file next to the circuit descriptor and downloads
//! the ceremony output on first use. A reference string larger than needed
//! is truncated to the circuit's size.
//!
//! The dummy setup samples its own string from a fixed seed instead. Anyone
//! knowing the seed can forge proofs against keys derived from it.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::time::Instant;

use halo2_proofs::halo2curves::bn256::Bn256;
use halo2_proofs::poly::commitment::Params;
use halo2_proofs::poly::kzg::commitment::ParamsKZG;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use reqwest::blocking::Client;
use thiserror::Error;

/// Ceremony download location; `{k}` is replaced by the circuit size.
pub const DEFAULT_SRS_URL: &str =
    "https://trusted-setup-halo2kzg.s3.eu-central-1.amazonaws.com/perpetual-powers-of-tau-raw-{k}";

/// Publicly known seed of the dummy setup.
pub const DUMMY_SEED: u64 = 42;

/// Error obtaining the reference string.
#[derive(Error, Debug)]
pub enum SrsError {
    /// The cache file could not be read or written.
    #[error("srs cache {path}: {source}")]
    Io {
        /// Cache file.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// The download could not be completed.
    #[error("failed to download srs from {url}: {source}")]
    Download {
        /// Requested URL.
        url: String,
        /// Underlying error.
        source: reqwest::Error,
    },
    /// The server answered with an error status.
    #[error("failed to download srs from {url}: HTTP {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// Response status.
        status: reqwest::StatusCode,
    },
    /// The cached string supports fewer rows than the circuit needs.
    #[error("srs supports 2^{have} rows, circuit needs 2^{need}")]
    TooSmall {
        /// Size of the cached string.
        have: u32,
        /// Size the circuit needs.
        need: u32,
    },
}

/// Where the trusted reference string lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrsSource {
    /// Cache file, downloaded to when absent.
    pub cache: PathBuf,
    /// Download URL with a `{k}` placeholder.
    pub url_template: String,
}

impl SrsSource {
    /// Source cached at `cache`, downloading from [`DEFAULT_SRS_URL`].
    pub fn new(cache: impl Into<PathBuf>) -> Self {
        Self {
            cache: cache.into(),
            url_template: DEFAULT_SRS_URL.to_string(),
        }
    }

    /// Replace the download URL template.
    pub fn with_url_template(mut self, template: impl Into<String>) -> Self {
        self.url_template = template.into();
        self
    }

    /// Download URL for a string of `2^k` points.
    pub fn url(&self, k: u32) -> String {
        self.url_template.replace("{k}", &k.to_string())
    }

    /// Reference string for `2^k` rows.
    pub fn load(&self, k: u32) -> Result<ParamsKZG<Bn256>, SrsError> {
        if !self.cache.exists() {
            self.download(k)?;
        }
        let started = Instant::now();
        let io_err = |source| SrsError::Io {
            path: self.cache.clone(),
            source,
        };
        let file = File::open(&self.cache).map_err(io_err)?;
        let mut params =
            ParamsKZG::<Bn256>::read(&mut BufReader::new(file)).map_err(io_err)?;
        if params.k() < k {
            return Err(SrsError::TooSmall {
                have: params.k(),
                need: k,
            });
        }
        if params.k() > k {
            params.downsize(k);
        }
        tracing::info!(
            path = %self.cache.display(),
            k,
            elapsed = ?started.elapsed(),
            "srs loaded"
        );
        Ok(params)
    }

    fn download(&self, k: u32) -> Result<(), SrsError> {
        let url = self.url(k);
        tracing::info!(%url, path = %self.cache.display(), "downloading srs");
        let started = Instant::now();

        let download_err = |source| SrsError::Download {
            url: url.clone(),
            source,
        };
        let client = Client::builder()
            .timeout(None)
            .user_agent(concat!("pwrap/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(download_err)?;
        let response = client.get(&url).send().map_err(download_err)?;
        if !response.status().is_success() {
            return Err(SrsError::Status {
                status: response.status(),
                url,
            });
        }
        let bytes = response.bytes().map_err(download_err)?;

        if let Some(parent) = self.cache.parent() {
            create_dir(parent).map_err(|source| SrsError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        write_atomically(&self.cache, &bytes).map_err(|source| SrsError::Io {
            path: self.cache.clone(),
            source,
        })?;
        tracing::info!(
            bytes = bytes.len(),
            elapsed = ?started.elapsed(),
            "srs downloaded"
        );
        Ok(())
    }
}

/// Write `bytes` next to `path` and rename into place, so an interrupted
/// download never leaves a truncated cache behind.
fn write_atomically(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let partial = path.with_extension("part");
    fs::write(&partial, bytes)?;
    fs::rename(&partial, path)
}

fn create_dir(dir: &Path) -> io::Result<()> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    fs::create_dir_all(dir)
}

/// Insecure reference string for `2^k` rows from [`DUMMY_SEED`].
pub fn dummy_params(k: u32) -> ParamsKZG<Bn256> {
    ParamsKZG::<Bn256>::setup(k, ChaCha20Rng::seed_from_u64(DUMMY_SEED))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufWriter;

    fn write_params(path: &Path, k: u32) {
        let mut w = BufWriter::new(File::create(path).unwrap());
        dummy_params(k).write(&mut w).unwrap();
    }

    #[test]
    fn cache_is_replaced_in_one_step() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("srs_setup");
        fs::write(&cache, b"stale").unwrap();
        write_atomically(&cache, b"fresh").unwrap();
        assert_eq!(fs::read(&cache).unwrap(), b"fresh");
        assert!(!dir.path().join("srs_setup.part").exists());
    }

    #[test]
    fn leftover_partial_download_is_not_a_cache() {
        let dir = tempfile::tempdir().unwrap();
        let src = SrsSource::new(dir.path().join("srs_setup"))
            .with_url_template("http://127.0.0.1:9/srs-{k}");
        fs::write(dir.path().join("srs_setup.part"), b"trunc").unwrap();
        assert!(src.load(4).is_err());
        assert!(!dir.path().join("srs_setup").exists());
    }

    #[test]
    fn url_substitutes_size() {
        let src = SrsSource::new("srs").with_url_template("https://example.org/srs-{k}.bin");
        assert_eq!(src.url(12), "https://example.org/srs-12.bin");
        assert_eq!(SrsSource::new("srs").url(3), DEFAULT_SRS_URL.replace("{k}", "3"));
    }

    #[test]
    fn cached_string_is_downsized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("srs_setup");
        write_params(&path, 5);
        let params = SrsSource::new(&path).load(4).unwrap();
        assert_eq!(params.k(), 4);
        assert_eq!(params.n(), 16);
    }

    #[test]
    fn cached_string_too_small_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("srs_setup");
        write_params(&path, 4);
        let err = SrsSource::new(&path).load(6).unwrap_err();
        assert!(matches!(err, SrsError::TooSmall { have: 4, need: 6 }));
    }

    #[test]
    fn corrupt_cache_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("srs_setup");
        fs::write(&path, [1u8, 2, 3]).unwrap();
        let err = SrsSource::new(&path).load(4).unwrap_err();
        assert!(matches!(err, SrsError::Io { .. }));
    }

    #[test]
    fn unreachable_source_fails_without_creating_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("srs_setup");
        let err = SrsSource::new(&path)
            .with_url_template("http://127.0.0.1:9/srs-{k}")
            .load(4)
            .unwrap_err();
        assert!(matches!(err, SrsError::Download { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn dummy_params_are_deterministic() {
        let mut a = Vec::new();
        let mut b = Vec::new();
        dummy_params(3).write(&mut a).unwrap();
        dummy_params(3).write(&mut b).unwrap();
        assert_eq!(a, b);
    }
}
