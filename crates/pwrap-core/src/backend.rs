//! # Backend Selection
//!
//! The two proving backends the wrapper can target. Parsed once from the
//! command line and carried as a closed enum from then on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Outer proof system used to wrap the plonky2 proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// PLONK with KZG commitments on BN254.
    Plonk,
    /// Groth16 on BN254.
    Groth16,
}

impl Backend {
    /// All backends, in CLI listing order.
    pub const ALL: [Backend; 2] = [Backend::Plonk, Backend::Groth16];

    /// Lowercase name, also the data subdirectory name.
    pub fn as_str(self) -> &'static str {
        match self {
            Backend::Plonk => "plonk",
            Backend::Groth16 => "groth16",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognized backend name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown proof system {0:?} (expected \"plonk\" or \"groth16\")")]
pub struct UnknownBackend(
    /// The rejected name.
    pub String,
);

impl FromStr for Backend {
    type Err = UnknownBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plonk" => Ok(Backend::Plonk),
            "groth16" => Ok(Backend::Groth16),
            other => Err(UnknownBackend(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_names() {
        assert_eq!("plonk".parse::<Backend>().unwrap(), Backend::Plonk);
        assert_eq!("groth16".parse::<Backend>().unwrap(), Backend::Groth16);
    }

    #[test]
    fn parse_is_case_sensitive() {
        let err = "PLONK".parse::<Backend>().unwrap_err();
        assert_eq!(err, UnknownBackend("PLONK".into()));
        assert!(err.to_string().contains("expected \"plonk\" or \"groth16\""));
    }

    #[test]
    fn display_roundtrips_through_from_str() {
        for backend in Backend::ALL {
            assert_eq!(backend.to_string().parse::<Backend>().unwrap(), backend);
        }
    }

    #[test]
    fn serde_uses_lowercase() {
        assert_eq!(serde_json::to_string(&Backend::Groth16).unwrap(), "\"groth16\"");
    }
}
