//! Package content types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::ModelError;

/// Which subset of a package's build outputs an archive contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentType {
    /// The package's own runtime binaries
    #[serde(alias = "CT_RUNTIME")]
    Runtime,

    /// Runtime binaries plus the shared libraries and plugins they load
    #[serde(alias = "CT_RUNTIME_PORTABLE")]
    RuntimePortable,

    /// Everything needed to develop against the package
    #[serde(alias = "CT_DEVELOPER")]
    Developer,

    /// The buildable source tree
    #[serde(alias = "CT_SOURCES")]
    Sources,
}

impl ContentType {
    pub const ALL: [ContentType; 4] = [
        ContentType::Runtime,
        ContentType::RuntimePortable,
        ContentType::Developer,
        ContentType::Sources,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Runtime => "runtime",
            ContentType::RuntimePortable => "runtime-portable",
            ContentType::Developer => "developer",
            ContentType::Sources => "sources",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContentType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_lowercase().replace('_', "-");
        let normalized = normalized.strip_prefix("ct-").unwrap_or(&normalized);
        match normalized {
            "runtime" => Ok(ContentType::Runtime),
            "runtime-portable" | "runtime-port" => Ok(ContentType::RuntimePortable),
            "developer" | "dev" => Ok(ContentType::Developer),
            "sources" | "src" => Ok(ContentType::Sources),
            _ => Err(ModelError::UnknownContentType(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cmake_constant_spellings() {
        assert_eq!("CT_RUNTIME".parse::<ContentType>().unwrap(), ContentType::Runtime);
        assert_eq!(
            "CT_RUNTIME_PORTABLE".parse::<ContentType>().unwrap(),
            ContentType::RuntimePortable
        );
        assert_eq!("developer".parse::<ContentType>().unwrap(), ContentType::Developer);
        assert_eq!("src".parse::<ContentType>().unwrap(), ContentType::Sources);
    }

    #[test]
    fn test_unknown_content_type() {
        let err = "CT_DOCS".parse::<ContentType>().unwrap_err();
        assert_eq!(err, ModelError::UnknownContentType("CT_DOCS".to_string()));
    }
}
