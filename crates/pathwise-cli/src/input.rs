//! Loading roadmap, request and schedule documents from disk.
//!
//! The format is chosen by extension: `.yaml`/`.yml` → YAML, `.toml` → TOML,
//! anything else → JSON.

use pathwise_core::ErrorCode;
use serde::de::DeserializeOwned;
use std::error::Error as StdError;
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

type BoxError = Box<dyn StdError + Send + Sync>;

/// Why an input document could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: BoxError,
    },
}

impl InputError {
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Read { .. } => ErrorCode::InputReadFailed,
            Self::Parse { .. } => ErrorCode::InputParseError,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Yaml,
    Toml,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml" | "yml") => Self::Yaml,
            Some("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

/// Read and deserialize `path`.
///
/// # Errors
///
/// Returns an [`InputError`] naming the file when it cannot be read or parsed.
pub fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T, InputError> {
    let content = fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let format = InputFormat::from_path(path);
    debug!(path = %path.display(), ?format, bytes = content.len(), "loading input");
    parse_document(&content, format).map_err(|source| InputError::Parse {
        path: path.display().to_string(),
        source,
    })
}

fn parse_document<T: DeserializeOwned>(content: &str, format: InputFormat) -> Result<T, BoxError> {
    let value = match format {
        InputFormat::Json => serde_json::from_str(content)?,
        InputFormat::Yaml => serde_yaml::from_str(content)?,
        InputFormat::Toml => toml::from_str(content)?,
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathwise_core::Roadmap;
    use std::path::PathBuf;

    #[test]
    fn extension_picks_format() {
        assert_eq!(InputFormat::from_path(&PathBuf::from("a.yml")), InputFormat::Yaml);
        assert_eq!(InputFormat::from_path(&PathBuf::from("a.YAML")), InputFormat::Yaml);
        assert_eq!(InputFormat::from_path(&PathBuf::from("a.toml")), InputFormat::Toml);
        assert_eq!(InputFormat::from_path(&PathBuf::from("a.json")), InputFormat::Json);
        assert_eq!(InputFormat::from_path(&PathBuf::from("roadmap")), InputFormat::Json);
    }

    #[test]
    fn yaml_and_toml_roadmaps_load() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("r.yaml");
        fs::write(
            &yaml,
            "nodes:\n  - id: a\n    estimated_hours: 2\n  - id: b\n    estimatedHours: 1.5\nedges:\n  - from: a\n    to: b\n",
        )
        .unwrap();
        let roadmap: Roadmap = load_document(&yaml).unwrap();
        assert_eq!(roadmap.nodes.len(), 2);
        assert_eq!(roadmap.edges[0].to, "b");

        let toml_path = dir.path().join("r.toml");
        fs::write(
            &toml_path,
            "[[nodes]]\nid = \"a\"\nestimated_hours = 2.0\ndifficulty = \"hard\"\n",
        )
        .unwrap();
        let roadmap: Roadmap = load_document(&toml_path).unwrap();
        assert_eq!(roadmap.nodes[0].id, "a");
        assert!(roadmap.edges.is_empty());
    }

    #[test]
    fn errors_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        let err = load_document::<Roadmap>(&path).unwrap_err();
        assert!(format!("{err}").contains("Failed to parse"), "{err}");
        assert_eq!(err.error_code(), ErrorCode::InputParseError);

        let missing = dir.path().join("missing.json");
        let err = load_document::<Roadmap>(&missing).unwrap_err();
        assert!(format!("{err}").contains("Failed to read"), "{err}");
        assert_eq!(err.error_code(), ErrorCode::InputReadFailed);
    }
}
