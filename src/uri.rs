use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

pub const FILE_SCHEME: &str = "file";
pub const GIT_REVISION_SCHEME: &str = "gitrev";
pub const DIFF_SCHEME: &str = "diff";

/// Address of a resource the editor can load: a live file, a file at a
/// revision, or a comparison of two of those.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceUri {
    scheme: String,
    path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    query: Option<String>,
}

impl ResourceUri {
    /// Resource for a path on disk. Non-UTF-8 bytes in the name are replaced,
    /// so such a resource can no longer be read back.
    pub fn file(path: &Path) -> Self {
        let text = path.to_string_lossy();
        if let Cow::Owned(_) = text {
            tracing::warn!(path = %path.display(), "file name is not valid UTF-8");
        }
        Self {
            scheme: FILE_SCHEME.to_string(),
            path: text.into_owned(),
            query: None,
        }
    }

    pub fn with_scheme(&self, scheme: &str) -> Self {
        Self {
            scheme: scheme.to_string(),
            ..self.clone()
        }
    }

    pub fn with_query(&self, query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..self.clone()
        }
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn fs_path(&self) -> PathBuf {
        PathBuf::from(&self.path)
    }

    /// Last path segment.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

impl fmt::Display for ResourceUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scheme == FILE_SCHEME {
            write!(f, "file://{}", self.path)?;
        } else {
            write!(f, "{}:{}", self.scheme, self.path)?;
        }
        if let Some(ref q) = self.query {
            write!(f, "?{q}")?;
        }
        Ok(())
    }
}

/// Encoding of a two-sided comparison into a single `diff:` resource.
pub struct DiffUris;

impl DiffUris {
    pub fn encode(from: &ResourceUri, to: &ResourceUri, label: &str) -> ResourceUri {
        // ResourceUri serialization cannot fail: plain strings only
        let query = serde_json::to_string(&[from, to]).unwrap_or_default();
        ResourceUri {
            scheme: DIFF_SCHEME.to_string(),
            path: label.to_string(),
            query: Some(query),
        }
    }

    pub fn decode(uri: &ResourceUri) -> Result<(ResourceUri, ResourceUri)> {
        if uri.scheme != DIFF_SCHEME {
            bail!("not a diff resource: {uri}");
        }
        let query = uri.query().context("diff resource without sides")?;
        let [from, to]: [ResourceUri; 2] =
            serde_json::from_str(query).context("Malformed diff resource")?;
        Ok((from, to))
    }

    pub fn is_diff(uri: &ResourceUri) -> bool {
        uri.scheme == DIFF_SCHEME
    }
}
