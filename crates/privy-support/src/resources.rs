//! Embedded text resources
//!
//! Assets are compiled in with `include_str!` and grouped in a [`ResourceSet`].
//! Every operation that produces output takes an explicit `io::Write` sink;
//! the `*_stdout` variants are shorthands for the console.
//!
//! ```rust,ignore
//! static FIXTURES: ResourceSet = ResourceSet::new(&[Resource {
//!     name: "greeting.txt",
//!     contents: include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/assets/greeting.txt")),
//! }]);
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Failure while reading or writing a resource
#[derive(Debug, Error)]
pub enum ResourceError {
    /// No resource has this name
    #[error("Resource '{0}' not found")]
    NotFound(String),

    /// Resource name is empty or whitespace
    #[error("Resource name must not be empty or whitespace")]
    BlankName,

    /// Writing to the sink failed
    #[error("Failed to write resource '{name}': {source}")]
    Write {
        /// Resource being written
        name: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Writing to disk failed
    #[error("Failed to extract resource '{name}' to {}: {source}", .path.display())]
    Extract {
        /// Resource being extracted
        name: String,
        /// Destination file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// One embedded text asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource {
    /// Name used for lookup and as the extracted file name
    pub name: &'static str,
    /// Asset text
    pub contents: &'static str,
}

/// A fixed set of embedded text assets
#[derive(Debug, Clone, Copy)]
pub struct ResourceSet {
    assets: &'static [Resource],
}

impl ResourceSet {
    /// Wrap a static asset table
    pub const fn new(assets: &'static [Resource]) -> Self {
        Self { assets }
    }

    /// Resource names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        self.assets.iter().map(|asset| asset.name)
    }

    /// Check if a resource exists
    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_ok()
    }

    fn find(&self, name: &str) -> Result<&'static Resource, ResourceError> {
        if name.trim().is_empty() {
            return Err(ResourceError::BlankName);
        }
        self.assets
            .iter()
            .find(|asset| asset.name == name)
            .ok_or_else(|| {
                debug!(resource = name, "resource not found");
                ResourceError::NotFound(name.to_string())
            })
    }

    /// Text of a resource
    pub fn read_text(&self, name: &str) -> Result<&'static str, ResourceError> {
        Ok(self.find(name)?.contents)
    }

    /// Text of a resource, also echoed to `sink`
    pub fn read_text_to<W: Write>(&self, name: &str, sink: &mut W) -> Result<&'static str, ResourceError> {
        let asset = self.find(name)?;
        sink.write_all(asset.contents.as_bytes())
            .and_then(|_| sink.flush())
            .map_err(|source| ResourceError::Write {
                name: asset.name.to_string(),
                source,
            })?;
        Ok(asset.contents)
    }

    /// Text of a resource, also echoed to stdout
    pub fn read_text_stdout(&self, name: &str) -> Result<&'static str, ResourceError> {
        self.read_text_to(name, &mut io::stdout().lock())
    }

    /// Write every resource name to `sink`, one per line
    pub fn list_to<W: Write>(&self, sink: &mut W) -> Result<(), ResourceError> {
        for asset in self.assets {
            writeln!(sink, "{}", asset.name).map_err(|source| ResourceError::Write {
                name: asset.name.to_string(),
                source,
            })?;
        }
        Ok(())
    }

    /// Write every resource name to stdout
    pub fn list_stdout(&self) -> Result<(), ResourceError> {
        self.list_to(&mut io::stdout().lock())
    }

    /// Write a resource into `dir` under its own name, returning the path
    ///
    /// Missing parent directories are created and an existing file is
    /// overwritten.
    pub fn extract_to(&self, name: &str, dir: &Path) -> Result<PathBuf, ResourceError> {
        let asset = self.find(name)?;
        let path = dir.join(asset.name);
        let extract_err = |source| ResourceError::Extract {
            name: asset.name.to_string(),
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(extract_err)?;
        }
        fs::write(&path, asset.contents).map_err(extract_err)?;
        debug!(resource = asset.name, path = %path.display(), "extracted resource");
        Ok(path)
    }
}
