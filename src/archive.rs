#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    fmt::{Debug, Display, Formatter},
    fs::File,
    io::{self, BufReader, Read},
    path::{Path, PathBuf},
};

use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};
use zip::{ZipArchive, result::ZipError};

use crate::{
    constants::{CLASS_SUFFIX, MODULE_INFO, VERSIONED_PREFIX},
    error::ArchiveError,
};

/// SHA-256 digest of a class file's bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Hashes an in-memory buffer.
    pub fn of(bytes: &[u8]) -> Self {
        Self(Sha256::digest(bytes).into())
    }
}

impl Display for ContentHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl Debug for ContentHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ContentHash({self})")
    }
}

impl Serialize for ContentHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A compiled class found inside a jar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassEntry {
    /// dotted class name, eg. `com.example.Foo$Bar`
    pub class_name:   String,
    /// digest of the entry's bytes
    pub content_hash: ContentHash,
}

/// Whether the entry at `path` is a class that takes part in uniqueness
/// checks.
///
/// Module descriptors and the version specific classes of multi-release jars
/// (everything under `META-INF/versions/`) are skipped, as is anything that is
/// not a `.class` file.
pub fn is_checked_class(path: &str) -> bool {
    path.ends_with(CLASS_SUFFIX)
        && !path.ends_with(MODULE_INFO)
        && !path.starts_with(VERSIONED_PREFIX)
}

/// Converts `com/example/Foo.class` into `com.example.Foo`.
pub fn class_name(entry_path: &str) -> String {
    entry_path
        .strip_suffix(CLASS_SUFFIX)
        .unwrap_or(entry_path)
        .replace('/', ".")
}

/// An open jar file.
pub struct JarReader {
    /// location of the jar, used in diagnostics
    path:    PathBuf,
    /// zip handle, closed when the reader is dropped
    archive: ZipArchive<BufReader<File>>,
}

impl JarReader {
    /// Opens the jar at `path`.
    ///
    /// Returns `Ok(None)` after logging a warning when the file does not
    /// exist. A file that exists but cannot be read as a zip archive is an
    /// error.
    pub fn open(path: &Path) -> Result<Option<Self>, ArchiveError> {
        if !path.exists() {
            tracing::warn!("Skipping {}, the file does not exist", path.display());
            return Ok(None);
        }

        let file = File::open(path).map_err(|e| ArchiveError::Open {
            path:   path.to_path_buf(),
            source: ZipError::Io(e),
        })?;
        let archive = ZipArchive::new(BufReader::new(file)).map_err(|source| ArchiveError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Some(Self {
            path: path.to_path_buf(),
            archive,
        }))
    }

    /// Location of the jar.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Streams every checked class, hashing its contents.
    pub fn classes(self) -> ClassEntries {
        ClassEntries {
            reader: self,
            next:   0,
        }
    }

    /// Streams the names of every checked class without reading contents.
    pub fn class_names(self) -> ClassNames {
        ClassNames(self.classes())
    }
}

/// Lazy iterator over the classes of one jar. See [`JarReader::classes`].
pub struct ClassEntries {
    /// the jar being walked
    reader: JarReader,
    /// index of the next central directory entry to look at
    next:   usize,
}

impl ClassEntries {
    /// Moves to the next accepted entry and hands its path and contents to
    /// `read`. Stops for good after the first error.
    fn advance<T>(
        &mut self,
        read: impl FnOnce(&str, &mut dyn Read) -> io::Result<T>,
    ) -> Option<Result<T, ArchiveError>> {
        let len = self.reader.archive.len();
        while self.next < len {
            let index = self.next;
            self.next += 1;

            let mut entry = match self.reader.archive.by_index(index) {
                Ok(entry) => entry,
                Err(source) => {
                    self.next = len;
                    return Some(Err(ArchiveError::Entry {
                        path: self.reader.path.clone(),
                        index,
                        source,
                    }));
                }
            };

            if entry.is_dir() || !is_checked_class(entry.name()) {
                continue;
            }

            let name = entry.name().to_string();
            return match read(&name, &mut entry) {
                Ok(value) => Some(Ok(value)),
                Err(source) => {
                    drop(entry);
                    self.next = len;
                    Some(Err(ArchiveError::Read {
                        path: self.reader.path.clone(),
                        entry: name,
                        source,
                    }))
                }
            };
        }
        None
    }
}

impl Iterator for ClassEntries {
    type Item = Result<ClassEntry, ArchiveError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance(|name, content| {
            let mut hasher = Sha256::new();
            io::copy(content, &mut hasher)?;
            Ok(ClassEntry {
                class_name:   class_name(name),
                content_hash: ContentHash(hasher.finalize().into()),
            })
        })
    }
}

/// Lazy iterator over class names only. See [`JarReader::class_names`].
pub struct ClassNames(ClassEntries);

impl Iterator for ClassNames {
    type Item = Result<String, ArchiveError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.advance(|name, _| Ok(class_name(name)))
    }
}
