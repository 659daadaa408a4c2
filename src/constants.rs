#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// File name of the class uniqueness lock file, relative to the project root.
pub const LOCK_FILE_NAME: &str = "baseline-class-uniqueness.lock";

/// File name of the resolved dependency manifest, relative to the project
/// root.
pub const MANIFEST_FILE_NAME: &str = "baseline-dependencies.json";

/// Command an operator runs to regenerate the lock file.
pub const WRITE_LOCKS_COMMAND: &str = "baseline check-class-uniqueness --write-locks";

/// Header written at the top of every lock file.
pub const LOCK_FILE_HEADER: &str = "# Danger! Multiple jars contain identically named classes. \
                                    This may cause different behaviour depending on classpath \
                                    ordering.\n# Run `baseline check-class-uniqueness \
                                    --write-locks` to update this file\n";

/// Suffix of compiled class entries inside a jar.
pub const CLASS_SUFFIX: &str = ".class";

/// Module descriptors never take part in uniqueness checks.
pub const MODULE_INFO: &str = "module-info.class";

/// Prefix of version specific entries in multi-release jars.
pub const VERSIONED_PREFIX: &str = "META-INF/versions/";

/// Environment variable overriding the project root directory.
pub const ROOT_DIR_ENV: &str = "BASELINE_ROOT_DIR";

/// Environment variable overriding the lock file location.
pub const LOCK_FILE_ENV: &str = "BASELINE_LOCK_FILE";

/// Environment variable overriding the manifest location.
pub const MANIFEST_ENV: &str = "BASELINE_MANIFEST";
