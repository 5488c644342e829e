//! Repository port for learned option sets.
//!
//! This module defines the trait boundary between the domain and
//! infrastructure layers for storing trained options.

use std::path::Path;

use crate::{Result, learning::OptionSet};

/// Port for persisting and loading learned option sets.
///
/// # Examples
///
/// ```no_run
/// use oporto::learning::OptionSet;
/// use oporto::ports::OptionRepository;
/// use std::path::Path;
///
/// fn store<R: OptionRepository>(repo: &R, options: &OptionSet) -> oporto::Result<()> {
///     repo.save(options, Path::new("options.msgpack"))
/// }
/// ```
pub trait OptionRepository {
    /// Save an option set.
    ///
    /// # Errors
    ///
    /// Returns an error if the location cannot be written or serialization
    /// fails.
    fn save(&self, options: &OptionSet, path: &Path) -> Result<()>;

    /// Load an option set.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is stored at `path` or the stored data
    /// cannot be decoded.
    fn load(&self, path: &Path) -> Result<OptionSet>;
}
