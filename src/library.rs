//! Sound asset library.
//!
//! Each [`SoundCategory`] maps to a directory under the sound root. The
//! library is filled once at boot by [`SoundLibrary::discover`] and is
//! read-only afterwards. An empty category is valid: requests for it are
//! skipped by the playback arbiter.
//!
//! ```text
//! /sounds/
//!   putmedown.wav      (shake warning, fixed asset)
//!   old/*.wav          SoundCategory::Old
//!   titan/*.wav        SoundCategory::Titan
//!   funny/*.wav        SoundCategory::Funny
//!   test/*.wav         SoundCategory::Test
//! ```

use core::fmt;
use std::fs;
use std::path::Path;

use log::{info, warn};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Asset category, one directory each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCategory {
    Old,
    Titan,
    Funny,
    Test,
}

impl SoundCategory {
    pub const ALL: [SoundCategory; 4] = [Self::Old, Self::Titan, Self::Funny, Self::Test];

    /// Directory name under the sound root.
    pub const fn dir(self) -> &'static str {
        match self {
            Self::Old => "old",
            Self::Titan => "titan",
            Self::Funny => "funny",
            Self::Test => "test",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for SoundCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir())
    }
}

/// Which directory entries count as playable assets.
#[derive(Debug, Clone)]
pub struct AssetFilter<'a> {
    /// Required extension, without the dot.
    pub extension: &'a str,
    /// Entries starting with this are skipped (e.g. macOS `._` forks).
    pub metadata_prefix: &'a str,
}

impl AssetFilter<'_> {
    pub fn accepts(&self, name: &str) -> bool {
        if !self.metadata_prefix.is_empty() && name.starts_with(self.metadata_prefix) {
            return false;
        }
        Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == self.extension)
    }
}

/// Immutable per-category list of asset file names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoundLibrary {
    assets: [Vec<String>; 4],
}

impl SoundLibrary {
    /// Build a library from explicit lists. Names are sorted so selection
    /// indices are stable across boots.
    pub fn from_assets<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (SoundCategory, S)>,
        S: Into<String>,
    {
        let mut library = Self::default();
        for (category, name) in entries {
            library.assets[category.index()].push(name.into());
        }
        for list in &mut library.assets {
            list.sort();
        }
        library
    }

    /// Enumerate every category directory under `root`.
    ///
    /// A missing or unreadable directory leaves that category empty; it
    /// never aborts discovery of the others.
    pub fn discover(root: &Path, filter: &AssetFilter<'_>) -> Self {
        let mut library = Self::default();
        for category in SoundCategory::ALL {
            let dir = root.join(category.dir());
            let entries = match fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("assets: {} unreadable ({}), category empty", dir.display(), e);
                    continue;
                }
            };

            let list = &mut library.assets[category.index()];
            for entry in entries.flatten() {
                if !entry.file_type().is_ok_and(|t| t.is_file()) {
                    continue;
                }
                match entry.file_name().to_str() {
                    Some(name) if filter.accepts(name) => list.push(name.to_owned()),
                    _ => {}
                }
            }
            list.sort();
            info!("assets: {} -> {} file(s)", category, list.len());
        }
        library
    }

    /// Asset names for `category`, in stable order.
    pub fn assets(&self, category: SoundCategory) -> &[String] {
        &self.assets[category.index()]
    }

    pub fn is_empty(&self, category: SoundCategory) -> bool {
        self.assets(category).is_empty()
    }

    /// Uniform random pick; `None` when the category is empty.
    pub fn choose<R: Rng + ?Sized>(&self, category: SoundCategory, rng: &mut R) -> Option<&str> {
        self.assets(category).choose(rng).map(String::as_str)
    }
}
