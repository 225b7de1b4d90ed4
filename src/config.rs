use std::path::PathBuf;

/// Directory holding the unified file and the `ethnic/` sub-directory.
pub const DATA_DIR: &str = "data";
/// Sub-directory of `DATA_DIR` holding one file per ethnicity.
pub const CATEGORY_SUBDIR: &str = "ethnic";
pub const CATEGORY_PATTERN: &str = "heritage-data-*.json";
pub const UNIFIED_FILE_NAME: &str = "heritage-data.json";
pub const SCHEMA_VERSION: &str = "2.0.0";
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Label used when a category file has no `metadata.ethnicity`.
pub const UNKNOWN_ETHNICITY: &str = "Unknown";

/// File names that match `CATEGORY_PATTERN` but are not category files.
pub const EXCLUDED_FILE_NAMES: [&str; 6] = [
    "heritage-data.json",
    "heritage-data-manifest.json",
    "heritage-data-progress.json",
    "heritage-data-template.json",
    "heritage-data-original-backup.json",
    "heritage-data-backup.json",
];

/// Top-level record fields that may be absent.
pub const OPTIONAL_FIELDS: [&str; 2] = ["lab", "urls"];

/// How many violations per record are printed before the rest are summarised.
pub const MAX_PRINTED_ERRORS: usize = 5;

/// Where the data files live on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub data_dir: PathBuf,
}

impl Layout {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn category_dir(&self) -> PathBuf {
        self.data_dir.join(CATEGORY_SUBDIR)
    }

    pub fn unified_path(&self) -> PathBuf {
        self.data_dir.join(UNIFIED_FILE_NAME)
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(DATA_DIR)
    }
}

pub fn is_excluded(file_name: &str) -> bool {
    EXCLUDED_FILE_NAMES.contains(&file_name)
}
