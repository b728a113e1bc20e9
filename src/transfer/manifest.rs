//! `manifest.json`: export file name to original source reference

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ImageEntry;

pub const MANIFEST_NAME: &str = "manifest.json";

const MANIFEST_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub source_ref: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_url: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub version: u32,
    pub files: BTreeMap<String, ManifestEntry>,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            version: MANIFEST_VERSION,
            files: BTreeMap::new(),
        }
    }
}

impl Manifest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the origin of an exported image file
    pub fn insert(&mut self, file_name: impl Into<String>, entry: &ImageEntry) {
        self.files.insert(
            file_name.into(),
            ManifestEntry {
                source_ref: entry.source_ref.clone(),
                page_url: entry.page_url.clone(),
            },
        );
    }

    #[must_use]
    pub fn get(&self, file_name: &str) -> Option<&ManifestEntry> {
        self.files.get(file_name)
    }

    /// Fold another manifest in; its entries win on conflict
    pub fn merge(&mut self, other: Self) {
        self.files.extend(other.files);
    }

    /// # Errors
    ///
    /// Returns a `serde_json::Error` if serialization fails.
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(self)
    }

    /// # Errors
    ///
    /// Returns a `serde_json::Error` if `bytes` is not a manifest.
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::entry;

    #[test]
    fn test_json_keeps_page_url_optional() {
        let mut manifest = Manifest::new();
        manifest.insert("1.png", &entry("/data/a.png", &[]));
        let mut with_url = entry("/data/b.png", &[]);
        with_url.page_url = Some("https://example.com/post/1".into());
        manifest.insert("2.png", &with_url);

        let json = String::from_utf8(manifest.to_json().unwrap()).unwrap();
        assert_eq!(json.matches("page_url").count(), 1);

        let parsed = Manifest::from_json(json.as_bytes()).unwrap();
        assert_eq!(parsed, manifest);
        assert_eq!(parsed.get("1.png").unwrap().source_ref, "/data/a.png");
    }

    #[test]
    fn test_merge_prefers_newer() {
        let mut first = Manifest::new();
        first.insert("1.png", &entry("old", &[]));
        let mut second = Manifest::new();
        second.insert("1.png", &entry("new", &[]));

        first.merge(second);
        assert_eq!(first.get("1.png").unwrap().source_ref, "new");
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(Manifest::from_json(b"not json").is_err());
    }
}
