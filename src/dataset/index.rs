//! Label-index parsing and sample-list construction.
//!
//! FGVC-Aircraft ships one text file per (class type, split) pair. Each line
//! holds an image id followed by the label, which may itself contain spaces
//! (`1025794 Boeing 707-320`).

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::DatasetError;

/// One parsed line of an index file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub image_id: String,
    pub label: String,
}

/// Image path paired with its dense class id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sample {
    pub path: PathBuf,
    pub target: usize,
}

/// Sorted class names and their dense ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassIndex {
    classes: Vec<String>,
    class_to_idx: BTreeMap<String, usize>,
}

impl ClassIndex {
    /// Build the index from raw labels; duplicates collapse and ids follow sort order.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let unique: BTreeSet<String> = labels
            .into_iter()
            .map(|label| label.as_ref().to_string())
            .collect();
        let classes: Vec<String> = unique.into_iter().collect();
        let class_to_idx = classes
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), idx))
            .collect();
        Self {
            classes,
            class_to_idx,
        }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn class_to_idx(&self) -> &BTreeMap<String, usize> {
        &self.class_to_idx
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.class_to_idx.get(name).copied()
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Index file contents with labels resolved to class ids.
#[derive(Debug, Clone, Default)]
pub struct IndexedLabels {
    pub image_ids: Vec<String>,
    pub targets: Vec<usize>,
    pub classes: ClassIndex,
}

/// Parse an index file body. `path` is only used for error messages.
pub fn parse_index(reader: impl BufRead, path: &Path) -> Result<Vec<IndexEntry>, DatasetError> {
    let mut entries = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| DatasetError::ReadIndex {
            path: path.to_path_buf(),
            source,
        })?;
        let mut tokens = line.split_whitespace();
        let Some(image_id) = tokens.next() else {
            continue;
        };
        let label = tokens.collect::<Vec<_>>().join(" ");
        if label.is_empty() {
            return Err(DatasetError::MalformedIndex {
                path: path.to_path_buf(),
                line: idx + 1,
                reason: format!("image '{image_id}' has no label"),
            });
        }
        entries.push(IndexEntry {
            image_id: image_id.to_string(),
            label,
        });
    }
    Ok(entries)
}

/// Read an index file and resolve every label to its class id.
pub fn find_classes(classes_file: &Path) -> Result<IndexedLabels, DatasetError> {
    let file = File::open(classes_file).map_err(|source| DatasetError::ReadIndex {
        path: classes_file.to_path_buf(),
        source,
    })?;
    let entries = parse_index(BufReader::new(file), classes_file)?;
    Ok(resolve_labels(entries))
}

fn resolve_labels(entries: Vec<IndexEntry>) -> IndexedLabels {
    let classes = ClassIndex::from_labels(entries.iter().map(|entry| entry.label.as_str()));
    let mut image_ids = Vec::with_capacity(entries.len());
    let mut targets = Vec::with_capacity(entries.len());
    for entry in entries {
        // every label went into the index above
        let target = classes.index_of(&entry.label).unwrap_or_default();
        image_ids.push(entry.image_id);
        targets.push(target);
    }
    IndexedLabels {
        image_ids,
        targets,
        classes,
    }
}

/// Pair image ids with targets as `<root>/data/images/<id>.jpg` samples.
pub fn make_dataset(
    root: &Path,
    image_ids: &[String],
    targets: &[usize],
) -> Result<Vec<Sample>, DatasetError> {
    if image_ids.len() != targets.len() {
        return Err(DatasetError::LengthMismatch {
            image_ids: image_ids.len(),
            targets: targets.len(),
        });
    }
    let images_dir = root.join("data").join("images");
    Ok(image_ids
        .iter()
        .zip(targets)
        .map(|(image_id, &target)| Sample {
            path: images_dir.join(format!("{image_id}.jpg")),
            target,
        })
        .collect())
}
