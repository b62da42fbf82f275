//! FGVC-Aircraft (Maji et al., 2013) as an indexable dataset.
//!
//! Expected layout below the user-supplied root:
//!
//! ```text
//! <root>/fgvc-aircraft-2013b/data/images/<id>.jpg
//! <root>/fgvc-aircraft-2013b/data/images_<class_type>_<split>.txt
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use directories::BaseDirs;

use super::index::{ClassIndex, Sample, find_classes, make_dataset};
use super::loader::{Identity, ImageLoader, SampleLoader, Transform};
use super::{ClassType, Dataset, Split};
use crate::config::DatasetSettings;
use crate::download::{self, ArchiveSource};
use crate::error::DatasetError;

/// Folder the archive unpacks into, appended to the user-supplied root.
pub const DATA_DIR_NAME: &str = "fgvc-aircraft-2013b";

/// Construction options for [`FgvcAircraft`].
#[derive(Debug, Clone)]
pub struct AircraftOptions<L = ImageLoader, T = Identity, U = Identity> {
    root: PathBuf,
    class_type: ClassType,
    split: Split,
    download: bool,
    archive: ArchiveSource,
    loader: L,
    transform: T,
    target_transform: U,
}

impl AircraftOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            class_type: ClassType::default(),
            split: Split::default(),
            download: false,
            archive: ArchiveSource::default(),
            loader: ImageLoader,
            transform: Identity,
            target_transform: Identity,
        }
    }

    /// Options taken from a settings file; `default_root` fills in a missing root.
    pub fn from_settings(settings: &DatasetSettings, default_root: impl Into<PathBuf>) -> Self {
        let root = settings.root.clone().unwrap_or_else(|| default_root.into());
        Self::new(root)
            .class_type(settings.class_type)
            .split(settings.split)
            .download(settings.download)
            .archive(settings.archive_source())
    }
}

impl<L, T, U> AircraftOptions<L, T, U> {
    pub fn class_type(mut self, class_type: ClassType) -> Self {
        self.class_type = class_type;
        self
    }

    pub fn split(mut self, split: Split) -> Self {
        self.split = split;
        self
    }

    /// Fetch the archive during construction if the data is missing.
    pub fn download(mut self, download: bool) -> Self {
        self.download = download;
        self
    }

    pub fn archive(mut self, archive: ArchiveSource) -> Self {
        self.archive = archive;
        self
    }

    pub fn loader<L2>(self, loader: L2) -> AircraftOptions<L2, T, U> {
        AircraftOptions {
            root: self.root,
            class_type: self.class_type,
            split: self.split,
            download: self.download,
            archive: self.archive,
            loader,
            transform: self.transform,
            target_transform: self.target_transform,
        }
    }

    pub fn transform<T2>(self, transform: T2) -> AircraftOptions<L, T2, U> {
        AircraftOptions {
            root: self.root,
            class_type: self.class_type,
            split: self.split,
            download: self.download,
            archive: self.archive,
            loader: self.loader,
            transform,
            target_transform: self.target_transform,
        }
    }

    pub fn target_transform<U2>(self, target_transform: U2) -> AircraftOptions<L, T, U2> {
        AircraftOptions {
            root: self.root,
            class_type: self.class_type,
            split: self.split,
            download: self.download,
            archive: self.archive,
            loader: self.loader,
            transform: self.transform,
            target_transform,
        }
    }

    /// Resolve paths, optionally download, and index the requested split.
    pub fn build(self) -> Result<FgvcAircraft<L, T, U>, DatasetError> {
        let root = expand_home(&self.root).join(DATA_DIR_NAME);
        let classes_file = root.join("data").join(format!(
            "images_{}_{}.txt",
            self.class_type, self.split
        ));

        if self.download {
            download::ensure_archive(&root, &classes_file, &self.archive)?;
        }

        let labels = find_classes(&classes_file)?;
        let samples = make_dataset(&root, &labels.image_ids, &labels.targets)?;
        tracing::debug!(
            "Indexed {} samples in {} classes from {}",
            samples.len(),
            labels.classes.len(),
            classes_file.display()
        );

        Ok(FgvcAircraft {
            root,
            classes_file,
            class_type: self.class_type,
            split: self.split,
            samples,
            classes: labels.classes,
            loader: self.loader,
            transform: self.transform,
            target_transform: self.target_transform,
        })
    }
}

/// FGVC-Aircraft split indexed as `(image, class id)` pairs.
pub struct FgvcAircraft<L = ImageLoader, T = Identity, U = Identity> {
    root: PathBuf,
    classes_file: PathBuf,
    class_type: ClassType,
    split: Split,
    samples: Vec<Sample>,
    classes: ClassIndex,
    loader: L,
    transform: T,
    target_transform: U,
}

impl FgvcAircraft {
    pub fn builder(root: impl Into<PathBuf>) -> AircraftOptions {
        AircraftOptions::new(root)
    }
}

impl<L, T, U> FgvcAircraft<L, T, U> {
    /// Dataset folder, i.e. the supplied root joined with `fgvc-aircraft-2013b`.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn classes_file(&self) -> &Path {
        &self.classes_file
    }

    pub fn class_type(&self) -> ClassType {
        self.class_type
    }

    pub fn split(&self) -> Split {
        self.split
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn classes(&self) -> &[String] {
        self.classes.classes()
    }

    pub fn class_to_idx(&self) -> &BTreeMap<String, usize> {
        self.classes.class_to_idx()
    }

    pub fn class_index(&self) -> &ClassIndex {
        &self.classes
    }
}

impl<L, T, U> Dataset for FgvcAircraft<L, T, U>
where
    L: SampleLoader,
    T: Transform<L::Output>,
    U: Transform<usize>,
{
    type Item = T::Output;
    type Target = U::Output;

    fn len(&self) -> usize {
        self.samples.len()
    }

    fn get(&self, index: usize) -> Result<(T::Output, U::Output), DatasetError> {
        let Sample { path, target } =
            self.samples
                .get(index)
                .ok_or(DatasetError::IndexOutOfRange {
                    index,
                    len: self.samples.len(),
                })?;
        let sample = self.loader.load(path)?;
        Ok((
            self.transform.apply(sample),
            self.target_transform.apply(*target),
        ))
    }
}

impl<L, T, U> fmt::Display for FgvcAircraft<L, T, U>
where
    L: SampleLoader,
    T: Transform<L::Output>,
    U: Transform<usize>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const TRANSFORMS: &str = "    Transforms (if any): ";
        const TARGET_TRANSFORMS: &str = "    Target Transforms (if any): ";
        writeln!(f, "Dataset FgvcAircraft")?;
        writeln!(f, "    Number of datapoints: {}", self.len())?;
        writeln!(f, "    Root Location: {}", self.root.display())?;
        writeln!(
            f,
            "{TRANSFORMS}{}",
            indent_continuation(&self.transform.describe(), TRANSFORMS.len())
        )?;
        write!(
            f,
            "{TARGET_TRANSFORMS}{}",
            indent_continuation(&self.target_transform.describe(), TARGET_TRANSFORMS.len())
        )
    }
}

fn indent_continuation(text: &str, width: usize) -> String {
    text.replace('\n', &format!("\n{}", " ".repeat(width)))
}

fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match BaseDirs::new() {
        Some(dirs) => dirs.home_dir().join(rest),
        None => path.to_path_buf(),
    }
}
