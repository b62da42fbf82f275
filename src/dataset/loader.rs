//! Pluggable sample loading and transforms.

use std::path::Path;

use image::RgbImage;

use crate::error::DatasetError;

/// Turns a sample path into an in-memory value.
///
/// Any `Fn(&Path) -> Result<T, DatasetError>` is a loader.
pub trait SampleLoader {
    type Output;

    fn load(&self, path: &Path) -> Result<Self::Output, DatasetError>;
}

impl<F, T> SampleLoader for F
where
    F: Fn(&Path) -> Result<T, DatasetError>,
{
    type Output = T;

    fn load(&self, path: &Path) -> Result<T, DatasetError> {
        self(path)
    }
}

/// Default loader: decode with `image` and convert to 8-bit RGB.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageLoader;

impl SampleLoader for ImageLoader {
    type Output = RgbImage;

    fn load(&self, path: &Path) -> Result<RgbImage, DatasetError> {
        let image = image::open(path).map_err(|err| DatasetError::Load {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        Ok(image.to_rgb8())
    }
}

/// Maps a loaded sample or a target to a new value.
///
/// Any `Fn(I) -> O` is a transform.
pub trait Transform<I> {
    type Output;

    fn apply(&self, input: I) -> Self::Output;

    /// Short description used in dataset summaries.
    fn describe(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

impl<I, O, F> Transform<I> for F
where
    F: Fn(I) -> O,
{
    type Output = O;

    fn apply(&self, input: I) -> O {
        self(input)
    }
}

/// Pass-through transform used when none is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl<I> Transform<I> for Identity {
    type Output = I;

    fn apply(&self, input: I) -> I {
        input
    }

    fn describe(&self) -> String {
        "None".to_string()
    }
}
