use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    assets::source::ImageAsset,
    foundation::error::{PackError, PackResult},
};

#[derive(Debug)]
/// Name-keyed store of source images.
///
/// The store owns every [`ImageAsset`]; fill specs hold shared handles to them.
/// Names are unique within a store, while identity checks elsewhere use
/// [`crate::AssetId`].
pub struct AssetStore {
    root: PathBuf,
    by_name: BTreeMap<String, Arc<ImageAsset>>,
}

impl AssetStore {
    /// Empty store resolving relative paths against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            by_name: BTreeMap::new(),
        }
    }

    /// Return root directory used when resolving relative image paths.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Decode `path` (relative to root unless absolute) and register it as `name`.
    pub fn load(&mut self, name: &str, path: impl AsRef<Path>) -> PackResult<Arc<ImageAsset>> {
        let abs = self.root.join(path.as_ref());
        let asset = ImageAsset::open(name, &abs)?;
        tracing::debug!(
            name,
            path = %abs.display(),
            width = asset.width(),
            height = asset.height(),
            channels = asset.channels(),
            "loaded image asset"
        );
        self.insert(asset)
    }

    /// Register an already constructed image under its own name.
    pub fn insert(&mut self, asset: ImageAsset) -> PackResult<Arc<ImageAsset>> {
        if self.by_name.contains_key(asset.name()) {
            return Err(PackError::validation(format!(
                "image name '{}' is already registered",
                asset.name()
            )));
        }
        let asset = Arc::new(asset);
        self.by_name
            .insert(asset.name().to_string(), Arc::clone(&asset));
        Ok(asset)
    }

    /// Lookup an image by name.
    pub fn get(&self, name: &str) -> PackResult<Arc<ImageAsset>> {
        self.by_name
            .get(name)
            .cloned()
            .ok_or_else(|| PackError::validation(format!("unknown image '{name}'")))
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }

    /// Number of registered images.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
