// FrameSeq Resource Table
// Copyright (c) 2026 Xing_The_Creator | FrameSeq
//
// Named drawables and resource arrays, loaded from a JSON manifest.
// Every drawable gets a non-zero ResourceId; id 0 is "unresolved".

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::codecs::png::PngDecoder;
use image::{ColorType, ImageDecoder, ImageFormat, RgbaImage};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{DecodeError, ResourceError};

/// Opaque handle to a drawable in a [`ResourceTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(pub u32);

impl ResourceId {
    pub const UNRESOLVED: ResourceId = ResourceId(0);

    pub fn is_resolved(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Turns a resource id into RGBA pixels.
///
/// `load` always allocates. `load_into` reuses the caller's buffer and must
/// fail (rather than resize it) when the encoded image has another shape.
pub trait FrameLoader: Send + Sync {
    fn load(&self, id: ResourceId) -> Result<RgbaImage, DecodeError>;

    fn load_into(&self, id: ResourceId, buffer: &mut RgbaImage) -> Result<(), DecodeError>;
}

enum Drawable {
    Bytes(Arc<[u8]>),
    File(PathBuf),
}

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    drawables: BTreeMap<String, PathBuf>,
    #[serde(default)]
    image_arrays: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    int_arrays: BTreeMap<String, Vec<u32>>,
}

#[derive(Default)]
pub struct ResourceTable {
    names: HashMap<String, ResourceId>,
    drawables: Vec<Drawable>,
    image_arrays: HashMap<String, Vec<String>>,
    int_arrays: HashMap<String, Vec<u32>>,
}

impl ResourceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a manifest. Drawable paths are resolved against the manifest's directory.
    pub fn from_manifest(path: &Path) -> Result<Self, ResourceError> {
        let json = fs::read_to_string(path).map_err(|source| ResourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        let table = Self::from_manifest_str(&json, base)?;

        info!(
            "[RESOURCES] Loaded {:?}: {} drawables, {} image arrays, {} int arrays",
            path,
            table.drawables.len(),
            table.image_arrays.len(),
            table.int_arrays.len()
        );
        Ok(table)
    }

    pub fn from_manifest_str(json: &str, base: &Path) -> Result<Self, ResourceError> {
        let manifest: Manifest = serde_json::from_str(json)?;
        let mut table = Self::new();

        for (name, file) in manifest.drawables {
            table.insert_path(&name, base.join(file));
        }
        for (name, entries) in manifest.image_arrays {
            table.define_image_array(&name, entries);
        }
        for (name, values) in manifest.int_arrays {
            table.define_int_array(&name, values);
        }
        Ok(table)
    }

    pub fn insert_bytes(&mut self, name: &str, bytes: impl Into<Arc<[u8]>>) -> ResourceId {
        self.insert(name, Drawable::Bytes(bytes.into()))
    }

    pub fn insert_path(&mut self, name: &str, path: impl Into<PathBuf>) -> ResourceId {
        self.insert(name, Drawable::File(path.into()))
    }

    fn insert(&mut self, name: &str, drawable: Drawable) -> ResourceId {
        if let Some(&id) = self.names.get(name) {
            self.drawables[(id.0 - 1) as usize] = drawable;
            return id;
        }
        self.drawables.push(drawable);
        let id = ResourceId(self.drawables.len() as u32);
        self.names.insert(name.to_string(), id);
        id
    }

    /// Id of a named drawable, or [`ResourceId::UNRESOLVED`].
    pub fn id(&self, name: &str) -> ResourceId {
        self.names
            .get(name)
            .copied()
            .unwrap_or(ResourceId::UNRESOLVED)
    }

    pub fn define_image_array(&mut self, name: &str, entries: Vec<String>) {
        self.image_arrays.insert(name.to_string(), entries);
    }

    pub fn define_int_array(&mut self, name: &str, values: Vec<u32>) {
        self.int_arrays.insert(name.to_string(), values);
    }

    /// Resolve an image array. Entries naming unknown drawables come back unresolved.
    pub fn image_array(&self, name: &str) -> Result<Vec<ResourceId>, ResourceError> {
        let entries = self
            .image_arrays
            .get(name)
            .ok_or_else(|| ResourceError::MissingArray(name.to_string()))?;
        Ok(entries.iter().map(|entry| self.id(entry)).collect())
    }

    pub fn int_array(&self, name: &str) -> Result<&[u32], ResourceError> {
        self.int_arrays
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| ResourceError::MissingArray(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.drawables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawables.is_empty()
    }

    fn bytes(&self, id: ResourceId) -> Result<Cow<'_, [u8]>, DecodeError> {
        let drawable = id
            .0
            .checked_sub(1)
            .and_then(|slot| self.drawables.get(slot as usize))
            .ok_or(DecodeError::Unresolved(id))?;

        match drawable {
            Drawable::Bytes(bytes) => Ok(Cow::Borrowed(&bytes[..])),
            Drawable::File(path) => Ok(Cow::Owned(fs::read(path)?)),
        }
    }
}

impl FrameLoader for ResourceTable {
    fn load(&self, id: ResourceId) -> Result<RgbaImage, DecodeError> {
        let bytes = self.bytes(id)?;
        Ok(image::load_from_memory(&bytes)?.into_rgba8())
    }

    fn load_into(&self, id: ResourceId, buffer: &mut RgbaImage) -> Result<(), DecodeError> {
        let bytes = self.bytes(id)?;

        let reader = image::io::Reader::new(Cursor::new(&bytes[..])).with_guessed_format()?;
        let format = reader.format();
        let found = reader.into_dimensions()?;
        let expected = buffer.dimensions();
        if found != expected {
            return Err(DecodeError::ShapeMismatch { expected, found });
        }

        // RGBA8 PNGs decode straight into the buffer's pixels.
        if format == Some(ImageFormat::Png) {
            let decoder = PngDecoder::new(Cursor::new(&bytes[..]))?;
            if decoder.color_type() == ColorType::Rgba8 {
                decoder.read_image(&mut **buffer)?;
                return Ok(());
            }
        }

        debug!("[RESOURCES] {} needs conversion before reuse", id);
        let decoded = image::load_from_memory(&bytes)?.into_rgba8();
        buffer.copy_from_slice(decoded.as_raw());
        Ok(())
    }
}
