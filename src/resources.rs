//! Filename-keyed resource loading.
//!
//! Names are resolved against a content root, dispatched to a loader by file
//! extension and cached, so the same name always yields the same shared
//! resource. Geometry is carried as an opaque source blob; decoding it is the
//! renderer's business.

use std::any::type_name;
use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("resource not found: {name} (looked in {})", .path.display())]
    NotFound { name: String, path: PathBuf },
    #[error("resource name `{name}` must stay inside the content root")]
    OutsideRoot { name: String },
    #[error("no loader registered for `{name}` (extension {extension:?})")]
    NoLoader { name: String, extension: String },
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode `{name}`: {source}")]
    Decode {
        name: String,
        #[source]
        source: image::ImageError,
    },
    #[error("`{name}` is a {found}, not a {expected}")]
    KindMismatch {
        name: String,
        found: &'static str,
        expected: &'static str,
    },
}

/// Source geometry of a model, handed to the renderer untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelResource {
    pub format: String,
    pub source: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureData {
    /// Tightly packed RGBA, 8 bits per channel.
    Rgba8(Vec<u8>),
    /// Encoded container (DDS cube maps, block-compressed mips) uploaded as-is.
    Container { format: String, bytes: Vec<u8> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureResource {
    pub width: u32,
    pub height: u32,
    pub data: TextureData,
}

impl TextureResource {
    /// 1x1 texture of a single colour.
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            data: TextureData::Rgba8(rgba.to_vec()),
        }
    }
}

/// Anything a loader produced.
#[derive(Debug, Clone)]
pub enum LoadedResource {
    Model(Arc<ModelResource>),
    Texture(Arc<TextureResource>),
}

impl LoadedResource {
    fn kind(&self) -> &'static str {
        match self {
            LoadedResource::Model(_) => ModelResource::KIND,
            LoadedResource::Texture(_) => TextureResource::KIND,
        }
    }
}

/// A resource type `ResourceManager::load` can hand out.
pub trait Resource: Send + Sync + 'static {
    const KIND: &'static str;

    fn extract(loaded: &LoadedResource) -> Option<Arc<Self>>;
}

impl Resource for ModelResource {
    const KIND: &'static str = "model";

    fn extract(loaded: &LoadedResource) -> Option<Arc<Self>> {
        match loaded {
            LoadedResource::Model(m) => Some(m.clone()),
            _ => None,
        }
    }
}

impl Resource for TextureResource {
    const KIND: &'static str = "texture";

    fn extract(loaded: &LoadedResource) -> Option<Arc<Self>> {
        match loaded {
            LoadedResource::Texture(t) => Some(t.clone()),
            _ => None,
        }
    }
}

/// Shared, named reference to a loaded resource.
pub struct Handle<T> {
    name: Arc<str>,
    inner: Arc<T>,
}

pub type ModelHandle = Handle<ModelResource>;
pub type TextureHandle = Handle<TextureResource>;

impl<T> Handle<T> {
    pub fn new(name: impl Into<Arc<str>>, resource: T) -> Self {
        Self {
            name: name.into(),
            inner: Arc::new(resource),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// True when both handles point at the same loaded resource.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            inner: self.inner.clone(),
        }
    }
}

impl<T> Deref for Handle<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("kind", &type_name::<T>())
            .field("name", &self.name)
            .finish()
    }
}

/// Maps resource names to files under a content root.
#[derive(Debug, Clone)]
pub struct FileResolver {
    root: PathBuf,
}

impl FileResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Names are relative paths below the root; absolute paths, `..` and
    /// prefixes are rejected.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, ResourceError> {
        let relative = Path::new(name);
        let contained = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if name.is_empty() || !contained {
            return Err(ResourceError::OutsideRoot {
                name: name.to_string(),
            });
        }
        let path = self.root.join(name);
        if path.is_file() {
            Ok(path)
        } else {
            Err(ResourceError::NotFound {
                name: name.to_string(),
                path,
            })
        }
    }
}

pub trait ResourceLoader {
    fn load(&self, name: &str, bytes: Vec<u8>) -> Result<LoadedResource, ResourceError>;
}

/// Keeps model files as raw source.
pub struct ModelLoader;

impl ResourceLoader for ModelLoader {
    fn load(&self, name: &str, bytes: Vec<u8>) -> Result<LoadedResource, ResourceError> {
        Ok(LoadedResource::Model(Arc::new(ModelResource {
            format: extension_of(name),
            source: bytes,
        })))
    }
}

/// Decodes common image formats to RGBA8.
pub struct TextureLoader;

impl ResourceLoader for TextureLoader {
    fn load(&self, name: &str, bytes: Vec<u8>) -> Result<LoadedResource, ResourceError> {
        let image = image::load_from_memory(&bytes).map_err(|source| ResourceError::Decode {
            name: name.to_string(),
            source,
        })?;
        let rgba = image.to_rgba8();
        Ok(LoadedResource::Texture(Arc::new(TextureResource {
            width: rgba.width(),
            height: rgba.height(),
            data: TextureData::Rgba8(rgba.into_raw()),
        })))
    }
}

/// Passes DDS containers through; only the header dimensions are read.
pub struct ContainerTextureLoader;

impl ContainerTextureLoader {
    const DDS_MAGIC: &'static [u8; 4] = b"DDS ";
}

impl ResourceLoader for ContainerTextureLoader {
    fn load(&self, name: &str, bytes: Vec<u8>) -> Result<LoadedResource, ResourceError> {
        // DDS header: magic, dwSize, dwFlags, dwHeight, dwWidth
        let (width, height) = if bytes.len() >= 20 && bytes[..4] == Self::DDS_MAGIC[..] {
            let word = |at: usize| u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]);
            (word(16), word(12))
        } else {
            tracing::warn!(name, "texture container has no DDS header, dimensions unknown");
            (0, 0)
        };
        Ok(LoadedResource::Texture(Arc::new(TextureResource {
            width,
            height,
            data: TextureData::Container {
                format: extension_of(name),
                bytes,
            },
        })))
    }
}

pub struct ResourceManager {
    resolver: FileResolver,
    loaders: HashMap<String, Arc<dyn ResourceLoader>>,
    cache: HashMap<String, LoadedResource>,
}

impl ResourceManager {
    pub fn new(resolver: FileResolver) -> Self {
        Self {
            resolver,
            loaders: HashMap::new(),
            cache: HashMap::new(),
        }
    }

    /// Manager with the viewer's standard model and texture loaders.
    pub fn with_default_loaders(resolver: FileResolver) -> Self {
        let mut manager = Self::new(resolver);
        manager.register_loader(Arc::new(ModelLoader), &[".fbx"]);
        manager.register_loader(Arc::new(TextureLoader), &[".png", ".jpg", ".jpeg", ".bmp", ".tga", ".webp"]);
        manager.register_loader(Arc::new(ContainerTextureLoader), &[".dds"]);
        manager
    }

    /// Extensions may be given with or without the leading dot.
    pub fn register_loader(&mut self, loader: Arc<dyn ResourceLoader>, extensions: &[&str]) {
        for ext in extensions {
            let ext = ext.trim_start_matches('.').to_ascii_lowercase();
            self.loaders.insert(ext, loader.clone());
        }
    }

    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    pub fn load<T: Resource>(&mut self, name: &str) -> Result<Handle<T>, ResourceError> {
        let loaded = match self.cache.get(name) {
            Some(loaded) => loaded.clone(),
            None => {
                let loaded = self.load_uncached(name)?;
                self.cache.insert(name.to_string(), loaded.clone());
                loaded
            }
        };

        let inner = T::extract(&loaded).ok_or_else(|| ResourceError::KindMismatch {
            name: name.to_string(),
            found: loaded.kind(),
            expected: T::KIND,
        })?;
        Ok(Handle {
            name: name.into(),
            inner,
        })
    }

    fn load_uncached(&self, name: &str) -> Result<LoadedResource, ResourceError> {
        let extension = extension_of(name);
        let loader = self
            .loaders
            .get(&extension)
            .ok_or_else(|| ResourceError::NoLoader {
                name: name.to_string(),
                extension: extension.clone(),
            })?;

        let path = self.resolver.resolve(name)?;
        let bytes = std::fs::read(&path).map_err(|source| ResourceError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(name, path = %path.display(), bytes = bytes.len(), "loading resource");
        loader.load(name, bytes)
    }
}

fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default()
}
