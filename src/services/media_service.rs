//! Media lifecycle: store uploaded originals, derive fixed-size variants
//! synchronously at attach time, and remove assets with their variants.

use std::fs;
use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{MediaAsset, MediaView};

/// Cropped and sharpened square; used for listing cards.
const THUMB_WIDTH: u32 = 300;
const THUMB_HEIGHT: u32 = 300;

/// Fit-within rendition used for detail views.
const PREVIEW_WIDTH: u32 = 800;
const PREVIEW_HEIGHT: u32 = 600;

const ALLOWED_MIME_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/webp"];

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("'{file}' must be jpeg, png, jpg, or webp")]
    UnsupportedType { file: String },

    #[error("'{file}' exceeds the upload size limit")]
    TooLarge { file: String },

    #[error("'{file}' is not a decodable image")]
    Decode { file: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// An uploaded file as received at the boundary, before validation.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

pub struct MediaService {
    storage_root: PathBuf,
    public_base_url: String,
    max_upload_bytes: usize,
}

impl MediaService {
    pub fn new(storage_root: PathBuf, public_base_url: String, max_upload_bytes: usize) -> Self {
        Self {
            storage_root,
            public_base_url,
            max_upload_bytes,
        }
    }

    /// Validate a whole batch before any asset is written; a single invalid
    /// entry rejects the batch.
    pub fn validate(&self, images: &[UploadedImage]) -> Result<(), MediaError> {
        for image in images {
            if !ALLOWED_MIME_TYPES.contains(&image.content_type.as_str()) {
                return Err(MediaError::UnsupportedType {
                    file: image.file_name.clone(),
                });
            }
            if image.bytes.len() > self.max_upload_bytes {
                return Err(MediaError::TooLarge {
                    file: image.file_name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Write the original and derive both variants under the asset's
    /// directory. Returns the sanitized file name stored on disk.
    pub fn process(&self, media_id: Uuid, upload: &UploadedImage) -> Result<String, MediaError> {
        let decoded = image::load_from_memory(&upload.bytes).map_err(|e| {
            tracing::warn!("Failed to decode upload '{}': {}", upload.file_name, e);
            MediaError::Decode {
                file: upload.file_name.clone(),
            }
        })?;

        let file_name = sanitize_file_name(&upload.file_name);
        let asset_dir = self.asset_dir(media_id);
        let conversions_dir = asset_dir.join("conversions");
        fs::create_dir_all(&conversions_dir)?;

        fs::write(asset_dir.join(&file_name), &upload.bytes)?;

        let stem = file_stem(&file_name);

        let thumb = decoded
            .resize_to_fill(THUMB_WIDTH, THUMB_HEIGHT, FilterType::Lanczos3)
            .unsharpen(1.0, 10);
        thumb
            .to_rgb8()
            .save(conversions_dir.join(format!("{stem}-thumb.jpg")))
            .map_err(|e| {
                tracing::error!("Failed to write thumb variant for {}: {}", media_id, e);
                MediaError::Decode {
                    file: upload.file_name.clone(),
                }
            })?;

        let preview = decoded.resize(PREVIEW_WIDTH, PREVIEW_HEIGHT, FilterType::Lanczos3);
        preview
            .to_rgb8()
            .save(conversions_dir.join(format!("{stem}-preview.jpg")))
            .map_err(|e| {
                tracing::error!("Failed to write preview variant for {}: {}", media_id, e);
                MediaError::Decode {
                    file: upload.file_name.clone(),
                }
            })?;

        Ok(file_name)
    }

    /// Remove an asset's directory: original plus all derived variants.
    /// Already-gone directories are fine (idempotent cleanup paths).
    pub fn remove(&self, media_id: Uuid) -> Result<(), MediaError> {
        match fs::remove_dir_all(self.asset_dir(media_id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(MediaError::Io(e)),
        }
    }

    pub fn asset_dir(&self, media_id: Uuid) -> PathBuf {
        self.storage_root.join(media_id.to_string())
    }

    /// Build the caller-facing representation with original and variant URLs.
    pub fn view(&self, asset: &MediaAsset) -> MediaView {
        let base = format!("{}/storage/media/{}", self.public_base_url, asset.id);
        let stem = file_stem(&asset.file_name);
        MediaView {
            id: asset.id,
            url: format!("{}/{}", base, asset.file_name),
            thumbnail_url: format!("{}/conversions/{}-thumb.jpg", base, stem),
            preview_url: format!("{}/conversions/{}-preview.jpg", base, stem),
        }
    }
}

/// Strip any path components from a client-supplied file name.
fn sanitize_file_name(name: &str) -> String {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or("upload")
        .to_string()
}

fn file_stem(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image")
        .to_string()
}
