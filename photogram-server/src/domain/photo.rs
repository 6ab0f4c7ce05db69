use std::path::Path;

use uuid::Uuid;

use super::error::FieldErrors;

pub(crate) const PLACEHOLDER_PHOTO: &str = "postEmpty.jpg";

const ACCEPTED_CONTENT_TYPES: [&str; 2] = ["image/jpeg", "image/jpg"];

/// Файл, пришедший в multipart-форме.
#[derive(Debug, Clone)]
pub(crate) struct UploadedPhoto {
    pub(crate) original_name: Option<String>,
    pub(crate) content_type: Option<String>,
    pub(crate) bytes: Vec<u8>,
}

impl UploadedPhoto {
    pub(crate) fn is_jpeg(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|content_type| ACCEPTED_CONTENT_TYPES.contains(&content_type))
    }
}

pub(crate) fn validate_photo(photo: Option<&UploadedPhoto>, errors: &mut FieldErrors) {
    match photo {
        None => errors.add("fotografia", "a photo is required"),
        Some(photo) if !photo.is_jpeg() => errors.add("fotografia", "the photo must be a JPG"),
        Some(_) => {}
    }
}

/// Уникальное имя файла с расширением исходного файла.
pub(crate) fn generate_photo_file_name(original_name: Option<&str>) -> String {
    let extension = original_name
        .map(Path::new)
        .and_then(Path::extension)
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));

    match extension {
        Some(ext) => format!("{}.{ext}", Uuid::new_v4()),
        None => Uuid::new_v4().to_string(),
    }
}

pub(crate) fn resolve_photo_file_name(stored: Option<&str>) -> &str {
    stored.unwrap_or(PLACEHOLDER_PHOTO)
}
