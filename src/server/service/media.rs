//! Image uploads to Cloudinary using an unsigned upload preset.

use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use url::Url;

use crate::server::error::AppError;

const PROFILE_FOLDER: &str = "profile_photos";
const CLOUDINARY_API: &str = "https://api.cloudinary.com/v1_1/";

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Clone)]
pub struct MediaStore {
    http_client: reqwest::Client,
    cloud_name: Option<String>,
    upload_preset: Option<String>,
}

impl MediaStore {
    pub fn new(
        http_client: reqwest::Client,
        cloud_name: Option<String>,
        upload_preset: Option<String>,
    ) -> Self {
        Self {
            http_client,
            cloud_name,
            upload_preset,
        }
    }

    /// Uploads a profile photo and returns its public HTTPS URL.
    ///
    /// # Arguments
    /// - `user_id` - Owner, used in the public id
    /// - `bytes` - Raw image data
    /// - `file_name` - Original file name
    /// - `content_type` - MIME type sent by the client
    ///
    /// # Returns
    /// - `Ok(String)` - The stored image URL
    /// - `Err(AppError::InternalError)` - Storage is not configured
    /// - `Err(AppError::ReqwestErr)` - Upload failed
    pub async fn upload_profile_photo(
        &self,
        user_id: i32,
        bytes: Vec<u8>,
        file_name: String,
        content_type: Option<String>,
    ) -> Result<String, AppError> {
        let (Some(cloud_name), Some(preset)) = (&self.cloud_name, &self.upload_preset) else {
            return Err(AppError::InternalError(
                "Image storage is not configured".to_string(),
            ));
        };

        let mut part = Part::bytes(bytes).file_name(file_name);
        if let Some(content_type) = content_type {
            part = part.mime_str(&content_type)?;
        }

        let form = Form::new()
            .text("upload_preset", preset.clone())
            .text("folder", PROFILE_FOLDER)
            .text(
                "public_id",
                format!("profile_{}_{}", user_id, Utc::now().timestamp_millis()),
            )
            .part("file", part);

        let url = upload_url(cloud_name)?;
        let response: UploadResponse = self
            .http_client
            .post(url)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response.secure_url)
    }
}

/// Upload endpoint for a cloud, with the cloud name escaped as a single path segment.
fn upload_url(cloud_name: &str) -> Result<Url, AppError> {
    let mut url = Url::parse(CLOUDINARY_API)
        .map_err(|e| AppError::InternalError(format!("Invalid Cloudinary base URL: {}", e)))?;
    url.path_segments_mut()
        .map_err(|_| AppError::InternalError("Cloudinary base URL cannot be a base".to_string()))?
        .pop_if_empty()
        .extend([cloud_name, "image", "upload"]);

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_upload_url() {
        let url = upload_url("demo").unwrap();

        assert_eq!(url.as_str(), "https://api.cloudinary.com/v1_1/demo/image/upload");
    }

    #[test]
    fn escapes_cloud_name() {
        let url = upload_url("a/b?c").unwrap();

        assert_eq!(
            url.as_str(),
            "https://api.cloudinary.com/v1_1/a%2Fb%3Fc/image/upload"
        );
    }
}
