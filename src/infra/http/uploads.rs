//! Multipart upload handling shared by the book cover and avatar routes.

use axum::extract::multipart::Multipart;

use super::error::ApiError;

const ALLOWED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Pull the image bytes out of the multipart field named `field_name`.
///
/// The file name must carry an allowed extension and the payload must stay
/// under `max_bytes`. Other fields in the request are ignored.
pub async fn read_image_field(
    multipart: &mut Multipart,
    field_name: &str,
    max_bytes: usize,
) -> Result<Vec<u8>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::invalid_input("malformed multipart body"))?
    {
        if field.name() != Some(field_name) {
            continue;
        }

        let file_name = field
            .file_name()
            .ok_or_else(|| ApiError::invalid_input("file name is required"))?;
        if !has_allowed_extension(file_name) {
            return Err(ApiError::invalid_input(
                "please upload a jpg, jpeg or png image",
            ));
        }

        let data = field
            .bytes()
            .await
            .map_err(|_| ApiError::invalid_input("failed to read upload"))?;
        if data.len() > max_bytes {
            return Err(ApiError::invalid_input("image exceeds the size limit"));
        }
        return Ok(data.to_vec());
    }

    Err(ApiError::invalid_input(format!(
        "missing multipart field `{field_name}`"
    )))
}

fn has_allowed_extension(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .is_some_and(|(stem, ext)| !stem.is_empty() && ALLOWED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_check() {
        assert!(has_allowed_extension("cover.png"));
        assert!(has_allowed_extension("photo.JPG"));
        assert!(has_allowed_extension("archive.tar.jpeg"));
        assert!(!has_allowed_extension("script.exe"));
        assert!(!has_allowed_extension("noextension"));
        assert!(!has_allowed_extension(".png"));
    }
}
