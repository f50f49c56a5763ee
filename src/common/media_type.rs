use crate::common::error::AppError;
use mime::Mime;

pub const THUMBNAIL_TYPES: &[&str] = &["image/jpeg", "image/png"];
pub const VIDEO_TYPES: &[&str] = &["video/mp4"];

/// Checks a part's declared `Content-Type` against an allow-list.
///
/// Parameters such as `; codecs=...` are ignored; only the essence is
/// compared. A missing or unparsable header is a validation failure.
pub fn validate(declared: Option<&str>, allowed: &[&str]) -> Result<Mime, AppError> {
    let raw = declared
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .ok_or_else(|| AppError::Validation("Missing media type".to_string()))?;

    let media_type: Mime = raw
        .parse()
        .map_err(|_| AppError::Validation("Unknown media type".to_string()))?;

    let essence = media_type.essence_str();
    if !allowed.iter().any(|a| a.eq_ignore_ascii_case(essence)) {
        return Err(AppError::Validation(format!("Invalid media type: {}", essence)));
    }

    Ok(media_type)
}

/// File extension used in storage keys, taken from the subtype.
pub fn extension(media_type: &Mime) -> &str {
    media_type.subtype().as_str()
}
