//! Media attachments.
//!
//! Models with media keep their attachments under the reserved `media`
//! attribute, which is why no form field may use that id. Uploaded images are
//! converted into the sizes configured in
//! [`Settings::media_conversions`](ignite_rs_core::Settings::media_conversions).

use serde::{Deserialize, Serialize};

use ignite_rs_core::Settings;

/// The attribute name reserved for media attachments.
pub const MEDIA_FIELD_ID: &str = "media";

/// One image conversion applied to uploaded media.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaConversion {
    /// The conversion name (e.g. `sm`).
    pub name: String,
    /// Target width in pixels.
    pub width: u32,
    /// Target height in pixels.
    pub height: u32,
    /// Sharpening amount.
    pub sharpen: u32,
    /// Whether the source format is kept instead of re-encoding.
    pub keep_original_format: bool,
    /// Whether responsive variants are generated.
    pub responsive: bool,
}

/// Returns the configured conversions, in configuration order.
///
/// # Examples
///
/// ```
/// use ignite_rs_core::Settings;
/// use ignite_rs_crud::media::media_conversions;
///
/// let conversions = media_conversions(&Settings::default());
/// assert_eq!(conversions[0].name, "sm");
/// assert_eq!(conversions[0].width, 300);
/// ```
pub fn media_conversions(settings: &Settings) -> Vec<MediaConversion> {
    settings
        .media_conversions
        .iter()
        .map(|(name, [width, height, sharpen])| MediaConversion {
            name: name.clone(),
            width: *width,
            height: *height,
            sharpen: *sharpen,
            keep_original_format: true,
            responsive: true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_conversions() {
        let conversions = media_conversions(&Settings::default());
        let names: Vec<&str> = conversions.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["sm", "md", "lg", "xl"]);
        assert!(conversions.iter().all(|c| c.keep_original_format && c.responsive));
        assert_eq!((conversions[3].width, conversions[3].height), (1400, 1400));
    }

    #[test]
    fn test_custom_conversion_keeps_order() {
        let mut settings = Settings::default();
        settings.media_conversions.clear();
        settings.media_conversions.insert("thumb".to_string(), [120, 80, 5]);
        settings.media_conversions.insert("hero".to_string(), [1920, 600, 0]);
        let conversions = media_conversions(&settings);
        assert_eq!(conversions.len(), 2);
        assert_eq!(conversions[0].name, "thumb");
        assert_eq!(conversions[0].sharpen, 5);
        assert_eq!(conversions[1].height, 600);
    }
}
