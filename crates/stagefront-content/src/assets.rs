use stagefront_core::AssetRef;

use crate::errors::{Result, StoreError};

/// Image size variants the storefront requests from the asset CDN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    /// Square tile in the downloads grid.
    Thumb300,
    /// Card art on the catalog/store grids.
    Card600,
    /// Full-width hero banner.
    Hero1600,
    /// No resize parameters; the stored original.
    Original,
}

impl ImageSize {
    fn dimensions(self) -> Option<(u32, u32)> {
        match self {
            ImageSize::Thumb300 => Some((300, 300)),
            ImageSize::Card600 => Some((600, 600)),
            ImageSize::Hero1600 => Some((1600, 900)),
            ImageSize::Original => None,
        }
    }
}

/// Builds fetchable CDN URLs out of opaque asset references
/// (`image-<id>-<WxH>-<ext>`, `file-<id>-<ext>`). References are produced
/// by the content store and pass through the query pipeline untouched; this
/// is the only place that interprets them.
#[derive(Debug, Clone)]
pub struct AssetResolver {
    project_id: String,
    dataset: String,
    base_url: String,
}

impl AssetResolver {
    pub fn new(project_id: impl Into<String>, dataset: impl Into<String>) -> Self {
        AssetResolver {
            project_id: project_id.into(),
            dataset: dataset.into(),
            base_url: "https://cdn.sanity.io".to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// `image-abc123-800x600-jpg` -> `<cdn>/images/<project>/<dataset>/abc123-800x600.jpg`
    /// with crop-to-fit resize parameters for sized variants.
    pub fn image_url(&self, asset: &AssetRef, size: ImageSize) -> Result<String> {
        let (id, dims, ext) = split_image_ref(asset)?;
        let mut url = format!(
            "{base}/images/{project}/{dataset}/{id}-{dims}.{ext}",
            base = self.base_url,
            project = self.project_id,
            dataset = self.dataset,
        );
        if let Some((w, h)) = size.dimensions() {
            url.push_str(&format!("?w={w}&h={h}&fit=crop"));
        }
        Ok(url)
    }

    /// `file-abc123-mp3` -> `<cdn>/files/<project>/<dataset>/abc123.mp3`
    pub fn file_url(&self, asset: &AssetRef) -> Result<String> {
        let rest = asset
            .as_str()
            .strip_prefix("file-")
            .ok_or_else(|| StoreError::InvalidAssetRef(asset.as_str().to_string()))?;
        let (id, ext) = rest
            .rsplit_once('-')
            .ok_or_else(|| StoreError::InvalidAssetRef(asset.as_str().to_string()))?;
        Ok(format!(
            "{base}/files/{project}/{dataset}/{id}.{ext}",
            base = self.base_url,
            project = self.project_id,
            dataset = self.dataset,
        ))
    }
}

fn split_image_ref(asset: &AssetRef) -> Result<(&str, &str, &str)> {
    let invalid = || StoreError::InvalidAssetRef(asset.as_str().to_string());
    let rest = asset.as_str().strip_prefix("image-").ok_or_else(invalid)?;
    let (stem, ext) = rest.rsplit_once('-').ok_or_else(invalid)?;
    let (id, dims) = stem.rsplit_once('-').ok_or_else(invalid)?;
    if id.is_empty() || ext.is_empty() || !dims.contains('x') {
        return Err(invalid());
    }
    Ok((id, dims, ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> AssetResolver {
        AssetResolver::new("1ut778we", "production")
    }

    #[test]
    fn image_url_with_size_variant() {
        let asset = AssetRef("image-abc123-800x600-jpg".to_string());
        let url = resolver().image_url(&asset, ImageSize::Thumb300).unwrap();
        assert_eq!(
            url,
            "https://cdn.sanity.io/images/1ut778we/production/abc123-800x600.jpg?w=300&h=300&fit=crop"
        );
    }

    #[test]
    fn image_url_original_has_no_resize_params() {
        let asset = AssetRef("image-abc123-800x600-png".to_string());
        let url = resolver().image_url(&asset, ImageSize::Original).unwrap();
        assert!(url.ends_with("/abc123-800x600.png"));
    }

    #[test]
    fn file_url_for_preview_audio() {
        let asset = AssetRef("file-deadbeef-mp3".to_string());
        let url = resolver().file_url(&asset).unwrap();
        assert_eq!(
            url,
            "https://cdn.sanity.io/files/1ut778we/production/deadbeef.mp3"
        );
    }

    #[test]
    fn malformed_refs_are_rejected() {
        for bad in ["image-abc123", "poster-abc-800x600-jpg", "image-abc-jpg"] {
            let res = resolver().image_url(&AssetRef(bad.to_string()), ImageSize::Original);
            assert!(matches!(res, Err(StoreError::InvalidAssetRef(_))), "{bad}");
        }
    }
}
