//! File selection intake and image decoding for on-screen previews.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
    sync::Arc,
};

const PREVIEW_MAX_DIMENSION: u32 = 1024;

#[derive(Clone, PartialEq, Eq)]
pub struct PreviewImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

impl fmt::Debug for PreviewImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("rgba_len", &self.rgba.len())
            .finish()
    }
}

pub fn decode_preview_image(bytes: &[u8]) -> Result<PreviewImage, String> {
    let dynamic = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    let resized = if dynamic.width() > PREVIEW_MAX_DIMENSION
        || dynamic.height() > PREVIEW_MAX_DIMENSION
    {
        dynamic.thumbnail(PREVIEW_MAX_DIMENSION, PREVIEW_MAX_DIMENSION)
    } else {
        dynamic
    }
    .to_rgba8();
    let width = resized.width() as usize;
    let height = resized.height() as usize;
    Ok(PreviewImage {
        width,
        height,
        rgba: resized.into_raw(),
    })
}

pub fn media_type_for_path(path: &Path) -> Option<String> {
    mime_guess::from_path(path).first_raw().map(str::to_string)
}

#[derive(Clone)]
pub enum SelectionSource {
    Path(PathBuf),
    Bytes(Arc<[u8]>),
}

/// A file picked through the dialog or dropped on the window, before it is
/// validated and read.
#[derive(Clone)]
pub struct FileSelection {
    pub name: String,
    pub media_type: Option<String>,
    pub source: SelectionSource,
}

impl FileSelection {
    pub fn from_path(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload.bin")
            .to_string();
        Self {
            name,
            media_type: media_type_for_path(&path),
            source: SelectionSource::Path(path),
        }
    }

    pub fn from_bytes(name: impl Into<String>, media_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type,
            source: SelectionSource::Bytes(bytes.into()),
        }
    }

    /// Dropped files carry a path on native targets and bytes elsewhere; the
    /// reported mime wins over a guess from the name.
    pub fn from_dropped(file: &egui::DroppedFile) -> Option<Self> {
        let guessed = file
            .path
            .as_deref()
            .and_then(media_type_for_path)
            .or_else(|| media_type_for_path(Path::new(&file.name)));
        let media_type = Some(file.mime.trim())
            .filter(|mime| !mime.is_empty())
            .map(str::to_string)
            .or(guessed);

        let (name, source) = match (&file.path, &file.bytes) {
            (Some(path), _) => {
                let name = path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .map(str::to_string)
                    .unwrap_or_else(|| file.name.clone());
                (name, SelectionSource::Path(path.clone()))
            }
            (None, Some(bytes)) => (file.name.clone(), SelectionSource::Bytes(bytes.clone())),
            (None, None) => return None,
        };

        Some(Self {
            name,
            media_type,
            source,
        })
    }

    pub fn read_bytes(&self) -> std::io::Result<Vec<u8>> {
        match &self.source {
            SelectionSource::Path(path) => fs::read(path),
            SelectionSource::Bytes(bytes) => Ok(bytes.to_vec()),
        }
    }
}

#[cfg(test)]
pub(crate) fn encode_test_png(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(width, height, image::Rgba([110, 169, 174, 255]));
    let mut out = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(image)
        .write_to(&mut out, image::ImageFormat::Png)
        .expect("encode png");
    out.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_png_into_rgba_preview() {
        let preview = decode_preview_image(&encode_test_png(4, 3)).expect("decode");
        assert_eq!((preview.width, preview.height), (4, 3));
        assert_eq!(preview.rgba.len(), 4 * 3 * 4);
        assert_eq!(&preview.rgba[..4], &[110, 169, 174, 255]);
    }

    #[test]
    fn large_images_are_thumbnailed() {
        let preview = decode_preview_image(&encode_test_png(2048, 512)).expect("decode");
        assert_eq!(preview.width, 1024);
        assert_eq!(preview.height, 256);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(decode_preview_image(b"not an image").is_err());
    }

    #[test]
    fn guesses_media_type_from_extension() {
        assert_eq!(
            media_type_for_path(Path::new("scan.PNG")).as_deref(),
            Some("image/png")
        );
        assert_eq!(
            media_type_for_path(Path::new("notes.txt")).as_deref(),
            Some("text/plain")
        );
        assert_eq!(media_type_for_path(Path::new("no_extension")), None);
    }

    #[test]
    fn selection_from_path_uses_file_name_and_guess() {
        let selection = FileSelection::from_path(PathBuf::from("/tmp/prints/cluster_4_557.jpg"));
        assert_eq!(selection.name, "cluster_4_557.jpg");
        assert_eq!(selection.media_type.as_deref(), Some("image/jpeg"));
    }

    #[test]
    fn dropped_file_prefers_reported_mime() {
        let dropped = egui::DroppedFile {
            name: "upload".to_string(),
            mime: "image/webp".to_string(),
            bytes: Some(Arc::from(vec![1u8, 2, 3])),
            ..Default::default()
        };
        let selection = FileSelection::from_dropped(&dropped).expect("selection");
        assert_eq!(selection.media_type.as_deref(), Some("image/webp"));
        assert_eq!(selection.read_bytes().expect("bytes"), vec![1, 2, 3]);
    }

    #[test]
    fn dropped_file_without_path_or_bytes_is_ignored() {
        let dropped = egui::DroppedFile {
            name: "ghost.png".to_string(),
            ..Default::default()
        };
        assert!(FileSelection::from_dropped(&dropped).is_none());
    }
}
