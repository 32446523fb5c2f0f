use std::io::Cursor;

use image::{ImageError, ImageReader};

use crate::error::EditorError;
use crate::Size;

/// Pixel dimensions of the decoded photo. The pixels live with whoever draws them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackgroundImage {
    pub width: u32,
    pub height: u32,
}

impl BackgroundImage {
    pub fn new(width: u32, height: u32) -> Result<Self, EditorError> {
        if width == 0 || height == 0 {
            return Err(EditorError::decode(format!(
                "image has no pixels ({width}x{height})"
            )));
        }
        Ok(Self { width, height })
    }

    pub fn size(&self) -> Size {
        Size::new(self.width as f64, self.height as f64)
    }
}

/// Sniffs the format of uploaded bytes and reads the header dimensions.
///
/// Returns `Ok(None)` when the bytes are not a format the bundled decoders
/// read (ICO, AVIF, HEIC, ...); the browser decode has the final say there.
/// Only empty input and recognized formats with a broken header fail here.
pub fn probe_image(bytes: &[u8]) -> Result<Option<BackgroundImage>, EditorError> {
    if bytes.is_empty() {
        return Err(EditorError::decode("file is empty"));
    }
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|err| EditorError::decode(err.to_string()))?;
    let Some(format) = reader.format() else {
        tracing::debug!("unrecognized image format, deferring to the browser decode");
        return Ok(None);
    };
    match reader.into_dimensions() {
        Ok((width, height)) => BackgroundImage::new(width, height).map(Some),
        Err(ImageError::Unsupported(err)) => {
            tracing::debug!(?format, error = %err, "no bundled decoder, deferring to the browser decode");
            Ok(None)
        }
        Err(err) => Err(EditorError::decode(err.to_string())),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Status of the most recent upload.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Pending(LoadTicket),
    Ready(BackgroundImage),
    Failed(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A newer upload started (or the editor was cleared) after this one.
    Stale,
    Loaded(BackgroundImage),
    Failed(EditorError),
}

/// Tracks uploads so that only the newest one may replace the background.
#[derive(Clone, Debug, Default)]
pub struct ImageLoader {
    last_ticket: u64,
    state: LoadState,
    current: Option<BackgroundImage>,
}

impl ImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn current(&self) -> Option<BackgroundImage> {
        self.current
    }

    pub fn begin(&mut self) -> LoadTicket {
        self.last_ticket += 1;
        let ticket = LoadTicket(self.last_ticket);
        self.state = LoadState::Pending(ticket);
        ticket
    }

    pub fn finish(
        &mut self,
        ticket: LoadTicket,
        result: Result<BackgroundImage, EditorError>,
    ) -> LoadOutcome {
        if self.state != LoadState::Pending(ticket) {
            tracing::debug!(ticket = ticket.id(), "discarding stale image load");
            return LoadOutcome::Stale;
        }
        match result {
            Ok(image) => {
                self.state = LoadState::Ready(image);
                self.current = Some(image);
                LoadOutcome::Loaded(image)
            }
            Err(err) => {
                tracing::warn!(ticket = ticket.id(), error = %err, "image load failed");
                self.state = LoadState::Failed(err.to_string());
                LoadOutcome::Failed(err)
            }
        }
    }

    /// Drops the background and orphans any in-flight load.
    pub fn clear(&mut self) {
        self.state = LoadState::Idle;
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1x1 RGBA PNG.
    const TINY_PNG: [u8; 67] = [
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
        0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
        0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
        0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ];

    /// Single-entry icon directory wrapping `TINY_PNG`.
    fn tiny_ico() -> Vec<u8> {
        let mut ico = vec![0x00, 0x00, 0x01, 0x00, 0x01, 0x00];
        ico.extend_from_slice(&[1, 1, 0, 0, 1, 0, 32, 0]);
        ico.extend_from_slice(&(TINY_PNG.len() as u32).to_le_bytes());
        ico.extend_from_slice(&22u32.to_le_bytes());
        ico.extend_from_slice(&TINY_PNG);
        ico
    }

    #[test]
    fn probe_reads_png_dimensions() {
        assert_eq!(
            probe_image(&TINY_PNG),
            Ok(Some(BackgroundImage { width: 1, height: 1 }))
        );
    }

    #[test]
    fn formats_without_a_bundled_decoder_are_left_to_the_browser() {
        assert_eq!(probe_image(&tiny_ico()), Ok(None));
        assert_eq!(probe_image(b"definitely not a picture"), Ok(None));
    }

    #[test]
    fn broken_headers_of_known_formats_are_rejected() {
        let err = probe_image(&TINY_PNG[..12]).unwrap_err();
        assert!(matches!(err, EditorError::ImageDecodeFailure { .. }));
        assert!(probe_image(&[]).is_err());
    }

    #[test]
    fn zero_sized_images_are_rejected() {
        assert!(BackgroundImage::new(0, 10).is_err());
    }

    #[test]
    fn newest_ticket_wins() {
        let mut loader = ImageLoader::new();
        let first = loader.begin();
        let second = loader.begin();
        let image = BackgroundImage::new(10, 20).unwrap();
        assert_eq!(loader.finish(first, Ok(image)), LoadOutcome::Stale);
        assert_eq!(loader.current(), None);
        assert_eq!(loader.finish(second, Ok(image)), LoadOutcome::Loaded(image));
        assert_eq!(loader.current(), Some(image));
        assert_eq!(loader.finish(second, Ok(image)), LoadOutcome::Stale);
    }

    #[test]
    fn failure_keeps_previous_background() {
        let mut loader = ImageLoader::new();
        let image = BackgroundImage::new(10, 20).unwrap();
        let ticket = loader.begin();
        loader.finish(ticket, Ok(image));
        let ticket = loader.begin();
        let outcome = loader.finish(ticket, Err(EditorError::decode("broken")));
        assert!(matches!(outcome, LoadOutcome::Failed(_)));
        assert_eq!(loader.current(), Some(image));
        assert!(matches!(loader.state(), LoadState::Failed(_)));
    }

    #[test]
    fn clear_orphans_pending_load() {
        let mut loader = ImageLoader::new();
        let ticket = loader.begin();
        loader.clear();
        let image = BackgroundImage::new(10, 20).unwrap();
        assert_eq!(loader.finish(ticket, Ok(image)), LoadOutcome::Stale);
        assert_eq!(loader.current(), None);
    }
}
