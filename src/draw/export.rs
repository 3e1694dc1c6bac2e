//! Flattening of background and ink into a single PNG.

use crate::board::BoardError;
use cairo::{Context, Format, ImageSurface};
use tokio::task;

/// Raw ARGB32 pixels of a flattened board, detached from any Cairo surface.
///
/// Owning the bytes (rather than a surface) lets the encode step run on a
/// blocking worker thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenedImage {
    width: i32,
    height: i32,
    stride: i32,
    data: Vec<u8>,
}

impl FlattenedImage {
    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Premultiplied native-endian ARGB32 bytes, `stride` bytes per row.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Encodes the pixels as PNG.
    pub fn encode_png(self) -> Result<Vec<u8>, BoardError> {
        let (width, height) = (self.width, self.height);
        let surface =
            ImageSurface::create_for_data(self.data, Format::ARgb32, width, height, self.stride)?;

        let mut buffer = Vec::new();
        surface
            .write_to_png(&mut buffer)
            .map_err(|e| BoardError::Encode(e.to_string()))?;

        log::debug!("Encoded {}x{} PNG ({} bytes)", width, height, buffer.len());
        Ok(buffer)
    }
}

/// Composites `background` then `ink` onto an offscreen surface.
///
/// Ink is always painted on top. Both layers must share dimensions.
pub fn flatten(
    background: &ImageSurface,
    ink: &ImageSurface,
) -> Result<FlattenedImage, BoardError> {
    let (width, height) = (background.width(), background.height());
    debug_assert_eq!((width, height), (ink.width(), ink.height()));

    let mut offscreen = ImageSurface::create(Format::ARgb32, width, height)?;
    {
        let ctx = Context::new(&offscreen)?;
        ctx.set_source_surface(background, 0.0, 0.0)?;
        ctx.paint()?;
        ctx.set_source_surface(ink, 0.0, 0.0)?;
        ctx.paint()?;
    }

    let stride = offscreen.stride();
    let data = offscreen
        .data()
        .map_err(|e| BoardError::Encode(format!("Offscreen surface unavailable: {e}")))?
        .to_vec();

    Ok(FlattenedImage {
        width,
        height,
        stride,
        data,
    })
}

/// Encodes on tokio's blocking pool and waits for completion.
pub async fn encode_png_async(image: FlattenedImage) -> Result<Vec<u8>, BoardError> {
    task::spawn_blocking(move || image.encode_png())
        .await
        .map_err(|e| BoardError::Encode(format!("Encode task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

    fn filled(width: i32, height: i32, rgba: (f64, f64, f64, f64)) -> ImageSurface {
        let surface = ImageSurface::create(Format::ARgb32, width, height).unwrap();
        let ctx = Context::new(&surface).unwrap();
        ctx.set_source_rgba(rgba.0, rgba.1, rgba.2, rgba.3);
        ctx.paint().unwrap();
        surface
    }

    #[test]
    fn ink_is_composited_over_background() {
        let background = filled(8, 4, (0.0, 0.0, 1.0, 1.0));
        let ink = ImageSurface::create(Format::ARgb32, 8, 4).unwrap();
        {
            let ctx = Context::new(&ink).unwrap();
            ctx.set_source_rgb(1.0, 0.0, 0.0);
            ctx.rectangle(0.0, 0.0, 4.0, 4.0);
            ctx.fill().unwrap();
        }

        let flat = flatten(&background, &ink).unwrap();
        let pixel = |x: usize, y: usize| {
            let offset = y * 8 * 4 + x * 4;
            u32::from_ne_bytes(flat.data()[offset..offset + 4].try_into().unwrap())
        };
        assert_eq!(pixel(1, 1), 0xffff0000);
        assert_eq!(pixel(6, 1), 0xff0000ff);
    }

    #[test]
    fn encoded_png_decodes_to_same_size() {
        let background = filled(30, 15, (1.0, 1.0, 1.0, 1.0));
        let ink = ImageSurface::create(Format::ARgb32, 30, 15).unwrap();
        let png = flatten(&background, &ink).unwrap().encode_png().unwrap();
        assert_eq!(&png[0..8], &PNG_SIGNATURE);

        let decoded = ImageSurface::create_from_png(&mut Cursor::new(png)).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (30, 15));
    }

    #[tokio::test]
    async fn async_encode_matches_sync_encode() {
        let background = filled(10, 10, (0.2, 0.4, 0.6, 1.0));
        let ink = ImageSurface::create(Format::ARgb32, 10, 10).unwrap();
        let flat = flatten(&background, &ink).unwrap();
        let sync = flat.clone().encode_png().unwrap();
        let from_worker = encode_png_async(flat).await.unwrap();
        assert_eq!(sync, from_worker);
    }
}
