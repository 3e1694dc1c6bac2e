//! Background and ink surface ownership.

use crate::board::BoardError;
use crate::util;
use cairo::{Context, Format, ImageSurface, Operator};
use std::io::Cursor;

/// Selects one of the two board layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// Repainted from the source image on every resize
    Background,
    /// Accumulates strokes
    Ink,
}

/// Owns the decoded source image plus the background and ink surfaces.
///
/// Both surfaces are created together and always share the same pixel
/// dimensions. No other component keeps a handle to them; painting code
/// borrows a context through [`SurfaceManager::with_ink`].
pub struct SurfaceManager {
    /// Decoded background image at its intrinsic size
    source: Option<ImageSurface>,
    background: Option<ImageSurface>,
    ink: Option<ImageSurface>,
    /// Last container width requested (applied once the source is loaded)
    container_width: u32,
}

impl SurfaceManager {
    /// Creates a manager with no surfaces, sized for `container_width` once loaded.
    pub fn new(container_width: u32) -> Self {
        Self {
            source: None,
            background: None,
            ink: None,
            container_width,
        }
    }

    /// Decodes a PNG background and sizes both surfaces to the container.
    ///
    /// Returns the intrinsic dimensions of the image. On failure the manager is
    /// left untouched, so a board that was already loaded keeps its surfaces.
    pub fn initialize(&mut self, png_data: &[u8]) -> Result<(i32, i32), BoardError> {
        let source = ImageSurface::create_from_png(&mut Cursor::new(png_data))
            .map_err(|e| BoardError::ImageLoad(e.to_string()))?;

        let (width, height) = (source.width(), source.height());
        if width <= 0 || height <= 0 {
            return Err(BoardError::ImageLoad(format!(
                "image has no pixels ({width}x{height})"
            )));
        }

        // Nothing is replaced until both surfaces exist for the new source.
        let (background, ink) = self
            .build_surfaces(&source, self.container_width)
            .map_err(|e| BoardError::ImageLoad(format!("cannot size surfaces: {e}")))?;

        self.source = Some(source);
        self.background = Some(background);
        self.ink = Some(ink);
        log::info!("Background loaded ({}x{})", width, height);
        Ok((width, height))
    }

    /// Whether both surfaces exist.
    pub fn is_ready(&self) -> bool {
        self.background.is_some() && self.ink.is_some()
    }

    /// Intrinsic aspect ratio of the loaded source image.
    pub fn aspect_ratio(&self) -> Option<f64> {
        self.source
            .as_ref()
            .map(|source| util::aspect_ratio(source.width(), source.height()))
    }

    /// Current shared surface dimensions.
    pub fn dimensions(&self) -> Option<(i32, i32)> {
        self.background
            .as_ref()
            .map(|surface| (surface.width(), surface.height()))
    }

    /// Container width the surfaces are (or will be) fitted to.
    pub fn container_width(&self) -> u32 {
        self.container_width
    }

    /// Resizes both surfaces to the container width.
    ///
    /// The background is repainted from the original source image and the
    /// existing ink is scaled onto the new ink surface. Before the source image
    /// has loaded this only records the width and returns `Ok(None)`.
    pub fn resize(&mut self, container_width: u32) -> Result<Option<(i32, i32)>, BoardError> {
        self.container_width = container_width;

        let Some(source) = self.source.as_ref() else {
            log::debug!("Resize to {container_width}px before background load; deferred");
            return Ok(None);
        };

        let (background, ink) = self.build_surfaces(source, container_width)?;
        let dimensions = (background.width(), background.height());
        self.background = Some(background);
        self.ink = Some(ink);

        log::debug!("Surfaces resized to {}x{}", dimensions.0, dimensions.1);
        Ok(Some(dimensions))
    }

    /// Creates a background painted from `source` and an ink surface carrying
    /// the current ink scaled, both fitted to `container_width`.
    fn build_surfaces(
        &self,
        source: &ImageSurface,
        container_width: u32,
    ) -> Result<(ImageSurface, ImageSurface), cairo::Error> {
        let aspect = util::aspect_ratio(source.width(), source.height());
        let (width, height) = util::fit_to_width(container_width, aspect);

        let background = ImageSurface::create(Format::ARgb32, width, height)?;
        paint_scaled(&background, source)?;

        let ink = ImageSurface::create(Format::ARgb32, width, height)?;
        if let Some(previous) = self.ink.as_ref() {
            paint_scaled(&ink, previous)?;
        }
        Ok((background, ink))
    }

    /// Runs `paint` with a fresh context targeting the ink surface.
    ///
    /// Returns `Ok(None)` when the surfaces do not exist yet.
    pub fn with_ink<R>(
        &mut self,
        paint: impl FnOnce(&Context) -> Result<R, cairo::Error>,
    ) -> Result<Option<R>, BoardError> {
        let Some(ink) = self.ink.as_ref() else {
            return Ok(None);
        };
        let ctx = Context::new(ink)?;
        Ok(Some(paint(&ctx)?))
    }

    /// Wipes the ink surface, leaving the background untouched.
    pub fn clear_ink(&mut self) -> Result<(), BoardError> {
        self.with_ink(|ctx| {
            ctx.set_operator(Operator::Clear);
            ctx.paint()
        })?;
        Ok(())
    }

    /// Borrows a layer for read-only compositing.
    pub fn layer(&self, layer: Layer) -> Option<&ImageSurface> {
        match layer {
            Layer::Background => self.background.as_ref(),
            Layer::Ink => self.ink.as_ref(),
        }
    }

    /// Reads one premultiplied ARGB32 pixel from a layer.
    ///
    /// Returns `None` when the layer does not exist, the coordinate is outside
    /// the surface, or a context still holds the surface.
    pub fn pixel(&mut self, layer: Layer, x: i32, y: i32) -> Option<u32> {
        let surface = match layer {
            Layer::Background => self.background.as_mut()?,
            Layer::Ink => self.ink.as_mut()?,
        };
        if x < 0 || y < 0 || x >= surface.width() || y >= surface.height() {
            return None;
        }
        let stride = surface.stride() as usize;
        let data = surface.data().ok()?;
        let offset = y as usize * stride + x as usize * 4;
        let bytes: [u8; 4] = data.get(offset..offset + 4)?.try_into().ok()?;
        Some(u32::from_ne_bytes(bytes))
    }

    /// Copies the raw pixel bytes of a layer.
    pub fn layer_bytes(&mut self, layer: Layer) -> Option<Vec<u8>> {
        let surface = match layer {
            Layer::Background => self.background.as_mut()?,
            Layer::Ink => self.ink.as_mut()?,
        };
        surface.data().ok().map(|data| data.to_vec())
    }
}

/// Paints `source` stretched to fill `target`.
fn paint_scaled(target: &ImageSurface, source: &ImageSurface) -> Result<(), cairo::Error> {
    let ctx = Context::new(target)?;
    ctx.scale(
        target.width() as f64 / source.width() as f64,
        target.height() as f64 / source.height() as f64,
    );
    ctx.set_source_surface(source, 0.0, 0.0)?;
    ctx.paint()
}

/// Alpha channel of a premultiplied ARGB32 pixel.
pub fn pixel_alpha(argb: u32) -> u8 {
    (argb >> 24) as u8
}

/// Red, green and blue channels of a premultiplied ARGB32 pixel.
pub fn pixel_rgb(argb: u32) -> (u8, u8, u8) {
    ((argb >> 16) as u8, (argb >> 8) as u8, argb as u8)
}
