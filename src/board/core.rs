//! Board state machine and construction.

use super::background::BackgroundLoader;
use super::types::{BoardError, BoardPhase};
use crate::config::{BoardProfile, Config};
use crate::draw::{
    self, Layer, StrokeRenderer, SurfaceManager, render_empty_state, render_eraser_preview,
    render_layers,
};
use crate::input::{InkMode, InputTracker, StyleController, StyleState};
use crate::util;

/// Width-to-height ratio assumed for the placeholder before an image loads.
pub const PLACEHOLDER_ASPECT_RATIO: f64 = 2.0;

/// Runtime settings for a board, usually derived from [`Config`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardSettings {
    /// Initial toolbar style
    pub style: StyleState,
    /// Container width the surfaces are fitted to
    pub container_width: u32,
    /// Whether to render the eraser cursor disc
    pub eraser_preview: bool,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            style: StyleState::default(),
            container_width: 1024,
            eraser_preview: true,
        }
    }
}

impl From<&Config> for BoardSettings {
    fn from(config: &Config) -> Self {
        Self {
            style: StyleState {
                mode: InkMode::Draw,
                line_color: config.drawing.line_color.to_color(),
                eraser_diameter: config.drawing.eraser_diameter,
                pen_width: config.drawing.pen_width,
            },
            container_width: config.canvas.container_width,
            eraser_preview: config.canvas.eraser_preview,
        }
    }
}

/// A layered annotation board: background image under a freehand ink layer.
///
/// The board owns its surfaces, gesture tracking, stroke renderer and style
/// controller. All painting happens synchronously inside the input handlers;
/// only background loading and PNG encoding are asynchronous.
pub struct Board {
    /// Where the background comes from and where saved images go
    pub(crate) profile: BoardProfile,
    pub(crate) surfaces: SurfaceManager,
    pub(crate) tracker: InputTracker,
    pub(crate) renderer: StrokeRenderer,
    pub(crate) style: StyleController,
    pub(crate) phase: BoardPhase,
    /// Message of the last failed background load, for the empty state
    pub(crate) load_error: Option<String>,
    pub(crate) show_eraser_preview: bool,
    /// Whether the display needs to be redrawn
    pub needs_redraw: bool,
}

impl Board {
    /// Creates an unloaded board for `profile`.
    pub fn new(profile: BoardProfile, settings: BoardSettings) -> Self {
        Self {
            profile,
            surfaces: SurfaceManager::new(settings.container_width),
            tracker: InputTracker::new(),
            renderer: StrokeRenderer::new(),
            style: StyleController::new(settings.style),
            phase: BoardPhase::Unloaded,
            load_error: None,
            show_eraser_preview: settings.eraser_preview,
            needs_redraw: true,
        }
    }

    pub fn profile(&self) -> &BoardProfile {
        &self.profile
    }

    pub fn phase(&self) -> BoardPhase {
        self.phase
    }

    /// Whether input currently paints (background loaded).
    pub fn is_drawing_enabled(&self) -> bool {
        self.phase != BoardPhase::Unloaded
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn style(&self) -> StyleState {
        self.style.state()
    }

    /// Current shared surface size, once loaded.
    pub fn dimensions(&self) -> Option<(i32, i32)> {
        self.surfaces.dimensions()
    }

    /// Fetches the profile's background through `loader` and installs it.
    ///
    /// On failure the error is remembered for the empty state and the board
    /// keeps its previous phase (drawing stays disabled if it never loaded).
    pub async fn load_background(
        &mut self,
        loader: &dyn BackgroundLoader,
    ) -> Result<(i32, i32), BoardError> {
        let reference = self.profile.background.clone();
        log::info!("Loading background '{}'", reference);

        match loader.load(&reference).await {
            Ok(bytes) => self.install_background(&bytes),
            Err(err) => Err(self.record_load_failure(err)),
        }
    }

    /// Decodes PNG bytes as the background and moves the board to `Ready`.
    ///
    /// Returns the intrinsic image dimensions.
    pub fn install_background(&mut self, png_data: &[u8]) -> Result<(i32, i32), BoardError> {
        // Surfaces are rebuilt below; an in-flight stroke cannot survive that.
        self.finish_gesture();

        match self.surfaces.initialize(png_data) {
            Ok(dimensions) => {
                self.phase = BoardPhase::Ready;
                self.load_error = None;
                self.needs_redraw = true;
                Ok(dimensions)
            }
            Err(err) => Err(self.record_load_failure(err)),
        }
    }

    fn record_load_failure(&mut self, err: BoardError) -> BoardError {
        log::error!("Failed to load background '{}': {}", self.profile.background, err);
        self.load_error = Some(err.to_string());
        self.needs_redraw = true;
        err
    }

    /// Ends any active gesture without painting.
    pub(crate) fn finish_gesture(&mut self) {
        let had_gesture = self.tracker.cancel();
        if had_gesture || self.phase == BoardPhase::Drawing {
            log::debug!("Finalizing in-progress stroke");
        }
        self.renderer.end();
        if self.phase == BoardPhase::Drawing {
            self.phase = BoardPhase::Ready;
        }
    }

    /// Renders the board for display: background, ink and eraser cursor.
    ///
    /// An unloaded board renders a neutral placeholder sized to the container.
    pub fn render(&self, ctx: &cairo::Context) {
        let (Some(background), Some(ink)) = (
            self.surfaces.layer(Layer::Background),
            self.surfaces.layer(Layer::Ink),
        ) else {
            let (width, height) =
                util::fit_to_width(self.surfaces.container_width(), PLACEHOLDER_ASPECT_RATIO);
            render_empty_state(ctx, width as f64, height as f64);
            return;
        };

        render_layers(ctx, background, ink);

        if let Some((center, diameter)) = self.eraser_preview() {
            render_eraser_preview(ctx, center.x, center.y, diameter);
        }
    }

    /// Center and diameter of the eraser cursor disc, when it should be shown.
    pub fn eraser_preview(&self) -> Option<(crate::input::Point, f64)> {
        let style = self.style.state();
        if !self.show_eraser_preview || style.mode != InkMode::Erase {
            return None;
        }
        self.tracker
            .cursor()
            .map(|cursor| (cursor, style.eraser_diameter))
    }

    /// Reads one ARGB32 pixel of a layer (see [`draw::SurfaceManager::pixel`]).
    pub fn pixel(&mut self, layer: Layer, x: i32, y: i32) -> Option<u32> {
        self.surfaces.pixel(layer, x, y)
    }

    /// Copies the raw bytes of a layer.
    pub fn layer_bytes(&mut self, layer: Layer) -> Option<Vec<u8>> {
        self.surfaces.layer_bytes(layer)
    }

    /// Composites background and ink into detached pixels.
    pub(crate) fn flatten(&self) -> Result<draw::FlattenedImage, BoardError> {
        let (Some(background), Some(ink)) = (
            self.surfaces.layer(Layer::Background),
            self.surfaces.layer(Layer::Ink),
        ) else {
            return Err(BoardError::ExportNotReady);
        };
        draw::flatten(background, ink)
    }
}
