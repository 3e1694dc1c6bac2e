use super::core::Board;
use super::types::{BoardError, BoardPhase};
use crate::draw::{self, Color};
use crate::input::InkMode;
use crate::publish::{PublishError, PublishManager, PublishOutcome, PublishTarget};
use tokio::sync::oneshot;

impl Board {
    /// Fits both surfaces to a new container width.
    ///
    /// A stroke in progress is finalized first. Before the background has
    /// loaded, the width is only recorded and `Ok(None)` is returned.
    pub fn resize(&mut self, container_width: u32) -> Result<Option<(i32, i32)>, BoardError> {
        if self.phase == BoardPhase::Drawing || self.tracker.is_active() {
            self.finish_gesture();
        }

        let resized = self.surfaces.resize(container_width)?;
        if resized.is_some() {
            self.needs_redraw = true;
        }
        Ok(resized)
    }

    pub fn set_mode(&mut self, mode: InkMode) {
        self.style.set_mode(mode);
        self.needs_redraw = true;
    }

    pub fn set_line_color(&mut self, color: Color) {
        self.style.set_line_color(color);
    }

    /// Sets the eraser diameter, returning the clamped value applied.
    pub fn set_eraser_diameter(&mut self, diameter: f64) -> f64 {
        let applied = self.style.set_eraser_diameter(diameter);
        if self.style.mode() == InkMode::Erase {
            self.needs_redraw = true;
        }
        applied
    }

    /// Wipes the ink layer. The background is never touched.
    ///
    /// # Behavior
    /// - `Ready`: ink cleared
    /// - `Drawing`: fails with [`BoardError::StrokeInProgress`]
    /// - `Unloaded`: nothing to clear, succeeds without effect
    pub fn clear(&mut self) -> Result<(), BoardError> {
        match self.phase {
            BoardPhase::Unloaded => Ok(()),
            BoardPhase::Drawing => Err(BoardError::StrokeInProgress),
            BoardPhase::Ready => {
                self.surfaces.clear_ink()?;
                log::info!("Ink cleared");
                self.needs_redraw = true;
                Ok(())
            }
        }
    }

    /// Flattens both layers and encodes the result as PNG.
    ///
    /// Flattening happens before the first await, so the encoded image is a
    /// snapshot of the board at call time.
    pub async fn export(&mut self) -> Result<Vec<u8>, BoardError> {
        let flattened = self.snapshot()?;
        draw::encode_png_async(flattened).await
    }

    fn snapshot(&self) -> Result<draw::FlattenedImage, BoardError> {
        match self.phase {
            BoardPhase::Unloaded => Err(BoardError::ExportNotReady),
            BoardPhase::Drawing => Err(BoardError::StrokeInProgress),
            BoardPhase::Ready => self.flatten(),
        }
    }

    /// Exports the board and queues it on `publisher` for `subject_id`.
    ///
    /// The board's profile supplies the bucket and table. The returned
    /// receiver resolves once the upload and record insert have finished.
    pub async fn save(
        &mut self,
        publisher: &PublishManager,
        subject_id: &str,
    ) -> Result<oneshot::Receiver<PublishOutcome>, PublishError> {
        let png = self.export().await?;
        let target = PublishTarget::new(&self.profile.bucket, &self.profile.table, subject_id);
        log::info!(
            "Saving board to bucket '{}' for '{}'",
            target.bucket,
            target.subject_id
        );
        publisher.request_publish(png, target)
    }
}
