use thiserror::Error;

use crate::canvas::DrawList;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// Temporarily unavailable (resize or teardown in progress).
    #[error("surface unavailable: {0}")]
    Unavailable(String),
    #[error("surface lost")]
    Lost,
}

/// A presentable render target. The loop acquires a frame, draws into it and
/// hands it back through `present`.
pub trait Surface: Send {
    type Frame: crate::canvas::Canvas;

    fn acquire(&mut self) -> Result<Self::Frame, SurfaceError>;
    fn present(&mut self, frame: Self::Frame) -> Result<(), SurfaceError>;
}

/// Surface without a display: frames are recorded draw lists and the most
/// recent presented one is kept for inspection.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    presented: u64,
    last_frame: Option<DrawList>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn presented_count(&self) -> u64 {
        self.presented
    }

    pub fn last_frame(&self) -> Option<&DrawList> {
        self.last_frame.as_ref()
    }
}

impl Surface for HeadlessSurface {
    type Frame = DrawList;

    fn acquire(&mut self) -> Result<DrawList, SurfaceError> {
        // Reuse the previous allocation.
        let mut frame = self.last_frame.take().unwrap_or_default();
        frame.clear();
        Ok(frame)
    }

    fn present(&mut self, frame: DrawList) -> Result<(), SurfaceError> {
        self.presented += 1;
        log::trace!("Presented headless frame {} ({} commands)", self.presented, frame.len());
        self.last_frame = Some(frame);
        Ok(())
    }
}
