use crate::error::ChartResult;
use crate::render::{FrameCounts, RenderFrame, Renderer};

/// No-op renderer used by tests and headless dashboard runs.
///
/// It still validates frame content so tests catch invalid geometry.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub last_counts: FrameCounts,
    pub frames_rendered: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.last_counts = frame.counts();
        self.frames_rendered += 1;
        Ok(())
    }
}
