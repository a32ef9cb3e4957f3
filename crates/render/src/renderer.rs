use glyphworld_kernel::ConfigError;
use std::io::Write;

use crate::frame::Frame;

/// Largest accepted viewport radius. A frame is `(2r + 1)^2` cells.
pub const MAX_VIEWPORT_RADIUS: u32 = 512;

/// Viewport configuration for text rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportConfig {
    /// Cells shown on each side of the view entity.
    pub radius: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self { radius: 20 }
    }
}

impl ViewportConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.radius == 0 {
            return Err(ConfigError::ZeroViewportRadius);
        }
        if self.radius > MAX_VIEWPORT_RADIUS {
            return Err(ConfigError::ViewportTooLarge {
                radius: self.radius,
                max: MAX_VIEWPORT_RADIUS,
            });
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to present frame: {0}")]
    Io(#[from] std::io::Error),
    #[error("presenter rejected frame at tick {tick}: {reason}")]
    Rejected { tick: u64, reason: String },
}

/// Pure projection of a frame into some output.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&self, frame: &Frame) -> Self::Output;
}

/// Render collaborator: side-effecting sink for frames.
pub trait Presenter {
    fn present(&mut self, frame: &Frame) -> Result<(), RenderError>;
}

/// Keeps every presented frame. Useful for tests and headless runs.
#[derive(Debug, Default)]
pub struct FrameRecorder {
    frames: Vec<Frame>,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn last(&self) -> Option<&Frame> {
        self.frames.last()
    }
}

impl Presenter for FrameRecorder {
    fn present(&mut self, frame: &Frame) -> Result<(), RenderError> {
        self.frames.push(frame.clone());
        Ok(())
    }
}

/// Square text grid centred on the view entity, with coordinate headers.
///
/// Sprites are drawn in frame order, so later entities overwrite earlier ones
/// sharing a cell. Rows run from the highest `y` down.
#[derive(Debug, Clone, Copy)]
pub struct AsciiViewport {
    radius: i64,
}

impl AsciiViewport {
    pub fn new(config: ViewportConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            radius: i64::from(config.radius),
        })
    }

    fn side(&self) -> usize {
        // radius is a u32, so the side length always fits
        (self.radius * 2 + 1) as usize
    }
}

impl Renderer for AsciiViewport {
    type Output = String;

    fn render(&self, frame: &Frame) -> String {
        let side = self.side();
        let left = i64::from(frame.view.x) - self.radius;
        let top = i64::from(frame.view.y) + self.radius;
        let mut cells = vec![vec![' '; side]; side];

        for placed in &frame.sprites {
            let col = i64::from(placed.position.x) - left;
            let row = top - i64::from(placed.position.y);
            if (0..side as i64).contains(&col) && (0..side as i64).contains(&row) {
                cells[row as usize][col as usize] = placed.sprite.glyph();
            }
        }

        let mut out = String::new();
        out.push_str(&format!(
            "=== tick {} | view ({}, {}) | entities {} ===\n",
            frame.tick,
            frame.view.x,
            frame.view.y,
            frame.len()
        ));
        let columns = left..left + side as i64;
        out.push_str("     ");
        out.extend(columns.clone().map(|x| digit(x.rem_euclid(100) / 10)));
        out.push('\n');
        out.push_str("     ");
        out.extend(columns.map(|x| digit(x.rem_euclid(10))));
        out.push('\n');
        for (i, row) in cells.iter().enumerate() {
            out.push_str(&format!("{:>4} ", top - i as i64));
            out.extend(row.iter());
            out.push('\n');
        }
        out
    }
}

fn digit(d: i64) -> char {
    char::from_digit(d as u32, 10).unwrap_or('?')
}

/// Writes an [`AsciiViewport`] rendering of each frame to a writer.
pub struct TextPresenter<W> {
    out: W,
    viewport: AsciiViewport,
}

impl<W: Write> TextPresenter<W> {
    pub fn new(out: W, viewport: AsciiViewport) -> Self {
        Self { out, viewport }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for TextPresenter<W> {
    fn present(&mut self, frame: &Frame) -> Result<(), RenderError> {
        let text = self.viewport.render(frame);
        self.out.write_all(text.as_bytes())?;
        self.out.flush()?;
        tracing::trace!(tick = frame.tick, "presented frame");
        Ok(())
    }
}
