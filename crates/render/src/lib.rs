//! Rendering Adapter: projects world state into frames of sprites and hands
//! them to a presenter.
//!
//! # Invariants
//! - Renderers and presenters cannot mutate world truth.
//! - A frame lists one sprite per entity, in the world's entity order.

mod frame;
mod renderer;

pub use frame::{Frame, PlacedSprite};
pub use renderer::{
    AsciiViewport, FrameRecorder, MAX_VIEWPORT_RADIUS, Presenter, RenderError, Renderer,
    TextPresenter, ViewportConfig,
};
