//! Shared engine: drawing surface, input state, frame loop, timers and the
//! chrome notification sink.

pub mod chrome;
pub mod driver;
pub mod geometry;
pub mod input;
pub mod surface;
pub mod timer;

pub use chrome::{Chrome, Overlay, PageChrome, Score};
pub use driver::{LoopDriver, LoopState};
pub use geometry::{clamp, Aabb};
pub use input::{InputState, Pointer};
pub use surface::{Align, Bounds, Canvas, DrawCommand, Surface, BACKDROP};
pub use timer::{TimerHandle, TimerId, TimerQueue};
