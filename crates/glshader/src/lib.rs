//! OpenGL shader programs for presenting video frames on a textured quad.
//!
//! The crate turns a [`ShaderConfiguration`] (where each stage's source lives)
//! into a linked [`ShaderProgram`] on a caller-supplied [`GraphicsContext`]:
//!
//! ```text
//!   ShaderConfiguration ──validate──▶ load + compile each stage ──▶ attach ──▶ link
//!          │                                    │                              │
//!          └─ InvalidConfiguration              └─ SourceLoad / StageCompile   └─ ProgramLink
//! ```
//!
//! Errors nest: everything after validation is reported as
//! [`ShaderError::Build`] with the precise [`BuildError`] as its source, so
//! callers can stop at "the shader could not be created" or walk down to the
//! I/O error or compiler log. The surrounding application owns the window,
//! the GL context and decoding; [`quad`] and [`frame`] carry the small pieces
//! of geometry and timing it needs to put frames on screen.

mod compile;
mod config;
pub mod context;
mod error;
pub mod frame;
mod program;
pub mod quad;
mod stage;
mod uniforms;

pub use config::{ConfigIssue, ShaderConfiguration};
pub use context::GraphicsContext;
pub use error::{BuildError, ShaderError};
pub use frame::{FrameClock, FrameError, TimeBase, VideoFrame};
pub use program::ShaderProgram;
pub use quad::quad_projection;
pub use stage::{ShaderStage, STAGE_COUNT};
pub use uniforms::UniformValue;

pub use glam;
