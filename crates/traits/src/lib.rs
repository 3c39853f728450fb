pub mod canvas;
pub mod font;
pub mod tagging;
pub mod typography;

pub use canvas::{Canvas, CanvasError, DrawOp, RecordingCanvas, TextRun};
pub use font::{FixedPitchMetrics, FontDescriptor, FontError, FontMetrics, VerticalMetrics};
pub use tagging::{TagAttributes, TagEvent, TagRecorder, TagRole, TagSink};
pub use typography::{NoTypography, Typography, UnicodeBidiTypography};
