#![forbid(unsafe_code)]

pub mod assets;
pub mod catalog;
pub mod compose;
pub mod encode;
pub mod error;
pub mod plan;
pub mod render;
pub mod session;
pub mod surface;

pub use assets::{SourceImage, decode_image, load_image};
pub use catalog::{Frame, FrameCatalog, NormBBox};
pub use encode::{DEFAULT_EXPORT_FILENAME, encode_png, write_png};
pub use error::{FrameryError, FrameryResult};
pub use plan::{Adjustments, DrawPlan, FitMode, solve};
pub use render::{EXPORT_HEIGHT, EXPORT_WIDTH, render_export, render_preview};
pub use session::Session;
pub use surface::Surface;
