pub mod catalog;
pub mod label;
pub mod opacity;
pub mod paint;
pub mod palette;

pub use catalog::{Dimension, DimensionCatalog, DimensionKind, SelectedDimension};
pub use label::format_label;
pub use opacity::{classify, OpacityClassifier, OpacityEncoding};
pub use paint::PaintSpec;
pub use palette::{palette_color, Color, CATEGORY10};
