pub mod controls;
pub mod tooltip;

pub use controls::{ControlOption, ControlPanel, DimensionChange};
pub use tooltip::TooltipContent;
