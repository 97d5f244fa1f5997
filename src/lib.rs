pub mod core;
pub mod export;
pub mod grid;
pub mod parser;
pub mod pipeline;
pub mod raster;

pub use crate::core::error::GridError;
pub use crate::core::model::{CellDescriptor, DocumentFinal, GridDimensions, TableFinal};
pub use crate::core::params::{GridParams, WindowParams};
pub use crate::grid::{GridAnalysis, TableDetector};
