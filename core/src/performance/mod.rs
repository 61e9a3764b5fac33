pub mod polar;
pub mod tack;
pub mod table;
pub mod vmg;

pub use tack::{TackInterpolation, TackRow};
pub use table::{PolarDiagram, TackTable};
pub use vmg::VmgEngine;
