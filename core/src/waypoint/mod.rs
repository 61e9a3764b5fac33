pub mod engine;
pub mod layline;
pub mod tack;

pub use engine::WaypointEngine;
pub use layline::Diamond;
pub use tack::{opposite_tack, vmc, OppositeTack, TackState};
