pub mod export;
pub mod materials;
mod plot;
pub mod rooms;
mod stats;
pub mod table;

pub use export::{MaterialReport, RoomReport};
pub use materials::{MaterialSummary, summarize_materials};
pub use rooms::{RoomSummary, summarize_rooms};
pub use table::Table;
