pub mod inventory;
pub mod records;
pub mod spending;
pub mod trend;

pub use inventory::*;
pub use records::*;
pub use spending::*;
pub use trend::*;
