pub mod delimited;
pub mod memory_table;

pub use delimited::parse_delimited;
pub use memory_table::{MemoryRow, MemoryTable};
