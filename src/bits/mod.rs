pub mod reader;

pub use reader::{read_u32_le, read_u32_pair_le, u32_le_at, write_u32_le};
