mod block;
pub use block::{xor_in_place, Block};

pub mod io;
