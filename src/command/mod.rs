// Module declarations (alphabetical)
pub mod convert;
pub mod intron;

pub use convert::{Convert, ConvertCMD};
pub use intron::{Intron, IntronCMD};
