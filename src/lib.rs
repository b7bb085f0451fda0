pub mod command;
pub mod fileformat;
pub mod matrix;
pub mod runtime;

pub use runtime::ScloomError;
