pub mod errors;
pub mod holiday;
