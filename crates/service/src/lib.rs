//! Service layer for the holiday directory.
//! - `storage` holds the generic JSON file-backed map with atomic persistence.
//! - `directory` defines the `HolidayStore` abstraction handlers depend on.
//! - `file` provides the file-backed implementation of that abstraction.

pub mod errors;
#[cfg(test)]
pub mod test_support;
pub mod storage;
pub mod directory;
pub mod file;
