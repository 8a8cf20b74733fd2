pub mod error;
pub mod gallery;
pub mod storage;
pub mod utils;
