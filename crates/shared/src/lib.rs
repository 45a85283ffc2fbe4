pub mod domain;
pub mod error;
pub mod process;
pub mod protocol;
pub mod status;
