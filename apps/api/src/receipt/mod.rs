pub mod assembler;
pub mod handlers;
pub mod models;
pub mod naming;
pub mod sequence;
pub mod validation;
pub mod words;

pub use assembler::{AssemblerSettings, ReceiptAssembler};
