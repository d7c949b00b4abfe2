pub mod cli;
mod codes;
mod error;
mod frequency;
pub mod log;
mod tree;

pub use codes::{CodeEntry, CodeTable};
pub use error::{HuffmanError, Result};
pub use frequency::{FrequencyCounter, FrequencyTable};
pub use tree::{HuffmanTree, Node};

pub use serde_json;
