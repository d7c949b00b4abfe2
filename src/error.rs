use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HuffmanError {
    #[error("cannot build a Huffman tree from empty input")]
    EmptyInput,

    #[error("malformed Huffman tree: internal node without two children")]
    MalformedTree,
}

/// A specialized `Result` type for code table construction.
pub type Result<T> = std::result::Result<T, HuffmanError>;
