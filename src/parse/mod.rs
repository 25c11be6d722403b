pub mod json_parser;
pub mod json_serializer;
pub mod text_parser;
pub mod text_serializer;

pub use json_parser::{JsonError, deserialize_item, deserialize_tree};
pub use json_serializer::{serialize_item, serialize_node, serialize_tree};
pub use text_parser::{TextFormatError, parse_text_tree};
pub use text_serializer::serialize_text_tree;
