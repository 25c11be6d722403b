pub mod config_io;
pub mod tree_io;

pub use config_io::read_settings;
pub use tree_io::{
    DecodeError, StoreError, atomic_write, decode_tree, encode_tree, load_tree, load_tree_or_empty,
    save_tree, sniff_format,
};
