//! A hierarchical outline of text items, checkboxes, separators, links and
//! remote-fed items, with two on-disk formats and a link-aware navigator.

pub mod cli;
pub mod io;
pub mod model;
pub mod ops;
pub mod parse;
pub mod util;
