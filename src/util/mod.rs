pub mod simplify;
pub mod unicode;
