pub mod catalog;
pub mod engagement;
pub mod envelope;
pub mod error;
pub mod playlist;
pub mod query;

mod macros;
