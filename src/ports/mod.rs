pub mod assets;
pub mod repository;
