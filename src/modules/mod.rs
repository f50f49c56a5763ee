pub mod assets;
pub mod video;
