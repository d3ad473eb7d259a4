pub mod metadata;
pub mod png;
pub mod video;
