pub mod error;
pub mod keys;
pub mod media_type;
pub mod response;
pub mod upload;
