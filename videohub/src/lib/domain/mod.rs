pub mod comment;
pub mod lifecycle;
pub mod user;
pub mod video;
