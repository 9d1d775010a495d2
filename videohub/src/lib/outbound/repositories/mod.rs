pub mod comment;
pub mod user;
pub mod video;

pub use comment::PostgresCommentRepository;
pub use user::PostgresUserRepository;
pub use video::PostgresVideoRepository;
