pub mod claims;
pub mod errors;
pub mod handler;
pub mod keys;

pub use claims::Claims;
pub use errors::JwtError;
pub use handler::JwtHandler;
pub use keys::KeyRing;
