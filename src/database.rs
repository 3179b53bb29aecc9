pub mod connection;
pub mod repository;
pub mod session;

pub use connection::*;
pub use session::PersistenceContext;
