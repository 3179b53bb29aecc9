pub mod games_repository;
pub mod reviews_repository;

pub use games_repository::GamesRepository;
pub use reviews_repository::ReviewsRepository;
