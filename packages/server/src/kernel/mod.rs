pub mod cache;
pub mod deps;
pub mod geo;
pub mod uow;

pub use cache::SwipeCache;
pub use deps::ServerDeps;
pub use geo::GeoIndex;
pub use uow::UnitOfWork;
