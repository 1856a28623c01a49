mod ids;
mod scanner;
mod store;

pub use ids::UuidIdGenerator;
pub use scanner::WalkdirFileSystem;
pub use store::JsonFileStore;
