pub mod geometry;
pub mod logger;
pub mod path;
pub mod platform;
pub mod random;
pub mod scheduler;
pub mod settings;
pub mod sleep;
pub mod types;
