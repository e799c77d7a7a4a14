pub mod models;

pub use models::{Args, Config, Mode};
