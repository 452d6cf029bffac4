pub mod settings;

pub use settings::{AccountSettings, Category, Settings};
