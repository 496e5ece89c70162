pub mod config;
pub mod error;
pub mod labels;
pub mod messages;
pub mod rules;

pub use config::Config;
pub use error::ActioneerError;
pub use labels::*;
pub use messages::*;
pub use rules::*;
