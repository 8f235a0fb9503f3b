pub mod data;
pub mod io;
pub mod printing;

pub use data::{BaseUrlSource, Config, ResolvedBaseUrl};
pub use io::ConfigError;
