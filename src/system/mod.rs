pub mod baseline;
pub mod collector;
pub mod host;
pub mod meminfo;
pub mod rank;
pub mod scanner;
pub mod snapshot;
pub mod source;
pub mod stat;
pub mod usage;
