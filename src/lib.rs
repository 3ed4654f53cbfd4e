pub mod achievements;
pub mod config;
pub mod error;
pub mod history;
pub mod model;
pub mod report;
pub mod sources;
pub mod stats;
pub mod weekly;

pub use config::EngineConfig;
pub use error::EngineError;
pub use history::ListeningHistory;
pub use report::WrappedReport;
