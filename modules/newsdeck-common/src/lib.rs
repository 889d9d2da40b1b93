pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::NewsdeckError;
pub use types::{CandidateItem, EnrichedRecord, ImpactLevel, SearchHit, Sector};
