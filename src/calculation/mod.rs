pub mod aggregator;
pub mod resolver;
pub mod service;

pub use service::ContributionService;
