pub mod eligibility;
pub mod ranker;
pub mod events;
pub mod recorder;
pub mod gateway;
pub mod memory;
pub mod seed;

pub use eligibility::filter_eligible;
pub use ranker::rank;
pub use events::{EngagementError, EngagementEvent};
pub use recorder::{EngagementRecorder, EngagementReport, IncrementOutcome};
pub use gateway::DisplayGateway;
pub use memory::InMemoryBannerStore;
