///! Near-Earth object close-approach data: wire schema, pipeline and dashboard state
pub mod error;
pub mod types;
pub mod parser;
pub mod api_client;
pub mod pipeline;
pub mod state;
pub mod cache;
pub mod dashboard;

pub use api_client::{NasaNeoClient, NeoSource};
pub use dashboard::NeoDashboard;
pub use error::NeoError;
pub use state::{DashboardEvent, DashboardSnapshot, DashboardView, ViewParams};
pub use types::{CloseApproach, DateGroup, FeedResult, NearEarthObject, NeoStats};
