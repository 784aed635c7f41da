// Peta UMKM Sulawesi Barat - Core Library
// Exposes all modules for use in the terminal UI, web server, and tests

pub mod error;
pub mod record;
pub mod store;
pub mod filter;
pub mod aggregate;
pub mod map;
pub mod dashboard;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{DashboardError, Result};
pub use record::Record;
pub use store::RecordStore;
pub use filter::{FilterCriteria, FilterEngine, FilteredView, ALL_OPTION};
pub use aggregate::{Aggregator, Summary};
pub use map::{
    MapMarker, MapProjection, MapProjector, MapView, Rgba, ViewState,
    EMPTY_MAP_NOTICE,
};
pub use dashboard::{Dashboard, FilterOptions, RenderModel};
pub use config::Config;
pub use logging::{init_logging, LogTarget};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Dashboard title shown by every front end
pub const APP_TITLE: &str = "Peta UMKM Sulawesi Barat";
