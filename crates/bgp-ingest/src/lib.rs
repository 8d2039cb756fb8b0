//! bgp-ingest
//!
//! One ingestion run over the day window:
//! - `GameRegistry`: name -> id, unique colour tag per new game
//! - `DateGate`: creation vs update path per date visit
//! - `ReconciliationEngine`: applies `bgp_reconcile::plan` decisions to the store
//! - `Ingestor`: paced fetch of both pages per date, oldest first
//!
//! Collaborators are passed in by reference and live for one run; nothing
//! here keeps global state.

pub mod date_gate;
pub mod engine;
pub mod ingest;
pub mod registry;
pub mod summary;

pub use date_gate::DateGate;
pub use engine::{PassReport, ReconciliationEngine};
pub use ingest::{scan_window, IngestSettings, Ingestor, Pacer, DEFAULT_PACING, PAGES_PER_DATE};
pub use registry::{
    format_color_tag, ColorTagPolicy, GameRegistry, RegistryError, ResolvedGame,
    DEFAULT_MAX_TAG_ATTEMPTS,
};
pub use summary::{FailedDate, IngestSummary};
