//! Architecture resolution and scoring engine.
//!
//! Given a project and a public endpoint, finds the compute platform(s) and the
//! single database platform serving it, then folds their topology into an
//! availability rating (0–3) and sums a cost estimate.
//!
//! # Module Structure
//!
//! - [`error`]: Probe error type (`ProbeError`)
//! - [`cloud`]: Cloud provider API abstraction (`CloudApi` trait, `RestCloudApi`)
//! - [`resource`]: Resource model (`ComputingResource`, `FrontDoor`, `DatabaseResource`)
//! - [`endpoint`]: Endpoint URL to host (`resolve_host`)
//! - [`probe`]: Per-platform resource probes (`ProbeOutcome`)
//! - [`resolver`]: Computing cascade and database reduction
//! - [`topology`]: Availability rating (`classify`)
//! - [`cost`]: Cost aggregation (`total_cost`)
//! - [`report`]: Aggregate root and entry point (`Architecture`, `Assessor`)
//!
//! # Architecture
//!
//! ```text
//! endpoint --resolve_host--> host
//!                              |
//!                     ComputingResolver (front door -> VM -> serverless)
//!                              |
//!                     DatabaseResolver (Cloud SQL | AlloyDB | Spanner, joined)
//!                              |
//!                     Architecture --> classify() / total_cost()
//! ```

pub mod cloud;
pub mod cost;
pub mod endpoint;
pub mod error;
pub mod probe;
pub mod report;
pub mod resolver;
pub mod resource;
pub mod topology;

// --- Public API Re-exports ---

// Entry point
pub use report::{Architecture, ArchitectureReport, Assessor};

// Error
pub use error::ProbeError;

// Cloud API
pub use cloud::{CloudApi, RestCloudApi};

// Resources
pub use resource::{
    CloudResource, ComputingResource, DatabaseResource, DistributedEngine, FrontDoor,
    MachineShape, ManagedCluster, RelationalEngine, ServerlessPlatform, ServerlessService,
    VirtualMachine,
};

// Resolution
pub use endpoint::resolve_host;
pub use probe::{ComputingProbe, DatabaseProbe, ProbeOutcome};
pub use resolver::{ComputingResolution, ComputingResolver, DatabaseResolver};

// Scoring
pub use cost::total_cost;
pub use topology::{app_rating, classify};
