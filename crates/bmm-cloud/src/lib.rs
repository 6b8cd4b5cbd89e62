//! bmm-cloud — node lifecycle for NVIDIA BMM bare-metal instances.
//!
//! Answers the orchestrator's per-node questions (does the instance still
//! exist, is it shut down, which addresses and topology labels does it
//! publish) from a single remote instance lookup.
//!
//! # Architecture
//!
//! ```text
//! NvidiaBmmCloud
//!   ├── ProviderId::parse (bmm-core) → instance UUID
//!   ├── InstanceLookup (trait)
//!   │   └── RestInstanceLookup → GET /v2/org/{org}/carbide/instance/{id}
//!   ├── lifecycle
//!   │   ├── exists()      → bool (absence policy applies)
//!   │   ├── is_shutdown() → Terminating | Terminated | Error
//!   │   └── metadata()    → addresses + instance type
//!   └── topology (configured site only)
//!       ├── zone_of()   → nvidia-bmm-zone-{site}
//!       └── region_of() → nvidia-bmm-region-{leading}
//! ```
//!
//! Nothing is cached and nothing is retried: errors go back to the
//! orchestrator's own reconciliation loop.

pub mod error;
pub mod lifecycle;
pub mod lookup;
pub mod provider;
pub mod rest;
pub mod topology;

pub use error::{CloudError, CloudResult};
pub use lifecycle::InstanceStatus;
pub use lookup::{Instance, InstanceLookup, InstanceResponse, Interface, LookupError};
pub use provider::NvidiaBmmCloud;
pub use rest::RestInstanceLookup;
