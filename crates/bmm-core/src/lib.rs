pub mod config;
pub mod providerid;
pub mod types;

pub use config::{AbsencePolicy, CloudConfig, ConfigError};
pub use providerid::{PROVIDER_NAME, ProviderId, ProviderIdError};
pub use types::*;
