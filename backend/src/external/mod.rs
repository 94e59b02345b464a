//! External API integrations

pub mod amadeus;
pub mod open_meteo;

pub use amadeus::AmadeusClient;
pub use open_meteo::ArchiveClient;
