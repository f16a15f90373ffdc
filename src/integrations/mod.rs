pub mod steam;

pub use steam::SteamClient;
