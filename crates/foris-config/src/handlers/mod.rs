//! Form builders of the individual configuration domains

pub mod dns;
pub mod lan;
pub mod maintenance;
pub mod notifications;
pub mod password;
pub mod region;
pub mod remote;
pub mod updater;
pub mod wan;
pub mod wifi;

pub use dns::DnsHandler;
pub use lan::LanHandler;
pub use maintenance::MaintenanceHandler;
pub use notifications::NotificationsHandler;
pub use password::{PasswordHandler, PasswordMode};
pub use region::{RegionHandler, TimeHandler};
pub use remote::RemoteHandler;
pub use updater::UpdaterHandler;
pub use wan::WanHandler;
pub use wifi::WifiHandler;
