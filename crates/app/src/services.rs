//! Application services orchestrating domain logic over the ports.

pub mod account_service;
pub mod command_service;
pub mod device_service;

pub use account_service::AccountService;
pub use command_service::CommandService;
pub use device_service::DeviceService;
