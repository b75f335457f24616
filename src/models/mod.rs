// Domain models: users, devices, host interfaces

mod device;
mod interface;
mod user;

pub use device::{Device, NewDevice};
pub use interface::NetworkInterface;
pub use user::{Capabilities, NewUser, User};
