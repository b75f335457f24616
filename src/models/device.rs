// Registered wake targets

/// A wake target. `mac` and `interface` are stored as entered; they are only
/// interpreted when a wake is requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub id: i64,
    pub name: String,
    pub mac: String,
    pub interface: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDevice {
    pub name: String,
    pub mac: String,
    pub interface: String,
}
