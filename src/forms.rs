// Form payloads. Fields deserialize as optional and are checked by `validate`,
// so a missing field is a `FormError`, not an extractor rejection.

use crate::models::{Capabilities, NewDevice, NewUser};
use serde::Deserialize;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(&'static str),
}

fn required(value: &Option<String>, field: &'static str) -> Result<String, FormError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(FormError::Missing(field)),
    }
}

/// HTML checkboxes are only submitted when ticked.
fn checked(value: &Option<String>) -> bool {
    matches!(value.as_deref(), Some(v) if !v.is_empty() && v != "false" && v != "0")
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl LoginForm {
    /// Username is trimmed; the password is taken as typed.
    pub fn validate(&self) -> Result<(String, String), FormError> {
        let username = required(&self.username, "username")?;
        let password = match self.password.as_deref() {
            Some(p) if !p.is_empty() => p.to_string(),
            _ => return Err(FormError::Missing("password")),
        };
        Ok((username, password))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DeviceForm {
    pub name: Option<String>,
    pub mac: Option<String>,
    pub interface: Option<String>,
}

impl DeviceForm {
    pub fn validate(&self) -> Result<NewDevice, FormError> {
        Ok(NewDevice {
            name: required(&self.name, "name")?,
            mac: required(&self.mac, "mac")?,
            interface: required(&self.interface, "interface")?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UserForm {
    pub username: Option<String>,
    pub password: Option<String>,
    pub is_admin: Option<String>,
    pub can_add_devices: Option<String>,
    pub can_send_wol: Option<String>,
}

impl UserForm {
    pub fn validate(&self) -> Result<NewUser, FormError> {
        let username = required(&self.username, "username")?;
        let password = match self.password.as_deref() {
            Some(p) if !p.is_empty() => p.to_string(),
            _ => return Err(FormError::Missing("password")),
        };
        Ok(NewUser {
            username,
            password,
            capabilities: Capabilities {
                is_admin: checked(&self.is_admin),
                can_add_devices: checked(&self.can_add_devices),
                can_send_wol: checked(&self.can_send_wol),
            },
        })
    }
}
