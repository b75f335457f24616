// Device registry in SQLite. Add and list only; MAC and interface are stored verbatim.

use crate::models::{Device, NewDevice};
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use tracing::instrument;

pub struct DeviceRepo {
    pool: SqlitePool,
}

impl DeviceRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self), fields(repo = "devices", operation = "list"))]
    pub async fn list(&self) -> anyhow::Result<Vec<Device>> {
        let rows = sqlx::query("SELECT id, name, mac, interface FROM devices ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(Self::parse_device_row).collect()
    }

    #[instrument(skip(self), fields(repo = "devices", operation = "get"))]
    pub async fn get(&self, id: i64) -> anyhow::Result<Option<Device>> {
        let row = sqlx::query("SELECT id, name, mac, interface FROM devices WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::parse_device_row).transpose()
    }

    #[instrument(skip(self, device), fields(repo = "devices", operation = "add", name = %device.name))]
    pub async fn add(&self, device: &NewDevice) -> anyhow::Result<Device> {
        let result = sqlx::query("INSERT INTO devices (name, mac, interface) VALUES ($1, $2, $3)")
            .bind(&device.name)
            .bind(&device.mac)
            .bind(&device.interface)
            .execute(&self.pool)
            .await?;
        Ok(Device {
            id: result.last_insert_rowid(),
            name: device.name.clone(),
            mac: device.mac.clone(),
            interface: device.interface.clone(),
        })
    }

    fn parse_device_row(row: &SqliteRow) -> anyhow::Result<Device> {
        Ok(Device {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            mac: row.try_get("mac")?,
            interface: row.try_get("interface")?,
        })
    }
}
