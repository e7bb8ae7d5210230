//! Device DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use infra_db::repositories::{DeviceChanges, DeviceRow, NewDevice};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateDeviceRequest {
    #[validate(length(min = 10, max = 20))]
    pub imei: String,
    pub name: Option<String>,
    pub user_id: Option<Uuid>,
    #[validate(range(min = 0, max = 100))]
    pub battery: Option<i32>,
    pub phone: Option<String>,
    pub mode: Option<String>,
    pub company_id: Option<Uuid>,
    pub uuid: Option<String>,
}

impl From<CreateDeviceRequest> for NewDevice {
    fn from(request: CreateDeviceRequest) -> Self {
        Self {
            imei: request.imei,
            name: request.name,
            user_id: request.user_id,
            battery: request.battery,
            phone: request.phone,
            mode: request.mode,
            company_id: request.company_id,
            device_uuid: request.uuid,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDeviceRequest {
    #[validate(length(min = 10, max = 20))]
    pub imei: Option<String>,
    pub name: Option<String>,
    pub user_id: Option<Uuid>,
    #[validate(range(min = 0, max = 100))]
    pub battery: Option<i32>,
    pub phone: Option<String>,
    pub mode: Option<String>,
    pub company_id: Option<Uuid>,
}

impl From<UpdateDeviceRequest> for DeviceChanges {
    fn from(request: UpdateDeviceRequest) -> Self {
        Self {
            imei: request.imei,
            name: request.name,
            user_id: request.user_id,
            battery: request.battery,
            phone: request.phone,
            mode: request.mode,
            company_id: request.company_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeviceResponse {
    pub id: Uuid,
    pub imei: String,
    pub name: Option<String>,
    pub user_id: Option<Uuid>,
    pub battery: Option<i32>,
    pub phone: Option<String>,
    pub mode: Option<String>,
    pub company_id: Option<Uuid>,
    pub uuid: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DeviceRow> for DeviceResponse {
    fn from(row: DeviceRow) -> Self {
        Self {
            id: row.device_id,
            imei: row.imei,
            name: row.name,
            user_id: row.user_id,
            battery: row.battery,
            phone: row.phone,
            mode: row.mode,
            company_id: row.company_id,
            uuid: row.device_uuid,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
