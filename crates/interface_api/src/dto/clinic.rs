//! Clinic DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use infra_db::repositories::{ClinicChanges, ClinicRow, NewClinic};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateClinicRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub company_id: Option<Uuid>,
}

impl From<CreateClinicRequest> for NewClinic {
    fn from(request: CreateClinicRequest) -> Self {
        Self {
            name: request.name,
            address: request.address,
            phone: request.phone,
            email: request.email,
            company_id: request.company_id,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateClinicRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub company_id: Option<Uuid>,
}

impl From<UpdateClinicRequest> for ClinicChanges {
    fn from(request: UpdateClinicRequest) -> Self {
        Self {
            name: request.name,
            address: request.address,
            phone: request.phone,
            email: request.email,
            company_id: request.company_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ClinicResponse {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub company_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ClinicRow> for ClinicResponse {
    fn from(row: ClinicRow) -> Self {
        Self {
            id: row.clinic_id,
            name: row.name,
            address: row.address,
            phone: row.phone,
            email: row.email,
            company_id: row.company_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
