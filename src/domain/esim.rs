use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    pub name: String,
    pub duration_days: u32,
    pub data_gb: u32,
    pub price_usd: u32,
    pub features: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivationStatus {
    Pending,
    Active,
    Expired,
}

/// Stored activation of a plan on a device.
#[derive(Debug, Clone)]
pub struct Activation {
    pub id: String,
    pub plan_id: String,
    pub device_imei: String,
    pub customer_email: String,
    pub activation_code: String,
    pub status: ActivationStatus,
    pub data_total_gb: u32,
    pub data_used_gb: f64,
    pub duration_days: u32,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActivateEsim {
    pub plan_id: String,
    pub device_imei: String,
    pub customer_email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActivationResponse {
    pub activation_id: String,
    pub qr_code_url: String,
    pub activation_code: String,
    pub status: ActivationStatus,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Balance {
    pub activation_id: String,
    pub data_remaining_gb: f64,
    pub days_remaining: u32,
    pub status: ActivationStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Usage {
    pub activation_id: String,
    pub data_used_gb: f64,
    pub data_total_gb: u32,
    pub usage_percentage: f64,
    pub last_updated: DateTime<Utc>,
}
