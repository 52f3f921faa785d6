use crate::data::catalog::find_plan;
use crate::domain::error::DomainError;
use crate::domain::esim::{
    ActivateEsim, Activation, ActivationResponse, ActivationStatus, Balance, Usage,
};
use crate::domain::repository::ActivationRepository;
use crate::domain::validation::{require_non_empty, validate_email};
use crate::infrastructure::clock::Clock;
use anyhow::Result;
use chrono::{DateTime, NaiveTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

const QR_BASE_URL: &str = "https://api.esim.com.mm/qr";

pub struct EsimService<R: ActivationRepository> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R: ActivationRepository> EsimService<R> {
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    #[instrument(skip(self, req), fields(plan_id = %req.plan_id))]
    pub async fn activate(&self, req: ActivateEsim) -> Result<ActivationResponse> {
        let plan = find_plan(&req.plan_id).ok_or_else(|| {
            warn!(plan_id = %req.plan_id, "Activation for unknown plan");
            DomainError::Validation("Invalid plan ID".to_string())
        })?;
        require_non_empty("device_imei", &req.device_imei)?;
        validate_email(&req.customer_email)?;

        let now = self.clock.now();
        let id = Uuid::new_v4().to_string();
        let activation = Activation {
            activation_code: format!("ESM{}", id[..8].to_uppercase()),
            id,
            plan_id: plan.id,
            device_imei: req.device_imei,
            customer_email: req.customer_email,
            status: ActivationStatus::Pending,
            data_total_gb: plan.data_gb,
            data_used_gb: 0.0,
            duration_days: plan.duration_days,
            created_at: now,
            expires_at: end_of_day(now),
        };
        self.repository.save(activation.clone()).await?;

        info!(activation_id = %activation.id, "eSIM activation created");
        Ok(ActivationResponse {
            qr_code_url: format!("{}/{}", QR_BASE_URL, activation.id),
            activation_id: activation.id,
            activation_code: activation.activation_code,
            status: activation.status,
            expires_at: activation.expires_at,
        })
    }

    async fn get(&self, id: &str) -> Result<Activation> {
        self.repository.find_by_id(id).await?.ok_or_else(|| {
            debug!(activation_id = id, "Activation not found");
            DomainError::NotFound("Activation not found".to_string()).into()
        })
    }

    #[instrument(skip(self))]
    pub async fn balance(&self, activation_id: &str) -> Result<Balance> {
        let activation = self.get(activation_id).await?;
        let days_remaining = self.days_remaining(&activation);
        let status = if days_remaining == 0 {
            ActivationStatus::Expired
        } else {
            activation.status
        };

        Ok(Balance {
            activation_id: activation.id,
            data_remaining_gb: (activation.data_total_gb as f64 - activation.data_used_gb).max(0.0),
            days_remaining,
            status,
        })
    }

    #[instrument(skip(self))]
    pub async fn usage(&self, activation_id: &str) -> Result<Usage> {
        let activation = self.get(activation_id).await?;
        let usage_percentage = if activation.data_total_gb == 0 {
            0.0
        } else {
            activation.data_used_gb / activation.data_total_gb as f64 * 100.0
        };

        Ok(Usage {
            activation_id: activation.id,
            data_used_gb: activation.data_used_gb,
            data_total_gb: activation.data_total_gb,
            usage_percentage,
            last_updated: self.clock.now(),
        })
    }

    fn days_remaining(&self, activation: &Activation) -> u32 {
        let elapsed = (self.clock.now() - activation.created_at).num_days().max(0);
        (activation.duration_days as i64 - elapsed).max(0) as u32
    }
}

// 23:59:59 UTC on the same day
fn end_of_day(at: DateTime<Utc>) -> DateTime<Utc> {
    let last_second = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
    at.date_naive().and_time(last_second).and_utc()
}
