use crate::domain::esim::Activation;
use crate::domain::repository::ActivationRepository;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace};

/// Activations keyed by activation id. Lives as long as the process.
#[derive(Clone)]
pub struct InMemoryActivationRepository {
    activations: Arc<RwLock<HashMap<String, Activation>>>,
}

impl InMemoryActivationRepository {
    pub fn new() -> Self {
        Self {
            activations: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryActivationRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActivationRepository for InMemoryActivationRepository {
    #[instrument(skip(self, activation), fields(activation_id = %activation.id, plan_id = %activation.plan_id))]
    async fn save(&self, activation: Activation) -> Result<()> {
        let mut activations = self.activations.write().await;
        activations.insert(activation.id.clone(), activation);
        debug!(count = activations.len(), "Activation stored");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &str) -> Result<Option<Activation>> {
        let activations = self.activations.read().await;
        let found = activations.get(id).cloned();
        if found.is_none() {
            trace!(activation_id = id, "Activation not in storage");
        }
        Ok(found)
    }
}
