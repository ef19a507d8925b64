use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{EntityId, LearningModule, ModuleRequest};

impl ApiClient {
    pub async fn list_modules(&self) -> Result<Vec<LearningModule>, Error> {
        self.get("modules").await
    }

    pub async fn get_module(&self, id: &EntityId) -> Result<LearningModule, Error> {
        self.get(&format!("modules/{id}")).await
    }

    pub async fn create_module(&self, request: &ModuleRequest) -> Result<LearningModule, Error> {
        self.post("modules", request).await
    }

    pub async fn update_module(&self, id: &EntityId, request: &ModuleRequest) -> Result<LearningModule, Error> {
        self.put(&format!("modules/{id}"), request).await
    }

    pub async fn delete_module(&self, id: &EntityId) -> Result<(), Error> {
        self.delete(&format!("modules/{id}")).await
    }
}
