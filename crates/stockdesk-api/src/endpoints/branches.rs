use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{Branch, BranchOption, BranchRequest, EntityId};

impl ApiClient {
    /// Every branch. The console filters, sorts, and pages them locally.
    pub async fn list_branches(&self) -> Result<Vec<Branch>, Error> {
        self.get("branches").await
    }

    pub async fn get_branch(&self, id: &EntityId) -> Result<Branch, Error> {
        self.get(&format!("branches/{id}")).await
    }

    pub async fn create_branch(&self, request: &BranchRequest) -> Result<Branch, Error> {
        self.post("branches", request).await
    }

    pub async fn update_branch(&self, id: &EntityId, request: &BranchRequest) -> Result<Branch, Error> {
        self.put(&format!("branches/{id}"), request).await
    }

    pub async fn delete_branch(&self, id: &EntityId) -> Result<(), Error> {
        self.delete(&format!("branches/{id}")).await
    }

    /// Flip `is_active`, returning the branch as stored afterwards.
    pub async fn toggle_branch_active(&self, id: &EntityId) -> Result<Branch, Error> {
        self.patch(&format!("branches/{id}/toggle-active")).await
    }

    /// Compact `{code, name}` entries for branch pickers.
    pub async fn branch_options(&self) -> Result<Vec<BranchOption>, Error> {
        self.get("branches/dropdown").await
    }
}
