use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{CreatedTeacher, EntityId, Teacher, TeacherCredentials, TeacherRequest};

impl ApiClient {
    pub async fn list_teachers(&self) -> Result<Vec<Teacher>, Error> {
        self.get("teachers").await
    }

    pub async fn get_teacher(&self, id: &EntityId) -> Result<Teacher, Error> {
        self.get(&format!("teachers/{id}")).await
    }

    /// Create a teacher account. The backend generates the password.
    pub async fn create_teacher(&self, request: &TeacherRequest) -> Result<CreatedTeacher, Error> {
        self.post("teachers", request).await
    }

    pub async fn update_teacher(&self, id: &EntityId, request: &TeacherRequest) -> Result<Teacher, Error> {
        self.put(&format!("teachers/{id}"), request).await
    }

    pub async fn delete_teacher(&self, id: &EntityId) -> Result<(), Error> {
        self.delete(&format!("teachers/{id}")).await
    }

    /// Have the backend mint a fresh password for a teacher.
    pub async fn reset_teacher_password(&self, id: &EntityId) -> Result<TeacherCredentials, Error> {
        self.post(&format!("teachers/{id}/reset-password"), &serde_json::json!({}))
            .await
    }

    pub async fn toggle_teacher_active(&self, id: &EntityId) -> Result<Teacher, Error> {
        self.patch(&format!("teachers/{id}/toggle-active")).await
    }
}
