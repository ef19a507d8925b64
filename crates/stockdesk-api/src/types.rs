// Wire types for the stock-management backend.
//
// Shapes follow the JSON the backend returns; alternate field spellings
// seen across endpoints are accepted through serde aliases.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── EntityId ────────────────────────────────────────────────────────

/// Identifier of a backend record.
///
/// Most tables use integer keys; a few legacy endpoints return string ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Numeric(i64),
    Text(String),
}

impl EntityId {
    pub fn as_numeric(&self) -> Option<i64> {
        match self {
            Self::Numeric(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        Self::Numeric(n)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        match s.trim().parse::<i64>() {
            Ok(n) => Self::Numeric(n),
            Err(_) => Self::Text(s),
        }
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

fn default_true() -> bool {
    true
}

// ── Auth ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Teacher,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: EntityId,
    pub username: String,
    #[serde(default, alias = "name")]
    pub full_name: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub branch_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "access_token")]
    pub token: String,
    pub user: CurrentUser,
}

// ── Branches ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    pub id: EntityId,
    #[serde(alias = "branch_code")]
    pub code: String,
    #[serde(alias = "branch_name")]
    pub name: String,
    #[serde(default)]
    pub is_head_branch: bool,
    #[serde(default)]
    pub regional_hub: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Compact branch entry used to populate branch pickers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchOption {
    #[serde(alias = "branch_code")]
    pub code: String,
    #[serde(alias = "branch_name")]
    pub name: String,
    #[serde(default)]
    pub is_head_branch: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchRequest {
    #[serde(rename = "branch_code")]
    pub code: String,
    #[serde(rename = "branch_name")]
    pub name: String,
    pub is_head_branch: bool,
    pub regional_hub: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

// ── Teachers ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Teacher {
    pub id: EntityId,
    pub username: String,
    #[serde(alias = "name", alias = "teacher_name")]
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub branch_code: String,
    #[serde(default)]
    pub division: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherRequest {
    pub username: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub branch_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub division: Option<String>,
}

/// Credentials minted by the backend on teacher creation or password reset.
/// The password is shown exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherCredentials {
    pub username: String,
    #[serde(alias = "generated_password", alias = "temporary_password")]
    pub password: String,
}

/// `POST teachers` answers with the new account plus its one-time password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedTeacher {
    #[serde(alias = "user")]
    pub teacher: Teacher,
    pub credentials: TeacherCredentials,
}

// ── Learning modules ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningModule {
    pub id: EntityId,
    #[serde(alias = "module_code")]
    pub code: String,
    #[serde(alias = "module_name")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub division: Option<String>,
    #[serde(default)]
    pub min_age: Option<u32>,
    #[serde(default)]
    pub max_age: Option<u32>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRequest {
    #[serde(rename = "module_code")]
    pub code: String,
    #[serde(rename = "module_name")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub division: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_age: Option<u32>,
}

// ── Certificate stock ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateBatch {
    pub id: EntityId,
    pub branch_code: String,
    #[serde(default)]
    pub batch_number: Option<String>,
    #[serde(alias = "certificate_amount")]
    pub certificate_quantity: u64,
    #[serde(alias = "medal_amount")]
    pub medal_quantity: u64,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockBatchRequest {
    pub branch_code: String,
    pub certificate_quantity: u64,
    pub medal_quantity: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Current on-hand stock per branch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockSummary {
    pub branch_code: String,
    #[serde(default)]
    pub branch_name: Option<String>,
    #[serde(alias = "certificate_stock")]
    pub certificates: u64,
    #[serde(alias = "medal_stock")]
    pub medals: u64,
    #[serde(default)]
    pub regional_hub: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockMigration {
    pub id: EntityId,
    #[serde(alias = "from_branch_code")]
    pub from_branch: String,
    #[serde(alias = "to_branch_code")]
    pub to_branch: String,
    pub certificate_quantity: u64,
    pub medal_quantity: u64,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationRequest {
    pub from_branch: String,
    pub to_branch: String,
    pub certificate_quantity: u64,
    pub medal_quantity: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// ── Activity logs ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: EntityId,
    #[serde(alias = "action_type")]
    pub action: String,
    #[serde(default)]
    pub entity_type: Option<String>,
    #[serde(alias = "message", default)]
    pub description: String,
    #[serde(default, alias = "username", alias = "user")]
    pub actor: Option<String>,
    #[serde(default)]
    pub branch_code: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Server-side filters for the paginated log endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogQuery {
    pub page: usize,
    pub limit: usize,
    pub search: Option<String>,
    pub action: Option<String>,
    pub branch_code: Option<String>,
}

impl LogQuery {
    pub(crate) fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.max(1).to_string()),
            ("limit", self.limit.max(1).to_string()),
        ];
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            params.push(("search", search.to_owned()));
        }
        if let Some(action) = self.action.as_deref().filter(|s| !s.is_empty()) {
            params.push(("action", action.to_owned()));
        }
        if let Some(branch) = self.branch_code.as_deref().filter(|s| !s.is_empty()) {
            params.push(("branch_code", branch.to_owned()));
        }
        params
    }
}

// ── Printing ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintRecord {
    pub id: EntityId,
    #[serde(default)]
    pub certificate_number: Option<String>,
    pub student_name: String,
    pub module_code: String,
    #[serde(default)]
    pub module_name: Option<String>,
    #[serde(default, alias = "teacher")]
    pub teacher_username: Option<String>,
    #[serde(default)]
    pub branch_code: Option<String>,
    #[serde(default, alias = "created_at")]
    pub printed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintRequest {
    pub module_code: String,
    pub student_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub print_date: Option<chrono::NaiveDate>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn entity_id_from_numeric_string() {
        assert_eq!(EntityId::from("42"), EntityId::Numeric(42));
    }

    #[test]
    fn entity_id_from_text() {
        let id: EntityId = "507f1f77bcf86cd799439011".parse().unwrap();
        assert_eq!(id.as_numeric(), None);
        assert_eq!(id.to_string(), "507f1f77bcf86cd799439011");
    }

    #[test]
    fn branch_accepts_alternate_field_names() {
        let branch: Branch = serde_json::from_value(json!({
            "id": 7,
            "branch_code": "SND",
            "branch_name": "Sunda",
            "is_head_branch": true,
            "regional_hub": "SND"
        }))
        .unwrap();
        assert_eq!(branch.code, "SND");
        assert!(branch.is_active);
        assert_eq!(branch.id, EntityId::Numeric(7));
    }

    #[test]
    fn branch_request_uses_backend_names() {
        let body = serde_json::to_value(BranchRequest {
            code: "SND".into(),
            name: "Sunda".into(),
            is_head_branch: true,
            regional_hub: "SND".into(),
            address: None,
            phone: None,
        })
        .unwrap();
        assert_eq!(body["branch_code"], "SND");
        assert!(body.get("address").is_none());
    }

    #[test]
    fn log_query_skips_empty_filters() {
        let query = LogQuery {
            page: 2,
            limit: 20,
            search: Some(String::new()),
            action: Some("CREATE".into()),
            branch_code: None,
        };
        assert_eq!(
            query.params(),
            vec![
                ("page", "2".to_owned()),
                ("limit", "20".to_owned()),
                ("action", "CREATE".to_owned()),
            ]
        );
    }
}
