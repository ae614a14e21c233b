use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::plan::PlanTier;

/// The signed-in user for this profile. At most one exists at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub plan: PlanTier,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Mints a new free-tier user. Falls back to the email's local part when
    /// no display name is given.
    pub fn new(email: &str, name: Option<&str>) -> Self {
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| email.split('@').next().unwrap_or(email).to_string());

        Self {
            id: Uuid::new_v4(),
            email: email.trim().to_string(),
            name,
            plan: PlanTier::Free,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_defaults_to_free_plan() {
        let user = User::new("ada@example.com", Some("Ada"));
        assert_eq!(user.plan, PlanTier::Free);
        assert_eq!(user.name, "Ada");
    }

    #[test]
    fn test_missing_name_uses_email_local_part() {
        let user = User::new("grace@example.com", None);
        assert_eq!(user.name, "grace");

        let blank = User::new("linus@example.com", Some("   "));
        assert_eq!(blank.name, "linus");
    }

    #[test]
    fn test_user_serializes_camel_case() {
        let user = User::new("ada@example.com", Some("Ada"));
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["plan"], "free");
    }
}
