use serde::{Deserialize, Serialize};

/// One onboarded account as persisted in the sessions file.
///
/// `session` is the messaging-platform login session blob; it is only ever
/// handed to the launch-URL collaborator and never sent to the game backend.
/// Identity is the `(name, username)` pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    pub session: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_app_url: Option<String>,
}

impl Account {
    pub fn new(name: String, session: String, username: String) -> Self {
        Self {
            name,
            session,
            username,
            proxy: None,
            web_app_url: None,
        }
    }

    /// Log-line prefix, e.g. `@johndoe`.
    pub fn handle(&self) -> String {
        format!("@{}", self.username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_are_omitted_when_absent() {
        let account = Account::new("John".into(), "blob".into(), "johndoe".into());
        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("proxy"));
        assert!(!json.contains("web_app_url"));
    }

    #[test]
    fn legacy_records_without_new_fields_still_parse() {
        let json = r#"{"name":"John","session":"blob","username":"johndoe"}"#;
        let account: Account = serde_json::from_str(json).unwrap();
        assert_eq!(account.handle(), "@johndoe");
        assert!(account.proxy.is_none());
    }
}
