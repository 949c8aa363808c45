//! User record types and the data-equality rule

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Opaque, externally-assigned user identity
///
/// The identity is assigned by the remote source and never regenerated
/// locally. It is the sole key used to match a remote record to a local
/// record during a reconciliation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Validated email value
///
/// The only rule is structural: non-empty and containing an `@`. This is
/// intentionally permissive; the remote source owns the address quality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Parse an email value, failing closed on anything without an `@`
    pub fn parse(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.trim().is_empty() || !value.contains('@') {
            return Err(Error::domain(format!("invalid email: {value:?}")));
        }
        Ok(Self(value))
    }

    /// The underlying string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Flat remote user payload as handed to the engine
///
/// Wire-format details (the city nested under an address substructure)
/// are flattened by the remote source before the payload reaches the
/// core. Fields are unvalidated strings; validation happens when the
/// engine builds a [`UserRecord`] from this payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteUser {
    /// Externally-assigned identity
    pub id: i64,
    /// Username
    pub username: String,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// City, already flattened out of the wire address substructure
    pub city: String,
}

/// The user record under reconciliation
///
/// The identity is fixed at construction. The four data fields
/// (username, full name, email, city) are mutable only as a group via
/// [`UserRecord::with_data`], which returns a new value carrying the
/// same identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    id: UserId,
    username: String,
    full_name: String,
    email: Email,
    city: String,
}

impl UserRecord {
    /// Construct a record, failing closed on invalid data
    ///
    /// Empty username, full name, or city, and any email without an
    /// `@`, are rejected with [`Error::Domain`]. A record in such a
    /// state never reaches the comparison step.
    pub fn new(
        id: UserId,
        username: impl Into<String>,
        full_name: impl Into<String>,
        email: impl Into<String>,
        city: impl Into<String>,
    ) -> Result<Self> {
        let username = username.into();
        let full_name = full_name.into();
        let city = city.into();

        if username.trim().is_empty() {
            return Err(Error::domain("username cannot be empty"));
        }
        if full_name.trim().is_empty() {
            return Err(Error::domain("full name cannot be empty"));
        }
        if city.trim().is_empty() {
            return Err(Error::domain("city cannot be empty"));
        }

        Ok(Self {
            id,
            username,
            full_name,
            email: Email::parse(email)?,
            city,
        })
    }

    /// Build a domain record from a remote payload
    pub fn from_remote(remote: &RemoteUser) -> Result<Self> {
        Self::new(
            UserId(remote.id),
            remote.username.clone(),
            remote.name.clone(),
            remote.email.clone(),
            remote.city.clone(),
        )
    }

    /// The fixed identity
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Username
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Full name
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Email value
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// City
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Return a new record with the same identity and the other
    /// record's data fields
    ///
    /// This is the update path: the engine replaces the local record's
    /// data with the remote values while the identity stays fixed.
    pub fn with_data(&self, other: &UserRecord) -> Self {
        Self {
            id: self.id,
            username: other.username.clone(),
            full_name: other.full_name.clone(),
            email: other.email.clone(),
            city: other.city.clone(),
        }
    }

    /// Data-equality check used for the update-vs-skip decision
    ///
    /// Two records sharing an identity are data-equal iff username,
    /// full name, email value, and city are all equal by exact,
    /// case-sensitive string comparison. No normalization.
    pub fn data_matches(&self, other: &UserRecord) -> bool {
        self.username == other.username
            && self.full_name == other.full_name
            && self.email == other.email
            && self.city == other.city
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, email: &str) -> UserRecord {
        UserRecord::new(UserId(id), "john", "John Doe", email, "Colombo").unwrap()
    }

    #[test]
    fn valid_record_constructs() {
        let user = record(1, "john@x.com");
        assert_eq!(user.id(), UserId(1));
        assert_eq!(user.username(), "john");
        assert_eq!(user.email().as_str(), "john@x.com");
    }

    #[test]
    fn email_without_at_is_rejected() {
        let err = UserRecord::new(UserId(1), "john", "John Doe", "not-an-email", "Colombo")
            .unwrap_err();
        assert!(matches!(err, Error::Domain(_)));
    }

    #[test]
    fn empty_fields_are_rejected() {
        assert!(UserRecord::new(UserId(1), "", "John Doe", "j@x.com", "Colombo").is_err());
        assert!(UserRecord::new(UserId(1), "john", "  ", "j@x.com", "Colombo").is_err());
        assert!(UserRecord::new(UserId(1), "john", "John Doe", "j@x.com", "").is_err());
    }

    #[test]
    fn data_matches_is_exact_and_case_sensitive() {
        let a = record(1, "john@x.com");
        let b = record(1, "john@x.com");
        assert!(a.data_matches(&b));

        let c = record(1, "John@x.com");
        assert!(!a.data_matches(&c));
    }

    #[test]
    fn data_matches_ignores_identity() {
        let a = record(1, "john@x.com");
        let b = record(2, "john@x.com");
        assert!(a.data_matches(&b));
    }

    #[test]
    fn with_data_keeps_identity() {
        let local = record(1, "old@x.com");
        let remote = record(1, "new@x.com");
        let updated = local.with_data(&remote);
        assert_eq!(updated.id(), UserId(1));
        assert_eq!(updated.email().as_str(), "new@x.com");
        assert!(updated.data_matches(&remote));
    }

    #[test]
    fn from_remote_validates_the_payload() {
        let bad = RemoteUser {
            id: 7,
            username: "ann".into(),
            name: "Ann".into(),
            email: "no-at-sign".into(),
            city: "Kandy".into(),
        };
        assert!(UserRecord::from_remote(&bad).is_err());
    }
}
