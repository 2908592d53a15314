//! User record types as exchanged with the remote directory.
//!
//! The JSON shape follows the `/users` collection: a flat record with nested
//! `address` and `company` objects. Fields the application does not edit are
//! kept in `extra` maps so an update sends them back untouched.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Number of digits kept by [`normalize_phone`].
pub const PHONE_DIGITS: usize = 10;

/// Postal address of a user. Only street and city are edited here.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Employer of a user. The name is optional and never validated.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Company {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A user record persisted by the remote directory.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: Address,
    #[serde(default, deserialize_with = "null_as_default")]
    pub company: Company,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A user that has not been persisted yet, so it has no id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub company: Company,
}

impl UserDraft {
    /// Attach a server-assigned id.
    pub fn into_record(self, id: u64) -> UserRecord {
        UserRecord {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            website: self.website,
            address: self.address,
            company: self.company,
            extra: Map::new(),
        }
    }
}

impl UserRecord {
    /// Company name, or an empty string when none was given.
    pub fn company_name(&self) -> &str {
        self.company.name.as_deref().unwrap_or("")
    }

    /// "street, city" as shown in the details pane.
    pub fn address_line(&self) -> String {
        match (self.address.street.is_empty(), self.address.city.is_empty()) {
            (true, true) => String::new(),
            (false, true) => self.address.street.clone(),
            (true, false) => self.address.city.clone(),
            (false, false) => format!("{}, {}", self.address.street, self.address.city),
        }
    }
}

/// Strip every non-digit from a raw phone string and keep the first ten digits.
///
/// Shorter inputs are returned as they are; this never pads or rejects.
/// Validation of user-entered phones is a separate, stricter step
/// (see [`crate::validate`]).
pub fn normalize_phone(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_digit)
        .take(PHONE_DIGITS)
        .collect()
}

// The API may send `"company": null`; treat it like a missing object.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
