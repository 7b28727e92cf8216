//! Student record, its write input and its stored document form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::timestamp::{self, iso_millis};

/// A student record as returned to callers.
///
/// Text fields and `age` are optional because stored documents may lack them;
/// timestamps are always present after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// Opaque stable identifier
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
    pub address: Option<String>,
    /// Server-assigned on insert
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
    /// Server-assigned on every write, never earlier than `created_at`
    #[serde(with = "iso_millis")]
    pub updated_at: DateTime<Utc>,
}

impl Student {
    /// Returns a builder with `created_at == updated_at == now`.
    #[must_use]
    pub fn builder(id: impl Into<String>) -> StudentBuilder {
        StudentBuilder::new(id.into())
    }
}

/// Builder for constructing [`Student`] instances.
#[derive(Debug, Clone)]
pub struct StudentBuilder {
    id: String,
    name: Option<String>,
    email: Option<String>,
    age: Option<i32>,
    address: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl StudentBuilder {
    fn new(id: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: None,
            email: None,
            age: None,
            address: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn age(mut self, age: i32) -> Self {
        self.age = Some(age);
        self
    }

    #[must_use]
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    #[must_use]
    pub fn created_at(mut self, ts: DateTime<Utc>) -> Self {
        self.created_at = ts;
        if self.updated_at < ts {
            self.updated_at = ts;
        }
        self
    }

    #[must_use]
    pub fn updated_at(mut self, ts: DateTime<Utc>) -> Self {
        self.updated_at = ts;
        self
    }

    #[must_use]
    pub fn build(self) -> Student {
        Student {
            id: self.id,
            name: self.name,
            email: self.email,
            age: self.age,
            address: self.address,
            created_at: self.created_at,
            updated_at: self.updated_at.max(self.created_at),
        }
    }
}

/// Write input for `createStudent` / `updateStudent`.
///
/// On create every field is required; on update absent fields keep their
/// stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStudent {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
    pub address: Option<String>,
}

impl NewStudent {
    /// Checks that every field is present and text fields are not blank.
    pub fn validate_for_create(&self) -> Result<(), CoreError> {
        let mut missing = Vec::new();
        for (field, value) in self.text_fields() {
            if value.is_none_or(|v| v.trim().is_empty()) {
                missing.push(field);
            }
        }
        if self.age.is_none() {
            missing.push("age");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(CoreError::InvalidInput(format!("{} required", missing.join(", "))))
        }
    }

    /// Checks that provided text fields are not blank.
    pub fn validate_for_update(&self) -> Result<(), CoreError> {
        let blank: Vec<&str> = self
            .text_fields()
            .into_iter()
            .filter(|(_, value)| value.is_some_and(|v| v.trim().is_empty()))
            .map(|(field, _)| field)
            .collect();
        if blank.is_empty() {
            Ok(())
        } else {
            Err(CoreError::InvalidInput(format!("{} must not be empty", blank.join(", "))))
        }
    }

    fn text_fields(&self) -> [(&'static str, Option<&str>); 3] {
        [
            ("name", self.name.as_deref()),
            ("email", self.email.as_deref()),
            ("address", self.address.as_deref()),
        ]
    }
}

/// Stored document shape, keyed like the API (`createdAt`, `updatedAt`).
///
/// Timestamps are kept as raw JSON so a malformed value never prevents the
/// rest of the document from loading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Value>,
}

impl StudentDocument {
    /// Document for a freshly created record: both timestamps set to `now`.
    #[must_use]
    pub fn new(input: &NewStudent, now: DateTime<Utc>) -> Self {
        let stamp = Value::String(timestamp::to_iso(&now));
        Self {
            name: input.name.clone(),
            email: input.email.clone(),
            age: input.age,
            address: input.address.clone(),
            created_at: Some(stamp.clone()),
            updated_at: Some(stamp),
        }
    }

    /// Overwrites the provided fields and bumps `updatedAt`.
    pub fn apply_update(&mut self, input: &NewStudent, now: DateTime<Utc>) {
        if let Some(name) = &input.name {
            self.name = Some(name.clone());
        }
        if let Some(email) = &input.email {
            self.email = Some(email.clone());
        }
        if let Some(age) = input.age {
            self.age = Some(age);
        }
        if let Some(address) = &input.address {
            self.address = Some(address.clone());
        }
        let created = self.created_at.as_ref().and_then(timestamp::from_json);
        let updated = created.map_or(now, |c| now.max(c));
        self.updated_at = Some(Value::String(timestamp::to_iso(&updated)));
    }

    /// Converts into the API record, normalizing timestamps.
    #[must_use]
    pub fn into_student(self, id: String, now: DateTime<Utc>) -> Student {
        let created_at = timestamp::normalize(self.created_at.as_ref(), "createdAt", now);
        let mut updated_at = timestamp::normalize(self.updated_at.as_ref(), "updatedAt", now);
        if updated_at < created_at {
            tracing::warn!(%id, "updatedAt earlier than createdAt in document, clamping");
            updated_at = created_at;
        }
        Student {
            id,
            name: self.name,
            email: self.email,
            age: self.age,
            address: self.address,
            created_at,
            updated_at,
        }
    }
}
