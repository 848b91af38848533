//! Parsed resource references (ARNs).
//!
//! An ARN has the shape `arn:<partition>:<service>:<region>:<account>:<resource>`
//! where `<resource>` is either `type:name`, `type/name` or a bare name. For
//! RDS cluster snapshots the name itself contains a colon
//! (`cluster-snapshot:rds:mydb-2024-06-26-03-09`), so only the first separator
//! after the resource type is significant.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EventError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceReference {
    raw: String,
    region: String,
    account: String,
    resource_name: String,
}

impl ResourceReference {
    pub fn parse(raw: &str) -> Result<Self, EventError> {
        let invalid = |reason: &str| EventError::InvalidArn {
            arn: raw.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = raw.trim();
        let parts: Vec<&str> = trimmed.splitn(6, ':').collect();
        if parts.len() != 6 {
            return Err(invalid("expected 6 colon-separated parts"));
        }
        if parts[0] != "arn" {
            return Err(invalid("must start with \"arn:\""));
        }
        if parts[1].is_empty() {
            return Err(invalid("empty partition"));
        }
        if parts[2].is_empty() {
            return Err(invalid("empty service"));
        }

        let resource = parts[5];
        let (resource_type, resource_name) = match resource.find([':', '/']) {
            Some(idx) => (Some(&resource[..idx]), &resource[idx + 1..]),
            None => (None, resource),
        };
        if resource_name.is_empty() {
            return Err(invalid("empty resource name"));
        }
        if resource_type.is_some_and(str::is_empty) {
            return Err(invalid("empty resource type"));
        }

        Ok(Self {
            raw: trimmed.to_string(),
            region: parts[3].to_string(),
            account: parts[4].to_string(),
            resource_name: resource_name.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    /// The resource's own name: everything after the resource type.
    ///
    /// For snapshots this is the human-meaningful snapshot identifier
    /// (`rds:mydb-2024-06-26-03-09`).
    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }
}

impl fmt::Display for ResourceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for ResourceReference {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ResourceReference {
    type Error = EventError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ResourceReference> for String {
    fn from(value: ResourceReference) -> Self {
        value.raw
    }
}
