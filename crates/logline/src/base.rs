//! Base fields attached to every record.
//!
//! # Design
//! - The process identity (`pid`, `hostname`) is looked up once and cached.
//! - `LOG_OMIT_FIELDS` names the fields to drop; by default both are dropped,
//!   which suits container platforms that attach their own identifiers.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::env::EnvSnapshot;
use crate::logfmt::Record;

/// Base field carrying the process id.
pub const FIELD_PID: &str = "pid";
/// Base field carrying the host name.
pub const FIELD_HOSTNAME: &str = "hostname";
/// Omission list used when `LOG_OMIT_FIELDS` is unset.
pub const DEFAULT_OMIT_FIELDS: &str = "pid,hostname";

const OMIT_NONE: &str = "none";

static PROCESS_IDENTITY: Lazy<ProcessIdentity> = Lazy::new(ProcessIdentity::detect);

struct ProcessIdentity {
    pid: u32,
    hostname: Option<String>,
}

impl ProcessIdentity {
    fn detect() -> Self {
        Self {
            pid: std::process::id(),
            hostname: hostname::get()
                .ok()
                .and_then(|name| name.into_string().ok()),
        }
    }
}

/// Which base fields are omitted from emitted records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseFields {
    omitted: BTreeSet<String>,
}

impl BaseFields {
    /// Omit the named fields; names are trimmed and lower-cased, blanks ignored.
    #[must_use]
    pub fn omitting<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let omitted = fields
            .into_iter()
            .map(|field| field.as_ref().trim().to_lowercase())
            .filter(|field| !field.is_empty())
            .collect();
        Self { omitted }
    }

    /// Whether `field` is emitted.
    #[must_use]
    pub fn includes(&self, field: &str) -> bool {
        !self.omitted.contains(field)
    }

    /// The omitted field names in sorted order.
    pub fn omitted(&self) -> impl Iterator<Item = &str> {
        self.omitted.iter().map(String::as_str)
    }

    /// Base entries for a record, in `pid`, `hostname` order.
    #[must_use]
    pub fn entries(&self) -> Record {
        let identity = &*PROCESS_IDENTITY;
        let mut entries = Record::new();
        if self.includes(FIELD_PID) {
            entries.insert(FIELD_PID.to_string(), Value::from(identity.pid));
        }
        if let Some(hostname) = identity
            .hostname
            .as_ref()
            .filter(|_| self.includes(FIELD_HOSTNAME))
        {
            entries.insert(FIELD_HOSTNAME.to_string(), Value::from(hostname.as_str()));
        }
        entries
    }
}

/// Resolve the base-field omission list from `LOG_OMIT_FIELDS`.
///
/// `none` or an empty value keeps every base field.
#[must_use]
pub fn resolve_base(env: &EnvSnapshot) -> BaseFields {
    let omit_fields = env.omit_fields().unwrap_or(DEFAULT_OMIT_FIELDS);
    if omit_fields == OMIT_NONE || omit_fields.is_empty() {
        return BaseFields::default();
    }
    BaseFields::omitting(omit_fields.split(','))
}
