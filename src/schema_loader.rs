//! Embedded JSON Schemas for backend payloads.
//!
//! Payloads are checked against their schema before serde sees them, so a
//! response with the right envelope but the wrong nested shape is rejected as
//! a whole instead of producing a partially filled catalog.

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::sync::OnceLock;

const TOPICS_RESPONSE_SCHEMA: &str = include_str!("../schema/topics_response.schema.json");

/// A compiled schema plus the name used in error messages.
pub(crate) struct PayloadSchema {
    name: &'static str,
    compiled: JSONSchema,
}

impl PayloadSchema {
    /// Schema for the `GET /api/questions/topics` envelope, compiled on first use.
    pub(crate) fn topics_response() -> Result<&'static Self> {
        static TOPICS: OnceLock<Result<PayloadSchema, String>> = OnceLock::new();
        TOPICS
            .get_or_init(|| {
                Self::compile("topics_response", TOPICS_RESPONSE_SCHEMA)
                    .map_err(|err| format!("{err:#}"))
            })
            .as_ref()
            .map_err(|err| anyhow!("{err}"))
    }

    fn compile(name: &'static str, text: &str) -> Result<Self> {
        let raw: Value =
            serde_json::from_str(text).with_context(|| format!("parsing schema {name}"))?;
        let compiled =
            JSONSchema::compile(&raw).map_err(|err| anyhow!("compiling schema {name}: {err}"))?;
        Ok(Self { name, compiled })
    }

    /// Validate `instance`, joining every violation into one error.
    pub(crate) fn validate(&self, instance: &Value) -> Result<()> {
        if let Err(errors) = self.compiled.validate(instance) {
            let details = errors
                .map(|err| err.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            bail!("payload failed {} validation: {}", self.name, details);
        }
        Ok(())
    }
}
