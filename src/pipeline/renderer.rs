//! Response rendering using embedded Tera templates
//!
//! Templates are filled from the serialized payload object, so a payload
//! that lacks a field its template needs is reported by name instead of
//! producing a half-filled message.

use rust_embed::Embed;
use serde_json::{Map, Value};
use tera::Tera;
use thiserror::Error;

use crate::core::store::parse_timestamp;
use crate::nlu::Intent;

use super::payload::{DataPayload, DISPLAY_TIMESTAMP_FORMAT, UNKNOWN};

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Missing data field in template: {0}")]
    MissingField(String),

    #[error("Template rendering error: {0}")]
    RenderError(String),
}

/// One response template per task intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    BatchLocation,
    BatchHandler,
    BatchHistory,
    BatchesByStatus,
    BatchInfo,
    BatchChart,
}

impl Template {
    pub fn for_intent(intent: Intent) -> Option<Self> {
        match intent {
            Intent::BatchLocation => Some(Template::BatchLocation),
            Intent::BatchHandler => Some(Template::BatchHandler),
            Intent::BatchHistory => Some(Template::BatchHistory),
            Intent::BatchesByStatus => Some(Template::BatchesByStatus),
            Intent::BatchInfo => Some(Template::BatchInfo),
            Intent::BatchChart => Some(Template::BatchChart),
            Intent::Greeting | Intent::Thanks | Intent::Farewell | Intent::Unknown => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Template::BatchLocation => "batch_location.txt.tera",
            Template::BatchHandler => "batch_handler.txt.tera",
            Template::BatchHistory => "batch_history.txt.tera",
            Template::BatchesByStatus => "batches_by_status.txt.tera",
            Template::BatchInfo => "batch_info.txt.tera",
            Template::BatchChart => "batch_chart.txt.tera",
        }
    }

    /// Payload fields that must be present
    fn required_fields(&self) -> &'static [&'static str] {
        match self {
            Template::BatchLocation => &["batch_code", "location", "status", "timestamp"],
            Template::BatchHandler => &["batch_code", "status", "location"],
            Template::BatchHistory => &["batch_code", "history"],
            Template::BatchesByStatus => &["status", "batches"],
            Template::BatchInfo => &[
                "batch_code",
                "product_name",
                "quantity",
                "manufactured_date",
                "status",
                "location",
            ],
            Template::BatchChart => &["batch_code"],
        }
    }

    /// Payload fields that render as "Unknown" when absent
    fn optional_fields(&self) -> &'static [&'static str] {
        match self {
            Template::BatchLocation | Template::BatchHandler => &["handler"],
            _ => &[],
        }
    }
}

/// Render a scalar for display; null and empty strings become "Unknown"
fn display(value: &Value) -> String {
    match value {
        Value::Null => UNKNOWN.to_string(),
        Value::String(s) if s.trim().is_empty() => UNKNOWN.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn display_timestamp(value: &Value) -> String {
    value
        .as_str()
        .and_then(parse_timestamp)
        .map(|ts| ts.format(DISPLAY_TIMESTAMP_FORMAT).to_string())
        .unwrap_or_else(|| display(value))
}

fn field<'a>(obj: &'a Map<String, Value>, name: &str) -> Result<&'a Value, TemplateError> {
    obj.get(name)
        .ok_or_else(|| TemplateError::MissingField(name.to_string()))
}

fn optional(obj: &Map<String, Value>, name: &str) -> String {
    obj.get(name).map(display).unwrap_or_else(|| UNKNOWN.to_string())
}

/// Build bullet lines from a list field, or `empty` when the list is empty
fn bullet_list(
    value: &Value,
    list_name: &str,
    empty: &str,
    line: impl Fn(&Map<String, Value>) -> Result<String, TemplateError>,
) -> Result<String, TemplateError> {
    let entries = value
        .as_array()
        .ok_or_else(|| TemplateError::MissingField(list_name.to_string()))?;

    if entries.is_empty() {
        return Ok(empty.to_string());
    }

    let lines = entries
        .iter()
        .map(|entry| {
            let obj = entry
                .as_object()
                .ok_or_else(|| TemplateError::MissingField(list_name.to_string()))?;
            line(obj).map(|text| format!("• {}", text))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(lines.join("\n"))
}

/// Renders data payloads into user-facing text
///
/// Built once; rendering borrows it immutably.
pub struct ResponseRenderer {
    tera: Tera,
}

impl ResponseRenderer {
    /// Create a renderer with the embedded templates
    pub fn new() -> Result<Self, TemplateError> {
        let mut tera = Tera::default();

        for file in EmbeddedTemplates::iter() {
            let filename = file.as_ref();
            if let Some(content) = EmbeddedTemplates::get(filename) {
                if let Ok(template_str) = std::str::from_utf8(&content.data) {
                    tera.add_raw_template(filename, template_str)
                        .map_err(|e| TemplateError::RenderError(e.to_string()))?;
                }
            }
        }

        Ok(Self { tera })
    }

    /// Render a typed payload with the given template
    pub fn render(&self, template: Template, payload: &DataPayload) -> Result<String, TemplateError> {
        let value =
            serde_json::to_value(payload).map_err(|e| TemplateError::RenderError(e.to_string()))?;
        self.render_value(template, &value)
    }

    /// Render an arbitrary payload object with the given template
    pub fn render_value(&self, template: Template, data: &Value) -> Result<String, TemplateError> {
        let required = template.required_fields();
        let obj = data.as_object().ok_or_else(|| {
            TemplateError::MissingField(required.first().copied().unwrap_or("data").to_string())
        })?;

        let mut context = tera::Context::new();
        for name in required {
            context.insert(*name, &display(field(obj, name)?));
        }
        for name in template.optional_fields() {
            context.insert(*name, &optional(obj, name));
        }

        match template {
            Template::BatchLocation => {
                context.insert("timestamp", &display_timestamp(field(obj, "timestamp")?));
            }
            Template::BatchHistory => {
                let history = bullet_list(
                    field(obj, "history")?,
                    "history",
                    "No tracking records found.",
                    |event| {
                        Ok(format!(
                            "{} - {} at {} (Handler: {})",
                            display_timestamp(field(event, "timestamp")?),
                            display(field(event, "status")?),
                            display(field(event, "location")?),
                            optional(event, "handler"),
                        ))
                    },
                )?;
                context.insert("history", &history);
            }
            Template::BatchesByStatus => {
                let batch_list = bullet_list(
                    field(obj, "batches")?,
                    "batches",
                    "No batches found.",
                    |batch| {
                        Ok(format!(
                            "{} - {} @ {} (Handler: {})",
                            display(field(batch, "batch_code")?),
                            optional(batch, "product_name"),
                            display(field(batch, "location")?),
                            optional(batch, "handler"),
                        ))
                    },
                )?;
                context.insert("batch_list", &batch_list);
            }
            Template::BatchHandler | Template::BatchInfo | Template::BatchChart => {}
        }

        if !self.tera.get_template_names().any(|n| n == template.name()) {
            return Err(TemplateError::NotFound(template.name().to_string()));
        }

        self.tera
            .render(template.name(), &context)
            .map(|text| text.trim().to_string())
            .map_err(|e| TemplateError::RenderError(e.to_string()))
    }
}
