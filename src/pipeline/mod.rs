//! Query pipeline - parse, retrieve, render
//!
//! Every query runs independently through:
//!
//! ```text
//! PARSED ─┬─ greeting/thanks/farewell ──────────────► DONE (canned reply)
//!         ├─ unknown ──► fallback model ─────────────► DONE
//!         └─ task intent ──► RETRIEVE ──► RENDER ────► DONE
//! ```
//!
//! All exits produce one [`ResponseEnvelope`]; nothing here returns an error.

pub mod payload;
pub mod renderer;
pub mod retriever;

pub use payload::DataPayload;
pub use renderer::{ResponseRenderer, Template, TemplateError};
pub use retriever::{RetrievalError, RetrieveFn};

use serde::Serialize;
use tracing::{debug, error, warn};

use crate::core::store::RecordStore;
use crate::fallback::FallbackModel;
use crate::nlu::{EntitySet, Intent, NluService};

pub const GREETING_MESSAGE: &str = "👋 Hello! How can I help you today?";
pub const THANKS_MESSAGE: &str = "😊 You're welcome! Let me know if you need anything else.";
pub const FAREWELL_MESSAGE: &str = "👋 Goodbye! Have a great day!";
pub const APOLOGY_MESSAGE: &str = "Sorry, I couldn't understand your question. Please try again.";
pub const NO_DATA_MESSAGE: &str = "No data found. Please check the batch code or status.";
pub const MISSING_BATCH_CODE_MESSAGE: &str =
    "Please specify a batch code (for example VDT-052025-A).";
pub const MISSING_STATUS_MESSAGE: &str =
    "Please specify a valid status like 'manufactured', 'in transit', or 'delivered'.";
pub const RENDER_FAILURE_MESSAGE: &str =
    "Sorry, something went wrong while generating the response.";

/// Prompt wrapped around unrecognized queries for the fallback model
pub fn fallback_prompt(query: &str) -> String {
    format!(
        "You are an ERP assistant. Try to respond clearly or casually.\n\nUser Query: {}",
        query
    )
}

/// The externally visible result of one query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseEnvelope {
    pub success: bool,
    pub message: String,
    pub intent: Intent,
    pub entities: EntitySet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<DataPayload>,
}

impl ResponseEnvelope {
    fn new(success: bool, message: impl Into<String>, intent: Intent, entities: EntitySet) -> Self {
        Self {
            success,
            message: message.into(),
            intent,
            entities,
            data: None,
        }
    }
}

/// How an intent is answered
#[derive(Clone, Copy)]
enum Route {
    Canned(&'static str),
    Fallback,
    Lookup {
        retrieve: RetrieveFn,
        template: Template,
    },
}

impl Route {
    fn for_intent(intent: Intent) -> Self {
        match intent {
            Intent::Greeting => Route::Canned(GREETING_MESSAGE),
            Intent::Thanks => Route::Canned(THANKS_MESSAGE),
            Intent::Farewell => Route::Canned(FAREWELL_MESSAGE),
            Intent::Unknown => Route::Fallback,
            Intent::BatchLocation => Route::Lookup {
                retrieve: retriever::current_tracking,
                template: Template::BatchLocation,
            },
            Intent::BatchHandler => Route::Lookup {
                retrieve: retriever::current_tracking,
                template: Template::BatchHandler,
            },
            Intent::BatchHistory => Route::Lookup {
                retrieve: retriever::batch_history,
                template: Template::BatchHistory,
            },
            Intent::BatchesByStatus => Route::Lookup {
                retrieve: retriever::batches_by_status,
                template: Template::BatchesByStatus,
            },
            Intent::BatchInfo => Route::Lookup {
                retrieve: retriever::batch_info,
                template: Template::BatchInfo,
            },
            Intent::BatchChart => Route::Lookup {
                retrieve: retriever::batch_chart,
                template: Template::BatchChart,
            },
        }
    }
}

/// Orchestrates NLU, retrieval, rendering and the fallback model
///
/// Holds no per-query state; `process` only borrows `self`.
pub struct Pipeline<S, M> {
    nlu: NluService,
    renderer: ResponseRenderer,
    store: S,
    model: M,
}

impl<S: RecordStore, M: FallbackModel> Pipeline<S, M> {
    pub fn new(store: S, model: M) -> Result<Self, TemplateError> {
        Ok(Self {
            nlu: NluService::new(),
            renderer: ResponseRenderer::new()?,
            store,
            model,
        })
    }

    /// Answer one query
    pub fn process(&self, query: &str) -> ResponseEnvelope {
        let parsed = self.nlu.parse(query);
        debug!(
            intent = %parsed.intent,
            batch_code = ?parsed.entities.batch_code,
            status = ?parsed.entities.status,
            "parsed query"
        );

        let intent = parsed.intent;
        let entities = parsed.entities;

        match Route::for_intent(intent) {
            Route::Canned(message) => ResponseEnvelope::new(true, message, intent, entities),
            Route::Fallback => {
                let message = self.ask_fallback(&parsed.original_query);
                ResponseEnvelope::new(true, message, intent, entities)
            }
            Route::Lookup { retrieve, template } => {
                self.lookup(intent, entities, retrieve, template)
            }
        }
    }

    fn ask_fallback(&self, query: &str) -> String {
        match self.model.generate(&fallback_prompt(query)) {
            Ok(reply) if !reply.trim().is_empty() => reply.trim().to_string(),
            Ok(_) => {
                warn!("fallback model returned an empty reply");
                APOLOGY_MESSAGE.to_string()
            }
            Err(e) => {
                warn!(error = %e, "fallback model failed");
                APOLOGY_MESSAGE.to_string()
            }
        }
    }

    fn lookup(
        &self,
        intent: Intent,
        entities: EntitySet,
        retrieve: RetrieveFn,
        template: Template,
    ) -> ResponseEnvelope {
        let data = match retrieve(&self.store, &entities) {
            Ok(Some(data)) => data,
            Ok(None) => {
                debug!(%intent, "no matching record");
                return ResponseEnvelope::new(false, NO_DATA_MESSAGE, intent, entities);
            }
            Err(RetrievalError::MissingEntity(name)) => {
                debug!(%intent, entity = name, "query is missing an entity");
                let message = match name {
                    "status" => MISSING_STATUS_MESSAGE,
                    _ => MISSING_BATCH_CODE_MESSAGE,
                };
                return ResponseEnvelope::new(false, message, intent, entities);
            }
            Err(RetrievalError::Store(e)) => {
                warn!(%intent, error = %e, "record store lookup failed");
                return ResponseEnvelope::new(false, NO_DATA_MESSAGE, intent, entities);
            }
        };

        match self.renderer.render(template, &data) {
            Ok(message) => ResponseEnvelope {
                success: true,
                message,
                intent,
                entities,
                data: Some(data),
            },
            Err(e @ TemplateError::MissingField(_)) => {
                error!(%intent, error = %e, "template field missing");
                ResponseEnvelope {
                    success: false,
                    message: e.to_string(),
                    intent,
                    entities,
                    data: Some(data),
                }
            }
            Err(e) => {
                error!(%intent, error = %e, "template rendering failed");
                ResponseEnvelope::new(false, RENDER_FAILURE_MESSAGE, intent, entities)
            }
        }
    }
}
