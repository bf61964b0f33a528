use std::error::Error as _;

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use engine::{EngineError, FieldIssue};

use serde::Serialize;
pub use server::{ServerState, router, run, run_with_listener};

mod analytics;
mod budgets;
mod categories;
mod server;
mod transactions;

pub enum ServerError {
    Engine(EngineError),
    /// The request could not be extracted (bad JSON, query string or path).
    Rejected {
        status: StatusCode,
        message: String,
        fields: Vec<FieldIssue>,
    },
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    fields: Vec<FieldIssue>,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound { .. } => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_)
        | EngineError::CategoryInUse { .. }
        | EngineError::CategoryHasBudgets { .. } => StatusCode::CONFLICT,
        EngineError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn body_for_engine_error(err: EngineError) -> ErrorBody {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            ErrorBody {
                error: "internal server error".to_string(),
                fields: Vec::new(),
            }
        }
        other => ErrorBody {
            error: other.to_string(),
            fields: other.fields().to_vec(),
        },
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), body_for_engine_error(err)),
            ServerError::Rejected {
                status,
                message,
                fields,
            } => (
                status,
                ErrorBody {
                    error: message,
                    fields,
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

/// The field a JSON body failed on, e.g. `amount` for `"1.005"`. Errors at
/// the document root (syntax, missing fields) name no field.
fn rejected_json_field(rejection: &JsonRejection) -> Option<FieldIssue> {
    let JsonRejection::JsonDataError(err) = rejection else {
        return None;
    };
    let mut cause = err.source();
    while let Some(current) = cause {
        if let Some(path_err) =
            current.downcast_ref::<serde_path_to_error::Error<serde_json::Error>>()
        {
            let field = path_err.path().to_string();
            return (field != ".").then(|| FieldIssue::new(field, path_err.inner().to_string()));
        }
        cause = current.source();
    }
    None
}

impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        Self::Rejected {
            status: value.status(),
            fields: rejected_json_field(&value).into_iter().collect(),
            message: value.body_text(),
        }
    }
}

impl From<QueryRejection> for ServerError {
    fn from(value: QueryRejection) -> Self {
        Self::Rejected {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: value.body_text(),
            fields: Vec::new(),
        }
    }
}

impl From<PathRejection> for ServerError {
    fn from(value: PathRejection) -> Self {
        Self::Rejected {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: value.body_text(),
            fields: Vec::new(),
        }
    }
}
