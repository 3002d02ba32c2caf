use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::error::{EditorError, EditorResult};
use crate::editor::Editor;
use crate::engine::CSV_MEDIA_TYPE;
use crate::models::*;

type ApiResult<T> = Result<T, (StatusCode, String)>;

// ============================================================
// Request bodies
// ============================================================

/// Text typed into an editable cell (header, enums, filter, filename).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextInput {
    pub text: String,
}

/// A cell value picked as a column filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellInput {
    pub value: String,
}

/// An edit to the `when` or `then` text of a generated row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationInput {
    pub row: Vec<String>,
    pub field: AnnotationField,
    pub text: String,
}

// ============================================================
// Error Handling
// ============================================================

/// Map an editor error to a response. Storage failures are logged in full and
/// reported to the client without details.
fn editor_error(e: EditorError) -> (StatusCode, String) {
    match e {
        EditorError::ColumnOutOfRange { .. } => {
            tracing::warn!("Validation error: {}", e);
            (StatusCode::NOT_FOUND, e.to_string())
        }
        EditorError::UnknownRow(_) | EditorError::TooManyRows { .. } => {
            tracing::warn!("Validation error: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string())
        }
        EditorError::Storage(e) => internal_error(e),
    }
}

fn internal_error(e: impl std::fmt::Display) -> (StatusCode, String) {
    tracing::error!("Internal error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

fn respond(result: EditorResult<Editor>) -> ApiResult<Json<TableView>> {
    result.map(|editor| Json(editor.view())).map_err(editor_error)
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Table
// ============================================================

pub async fn get_table(State(state): State<AppState>) -> ApiResult<Json<TableView>> {
    state
        .read()
        .map(|editor| Json(editor.view()))
        .map_err(internal_error)
}

pub async fn reset_all(State(state): State<AppState>) -> ApiResult<Json<TableView>> {
    respond(state.edit(|editor| {
        editor.reset_all();
        Ok(())
    }))
}

pub async fn reset_rows(State(state): State<AppState>) -> ApiResult<Json<TableView>> {
    respond(state.edit(|editor| {
        editor.reset_rows();
        Ok(())
    }))
}

pub async fn reset_filters(State(state): State<AppState>) -> ApiResult<Json<TableView>> {
    respond(state.edit(|editor| {
        editor.reset_filters();
        Ok(())
    }))
}

// ============================================================
// Columns
// ============================================================

pub async fn add_column(
    State(state): State<AppState>,
) -> ApiResult<(StatusCode, Json<TableView>)> {
    respond(state.edit(|editor| editor.add_column()))
    .map(|view| (StatusCode::CREATED, view))
}

pub async fn remove_column(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> ApiResult<Json<TableView>> {
    respond(state.edit(|editor| editor.remove_column(index)))
}

pub async fn set_header(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(input): Json<TextInput>,
) -> ApiResult<Json<TableView>> {
    respond(state.edit(|editor| editor.set_header(index, &input.text)))
}

pub async fn set_enums(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(input): Json<TextInput>,
) -> ApiResult<Json<TableView>> {
    respond(state.edit(|editor| editor.set_enums(index, &input.text)))
}

// ============================================================
// Filters
// ============================================================

pub async fn set_filter(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(input): Json<TextInput>,
) -> ApiResult<Json<TableView>> {
    respond(state.edit(|editor| editor.set_filter(index, &input.text)))
}

pub async fn set_filter_by_cell(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(input): Json<CellInput>,
) -> ApiResult<Json<TableView>> {
    respond(state.edit(|editor| editor.set_filter_by_cell(index, &input.value)))
}

pub async fn clear_filter(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> ApiResult<Json<TableView>> {
    respond(state.edit(|editor| editor.clear_filter(index)))
}

// ============================================================
// Rows
// ============================================================

pub async fn set_annotation(
    State(state): State<AppState>,
    Json(input): Json<AnnotationInput>,
) -> ApiResult<Json<TableView>> {
    respond(state.edit(|editor| editor.set_annotation(&input.row, input.field, &input.text)))
}

// ============================================================
// Export
// ============================================================

pub async fn set_filename(
    State(state): State<AppState>,
    Json(input): Json<TextInput>,
) -> ApiResult<Json<TableView>> {
    respond(state.edit(|editor| {
        editor.set_filename(&input.text);
        Ok(())
    }))
}

/// The full CSV as a download, named after the stored filename.
pub async fn export_csv(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let editor = state.read().map_err(internal_error)?;
    let filename = match editor.filename() {
        "" => DEFAULT_FILENAME.to_string(),
        name => header_safe(name),
    };
    tracing::info!("Exporting {}", filename);

    Ok((
        [
            (
                header::CONTENT_TYPE,
                format!("{}; charset=utf-8", CSV_MEDIA_TYPE),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        editor.to_csv(),
    ))
}

/// Header values must be visible ASCII; anything else becomes `_`.
fn header_safe(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_graphic() && c != '"' || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
