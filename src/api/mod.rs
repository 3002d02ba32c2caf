mod handlers;

use std::sync::{Arc, Mutex};

use axum::{
    http::HeaderValue,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use handlers::{AnnotationInput, CellInput, TextInput};

use crate::db::Database;
use crate::editor::Editor;
use crate::error::{EditorError, EditorResult};

/// Shared server state.
///
/// The table is a single document with a single logical writer, so every edit
/// runs load-mutate-save under one lock.
#[derive(Clone)]
pub struct AppState {
    db: Database,
    edit_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            edit_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn read(&self) -> anyhow::Result<Editor> {
        let _guard = self.edit_lock.lock().expect("edit lock poisoned");
        Editor::load(&self.db)
    }

    /// Apply `f` to the stored table and persist the result.
    pub fn edit(&self, f: impl FnOnce(&mut Editor) -> EditorResult<()>) -> EditorResult<Editor> {
        let _guard = self.edit_lock.lock().expect("edit lock poisoned");
        let mut editor = Editor::load(&self.db)?;
        f(&mut editor)?;
        editor.save(&self.db).map_err(EditorError::Storage)?;
        Ok(editor)
    }
}

pub fn create_router(db: Database) -> Router {
    create_router_with_cors(db, None)
}

/// Build the API router. `cors_origins` restricts CORS to the given origins;
/// `None` allows any origin.
pub fn create_router_with_cors(db: Database, cors_origins: Option<Vec<String>>) -> Router {
    let api = Router::new()
        // Table
        .route("/table", get(handlers::get_table))
        .route("/table/reset", post(handlers::reset_all))
        .route("/table/reset/rows", post(handlers::reset_rows))
        .route("/table/reset/filters", post(handlers::reset_filters))
        // Columns
        .route("/columns", post(handlers::add_column))
        .route("/columns/{index}", delete(handlers::remove_column))
        .route("/columns/{index}/header", put(handlers::set_header))
        .route("/columns/{index}/enums", put(handlers::set_enums))
        // Filters
        .route("/filters/{index}", put(handlers::set_filter))
        .route("/filters/{index}", delete(handlers::clear_filter))
        .route("/filters/{index}/cell", put(handlers::set_filter_by_cell))
        // Rows
        .route("/rows/annotation", put(handlers::set_annotation))
        // Export
        .route("/filename", put(handlers::set_filename))
        .route("/export.csv", get(handlers::export_csv))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
        .with_state(AppState::new(db))
}

fn cors_layer(origins: Option<Vec<String>>) -> CorsLayer {
    let Some(origins) = origins else {
        return CorsLayer::permissive();
    };

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(Any)
}
