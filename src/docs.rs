//! Generated OpenAPI document and a Swagger UI page that renders it.

use axum::response::Html;
use axum::{Json, Router, routing::get};
use utoipa::OpenApi;

use crate::api;
use crate::error::ErrorResponse;
use crate::models::{NewTodoRequest, Todo, UpdateTodoRequest};
use crate::state::AppState;

pub const OPENAPI_PATH: &str = "/swagger.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Todo API",
        description = "Create, list, retrieve, update and delete todo items."
    ),
    paths(
        api::list_todos,
        api::get_todo,
        api::create_todo,
        api::update_todo,
        api::delete_todo,
    ),
    components(schemas(Todo, NewTodoRequest, UpdateTodoRequest, ErrorResponse)),
    tags((name = "todos", description = "Todo items"))
)]
pub struct ApiDoc;

const SWAGGER_UI_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>Todo API - Swagger UI</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.onload = () => {
      window.ui = SwaggerUIBundle({ url: "/swagger.json", dom_id: "#swagger-ui" });
    };
  </script>
</body>
</html>
"##;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(OPENAPI_PATH, get(openapi_json))
        .route("/swagger", get(swagger_ui))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn swagger_ui() -> Html<&'static str> {
    Html(SWAGGER_UI_HTML)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_todo_operation() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = &doc["paths"];

        for method in ["get", "post"] {
            assert!(paths["/todos"][method].is_object(), "missing {method} /todos");
        }
        for method in ["get", "put", "delete"] {
            assert!(paths["/todos/{id}"][method].is_object(), "missing {method} /todos/{{id}}");
        }
        assert!(doc["components"]["schemas"]["Todo"].is_object());
    }

    #[test]
    fn ui_points_at_the_generated_document() {
        assert!(SWAGGER_UI_HTML.contains(OPENAPI_PATH));
        assert!(SWAGGER_UI_HTML.contains(r##"dom_id: "#swagger-ui""##));
        assert!(SWAGGER_UI_HTML.trim_end().ends_with("</html>"));
    }
}
