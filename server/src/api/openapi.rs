//! OpenAPI specification and Swagger UI

use axum::http::header;
use axum::response::{Html, IntoResponse, Json};
use utoipa::OpenApi;

use crate::api::routes::{customers, filters, health, movies, revenue};
use crate::data::TicketRecord;
use crate::data::query::{GroupTotal, RepeatCustomerStats};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Marquee API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Cinema ticket-sales reporting"
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "filters", description = "Filtered record listing"),
        (name = "movies", description = "Movie revenue aggregations"),
        (name = "customers", description = "Customer aggregations"),
        (name = "revenue", description = "Revenue time series")
    ),
    paths(
        health::health,
        filters::filter_data,
        movies::top_movies,
        customers::top_customers,
        customers::repeat_customers,
        revenue::daily_revenue,
    ),
    components(schemas(
        health::HealthResponse,
        TicketRecord,
        GroupTotal,
        RepeatCustomerStats,
    ))
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
pub async fn openapi_json() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        Json(ApiDoc::openapi()),
    )
}

/// Serve Swagger UI from CDN
pub async fn swagger_ui_html() -> Html<&'static str> {
    Html(SWAGGER_UI_HTML)
}

const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Marquee API Documentation</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
    <style>
        html { box-sizing: border-box; overflow-y: scroll; }
        *, *:before, *:after { box-sizing: inherit; }
        body { margin: 0; background: #fafafa; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = () => {
            window.ui = SwaggerUIBundle({
                url: "/api/openapi.json",
                dom_id: '#swagger-ui',
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout",
                deepLinking: true,
                showExtensions: true,
                showCommonExtensions: true
            });
        };
    </script>
</body>
</html>"#;
