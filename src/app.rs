use std::net::SocketAddr;

use axum::{routing::get, Json, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::{auth, todos};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/auth", auth::router())
        .nest("/api/todos", todos::router())
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    // `status` is filled in by on_response; it must be declared
                    // here or the later record is silently dropped.
                    tracing::info_span!(
                        "http_request",
                        %method,
                        uri = %uri,
                        status = tracing::field::Empty
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    };

    use axum::{body::Body, http::Request};
    use tower::ServiceExt;
    use tracing::field::{Field, Visit};
    use tracing::instrument::WithSubscriber;
    use tracing_subscriber::{layer::SubscriberExt, Layer};

    use super::build_app;
    use crate::state::AppState;

    /// Flips to true when any span records a `status` value. Records to
    /// undeclared fields never reach `on_record`, so this only observes
    /// fields the span macro actually declared.
    #[derive(Clone, Default)]
    struct StatusRecorded(Arc<AtomicBool>);

    impl<S> Layer<S> for StatusRecorded
    where
        S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    {
        fn on_record(
            &self,
            _id: &tracing::span::Id,
            values: &tracing::span::Record<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            struct SeenStatus<'a>(&'a AtomicBool);
            impl Visit for SeenStatus<'_> {
                fn record_debug(&mut self, field: &Field, _: &dyn std::fmt::Debug) {
                    if field.name() == "status" {
                        self.0.store(true, Ordering::SeqCst);
                    }
                }
            }
            values.record(&mut SeenStatus(&self.0));
        }
    }

    #[tokio::test]
    async fn response_status_lands_on_the_request_span() {
        let seen = StatusRecorded::default();
        let subscriber = tracing_subscriber::registry().with(seen.clone());

        let app = build_app(AppState::fake());
        let response = async {
            app.oneshot(Request::get("/health").body(Body::empty()).unwrap())
                .await
                .unwrap()
        }
        .with_subscriber(subscriber)
        .await;

        assert!(response.status().is_success());
        assert!(
            seen.0.load(Ordering::SeqCst),
            "http_request span never recorded a status field"
        );
    }
}

pub async fn serve(app: Router, port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        port
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
