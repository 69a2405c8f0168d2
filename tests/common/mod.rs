use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Extension, Router,
};
use chrono::Utc;
use http_body_util::BodyExt;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

use rentora_api::{
    auth::{consts as perm, roles, AuthConfig, AuthService},
    config::AppConfig,
    db::{self, DbConfig},
    entities::property,
    events::{self, EventSender},
    handlers::AppServices,
    AppState,
};

const TEST_JWT_SECRET: &str = "integration_test_secret_key_0123456789abcdef";

/// Helper harness spinning up the full router over an in-memory SQLite
/// database. One instance per test; state never leaks between tests.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    auth_service: Arc<AuthService>,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            TEST_JWT_SECRET.to_string(),
            3600,
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.auto_migrate = true;
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        // A single connection keeps every query on the same in-memory database
        let db_config = DbConfig {
            url: cfg.database_url.clone(),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(600),
            acquire_timeout: Duration::from_secs(5),
        };
        let pool = db::establish_connection_with_config(&db_config)
            .await
            .expect("failed to create test database");

        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);

        let (event_tx, event_rx) = mpsc::channel(64);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let auth_service = Arc::new(AuthService::new(AuthConfig::from_app_config(&cfg)));
        let services = AppServices::new(db_arc.clone(), Arc::new(event_sender.clone()), &cfg);

        let state = AppState {
            db: db_arc,
            config: cfg,
            event_sender,
            services,
        };

        let router = Router::new()
            .nest("/api/v1", rentora_api::api_v1_routes())
            .layer(Extension(auth_service.clone()))
            .with_state(state.clone());

        Self {
            router,
            state,
            auth_service,
            _event_task: event_task,
        }
    }

    /// Mint a bearer token carrying the full billing permission set
    pub fn token_for(&self, user_id: Uuid, extra_roles: &[&str]) -> String {
        let roles = extra_roles.iter().map(|r| r.to_string()).collect();
        self.auth_service
            .issue_token(
                user_id,
                Some("Test User".to_string()),
                Some("test@example.com".to_string()),
                roles,
                vec![
                    perm::BILLING_ACCESS.to_string(),
                    perm::BILLING_READ.to_string(),
                    perm::BILLING_WRITE.to_string(),
                    perm::BILLING_REFUND.to_string(),
                ],
            )
            .expect("failed to mint test token")
    }

    /// Mint an admin token
    pub fn admin_token(&self, user_id: Uuid) -> String {
        self.token_for(user_id, &[roles::ADMIN])
    }

    /// Fire a request through the router and decode the JSON body
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .expect("failed to build request"),
            None => builder.body(Body::empty()).expect("failed to build request"),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router error");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("failed to read body")
            .to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }

    /// Seed a property owned by the given user, bypassing the HTTP surface
    pub async fn seed_property(&self, owner_id: Uuid, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        let model = property::ActiveModel {
            id: Set(id),
            owner_id: Set(owner_id),
            name: Set(name.to_string()),
            created_at: Set(Utc::now()),
        };
        model
            .insert(&*self.state.db)
            .await
            .expect("failed to seed property");
        id
    }
}

/// Standard invoice body from the spec walkthrough: 2 x 50 at 10% tax
pub fn spec_invoice_body(issued_to: Uuid) -> Value {
    serde_json::json!({
        "invoice_type": "rental",
        "issued_to": issued_to,
        "customer_name": "Jamie Chen",
        "customer_email": "jamie@example.com",
        "line_items": [
            {"description": "2 nights at Driftwood Cottage", "quantity": "2", "unit_price": "50"}
        ],
        "tax_rate": "10",
        "discount_amount": "0"
    })
}
