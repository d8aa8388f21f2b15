// SPDX-FileCopyrightText: 2026 Vetrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` wires a real [`TryOnPipeline`] over temp storage and a
//! wiremock provider endpoint, plus seed helpers for tenants, products, and
//! sessions.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use vetrina_blobstore::FsBlobStore;
use vetrina_core::VetrinaError;
use vetrina_pipeline::{CaptureUpload, TryOnPipeline};
use vetrina_storage::queries::{products, sessions, tenants};
use vetrina_storage::{Database, Product, Tenant, TryOnSession};
use vetrina_yce::{YceConfig, YceProvider};
use wiremock::MockServer;

/// A plausibly well-formed V2 S2S key for tests.
pub const TEST_API_KEY: &str = "sk-test-0123456789abcdef0123";

/// Builder for configuring the test harness.
pub struct TestHarnessBuilder {
    api_key: String,
    poll_interval: Duration,
    max_poll_attempts: u32,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            api_key: TEST_API_KEY.to_string(),
            poll_interval: Duration::from_millis(5),
            max_poll_attempts: 15,
        }
    }

    /// Use a different provider credential (e.g. a malformed one, to drive
    /// the configuration failure path).
    pub fn with_api_key(mut self, key: &str) -> Self {
        self.api_key = key.to_string();
        self
    }

    /// Override the polling budget. The default keeps the production
    /// 15-attempt budget but shrinks the interval so timeout tests finish
    /// in milliseconds.
    pub fn with_poll_budget(mut self, interval: Duration, max_attempts: u32) -> Self {
        self.poll_interval = interval;
        self.max_poll_attempts = max_attempts;
        self
    }

    /// Build the harness: temp database, temp blob store, mock provider.
    pub async fn build(self) -> Result<TestHarness, VetrinaError> {
        let data_dir = tempfile::TempDir::new().map_err(|e| VetrinaError::Storage {
            source: Box::new(e),
        })?;

        let db_path = data_dir.path().join("vetrina-test.db");
        let db = Database::open(&db_path.to_string_lossy()).await?;

        let blob_root = data_dir.path().join("captures");
        let blobs = Arc::new(FsBlobStore::new(&blob_root, "http://blobs.test/captures"));

        let provider_server = MockServer::start().await;
        let provider_config = YceConfig::new(SecretString::from(self.api_key))
            .with_base_url(provider_server.uri())
            .with_poll_budget(self.poll_interval, self.max_poll_attempts);
        let provider = Arc::new(YceProvider::new(provider_config)?);

        let pipeline = TryOnPipeline::new(db.clone(), blobs.clone(), provider);

        Ok(TestHarness {
            db,
            pipeline,
            provider_server,
            blobs,
            _data_dir: data_dir,
        })
    }
}

/// A complete test environment over disposable infrastructure.
pub struct TestHarness {
    /// Temp SQLite database, migrated.
    pub db: Database,
    /// The real orchestrator under test.
    pub pipeline: TryOnPipeline,
    /// Wiremock server standing in for the try-on provider. Mount
    /// expectations with the helpers in [`crate::provider_stubs`] or raw
    /// wiremock mocks.
    pub provider_server: MockServer,
    /// Temp filesystem blob store.
    pub blobs: Arc<FsBlobStore>,
    /// Temp directory kept alive for cleanup on drop.
    _data_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Build with all defaults.
    pub async fn start() -> TestHarness {
        TestHarnessBuilder::new()
            .build()
            .await
            .expect("test harness should build")
    }

    /// Seed an active tenant.
    pub async fn seed_tenant(&self, slug: &str, unit_balance: i64) -> Tenant {
        let tenant = Tenant::new(slug, slug, unit_balance);
        tenants::create_tenant(&self.db, &tenant)
            .await
            .expect("seed tenant");
        tenant
    }

    /// Seed an active product without tuning overrides.
    pub async fn seed_product(&self, tenant: &Tenant, name: &str, category: &str) -> Product {
        let product = Product::new(
            &tenant.id,
            name,
            category,
            &format!("https://cdn.test/{category}/{name}.png"),
        );
        products::create_product(&self.db, &product)
            .await
            .expect("seed product");
        product
    }

    /// Seed an active product with a tuning object.
    pub async fn seed_product_with_tuning(
        &self,
        tenant: &Tenant,
        name: &str,
        category: &str,
        tuning: serde_json::Value,
    ) -> Product {
        let product = Product::new(
            &tenant.id,
            name,
            category,
            &format!("https://cdn.test/{category}/{name}.png"),
        )
        .with_tuning(tuning);
        products::create_product(&self.db, &product)
            .await
            .expect("seed product");
        product
    }

    /// Seed an unstarted session for a product.
    pub async fn seed_session(&self, tenant: &Tenant, product: &Product) -> TryOnSession {
        let session = TryOnSession::new(&tenant.id, &product.id);
        sessions::create_session(&self.db, &session)
            .await
            .expect("seed session");
        session
    }

    /// Re-read a session.
    pub async fn session(&self, id: &str) -> TryOnSession {
        sessions::get_session(&self.db, id)
            .await
            .expect("read session")
            .expect("session exists")
    }

    /// Current unit balance of a tenant.
    pub async fn balance(&self, tenant_id: &str) -> i64 {
        tenants::get_tenant(&self.db, tenant_id)
            .await
            .expect("read tenant")
            .expect("tenant exists")
            .unit_balance
    }

    /// A capture upload that passes input validation.
    pub fn capture() -> CaptureUpload {
        CaptureUpload {
            content_type: "image/jpeg".to_string(),
            bytes: vec![0xD8; 4096],
        }
    }
}
