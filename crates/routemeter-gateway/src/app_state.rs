//! Shared application state for the demo gateway.
//!
//! Holds the config, the resource catalog built from it, the metric registry,
//! and the metrics feature that binds routes against that registry.

use std::sync::Arc;

use routemeter_core::error::Result;
use routemeter_core::{MetricRegistry, ResourceCatalog, ResourceInfo};

use crate::config::RouteMeterConfig;
use crate::instrument::MetricsFeature;
use crate::services::orders::{self, OrderStore};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    registry: Arc<MetricRegistry>,
    feature: Arc<MetricsFeature>,
}

struct AppStateInner {
    cfg: RouteMeterConfig,
    catalog: ResourceCatalog,
    orders: OrderStore,
}

impl AppState {
    /// Build application state with a fresh registry.
    pub fn new(cfg: RouteMeterConfig) -> Result<Self> {
        Self::with_registry(cfg, Arc::new(MetricRegistry::new()))
    }

    pub fn with_registry(cfg: RouteMeterConfig, registry: Arc<MetricRegistry>) -> Result<Self> {
        let mut catalog = cfg.catalog()?;
        // Configured declaration wins over the built-in one.
        let declared = catalog.get_or_insert(orders::resource_type());
        tracing::debug!(resource = orders::RESOURCE, methods = declared.methods().len(), "order resource declared");

        let feature = Arc::new(MetricsFeature::new(Arc::clone(&registry)));
        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                catalog,
                orders: OrderStore::default(),
            }),
            registry,
            feature,
        })
    }

    pub fn cfg(&self) -> &RouteMeterConfig {
        &self.inner.cfg
    }

    pub fn catalog(&self) -> &ResourceCatalog {
        &self.inner.catalog
    }

    pub fn orders(&self) -> &OrderStore {
        &self.inner.orders
    }

    pub fn registry(&self) -> Arc<MetricRegistry> {
        Arc::clone(&self.registry)
    }

    pub fn metrics_feature(&self) -> Arc<MetricsFeature> {
        Arc::clone(&self.feature)
    }

    pub fn resource_info<I, S>(&self, type_name: &str, method: &str, params: I) -> Result<ResourceInfo>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner.catalog.info(type_name, method, params)
    }
}
