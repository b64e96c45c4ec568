use std::collections::HashSet;
use std::net::SocketAddr;

use serde::Deserialize;

use routemeter_core::error::{Result, RouteMeterError};
use routemeter_core::{MethodDecl, MetricAnnotation, ResourceCatalog, ResourceType};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteMeterConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub resources: Vec<ResourceConfig>,
}

impl RouteMeterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(RouteMeterError::UnsupportedVersion);
        }

        self.server.validate()?;

        let mut seen = HashSet::new();
        for r in &self.resources {
            r.validate()?;
            if let Some(parent) = &r.extends {
                // Supertypes must be declared first; this also rules out cycles.
                if !seen.contains(parent.as_str()) {
                    return Err(RouteMeterError::BadConfig(format!(
                        "resource {} extends {parent}, which is not declared before it",
                        r.type_name
                    )));
                }
            }
            if !seen.insert(r.type_name.as_str()) {
                return Err(RouteMeterError::BadConfig(format!(
                    "duplicate resource type: {}",
                    r.type_name
                )));
            }
        }
        Ok(())
    }

    /// Build the resource catalog. Assumes `validate` passed.
    pub fn catalog(&self) -> Result<ResourceCatalog> {
        let mut catalog = ResourceCatalog::new();
        for r in &self.resources {
            let mut ty = ResourceType::new(&r.type_name);
            if let Some(parent) = &r.extends {
                ty = ty.extends(catalog.get(parent)?);
            }
            for m in &r.methods {
                ty = ty.method(m.to_decl());
            }
            catalog.insert(ty);
        }
        Ok(catalog)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_metrics_path")]
    pub metrics_path: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            metrics_path: default_metrics_path(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if !self.metrics_path.starts_with('/') {
            return Err(RouteMeterError::BadConfig(
                "server.metrics_path must start with '/'".into(),
            ));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen
            .parse()
            .map_err(|e| RouteMeterError::BadConfig(format!("server.listen must be a valid SocketAddr: {e}")))
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_metrics_path() -> String {
    "/metrics".into()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceConfig {
    #[serde(rename = "type")]
    pub type_name: String,

    #[serde(default)]
    pub extends: Option<String>,

    #[serde(default)]
    pub methods: Vec<MethodConfig>,
}

impl ResourceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.type_name.trim().is_empty() {
            return Err(RouteMeterError::BadConfig("resources[].type must not be empty".into()));
        }
        let mut signatures = HashSet::new();
        for m in &self.methods {
            if m.name.trim().is_empty() {
                return Err(RouteMeterError::BadConfig(format!(
                    "resource {}: method name must not be empty",
                    self.type_name
                )));
            }
            if !signatures.insert((m.name.as_str(), m.params.as_slice())) {
                return Err(RouteMeterError::BadConfig(format!(
                    "resource {}: duplicate method {}({})",
                    self.type_name,
                    m.name,
                    m.params.join(", ")
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MethodConfig {
    pub name: String,

    #[serde(default)]
    pub params: Vec<String>,

    #[serde(default)]
    pub timed: Option<MetricAnnotation>,

    #[serde(default)]
    pub metered: Option<MetricAnnotation>,
}

impl MethodConfig {
    pub fn to_decl(&self) -> MethodDecl {
        let mut decl = MethodDecl::new(&self.name);
        decl.params = self.params.clone();
        decl.timed = self.timed.clone();
        decl.metered = self.metered.clone();
        decl
    }
}
