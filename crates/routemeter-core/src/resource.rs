//! Explicit resource model.
//!
//! Resource types are described up front (in code or config) instead of being
//! discovered by reflection. A `ResourceType` lists its methods and the metric
//! annotations each method carries; an optional supertype supplies inherited
//! methods.

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::error::{Result, RouteMeterError};

/// A request for a timer or meter on a resource method.
///
/// `name` overrides the method name; `absolute` makes it verbatim instead of
/// prefixed by the declaring type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricAnnotation {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub absolute: bool,
}

impl MetricAnnotation {
    /// Relative explicit name.
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()), absolute: false }
    }

    /// Absolute explicit name.
    pub fn absolute(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()), absolute: true }
    }
}

/// A method declared on a resource type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub name: String,
    pub params: Vec<String>,
    pub timed: Option<MetricAnnotation>,
    pub metered: Option<MetricAnnotation>,
}

impl MethodDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            timed: None,
            metered: None,
        }
    }

    pub fn param(mut self, ty: impl Into<String>) -> Self {
        self.params.push(ty.into());
        self
    }

    pub fn timed(mut self, annotation: MetricAnnotation) -> Self {
        self.timed = Some(annotation);
        self
    }

    pub fn metered(mut self, annotation: MetricAnnotation) -> Self {
        self.metered = Some(annotation);
        self
    }

    /// Signature match: same name, same parameter types in order.
    pub fn matches<S: AsRef<str>>(&self, name: &str, params: &[S]) -> bool {
        self.name == name
            && self.params.len() == params.len()
            && self.params.iter().zip(params).all(|(a, b)| a == b.as_ref())
    }
}

/// A handler type: canonical dotted name, declared methods, optional supertype.
#[derive(Debug, Clone)]
pub struct ResourceType {
    canonical_name: String,
    methods: Vec<MethodDecl>,
    supertype: Option<Arc<ResourceType>>,
}

impl ResourceType {
    pub fn new(canonical_name: impl Into<String>) -> Self {
        Self {
            canonical_name: canonical_name.into(),
            methods: Vec::new(),
            supertype: None,
        }
    }

    /// Derive the canonical name from a Rust type path (`shop::Orders` -> `shop.Orders`).
    pub fn of<T: ?Sized>() -> Self {
        Self::new(std::any::type_name::<T>().replace("::", "."))
    }

    pub fn method(mut self, decl: MethodDecl) -> Self {
        self.methods.push(decl);
        self
    }

    pub fn extends(mut self, supertype: Arc<ResourceType>) -> Self {
        self.supertype = Some(supertype);
        self
    }

    pub fn canonical_name(&self) -> &str {
        &self.canonical_name
    }

    pub fn methods(&self) -> &[MethodDecl] {
        &self.methods
    }

    pub fn supertype(&self) -> Option<&Arc<ResourceType>> {
        self.supertype.as_ref()
    }

    /// Method declared directly on this type.
    pub fn declared_method<S: AsRef<str>>(&self, name: &str, params: &[S]) -> Option<&MethodDecl> {
        self.methods.iter().find(|m| m.matches(name, params))
    }

    /// Method declared on this type or inherited; returns the declaring type too.
    pub fn find_method<S: AsRef<str>>(
        &self,
        name: &str,
        params: &[S],
    ) -> Option<(&ResourceType, &MethodDecl)> {
        let mut ty = Some(self);
        while let Some(t) = ty {
            if let Some(m) = t.declared_method(name, params) {
                return Some((t, m));
            }
            ty = t.supertype.as_deref();
        }
        None
    }
}

/// Identity of a concrete resource method: (declaring type, name, parameter types).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceMethod {
    pub declaring_type: String,
    pub name: String,
    pub params: Vec<String>,
}

impl fmt::Display for ResourceMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}({})", self.declaring_type, self.name, self.params.join(", "))
    }
}

/// A resolved method: its identity plus the declaration carrying annotations.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedMethod<'a> {
    pub declaring_type: &'a ResourceType,
    pub decl: &'a MethodDecl,
}

impl ResolvedMethod<'_> {
    pub fn key(&self) -> ResourceMethod {
        ResourceMethod {
            declaring_type: self.declaring_type.canonical_name().to_string(),
            name: self.decl.name.clone(),
            params: self.decl.params.clone(),
        }
    }
}

/// What the host hands a feature for one binding: the implementation type and
/// the invoked method's signature.
#[derive(Debug, Clone)]
pub struct ResourceInfo {
    resource_type: Arc<ResourceType>,
    method_name: String,
    params: Vec<String>,
}

impl ResourceInfo {
    pub fn new<I, S>(resource_type: Arc<ResourceType>, method_name: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            resource_type,
            method_name: method_name.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    pub fn resource_type(&self) -> &Arc<ResourceType> {
        &self.resource_type
    }

    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Resolve the concrete method on the implementation type.
    pub fn resolve(&self) -> Result<ResolvedMethod<'_>> {
        self.resource_type
            .find_method(&self.method_name, &self.params)
            .map(|(declaring_type, decl)| ResolvedMethod { declaring_type, decl })
            .ok_or_else(|| RouteMeterError::NoSuchMethod {
                resource: self.resource_type.canonical_name().to_string(),
                method: format!("{}({})", self.method_name, self.params.join(", ")),
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn base() -> Arc<ResourceType> {
        Arc::new(
            ResourceType::new("com.example.BaseResource")
                .method(MethodDecl::new("ping").timed(MetricAnnotation::default())),
        )
    }

    #[test]
    fn resolves_declared_method_by_signature() {
        let ty = Arc::new(
            ResourceType::new("com.example.OrderService")
                .method(MethodDecl::new("get").param("u64"))
                .method(MethodDecl::new("get").param("String")),
        );
        let info = ResourceInfo::new(ty, "get", ["String"]);
        let resolved = info.resolve().unwrap();
        assert_eq!(resolved.decl.params, vec!["String".to_string()]);
        assert_eq!(resolved.key().declaring_type, "com.example.OrderService");
    }

    #[test]
    fn inherited_method_keeps_its_declaring_type() {
        let ty = Arc::new(ResourceType::new("com.example.OrderService").extends(base()));
        let info = ResourceInfo::new(ty, "ping", Vec::<String>::new());
        let key = info.resolve().unwrap().key();
        assert_eq!(key.declaring_type, "com.example.BaseResource");
        assert_eq!(key.to_string(), "com.example.BaseResource.ping()");
    }

    #[test]
    fn unknown_method_is_a_binding_error() {
        let ty = Arc::new(ResourceType::new("com.example.OrderService"));
        let err = ResourceInfo::new(ty, "missing", ["Order"]).resolve().unwrap_err();
        assert!(err.is_fatal_binding());
        assert_eq!(err.to_string(), "no such method: com.example.OrderService.missing(Order)");
    }

    #[test]
    fn parameter_types_must_match_exactly() {
        let ty = Arc::new(ResourceType::new("a.B").method(MethodDecl::new("m").param("A").param("B")));
        assert!(ty.declared_method("m", &["A"]).is_none());
        assert!(ty.declared_method("m", &["B", "A"]).is_none());
        assert!(ty.declared_method("m", &["A", "B"]).is_some());
    }

    struct Orders;

    #[test]
    fn rust_type_paths_become_dotted_names() {
        let ty = ResourceType::of::<Orders>();
        assert!(ty.canonical_name().ends_with(".tests.Orders"));
        assert!(!ty.canonical_name().contains("::"));
    }
}
