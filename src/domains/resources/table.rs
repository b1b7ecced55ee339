//! Resource descriptors and the immutable table that holds them.

use super::definitions::HandlerFn;
use super::error::ResourceError;
use super::message::{Method, render_path};

/// One addressable resource: a method and path bound to a handler.
#[derive(Debug, Clone)]
pub struct ResourceDescriptor {
    pub method: Method,

    /// Path segments, compared case-sensitively.
    pub path: Vec<String>,

    pub handler: HandlerFn,

    /// Link-format attribute advertised by discovery (e.g. `ct=0`).
    pub discovery_attribute: Option<String>,
}

impl ResourceDescriptor {
    pub fn new(method: Method, path: &[&str], handler: HandlerFn) -> Self {
        Self {
            method,
            path: path.iter().map(|s| s.to_string()).collect(),
            handler,
            discovery_attribute: None,
        }
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.discovery_attribute = Some(attribute.into());
        self
    }

    /// The path rendered as `/seg1/seg2`.
    pub fn path_string(&self) -> String {
        render_path(&self.path)
    }

    /// Attribute to advertise, if this resource is listed by discovery.
    pub fn discoverable_attribute(&self) -> Option<&str> {
        self.discovery_attribute
            .as_deref()
            .filter(|attribute| !attribute.is_empty())
    }

    pub fn matches_path(&self, path: &[String]) -> bool {
        self.path == path
    }

    fn validate(&self) -> Result<(), ResourceError> {
        if self.path.is_empty() {
            return Err(ResourceError::invalid_descriptor(format!(
                "{} resource has no path segments",
                self.method
            )));
        }

        for segment in &self.path {
            if segment.is_empty() || !segment.is_ascii() || segment.contains('/') {
                return Err(ResourceError::invalid_descriptor(format!(
                    "bad path segment {:?} in {}",
                    segment,
                    self.path_string()
                )));
            }
        }

        if let Some(attribute) = &self.discovery_attribute {
            if !attribute.is_ascii() || attribute.contains(',') {
                return Err(ResourceError::invalid_descriptor(format!(
                    "bad discovery attribute {:?} on {}",
                    attribute,
                    self.path_string()
                )));
            }
        }

        Ok(())
    }
}

/// Ordered, validated, read-only list of resources.
#[derive(Debug, Clone)]
pub struct ResourceTable {
    descriptors: Vec<ResourceDescriptor>,
}

impl ResourceTable {
    /// Validate `descriptors` and freeze them into a table.
    pub fn new(descriptors: Vec<ResourceDescriptor>) -> Result<Self, ResourceError> {
        for (index, descriptor) in descriptors.iter().enumerate() {
            descriptor.validate()?;

            let duplicate = descriptors[..index]
                .iter()
                .any(|d| d.method == descriptor.method && d.path == descriptor.path);
            if duplicate {
                return Err(ResourceError::Duplicate {
                    method: descriptor.method,
                    path: descriptor.path_string(),
                });
            }
        }

        Ok(Self { descriptors })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResourceDescriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Find the descriptor bound to exactly `(method, path)`.
    ///
    /// Distinguishes an unknown path from a known path registered under a
    /// different method.
    pub fn lookup(
        &self,
        method: Method,
        path: &[String],
    ) -> Result<&ResourceDescriptor, ResourceError> {
        let mut path_known = false;
        for descriptor in &self.descriptors {
            if descriptor.matches_path(path) {
                if descriptor.method == method {
                    return Ok(descriptor);
                }
                path_known = true;
            }
        }

        let rendered = render_path(path);
        if path_known {
            Err(ResourceError::method_not_allowed(method, rendered))
        } else {
            Err(ResourceError::not_found(rendered))
        }
    }
}

impl<'a> IntoIterator for &'a ResourceTable {
    type Item = &'a ResourceDescriptor;
    type IntoIter = std::slice::Iter<'a, ResourceDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
