//! Reading link-format documents on the gateway side.
//!
//! A gateway fetches `/.well-known/core` from a node and turns the listing
//! into a device profile: which sensors and actuators the node offers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::error::ResourceError;
use super::message::render_path;

/// One `<path>;attr;...` entry of a link-format document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub path: Vec<String>,

    /// Attributes in document order; flags have no value.
    pub attributes: Vec<(String, Option<String>)>,
}

impl Link {
    /// Value of the first attribute named `name`.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .and_then(|(_, value)| value.as_deref())
    }

    /// Registered content format (`ct=`), if advertised.
    pub fn content_format(&self) -> Option<u16> {
        self.attribute("ct").and_then(|ct| ct.parse().ok())
    }

    pub fn path_string(&self) -> String {
        render_path(&self.path)
    }
}

/// Parse a link-format document.
///
/// Empty entries (e.g. a trailing comma) are skipped. A malformed final entry
/// is dropped with a warning so that a document truncated by the node still
/// yields its complete links; a malformed entry anywhere else is an error.
pub fn parse_link_format(document: &str) -> Result<Vec<Link>, ResourceError> {
    let entries: Vec<&str> = split_outside_quotes(document, ',')
        .into_iter()
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .collect();

    let mut links = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        match parse_link(entry) {
            Ok(link) => links.push(link),
            Err(e) if index + 1 == entries.len() => {
                warn!("Skipping incomplete trailing link: {}", e);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(links)
}

fn parse_link(entry: &str) -> Result<Link, ResourceError> {
    let entry = entry.trim();
    let rest = entry
        .strip_prefix('<')
        .ok_or_else(|| ResourceError::invalid_link_format(format!("missing '<' in {entry:?}")))?;
    let (target, params) = rest
        .split_once('>')
        .ok_or_else(|| ResourceError::invalid_link_format(format!("missing '>' in {entry:?}")))?;

    let path = target
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    let mut attributes = Vec::new();
    for param in split_outside_quotes(params, ';') {
        let param = param.trim();
        if param.is_empty() {
            continue;
        }
        match param.split_once('=') {
            Some((key, value)) => attributes.push((
                key.to_string(),
                Some(value.trim_matches('"').to_string()),
            )),
            None => attributes.push((param.to_string(), None)),
        }
    }

    Ok(Link { path, attributes })
}

fn split_outside_quotes(input: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;

    for (index, c) in input.char_indices() {
        if c == '"' {
            in_quotes = !in_quotes;
        } else if c == separator && !in_quotes {
            parts.push(&input[start..index]);
            start = index + c.len_utf8();
        }
    }
    parts.push(&input[start..]);
    parts
}

/// What a node's service does, judged by the first path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    Sensor,
    Actuator,
    Other,
}

impl ServiceKind {
    pub fn classify(link: &Link) -> Self {
        match link.path.first().map(String::as_str) {
            Some("sensor") => Self::Sensor,
            Some("actuator") => Self::Actuator,
            _ => Self::Other,
        }
    }
}

/// A sensor or actuator offered by a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    pub path: String,
    pub content_format: Option<u16>,
}

/// Sensors and actuators discovered on one node, keyed by service name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceServices {
    pub sensors: BTreeMap<String, Service>,
    pub actuators: BTreeMap<String, Service>,
}

impl DeviceServices {
    /// Group `links` into sensors and actuators; other links are ignored.
    pub fn from_links(links: &[Link]) -> Self {
        let mut services = Self::default();

        for link in links {
            let Some(name) = link.path.last() else {
                continue;
            };
            let service = Service {
                name: name.clone(),
                path: link.path_string(),
                content_format: link.content_format(),
            };
            match ServiceKind::classify(link) {
                ServiceKind::Sensor => {
                    services.sensors.insert(name.clone(), service);
                }
                ServiceKind::Actuator => {
                    services.actuators.insert(name.clone(), service);
                }
                ServiceKind::Other => {}
            }
        }

        services
    }

    /// Serialize for publication to a dashboard.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
