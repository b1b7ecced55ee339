//! Resource Registry - central registration of all resources.
//!
//! When adding a new resource:
//! 1. Create the resource file in `definitions/`
//! 2. Export it in `definitions/mod.rs`
//! 3. Register it here in `get_all_resources()`
//!
//! Table order is the order of `get_all_resources()`; discovery lists
//! resources in that order.

use super::definitions::{
    ActuatorLedResource, ResourceDefinition, RiotBoardResource, SensorTemperatureResource,
    WellKnownCoreResource,
};
use super::error::ResourceError;
use super::table::{ResourceDescriptor, ResourceTable};

/// Helper function to create a descriptor from a definition.
fn build_descriptor<R: ResourceDefinition>() -> ResourceDescriptor {
    let descriptor = ResourceDescriptor::new(R::METHOD, R::PATH, R::handle);
    match R::ATTRIBUTE {
        Some(attribute) => descriptor.with_attribute(attribute),
        None => descriptor,
    }
}

/// Get all registered resources as descriptors, in table order.
pub fn get_all_resources() -> Vec<ResourceDescriptor> {
    vec![
        build_descriptor::<WellKnownCoreResource>(),
        build_descriptor::<RiotBoardResource>(),
        build_descriptor::<SensorTemperatureResource>(),
        build_descriptor::<ActuatorLedResource>(),
    ]
}

/// Build and validate the node's resource table.
pub fn build_table() -> Result<ResourceTable, ResourceError> {
    ResourceTable::new(get_all_resources())
}

/// Get the paths of all registered resources.
pub fn resource_paths() -> Vec<String> {
    get_all_resources()
        .iter()
        .map(ResourceDescriptor::path_string)
        .collect()
}
