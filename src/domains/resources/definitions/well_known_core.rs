//! `/.well-known/core` discovery resource.

use super::{HandlerContext, ResourceDefinition};
use crate::domains::resources::buffer::ResponseBuffer;
use crate::domains::resources::discovery::write_discovery_document;
use crate::domains::resources::message::{
    ContentFormat, IncomingRequest, Method, OutgoingResponse, ResponseCode, make_response,
};

/// Lists every discoverable resource in link-format.
pub struct WellKnownCoreResource;

impl ResourceDefinition for WellKnownCoreResource {
    const METHOD: Method = Method::Get;
    const PATH: &'static [&'static str] = &[".well-known", "core"];
    const ATTRIBUTE: Option<&'static str> = Some("ct=40");

    fn handle(
        ctx: &HandlerContext<'_>,
        request: &IncomingRequest,
        mut buffer: ResponseBuffer,
    ) -> OutgoingResponse {
        write_discovery_document(ctx.table, &mut buffer);
        make_response(
            request,
            buffer,
            ResponseCode::Content,
            ContentFormat::LinkFormat,
        )
    }
}
