//! `/riot/board` identity resource.

use super::{HandlerContext, ResourceDefinition};
use crate::domains::resources::buffer::ResponseBuffer;
use crate::domains::resources::message::{
    ContentFormat, IncomingRequest, Method, OutgoingResponse, ResponseCode, make_response,
};

/// Reports the board identifier the node was configured with.
pub struct RiotBoardResource;

impl ResourceDefinition for RiotBoardResource {
    const METHOD: Method = Method::Get;
    const PATH: &'static [&'static str] = &["riot", "board"];
    const ATTRIBUTE: Option<&'static str> = Some("ct=0");

    fn handle(
        ctx: &HandlerContext<'_>,
        request: &IncomingRequest,
        mut buffer: ResponseBuffer,
    ) -> OutgoingResponse {
        buffer.push_str(&ctx.hardware.board);
        make_response(
            request,
            buffer,
            ResponseCode::Content,
            ContentFormat::TextPlain,
        )
    }
}
