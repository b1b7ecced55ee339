//! `/sensor/temperature` reading resource.

use super::{HandlerContext, ResourceDefinition};
use crate::domains::hardware::TEMPERATURE_UNIT;
use crate::domains::resources::buffer::ResponseBuffer;
use crate::domains::resources::message::{
    ContentFormat, IncomingRequest, Method, OutgoingResponse, ResponseCode, make_response,
};

/// Current temperature as `<integer><unit>` text, e.g. `21C`.
pub struct SensorTemperatureResource;

impl ResourceDefinition for SensorTemperatureResource {
    const METHOD: Method = Method::Get;
    const PATH: &'static [&'static str] = &["sensor", "temperature"];
    const ATTRIBUTE: Option<&'static str> = Some("ct=0");

    fn handle(
        ctx: &HandlerContext<'_>,
        request: &IncomingRequest,
        mut buffer: ResponseBuffer,
    ) -> OutgoingResponse {
        let celsius = ctx.hardware.sensor.read_celsius();
        buffer.push_str(&format!("{}{}", celsius, TEMPERATURE_UNIT));
        make_response(
            request,
            buffer,
            ResponseCode::Content,
            ContentFormat::TextPlain,
        )
    }
}
