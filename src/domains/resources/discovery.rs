//! CoRE link-format discovery document.
//!
//! Every descriptor carrying a non-empty discovery attribute is listed in
//! table order as `</seg1/seg2>;attr`, entries separated by `,`.

use bytes::Bytes;
use tracing::warn;

use super::buffer::ResponseBuffer;
use super::table::ResourceTable;

/// Write the discovery document for `table` into `buffer`.
///
/// Output is bounded by the buffer; on overflow the document is cut short and
/// the buffer is marked truncated. Returns the number of complete entries.
pub fn write_discovery_document(table: &ResourceTable, buffer: &mut ResponseBuffer) -> usize {
    let mut entries = 0;

    for descriptor in table {
        let Some(attribute) = descriptor.discoverable_attribute() else {
            continue;
        };

        if entries > 0 {
            buffer.push_str(",");
        }
        buffer.push_str("<");
        for segment in &descriptor.path {
            buffer.push_str("/");
            buffer.push_str(segment);
        }
        buffer.push_str(">;");
        buffer.push_str(attribute);

        if buffer.is_truncated() {
            break;
        }
        entries += 1;
    }

    if buffer.is_truncated() {
        warn!(
            "Discovery document truncated at {} bytes ({} entries)",
            buffer.len(),
            entries
        );
    }

    entries
}

/// Build the discovery document for `table` in a default-sized buffer.
pub fn generate_discovery_document(table: &ResourceTable) -> Bytes {
    let mut buffer = ResponseBuffer::new();
    write_discovery_document(table, &mut buffer);
    buffer.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::resources::buffer::MAX_RESPONSE_LEN;
    use crate::domains::resources::definitions::HandlerContext;
    use crate::domains::resources::message::{
        ContentFormat, IncomingRequest, Method, OutgoingResponse, ResponseCode, make_response,
    };
    use crate::domains::resources::registry::build_table;
    use crate::domains::resources::table::ResourceDescriptor;

    fn noop(
        _ctx: &HandlerContext<'_>,
        request: &IncomingRequest,
        buffer: ResponseBuffer,
    ) -> OutgoingResponse {
        make_response(request, buffer, ResponseCode::Content, ContentFormat::TextPlain)
    }

    fn table_of(entries: &[(&[&str], Option<&str>)]) -> ResourceTable {
        let descriptors = entries
            .iter()
            .map(|(path, attribute)| {
                let descriptor = ResourceDescriptor::new(Method::Get, path, noop);
                match attribute {
                    Some(a) => descriptor.with_attribute(*a),
                    None => descriptor,
                }
            })
            .collect();
        ResourceTable::new(descriptors).unwrap()
    }

    fn as_text(bytes: &Bytes) -> &str {
        std::str::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_default_table_document() {
        let document = generate_discovery_document(&build_table().unwrap());
        assert_eq!(
            as_text(&document),
            "</.well-known/core>;ct=40,</riot/board>;ct=0,\
             </sensor/temperature>;ct=0,</actuator/led>;ct=0"
        );
    }

    #[test]
    fn test_skips_resources_without_attribute() {
        let table = table_of(&[
            (&["hidden"], None),
            (&["a"], Some("ct=0")),
            (&["empty"], Some("")),
            (&["b", "c"], Some("rt=\"temp\"")),
            (&["tail"], None),
        ]);
        let document = generate_discovery_document(&table);
        assert_eq!(as_text(&document), "</a>;ct=0,</b/c>;rt=\"temp\"");
    }

    #[test]
    fn test_comma_count_matches_entries() {
        for eligible in 0usize..6 {
            let names: Vec<String> = (0..eligible).map(|i| format!("r{}", i)).collect();
            let paths: Vec<[&str; 1]> = names.iter().map(|n| [n.as_str()]).collect();
            let entries: Vec<(&[&str], Option<&str>)> =
                paths.iter().map(|p| (&p[..], Some("ct=0"))).collect();

            let document = generate_discovery_document(&table_of(&entries));
            let text = as_text(&document);
            let commas = text.matches(',').count();

            assert_eq!(commas, eligible.saturating_sub(1));
            assert!(!text.starts_with(','));
            assert!(!text.ends_with(','));
        }
    }

    #[test]
    fn test_empty_table_yields_empty_document() {
        let document = generate_discovery_document(&table_of(&[]));
        assert!(document.is_empty());
    }

    #[test]
    fn test_oversized_table_is_truncated_within_bounds() {
        let long = "s".repeat(120);
        let names: Vec<String> = (0..20).map(|i| format!("{}{}", long, i)).collect();
        let paths: Vec<[&str; 2]> = names.iter().map(|n| ["x", n.as_str()]).collect();
        let entries: Vec<(&[&str], Option<&str>)> =
            paths.iter().map(|p| (&p[..], Some("ct=0"))).collect();
        let table = table_of(&entries);

        let mut buffer = ResponseBuffer::new();
        let written = write_discovery_document(&table, &mut buffer);

        assert!(buffer.is_truncated());
        assert_eq!(buffer.len(), MAX_RESPONSE_LEN - 1);
        assert!(written < entries.len());
        assert!(buffer.as_bytes().starts_with(b"</x/"));
    }

    #[test]
    fn test_small_buffer_never_overruns() {
        let table = build_table().unwrap();
        for capacity in 0..40 {
            let mut buffer = ResponseBuffer::with_capacity(capacity);
            write_discovery_document(&table, &mut buffer);
            assert!(buffer.len() <= capacity.saturating_sub(1));
        }
    }
}
