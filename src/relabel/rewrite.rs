//! Streaming rewrite of region names with quick-xml

use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};

use super::config::RelabelConfig;
use super::RelabelError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Rewrite the name of every region directly under the root element.
///
/// Returns the pretty-printed document and the number of regions relabeled.
pub(crate) fn rewrite_regions(
    source: &[u8],
    base_name: &str,
    config: &RelabelConfig,
) -> Result<(Vec<u8>, usize), RelabelError> {
    let mut reader = Reader::from_reader(source);

    // The reader swallows a byte order mark; carry it over to the output.
    let mut output = Vec::with_capacity(source.len());
    if source.starts_with(UTF8_BOM) {
        output.extend_from_slice(UTF8_BOM);
    }
    let mut writer = Writer::new_with_indent(output, config.indent_char, config.indent_size);

    let mut depth = 0usize;
    let mut seen_root = false;
    let mut regions = 0usize;

    loop {
        let offset = reader.buffer_position() as u64;
        let event = reader.read_event().map_err(|e| RelabelError::Parse {
            position: reader.buffer_position() as u64,
            message: e.to_string(),
        })?;

        match event {
            Event::Start(start) => {
                if depth == 1 && is_region(&start, config) {
                    let label = config.region_label(base_name, regions);
                    let relabeled = with_name(&start, &label, config, offset)?;
                    write(&mut writer, Event::Start(relabeled))?;
                    regions += 1;
                } else {
                    write(&mut writer, Event::Start(start))?;
                }
                depth += 1;
                seen_root = true;
            }
            Event::Empty(start) => {
                if depth == 1 && is_region(&start, config) {
                    let label = config.region_label(base_name, regions);
                    let relabeled = with_name(&start, &label, config, offset)?;
                    write(&mut writer, Event::Empty(relabeled))?;
                    regions += 1;
                } else {
                    write(&mut writer, Event::Empty(start))?;
                }
                seen_root = true;
            }
            Event::End(end) => {
                depth = depth.saturating_sub(1);
                write(&mut writer, Event::End(end))?;
            }
            // Whitespace between elements is replaced by the writer's indentation.
            // Any other text is written back untouched.
            Event::Text(text) if text.iter().all(u8::is_ascii_whitespace) => {}
            Event::Eof => break,
            other => write(&mut writer, other)?,
        }
    }

    if depth != 0 {
        return Err(RelabelError::Parse {
            position: reader.buffer_position() as u64,
            message: format!("{} element(s) left unclosed at end of document", depth),
        });
    }
    if !seen_root {
        return Err(RelabelError::Parse {
            position: 0,
            message: "document has no root element".to_string(),
        });
    }

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok((bytes, regions))
}

fn is_region(start: &BytesStart<'_>, config: &RelabelConfig) -> bool {
    start.name().as_ref() == config.region_tag.as_bytes()
}

/// Copy an element, setting its name attribute to `label`.
///
/// An existing attribute keeps its position; a missing one is appended.
/// `offset` is where the element starts in the source, for error reports.
fn with_name(
    start: &BytesStart<'_>,
    label: &str,
    config: &RelabelConfig,
    offset: u64,
) -> Result<BytesStart<'static>, RelabelError> {
    let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut relabeled = BytesStart::new(tag);
    let mut replaced = false;

    for attr in start.attributes() {
        let attr = attr.map_err(|e| RelabelError::Parse {
            position: offset,
            message: format!("bad attribute on <{}>: {}", config.region_tag, e),
        })?;
        if attr.key.as_ref() == config.name_attribute.as_bytes() {
            relabeled.push_attribute((config.name_attribute.as_str(), label));
            replaced = true;
        } else {
            relabeled.push_attribute(attr);
        }
    }

    if !replaced {
        relabeled.push_attribute((config.name_attribute.as_str(), label));
    }
    Ok(relabeled)
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), RelabelError> {
    writer
        .write_event(event)
        .map_err(|e| RelabelError::Serialize {
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rewrite(source: &str) -> (String, usize) {
        let (bytes, count) =
            rewrite_regions(source.as_bytes(), "base", &RelabelConfig::default()).unwrap();
        (String::from_utf8(bytes).unwrap(), count)
    }

    #[test]
    fn test_rewrites_existing_names() {
        let (out, count) = rewrite(r#"<Seq><Area Name="a"/><Area Name="b"/></Seq>"#);
        assert_eq!(count, 2);
        assert_eq!(
            out,
            "<Seq>\n  <Area Name=\"base_roi000\"/>\n  <Area Name=\"base_roi001\"/>\n</Seq>\n"
        );
    }

    #[test]
    fn test_adds_missing_name_after_other_attributes() {
        let (out, _) = rewrite(r#"<Seq><Area Type="1"></Area></Seq>"#);
        assert!(out.contains(r#"<Area Type="1" Name="base_roi000">"#), "{}", out);
    }

    #[test]
    fn test_keeps_attribute_order() {
        let (out, _) = rewrite(r#"<Seq><Area Id="9" Name="old" Type="1"/></Seq>"#);
        assert!(
            out.contains(r#"<Area Id="9" Name="base_roi000" Type="1"/>"#),
            "{}",
            out
        );
    }

    #[test]
    fn test_nested_areas_untouched() {
        let (out, count) =
            rewrite(r#"<Seq><Group><Area Name="deep"/></Group><Area Name="top"/></Seq>"#);
        assert_eq!(count, 1);
        assert!(out.contains(r#"<Area Name="deep"/>"#));
        assert!(out.contains(r#"<Area Name="base_roi000"/>"#));
    }

    #[test]
    fn test_root_named_area_untouched() {
        let (out, count) = rewrite(r#"<Area Name="root"><Area Name="child"/></Area>"#);
        assert_eq!(count, 1);
        assert!(out.starts_with(r#"<Area Name="root">"#));
    }

    #[test]
    fn test_unclosed_root_is_parse_error() {
        let result = rewrite_regions(b"<Seq><Area/>", "base", &RelabelConfig::default());
        assert!(matches!(result, Err(RelabelError::Parse { .. })));
    }

    #[test]
    fn test_mismatched_tags_is_parse_error() {
        let result = rewrite_regions(b"<Seq><Area></Seq>", "base", &RelabelConfig::default());
        assert!(matches!(result, Err(RelabelError::Parse { .. })));
    }

    #[test]
    fn test_empty_input_is_parse_error() {
        let result = rewrite_regions(b"   ", "base", &RelabelConfig::default());
        assert!(matches!(result, Err(RelabelError::Parse { .. })));
    }

    #[test]
    fn test_text_content_kept_verbatim() {
        let (out, count) = rewrite(
            r#"<Seq><Method>  C:\Methods\a b.m  </Method><Area Name="x"/></Seq>"#,
        );
        assert_eq!(count, 1);
        assert_eq!(
            out,
            "<Seq>\n  <Method>  C:\\Methods\\a b.m  </Method>\n  <Area Name=\"base_roi000\"/>\n</Seq>\n"
        );
    }

    #[test]
    fn test_mixed_content_keeps_spacing() {
        let (out, _) = rewrite(r#"<Seq><Note>see <b>this</b> now</Note><Area/></Seq>"#);
        assert!(out.contains("<Note>see <b>this</b> now</Note>"), "{}", out);
    }

    #[test]
    fn test_byte_order_mark_kept() {
        let source = b"\xEF\xBB\xBF<?xml version=\"1.0\" encoding=\"UTF-8\"?><Seq><Area/></Seq>";
        let (bytes, count) = rewrite_regions(source, "b", &RelabelConfig::default()).unwrap();
        assert_eq!(count, 1);
        assert!(bytes.starts_with(b"\xEF\xBB\xBF<?xml"));
        assert_eq!(
            &bytes[3..],
            b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Seq>\n  <Area Name=\"b_roi000\"/>\n</Seq>\n"
        );
    }

    #[test]
    fn test_no_byte_order_mark_added() {
        let (bytes, _) = rewrite_regions(b"<Seq/>", "b", &RelabelConfig::default()).unwrap();
        assert_eq!(bytes, b"<Seq/>\n");
    }

    #[test]
    fn test_bad_attribute_reports_element_offset() {
        let result = rewrite_regions(
            br#"<Seq><Area Name="a" Name="b"/></Seq>"#,
            "base",
            &RelabelConfig::default(),
        );
        match result {
            Err(RelabelError::Parse { position, .. }) => assert_eq!(position, 5),
            other => panic!("expected a parse error, got {:?}", other.map(|(_, n)| n)),
        }
    }

    #[test]
    fn test_tab_indentation() {
        let config = RelabelConfig::new().with_tabs();
        let (bytes, _) = rewrite_regions(b"<Seq><Area/></Seq>", "x", &config).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "<Seq>\n\t<Area Name=\"x_roi000\"/>\n</Seq>\n"
        );
    }
}
