use crate::error::ReportError;
use core_types::{OutputFormat, Record, value_to_text};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::fs;
use std::path::Path;

const XML_ROOT: &str = "data";
const XML_RECORD: &str = "record";

/// Writes a query result to `path` in the requested format.
///
/// An empty result written as XML produces no file at all.
pub fn write(records: &[Record], path: &Path, format: OutputFormat) -> Result<(), ReportError> {
    let contents = match format {
        OutputFormat::Json => to_json(records)?,
        OutputFormat::Xml => {
            if records.is_empty() {
                tracing::warn!(path = %path.display(), "Empty result, no XML report written.");
                return Ok(());
            }
            to_xml(records)?
        }
    };

    fs::write(path, contents).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), records = records.len(), %format, "Report written.");
    Ok(())
}

fn to_json(records: &[Record]) -> Result<Vec<u8>, ReportError> {
    let mut json = serde_json::to_vec_pretty(records)?;
    json.push(b'\n');
    Ok(json)
}

fn to_xml(records: &[Record]) -> Result<Vec<u8>, ReportError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_error)?;
    writer
        .write_event(Event::Start(BytesStart::new(XML_ROOT)))
        .map_err(xml_error)?;

    for record in records {
        writer
            .write_event(Event::Start(BytesStart::new(XML_RECORD)))
            .map_err(xml_error)?;
        for (column, value) in record {
            if !is_xml_name(column) {
                return Err(ReportError::InvalidElementName(column.clone()));
            }
            let text = value_to_text(value);
            writer
                .write_event(Event::Start(BytesStart::new(column.as_str())))
                .map_err(xml_error)?;
            writer
                .write_event(Event::Text(BytesText::new(&text)))
                .map_err(xml_error)?;
            writer
                .write_event(Event::End(BytesEnd::new(column.as_str())))
                .map_err(xml_error)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(XML_RECORD)))
            .map_err(xml_error)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new(XML_ROOT)))
        .map_err(xml_error)?;

    let mut xml = writer.into_inner();
    xml.push(b'\n');
    Ok(xml)
}

fn xml_error<E>(err: E) -> ReportError
where
    E: std::error::Error + Send + Sync + 'static,
{
    ReportError::Xml(Box::new(err))
}

/// Element names: a letter or `_` first, then letters, digits, `_`, `-` or `.`,
/// and no reserved `xml` prefix.
fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
        && !name.to_ascii_lowercase().starts_with("xml")
}
