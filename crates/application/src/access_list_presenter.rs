use flavorgate_core::{AppError, AppResult};
use flavorgate_domain::AccessGrant;
use quick_xml::Reader as XmlReader;
use quick_xml::Writer as XmlWriter;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use serde::{Deserialize, Serialize};

const XML_DECLARATION: &str = "<?xml version='1.0' encoding='UTF-8'?>\n";
const ROOT_ELEMENT: &str = "flavor_access";
const ACCESS_ELEMENT: &str = "access";
const FLAVOR_ID_ATTRIBUTE: &str = "flavor_id";
const TENANT_ID_ATTRIBUTE: &str = "tenant_id";

/// Key/value form of one grant for formats without a document tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRecord {
    /// Granted flavor.
    pub flavor_id: String,
    /// Grantee tenant.
    pub tenant_id: String,
}

impl From<&AccessGrant> for AccessRecord {
    fn from(grant: &AccessGrant) -> Self {
        Self {
            flavor_id: grant.flavor_id().as_str().to_owned(),
            tenant_id: grant.tenant_id().as_str().to_owned(),
        }
    }
}

/// Converts grants into key/value records, preserving order.
#[must_use]
pub fn access_list_records(grants: &[AccessGrant]) -> Vec<AccessRecord> {
    grants.iter().map(AccessRecord::from).collect()
}

/// Renders grants as an XML `flavor_access` document, preserving order.
///
/// An empty list renders a root element without children.
pub fn render_access_list_xml(grants: &[AccessGrant]) -> AppResult<String> {
    let mut writer = XmlWriter::new(XML_DECLARATION.as_bytes().to_vec());

    if grants.is_empty() {
        writer
            .write_event(Event::Empty(BytesStart::new(ROOT_ELEMENT)))
            .map_err(render_error)?;
    } else {
        writer
            .write_event(Event::Start(BytesStart::new(ROOT_ELEMENT)))
            .map_err(render_error)?;
        for grant in grants {
            let mut element = BytesStart::new(ACCESS_ELEMENT);
            element.push_attribute((FLAVOR_ID_ATTRIBUTE, grant.flavor_id().as_str()));
            element.push_attribute((TENANT_ID_ATTRIBUTE, grant.tenant_id().as_str()));
            writer
                .write_event(Event::Empty(element))
                .map_err(render_error)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(ROOT_ELEMENT)))
            .map_err(render_error)?;
    }

    String::from_utf8(writer.into_inner())
        .map_err(|error| AppError::Internal(format!("access list is not valid UTF-8: {error}")))
}

/// Parses a `flavor_access` XML document back into key/value records.
pub fn parse_access_list_xml(document: &str) -> AppResult<Vec<AccessRecord>> {
    let mut reader = XmlReader::from_str(document);
    reader.trim_text(true);
    let mut buf = Vec::new();
    let mut records = Vec::new();
    let mut root_state = RootState::Pending;

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|error| AppError::Validation(format!("malformed access list: {error}")))?;

        match event {
            Event::Decl(_) | Event::Comment(_) => {}
            Event::Start(ref element) | Event::Empty(ref element)
                if root_state == RootState::Pending =>
            {
                if element.name().as_ref() != ROOT_ELEMENT.as_bytes() {
                    return Err(AppError::Validation(format!(
                        "access list root must be '{ROOT_ELEMENT}'"
                    )));
                }
                root_state = if matches!(event, Event::Empty(_)) {
                    RootState::Closed
                } else {
                    RootState::Open
                };
            }
            Event::Empty(ref element)
                if root_state == RootState::Open
                    && element.name().as_ref() == ACCESS_ELEMENT.as_bytes() =>
            {
                records.push(parse_access_element(element)?);
            }
            Event::Start(ref element)
                if root_state == RootState::Open
                    && element.name().as_ref() == ACCESS_ELEMENT.as_bytes() =>
            {
                records.push(parse_access_element(element)?);
                reader
                    .read_to_end_into(element.to_end().name(), &mut Vec::new())
                    .map_err(|error| {
                        AppError::Validation(format!("malformed access element: {error}"))
                    })?;
            }
            Event::End(ref element)
                if root_state == RootState::Open
                    && element.name().as_ref() == ROOT_ELEMENT.as_bytes() =>
            {
                root_state = RootState::Closed;
            }
            Event::Eof => break,
            other => {
                return Err(AppError::Validation(format!(
                    "unexpected content in access list: {other:?}"
                )));
            }
        }
        buf.clear();
    }

    if root_state != RootState::Closed {
        return Err(AppError::Validation(format!(
            "access list is missing a closed '{ROOT_ELEMENT}' root"
        )));
    }

    Ok(records)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RootState {
    Pending,
    Open,
    Closed,
}

fn parse_access_element(element: &BytesStart<'_>) -> AppResult<AccessRecord> {
    let mut flavor_id = None;
    let mut tenant_id = None;

    for attribute in element.attributes() {
        let attribute = attribute
            .map_err(|error| AppError::Validation(format!("malformed access attribute: {error}")))?;
        let value = attribute
            .unescape_value()
            .map_err(|error| AppError::Validation(format!("malformed access attribute: {error}")))?
            .into_owned();
        match attribute.key.as_ref() {
            key if key == FLAVOR_ID_ATTRIBUTE.as_bytes() => flavor_id = Some(value),
            key if key == TENANT_ID_ATTRIBUTE.as_bytes() => tenant_id = Some(value),
            _ => {}
        }
    }

    match (flavor_id, tenant_id) {
        (Some(flavor_id), Some(tenant_id)) => Ok(AccessRecord {
            flavor_id,
            tenant_id,
        }),
        _ => Err(AppError::Validation(format!(
            "'{ACCESS_ELEMENT}' requires '{FLAVOR_ID_ATTRIBUTE}' and '{TENANT_ID_ATTRIBUTE}'"
        ))),
    }
}

fn render_error(error: quick_xml::Error) -> AppError {
    AppError::Internal(format!("failed to render access list: {error}"))
}
