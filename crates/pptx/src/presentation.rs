//! Registering new slides in `ppt/presentation.xml`.

use crate::package::prefixed_name;
use crate::template::local_name;
use crate::xml_error;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use slidegen_core::{Error, Result};

/// Smallest valid slide id.
const MIN_SLIDE_ID: u32 = 256;

/// Relationships namespace, used to find the prefix for `r:id`.
const RELATIONSHIPS_NS: &[u8] =
    b"http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Children of `<p:presentation>` that precede `<p:sldIdLst>`.
const BEFORE_SLIDE_LIST: &[&[u8]] = &[b"sldMasterIdLst", b"notesMasterIdLst", b"handoutMasterIdLst"];

/// Highest slide id already in use, if any.
pub fn max_slide_id(xml: &str) -> Result<Option<u32>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut max = None;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Empty(ref e) | Event::Start(ref e) if local_name(e.name().as_ref()) == b"sldId" => {
                let id = e
                    .attributes()
                    .flatten()
                    .find(|a| a.key.as_ref() == b"id")
                    .and_then(|a| String::from_utf8_lossy(&a.value).parse::<u32>().ok());
                if let Some(id) = id {
                    max = max.max(Some(id));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(max)
}

/// Append one `<p:sldId>` per relationship id, creating the list if needed.
///
/// Ids continue after the highest existing one.
pub fn append_slide_ids(xml: &str, rel_ids: &[String]) -> Result<String> {
    let first_id = match max_slide_id(xml)? {
        Some(max) => max
            .checked_add(1)
            .ok_or_else(|| Error::TemplateError("Slide ids exhausted".to_string()))?,
        None => MIN_SLIDE_ID,
    }
    .max(MIN_SLIDE_ID);

    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Vec::with_capacity(xml.len() + rel_ids.len() * 48));
    let mut names = ListNames::default();
    let mut depth = 0usize;
    let mut inserted = false;

    loop {
        let event = reader.read_event().map_err(xml_error)?;
        match &event {
            Event::Start(e) => {
                if depth == 0 {
                    names = ListNames::from_root(e);
                } else if depth == 1 && !inserted && !is_before_slide_list(e) {
                    if local_name(e.name().as_ref()) != b"sldIdLst" {
                        write_list(&mut writer, &names, first_id, rel_ids)?;
                        inserted = true;
                    }
                }
                depth += 1;
            }
            Event::Empty(e) if depth == 1 && !inserted && !is_before_slide_list(e) => {
                if local_name(e.name().as_ref()) == b"sldIdLst" {
                    // Expand an empty list in place
                    write_list(&mut writer, &names, first_id, rel_ids)?;
                    inserted = true;
                    continue;
                }
                write_list(&mut writer, &names, first_id, rel_ids)?;
                inserted = true;
            }
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                if !inserted && depth == 1 && local_name(e.name().as_ref()) == b"sldIdLst" {
                    write_entries(&mut writer, &names, first_id, rel_ids)?;
                    inserted = true;
                } else if !inserted && depth == 0 {
                    write_list(&mut writer, &names, first_id, rel_ids)?;
                    inserted = true;
                }
            }
            Event::Eof => break,
            _ => {}
        }
        writer.write_event(event).map_err(xml_error)?;
    }

    if !inserted {
        return Err(Error::TemplateError(
            "Presentation part has no root element".to_string(),
        ));
    }

    String::from_utf8(writer.into_inner())
        .map_err(|e| Error::XmlError(format!("Presentation is not UTF-8: {}", e)))
}

/// Qualified names to use for new elements, derived from the root.
#[derive(Debug, Default)]
struct ListNames {
    list: String,
    entry: String,
    rel_id_attr: String,
}

impl ListNames {
    fn from_root(root: &BytesStart) -> Self {
        let root_name = root.name();
        let r_prefix = root
            .attributes()
            .flatten()
            .find(|a| a.value.as_ref() == RELATIONSHIPS_NS && a.key.as_ref().starts_with(b"xmlns:"))
            .map(|a| String::from_utf8_lossy(&a.key.as_ref()[6..]).into_owned())
            .unwrap_or_else(|| "r".to_string());

        Self {
            list: prefixed_name(root_name.as_ref(), "sldIdLst"),
            entry: prefixed_name(root_name.as_ref(), "sldId"),
            rel_id_attr: format!("{}:id", r_prefix),
        }
    }
}

fn is_before_slide_list(e: &BytesStart) -> bool {
    BEFORE_SLIDE_LIST.contains(&local_name(e.name().as_ref()))
}

/// Write a complete `<p:sldIdLst>` with the new entries.
fn write_list(
    writer: &mut Writer<Vec<u8>>,
    names: &ListNames,
    first_id: u32,
    rel_ids: &[String],
) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new(names.list.as_str())))
        .map_err(xml_error)?;
    write_entries(writer, names, first_id, rel_ids)?;
    writer
        .write_event(Event::End(BytesEnd::new(names.list.as_str())))
        .map_err(xml_error)
}

/// Write the `<p:sldId>` entries.
fn write_entries(
    writer: &mut Writer<Vec<u8>>,
    names: &ListNames,
    first_id: u32,
    rel_ids: &[String],
) -> Result<()> {
    for (offset, rel_id) in rel_ids.iter().enumerate() {
        let id = (first_id as usize + offset).to_string();
        let entry = BytesStart::new(names.entry.as_str())
            .with_attributes([("id", id.as_str()), (names.rel_id_attr.as_str(), rel_id.as_str())]);
        writer.write_event(Event::Empty(entry)).map_err(xml_error)?;
    }
    Ok(())
}
