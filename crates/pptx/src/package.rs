//! OPC package access: reading and writing the ZIP container and
//! maintaining `[Content_Types].xml`.

use crate::xml_error;
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};
use slidegen_core::{Error, Result};
use std::io::{Read, Seek, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Name of the content types part.
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// Content type of a presentation main part.
pub const CT_PRESENTATION_MAIN: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";

/// Content type of a template main part (.potx).
pub const CT_TEMPLATE_MAIN: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.template.main+xml";

/// Content type of a slide part.
pub const CT_SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";

/// Content type of a notes slide part.
pub const CT_NOTES_SLIDE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.notesSlide+xml";

/// A single part (file) in the package.
#[derive(Debug, Clone)]
struct Part {
    name: String,
    data: Vec<u8>,
}

/// An in-memory OPC package, keeping parts in their original order.
#[derive(Debug, Clone, Default)]
pub struct Package {
    parts: Vec<Part>,
}

impl Package {
    /// Read every part of a ZIP package into memory.
    pub fn read<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let mut parts = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut file = archive
                .by_index(i)
                .map_err(|e| Error::ZipError(format!("Failed to read entry {}: {}", i, e)))?;
            if file.is_dir() {
                continue;
            }

            let name = file.name().to_string();
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)
                .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", name, e)))?;
            parts.push(Part { name, data });
        }

        log::debug!("Read package with {} parts", parts.len());
        Ok(Self { parts })
    }

    /// Whether a part exists.
    pub fn contains(&self, name: &str) -> bool {
        self.parts.iter().any(|p| p.name == name)
    }

    /// Raw bytes of a part.
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.data.as_slice())
    }

    /// A part decoded as UTF-8 text.
    pub fn get_str(&self, name: &str) -> Result<&str> {
        let data = self
            .get(name)
            .ok_or_else(|| Error::TemplateError(format!("Missing part '{}'", name)))?;
        std::str::from_utf8(data)
            .map_err(|e| Error::XmlError(format!("Part '{}' is not UTF-8: {}", name, e)))
    }

    /// Insert or replace a part.
    pub fn set(&mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) {
        let name = name.into();
        let data = data.into();
        match self.parts.iter_mut().find(|p| p.name == name) {
            Some(part) => part.data = data,
            None => self.parts.push(Part { name, data }),
        }
    }

    /// Part names in package order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|p| p.name.as_str())
    }

    /// Write the package as a ZIP archive, content types first.
    pub fn write<W: Write + Seek>(&self, writer: W) -> Result<W> {
        let mut zip = ZipWriter::new(writer);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        let ordered = self
            .parts
            .iter()
            .filter(|p| p.name == CONTENT_TYPES_PART)
            .chain(self.parts.iter().filter(|p| p.name != CONTENT_TYPES_PART));

        for part in ordered {
            zip.start_file(part.name.as_str(), options)
                .map_err(|e| Error::ZipError(format!("Failed to add '{}': {}", part.name, e)))?;
            zip.write_all(&part.data)?;
        }

        zip.finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish ZIP: {}", e)))
    }
}

/// Add `Override` entries and turn a template main content type into a
/// presentation one.
///
/// `overrides` holds `(part name, content type)` pairs; part names are given
/// without the leading slash.
pub fn update_content_types(xml: &str, overrides: &[(String, &str)]) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Vec::with_capacity(xml.len() + overrides.len() * 160));
    let mut depth = 0usize;

    loop {
        let event = reader.read_event().map_err(xml_error)?;
        match &event {
            Event::Start(_) => depth += 1,
            Event::Empty(e) if e.local_name().as_ref() == b"Override" => {
                if let Some(rewritten) = rewrite_template_override(e) {
                    writer
                        .write_event(Event::Empty(rewritten))
                        .map_err(xml_error)?;
                    continue;
                }
            }
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    for (part_name, content_type) in overrides {
                        let name = prefixed_name(e.name().as_ref(), "Override");
                        let part_name = format!("/{}", part_name);
                        let element = BytesStart::new(name).with_attributes([
                            ("PartName", part_name.as_str()),
                            ("ContentType", *content_type),
                        ]);
                        writer.write_event(Event::Empty(element)).map_err(xml_error)?;
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        writer.write_event(event).map_err(xml_error)?;
    }

    String::from_utf8(writer.into_inner())
        .map_err(|e| Error::XmlError(format!("Content types are not UTF-8: {}", e)))
}

/// Rebuild an `Override` with the presentation content type if it
/// currently carries the template one.
fn rewrite_template_override(e: &BytesStart) -> Option<BytesStart<'static>> {
    let is_template = e
        .attributes()
        .flatten()
        .any(|a| a.key.as_ref() == b"ContentType" && a.value.as_ref() == CT_TEMPLATE_MAIN.as_bytes());
    if !is_template {
        return None;
    }

    log::debug!("Converting template main part to presentation");
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut rewritten = BytesStart::new(name);
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == b"ContentType" {
            rewritten.push_attribute(("ContentType", CT_PRESENTATION_MAIN));
        } else {
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = String::from_utf8_lossy(&attr.value).into_owned();
            rewritten.push_attribute((key.as_str(), value.as_str()));
        }
    }
    Some(rewritten)
}

/// `local` qualified with the namespace prefix of `reference`, if it has one.
pub(crate) fn prefixed_name(reference: &[u8], local: &str) -> String {
    match reference.iter().position(|&b| b == b':') {
        Some(pos) => format!("{}:{}", String::from_utf8_lossy(&reference[..pos]), local),
        None => local.to_string(),
    }
}
