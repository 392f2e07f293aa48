//! Template inspection: relationships, slide layouts, and layout selection.

use crate::package::{Package, CONTENT_TYPES_PART};
use crate::xml_error;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use slidegen_core::{Error, Result};
use std::io::{Read, Seek};

/// Main presentation part.
pub const PRESENTATION_PART: &str = "ppt/presentation.xml";

/// Relationships of the main presentation part.
pub const PRESENTATION_RELS_PART: &str = "ppt/_rels/presentation.xml.rels";

/// Directory holding slide layout parts.
const LAYOUT_PREFIX: &str = "ppt/slideLayouts/slideLayout";

/// Relationship type URIs written into generated parts.
pub mod rel_types {
    pub const SLIDE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
    pub const SLIDE_LAYOUT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
    pub const NOTES_SLIDE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesSlide";
    pub const NOTES_MASTER: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesMaster";

    /// Whether `rel_type` is of the kind `known`, ignoring the namespace base.
    pub fn matches(rel_type: &str, known: &str) -> bool {
        let suffix = known.rsplit('/').next().unwrap_or(known);
        rel_type.rsplit('/').next() == Some(suffix)
    }
}

/// A single package relationship.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    pub target_mode: Option<String>,
}

impl Relationship {
    /// Create an internal relationship.
    pub fn new(id: impl Into<String>, rel_type: &str, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rel_type: rel_type.to_string(),
            target: target.into(),
            target_mode: None,
        }
    }
}

/// Parse a relationships part.
pub fn parse_relationships(xml: &str) -> Result<Vec<Relationship>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut rels = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"Relationship" =>
            {
                let mut rel = Relationship::new(String::new(), "", String::new());
                for attr in e.attributes().flatten() {
                    let value = attr
                        .unescape_value()
                        .map(|v| v.into_owned())
                        .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
                    match attr.key.as_ref() {
                        b"Id" => rel.id = value,
                        b"Type" => rel.rel_type = value,
                        b"Target" => rel.target = value,
                        b"TargetMode" => rel.target_mode = Some(value),
                        _ => {}
                    }
                }
                rels.push(rel);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing relationships: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(rels)
}

/// Serialize relationships into a relationships part.
pub fn write_relationships(rels: &[Relationship]) -> String {
    let mut xml = String::with_capacity(256 + rels.len() * 160);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for rel in rels {
        xml.push_str(&format!(
            r#"<Relationship Id="{}" Type="{}" Target="{}""#,
            escape(&rel.id),
            escape(&rel.rel_type),
            escape(&rel.target)
        ));
        if let Some(mode) = &rel.target_mode {
            xml.push_str(&format!(r#" TargetMode="{}""#, escape(mode)));
        }
        xml.push_str("/>");
    }
    xml.push_str("</Relationships>");
    xml
}

/// Next free `rIdN` identifier.
pub fn next_rel_number(rels: &[Relationship]) -> usize {
    rels.iter()
        .filter_map(|r| trailing_number(&r.id))
        .max()
        .unwrap_or(0)
        + 1
}

/// A placeholder reference, as written in `<p:ph type=".." idx=".."/>`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlaceholderRef {
    pub ph_type: Option<String>,
    pub idx: Option<String>,
}

impl PlaceholderRef {
    fn from_element(e: &BytesStart) -> Self {
        let mut ph = Self::default();
        for attr in e.attributes().flatten() {
            let value = String::from_utf8_lossy(&attr.value).into_owned();
            match attr.key.as_ref() {
                b"type" => ph.ph_type = Some(value),
                b"idx" => ph.idx = Some(value),
                _ => {}
            }
        }
        ph
    }

    fn is_title(&self) -> bool {
        matches!(self.ph_type.as_deref(), Some("title" | "ctrTitle"))
    }

    /// Body-like placeholder that can take bullet text. Untyped means `obj`.
    fn is_body(&self) -> bool {
        matches!(self.ph_type.as_deref(), None | Some("body" | "obj"))
    }

    /// Placeholders that never receive slide content.
    fn is_decoration(&self) -> bool {
        matches!(
            self.ph_type.as_deref(),
            Some("dt" | "ftr" | "sldNum" | "hdr" | "sldImg")
        )
    }
}

/// What a slide layout offers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutInfo {
    /// Part name, e.g. `ppt/slideLayouts/slideLayout2.xml`.
    pub part_name: String,
    /// Title placeholder, if any.
    pub title: Option<PlaceholderRef>,
    /// Placeholder that receives bullets, if any.
    pub body: Option<PlaceholderRef>,
    /// Number of placeholders on the layout.
    pub placeholder_count: usize,
    /// Whether the body is a true body placeholder rather than a fallback.
    has_true_body: bool,
}

/// Read placeholders from a slide layout part.
pub fn parse_layout(part_name: &str, xml: &str) -> Result<LayoutInfo> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut placeholders = Vec::new();
    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Empty(ref e) | Event::Start(ref e) if local_name(e.name().as_ref()) == b"ph" => {
                placeholders.push(PlaceholderRef::from_element(e));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let title = placeholders.iter().find(|p| p.is_title()).cloned();
    let true_body = placeholders
        .iter()
        .find(|p| !p.is_title() && p.is_body())
        .cloned();
    let has_true_body = true_body.is_some();
    let body = true_body.or_else(|| {
        placeholders
            .iter()
            .find(|p| !p.is_title() && !p.is_decoration())
            .cloned()
    });

    Ok(LayoutInfo {
        part_name: part_name.to_string(),
        title,
        body,
        placeholder_count: placeholders.len(),
        has_true_body,
    })
}

/// Pick the layout to use for generated slides.
///
/// Prefers a title plus body layout, then any layout with two or more
/// placeholders, then the first layout.
pub fn select_layout(layouts: &[LayoutInfo]) -> Option<&LayoutInfo> {
    layouts
        .iter()
        .find(|l| l.title.is_some() && l.has_true_body)
        .or_else(|| layouts.iter().find(|l| l.placeholder_count >= 2))
        .or_else(|| layouts.first())
}

/// A loaded template with everything the renderer needs to append slides.
#[derive(Debug)]
pub struct Template {
    /// All parts of the template package.
    pub package: Package,
    /// Relationships of the main presentation part.
    pub presentation_rels: Vec<Relationship>,
    /// Layout chosen for generated slides.
    pub layout: LayoutInfo,
    /// Notes master part name, if the template has one.
    pub notes_master: Option<String>,
}

impl Template {
    /// Load and inspect a `.pptx` or `.potx` template.
    pub fn load<R: Read + Seek>(reader: R) -> Result<Self> {
        let package = Package::read(reader)?;

        for required in [CONTENT_TYPES_PART, PRESENTATION_PART, PRESENTATION_RELS_PART] {
            if !package.contains(required) {
                return Err(Error::TemplateError(format!(
                    "Missing required part '{}'",
                    required
                )));
            }
        }

        let presentation_rels = parse_relationships(package.get_str(PRESENTATION_RELS_PART)?)?;

        let mut layout_names: Vec<&str> = package
            .names()
            .filter(|n| n.starts_with(LAYOUT_PREFIX) && n.ends_with(".xml"))
            .collect();
        layout_names.sort_by_key(|n| trailing_number(n).unwrap_or(usize::MAX));

        let layouts = layout_names
            .iter()
            .map(|name| parse_layout(name, package.get_str(name)?))
            .collect::<Result<Vec<_>>>()?;

        let layout = select_layout(&layouts)
            .cloned()
            .ok_or_else(|| Error::TemplateError("Template has no slide layouts".to_string()))?;
        log::debug!(
            "Using layout {} ({} placeholders)",
            layout.part_name,
            layout.placeholder_count
        );

        let notes_master = presentation_rels
            .iter()
            .find(|r| rel_types::matches(&r.rel_type, rel_types::NOTES_MASTER))
            .map(|r| resolve_target("ppt", &r.target));

        Ok(Self {
            package,
            presentation_rels,
            layout,
            notes_master,
        })
    }

    /// Highest `N` among parts named `{prefix}N.xml`.
    pub fn max_part_number(&self, prefix: &str) -> usize {
        self.package
            .names()
            .filter(|n| n.starts_with(prefix) && n.ends_with(".xml"))
            .filter_map(trailing_number)
            .max()
            .unwrap_or(0)
    }
}

/// Resolve a relationship target against the directory of its source part.
pub fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}

/// Target of `part_name` as seen from a part one directory below `ppt/`.
pub fn sibling_target(part_name: &str) -> String {
    format!("../{}", part_name.strip_prefix("ppt/").unwrap_or(part_name))
}

/// Extract the local name from a potentially namespaced XML element name.
pub(crate) fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Extract a trailing number from a string like "rId2" or "slideLayout3.xml".
pub(crate) fn trailing_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml").trim_end_matches(".rels");

    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let digits: String = digits.chars().rev().collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="slideMasters/slideMaster1.xml"/>
<Relationship Id="rId7" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com/?a=1&amp;b=2" TargetMode="External"/>
</Relationships>"#;

    fn layout_xml(placeholders: &[&str]) -> String {
        let shapes: String = placeholders
            .iter()
            .map(|ph| format!("<p:sp><p:nvSpPr><p:nvPr>{}</p:nvPr></p:nvSpPr></p:sp>", ph))
            .collect();
        format!(
            r#"<p:sldLayout xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree>{}</p:spTree></p:cSld></p:sldLayout>"#,
            shapes
        )
    }

    #[test]
    fn test_parse_relationships() {
        let rels = parse_relationships(RELS).unwrap();

        assert_eq!(rels.len(), 2);
        assert_eq!(rels[0].id, "rId1");
        assert_eq!(rels[0].target, "slideMasters/slideMaster1.xml");
        assert_eq!(rels[1].target, "https://example.com/?a=1&b=2");
        assert_eq!(rels[1].target_mode.as_deref(), Some("External"));
        assert_eq!(next_rel_number(&rels), 8);
    }

    #[test]
    fn test_relationships_round_trip() {
        let rels = parse_relationships(RELS).unwrap();
        let written = write_relationships(&rels);

        assert!(written.contains("a=1&amp;b=2"));
        assert_eq!(parse_relationships(&written).unwrap(), rels);
    }

    #[test]
    fn test_rel_type_matches() {
        assert!(rel_types::matches(rel_types::SLIDE, rel_types::SLIDE));
        assert!(rel_types::matches(
            "http://purl.oclc.org/ooxml/officeDocument/relationships/notesMaster",
            rel_types::NOTES_MASTER
        ));
        assert!(!rel_types::matches(rel_types::SLIDE_LAYOUT, rel_types::SLIDE));
    }

    #[test]
    fn test_parse_layout_title_and_content() {
        let xml = layout_xml(&[
            r#"<p:ph type="title"/>"#,
            r#"<p:ph idx="1"/>"#,
            r#"<p:ph type="dt" sz="half" idx="10"/>"#,
        ]);
        let layout = parse_layout("ppt/slideLayouts/slideLayout2.xml", &xml).unwrap();

        assert_eq!(layout.placeholder_count, 3);
        assert_eq!(layout.title.unwrap().ph_type.as_deref(), Some("title"));
        let body = layout.body.unwrap();
        assert_eq!(body.ph_type, None);
        assert_eq!(body.idx.as_deref(), Some("1"));
    }

    #[test]
    fn test_select_layout_prefers_title_and_body() {
        let title_slide = parse_layout(
            "ppt/slideLayouts/slideLayout1.xml",
            &layout_xml(&[r#"<p:ph type="ctrTitle"/>"#, r#"<p:ph type="subTitle" idx="1"/>"#]),
        )
        .unwrap();
        let content = parse_layout(
            "ppt/slideLayouts/slideLayout2.xml",
            &layout_xml(&[r#"<p:ph type="title"/>"#, r#"<p:ph type="body" idx="1"/>"#]),
        )
        .unwrap();
        let layouts = vec![title_slide.clone(), content.clone()];

        assert_eq!(select_layout(&layouts), Some(&content));
        // Without a true body layout, two placeholders are enough
        assert_eq!(select_layout(&layouts[..1]), Some(&title_slide));
        assert_eq!(
            title_slide.body.unwrap().ph_type.as_deref(),
            Some("subTitle")
        );
    }

    #[test]
    fn test_select_layout_falls_back_to_first() {
        let blank = parse_layout("ppt/slideLayouts/slideLayout7.xml", &layout_xml(&[])).unwrap();
        let layouts = vec![blank.clone()];

        assert_eq!(select_layout(&layouts), Some(&blank));
        assert!(select_layout(&[]).is_none());
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(
            resolve_target("ppt", "notesMasters/notesMaster1.xml"),
            "ppt/notesMasters/notesMaster1.xml"
        );
        assert_eq!(
            resolve_target("ppt/slides", "../slideLayouts/slideLayout1.xml"),
            "ppt/slideLayouts/slideLayout1.xml"
        );
        assert_eq!(resolve_target("ppt", "/ppt/slides/slide1.xml"), "ppt/slides/slide1.xml");
    }

    #[test]
    fn test_sibling_target() {
        assert_eq!(
            sibling_target("ppt/slideLayouts/slideLayout2.xml"),
            "../slideLayouts/slideLayout2.xml"
        );
    }

    #[test]
    fn test_trailing_number() {
        assert_eq!(trailing_number("rId1"), Some(1));
        assert_eq!(trailing_number("rId12"), Some(12));
        assert_eq!(trailing_number("ppt/slides/slide123.xml"), Some(123));
        assert_eq!(trailing_number("nodigits"), None);
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name(b"p:sp"), b"sp");
        assert_eq!(local_name(b"a:t"), b"t");
        assert_eq!(local_name(b"sp"), b"sp");
    }
}
