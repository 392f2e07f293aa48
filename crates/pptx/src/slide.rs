//! XML for generated slide and notes slide parts.

use crate::template::{LayoutInfo, PlaceholderRef};
use quick_xml::escape::escape;
use slidegen_core::normalize::truncate_chars;
use slidegen_core::{Slide, MAX_BULLETS, MAX_NOTES_CHARS, MAX_TITLE_CHARS};
use std::fmt::Write;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const NAMESPACES: &str = concat!(
    r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#
);

/// Required group shape properties at the top of every shape tree.
const GROUP_SHAPE_PROPERTIES: &str = concat!(
    r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
    r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/>"#,
    r#"<a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#
);

/// Generate the XML of a slide laid out on `layout`.
///
/// Title and bullets are capped again here so the part never exceeds the
/// plan bounds, whatever produced the slide.
pub fn slide_xml(slide: &Slide, layout: &LayoutInfo) -> String {
    let mut xml = String::with_capacity(2048);
    xml.push_str(XML_DECLARATION);
    let _ = write!(xml, "<p:sld {}>", NAMESPACES);
    xml.push_str("<p:cSld><p:spTree>");
    xml.push_str(GROUP_SHAPE_PROPERTIES);

    let default_title = PlaceholderRef {
        ph_type: Some("title".to_string()),
        idx: None,
    };
    let title_ph = layout.title.as_ref().unwrap_or(&default_title);
    let title = truncate_chars(slide.title(), MAX_TITLE_CHARS);
    write_placeholder_shape(&mut xml, 2, "Title 1", title_ph, &[title]);

    match &layout.body {
        Some(body_ph) => {
            let bullets: Vec<&str> = slide
                .bullets()
                .iter()
                .take(MAX_BULLETS)
                .map(String::as_str)
                .collect();
            write_placeholder_shape(&mut xml, 3, "Content Placeholder 2", body_ph, &bullets);
        }
        None if !slide.bullets().is_empty() => {
            log::warn!(
                "Layout {} has no body placeholder; dropping bullets",
                layout.part_name
            );
        }
        None => {}
    }

    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sld>");
    xml
}

/// Generate the XML of a notes slide holding `notes`.
pub fn notes_xml(notes: &str) -> String {
    let notes = truncate_chars(notes, MAX_NOTES_CHARS);
    let lines: Vec<&str> = notes.lines().collect();

    let mut xml = String::with_capacity(1024 + notes.len());
    xml.push_str(XML_DECLARATION);
    let _ = write!(xml, "<p:notes {}>", NAMESPACES);
    xml.push_str("<p:cSld><p:spTree>");
    xml.push_str(GROUP_SHAPE_PROPERTIES);

    // Slide image placeholder, positioned by the notes master
    xml.push_str(concat!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Slide Image Placeholder 1"/>"#,
        r#"<p:cNvSpPr><a:spLocks noGrp="1" noRot="1" noChangeAspect="1"/></p:cNvSpPr>"#,
        r#"<p:nvPr><p:ph type="sldImg"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp>"#
    ));

    let body = PlaceholderRef {
        ph_type: Some("body".to_string()),
        idx: Some("1".to_string()),
    };
    write_placeholder_shape(&mut xml, 3, "Notes Placeholder 2", &body, &lines);

    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:notes>");
    xml
}

/// Write a placeholder shape with one paragraph per entry of `paragraphs`.
fn write_placeholder_shape(
    xml: &mut String,
    id: u32,
    name: &str,
    ph: &PlaceholderRef,
    paragraphs: &[&str],
) {
    xml.push_str("<p:sp><p:nvSpPr>");
    let _ = write!(xml, r#"<p:cNvPr id="{}" name="{}"/>"#, id, escape(name));
    xml.push_str(r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>"#);
    xml.push_str("<p:nvPr><p:ph");
    if let Some(ph_type) = &ph.ph_type {
        let _ = write!(xml, r#" type="{}""#, escape(ph_type));
    }
    if let Some(idx) = &ph.idx {
        let _ = write!(xml, r#" idx="{}""#, escape(idx));
    }
    xml.push_str("/></p:nvPr></p:nvSpPr>");
    xml.push_str("<p:spPr/>");

    xml.push_str("<p:txBody><a:bodyPr/><a:lstStyle/>");
    if paragraphs.is_empty() {
        xml.push_str(r#"<a:p><a:endParaRPr lang="en-US" dirty="0"/></a:p>"#);
    }
    for paragraph in paragraphs {
        write_paragraph(xml, paragraph);
    }
    xml.push_str("</p:txBody></p:sp>");
}

/// Write one level-0 paragraph; embedded newlines become line breaks.
fn write_paragraph(xml: &mut String, text: &str) {
    xml.push_str("<a:p>");
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            xml.push_str(r#"<a:br><a:rPr lang="en-US" dirty="0"/></a:br>"#);
        }
        if line.is_empty() {
            continue;
        }
        let _ = write!(
            xml,
            r#"<a:r><a:rPr lang="en-US" dirty="0"/><a:t>{}</a:t></a:r>"#,
            escape(line)
        );
    }
    xml.push_str("</a:p>");
}
