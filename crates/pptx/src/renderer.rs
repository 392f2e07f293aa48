//! Rendering a slide plan into a copy of a template.

use crate::package::{update_content_types, CONTENT_TYPES_PART, CT_NOTES_SLIDE, CT_SLIDE};
use crate::presentation::append_slide_ids;
use crate::slide::{notes_xml, slide_xml};
use crate::template::{
    next_rel_number, rel_types, sibling_target, write_relationships, Relationship, Template,
    PRESENTATION_PART, PRESENTATION_RELS_PART,
};
use slidegen_core::{Result, SlidePlan};
use std::io::{Read, Seek, Write};

const SLIDE_PREFIX: &str = "ppt/slides/slide";
const NOTES_SLIDE_PREFIX: &str = "ppt/notesSlides/notesSlide";

/// PPTX renderer: appends one slide per plan entry to a template.
pub struct PptxRenderer;

impl PptxRenderer {
    /// Create a new renderer.
    pub fn new() -> Self {
        Self
    }

    /// Render `plan` into the `.pptx`/`.potx` read from `template`, writing a
    /// `.pptx` to `output`.
    ///
    /// Slides already in the template are kept; new slides follow them.
    pub fn render<R: Read + Seek, W: Write + Seek>(
        &self,
        template: R,
        plan: &SlidePlan,
        output: W,
    ) -> Result<W> {
        let template = Template::load(template)?;
        let first_slide = template.max_part_number(SLIDE_PREFIX) + 1;
        let mut notes_number = template.max_part_number(NOTES_SLIDE_PREFIX) + 1;

        let Template {
            mut package,
            mut presentation_rels,
            layout,
            notes_master,
        } = template;
        let notes_master = notes_master.filter(|master| package.contains(master));

        let mut next_rel = next_rel_number(&presentation_rels);
        let mut slide_rel_ids = Vec::with_capacity(plan.len());
        let mut overrides: Vec<(String, &str)> = Vec::new();
        let mut notes_skipped = false;

        for (offset, slide) in plan.iter().enumerate() {
            let number = first_slide + offset;
            let slide_part = format!("{}{}.xml", SLIDE_PREFIX, number);
            let mut slide_rels = vec![Relationship::new(
                "rId1",
                rel_types::SLIDE_LAYOUT,
                sibling_target(&layout.part_name),
            )];

            if let Some(notes) = slide.notes() {
                match &notes_master {
                    Some(master) => {
                        let notes_part = format!("{}{}.xml", NOTES_SLIDE_PREFIX, notes_number);
                        notes_number += 1;

                        slide_rels.push(Relationship::new(
                            "rId2",
                            rel_types::NOTES_SLIDE,
                            sibling_target(&notes_part),
                        ));
                        let notes_rels = [
                            Relationship::new("rId1", rel_types::NOTES_MASTER, sibling_target(master)),
                            Relationship::new("rId2", rel_types::SLIDE, sibling_target(&slide_part)),
                        ];
                        package.set(rels_part_name(&notes_part), write_relationships(&notes_rels));
                        package.set(notes_part.clone(), notes_xml(notes));
                        overrides.push((notes_part, CT_NOTES_SLIDE));
                    }
                    None if !notes_skipped => {
                        log::warn!("Template has no notes master; skipping speaker notes");
                        notes_skipped = true;
                    }
                    None => {}
                }
            }

            package.set(rels_part_name(&slide_part), write_relationships(&slide_rels));
            package.set(slide_part.clone(), slide_xml(slide, &layout));
            overrides.push((slide_part, CT_SLIDE));

            let rel_id = format!("rId{}", next_rel);
            next_rel += 1;
            presentation_rels.push(Relationship::new(
                rel_id.clone(),
                rel_types::SLIDE,
                format!("slides/slide{}.xml", number),
            ));
            slide_rel_ids.push(rel_id);
        }

        let presentation = append_slide_ids(package.get_str(PRESENTATION_PART)?, &slide_rel_ids)?;
        package.set(PRESENTATION_PART, presentation);
        package.set(PRESENTATION_RELS_PART, write_relationships(&presentation_rels));

        let content_types = update_content_types(package.get_str(CONTENT_TYPES_PART)?, &overrides)?;
        package.set(CONTENT_TYPES_PART, content_types);

        log::debug!(
            "Rendered {} slides starting at slide{} on {}",
            plan.len(),
            first_slide,
            layout.part_name
        );
        package.write(output)
    }
}

impl Default for PptxRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Relationships part belonging to `part_name`.
fn rels_part_name(part_name: &str) -> String {
    match part_name.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part_name),
    }
}
