//! PPTX (Office Open XML) renderer for slide plans.
//!
//! Templates are ZIP archives of XML parts; generated slides are appended as
//! new parts and registered in the package bookkeeping.

pub mod package;
pub mod presentation;
pub mod renderer;
pub mod slide;
pub mod template;

pub use renderer::PptxRenderer;

/// Map a quick-xml error into the crate error type.
pub(crate) fn xml_error(e: quick_xml::Error) -> slidegen_core::Error {
    slidegen_core::Error::XmlError(e.to_string())
}
