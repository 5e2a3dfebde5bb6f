pub mod duration;
pub mod elements;
pub mod extract;

use extract::{ClassMarkers, DurationMode, OutlineRecord};

/// Two-pass pipeline: markup → flat elements → outline records.
pub fn process_document(
    html: &str,
    course_title: &str,
    markers: &ClassMarkers,
    mode: DurationMode,
) -> Vec<OutlineRecord> {
    let elements = elements::flatten(html);
    tracing::debug!(elements = elements.len(), "flattened document");
    extract::extract(&elements, course_title, markers, mode)
}
