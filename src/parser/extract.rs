use serde::{Deserialize, Serialize};

use super::duration::is_duration;
use super::elements::Element;

pub const NO_TITLE: &str = "(no title)";

/// CSS class tokens that identify outline pieces in the catalog markup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClassMarkers {
    pub section_title: String,
    pub item_title: String,
    /// Both tokens must be present on the same element.
    pub duration: [String; 2],
}

impl Default for ClassMarkers {
    fn default() -> Self {
        ClassMarkers {
            section_title: "section--section-title--svpHP".to_string(),
            item_title: "section--item-title--EWIuI".to_string(),
            duration: [
                "section--hidden-on-mobile---ITMr".to_string(),
                "section--item-content-summary--Aq9em".to_string(),
            ],
        }
    }
}

impl ClassMarkers {
    fn is_section_title(&self, el: &Element) -> bool {
        el.is_span() && el.has_class(&self.section_title)
    }

    fn is_item_title(&self, el: &Element) -> bool {
        el.is_span() && el.has_class(&self.item_title)
    }

    fn is_duration(&self, el: &Element) -> bool {
        el.is_span() && self.duration.iter().all(|c| el.has_class(c))
    }
}

/// Whether duration text is validated before a record is emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationMode {
    /// Only `m:ss` text produces a record.
    #[default]
    Strict,
    /// Any text on a duration element is passed through.
    Lenient,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineRecord {
    pub order: usize,
    pub course_title: String,
    pub section_title: String,
    pub item_title: String,
    pub duration_text: String,
}

#[derive(Debug, Default)]
struct ScanState {
    current_section: Option<String>,
    current_item_title: Option<String>,
    next_order: usize,
}

impl ScanState {
    fn new() -> Self {
        ScanState {
            next_order: 1,
            ..Default::default()
        }
    }
}

/// Walk elements in document order and emit one record per duration marker
/// seen under an active section.
pub fn extract(
    elements: &[Element],
    course_title: &str,
    markers: &ClassMarkers,
    mode: DurationMode,
) -> Vec<OutlineRecord> {
    let mut state = ScanState::new();
    let mut records = Vec::new();

    for el in elements {
        if markers.is_section_title(el) {
            state.current_section = Some(el.text.trim().to_string());
        } else if markers.is_item_title(el) && state.current_section.is_some() {
            state.current_item_title = Some(el.text.trim().to_string());
        }

        if !markers.is_duration(el) {
            continue;
        }
        let Some(section) = &state.current_section else {
            continue;
        };

        let duration_text = el.text.trim();
        if mode == DurationMode::Strict && !is_duration(duration_text) {
            tracing::debug!(text = duration_text, "skipping non-duration summary");
            continue;
        }

        records.push(OutlineRecord {
            order: state.next_order,
            course_title: course_title.to_string(),
            section_title: section.clone(),
            item_title: state
                .current_item_title
                .clone()
                .unwrap_or_else(|| NO_TITLE.to_string()),
            duration_text: duration_text.to_string(),
        });
        state.next_order += 1;
    }

    records
}
