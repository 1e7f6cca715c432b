//! Plain-text clipboard payload.

use crate::types::ElementSnapshot;

/// Format the selection and note for the clipboard.
///
/// Each element becomes a block headed `=== Element N ===` (1-based), with
/// `id`, `classes` and `selector` lines present only when there is something
/// to show. Blocks are separated by a blank line. A non-empty note is
/// appended under `=== Prompt ===`. An empty selection formats to nothing,
/// note or not.
pub fn format_selection(elements: &[ElementSnapshot], note: &str) -> String {
    if elements.is_empty() {
        return String::new();
    }
    let mut out = String::new();

    for (idx, element) in elements.iter().enumerate() {
        if idx > 0 {
            out.push_str("\n\n");
        }
        out.push_str(&format!("=== Element {} ===\n", idx + 1));
        out.push_str(&format!("url: {}\n", element.url));
        out.push_str(&format!("tag: {}\n", element.tag));
        if !element.id.is_empty() {
            out.push_str(&format!("id: {}\n", element.id));
        }
        if !element.classes.is_empty() {
            let classes: Vec<&str> = element.classes.iter().map(|c| c.as_str()).collect();
            out.push_str(&format!("classes: {}\n", classes.join(" ")));
        }
        if let Some(selector) = &element.selector {
            out.push_str(&format!("selector: {selector}\n"));
        }
        out.push_str("\nHTML:\n");
        out.push_str(&element.html);
    }

    if !note.is_empty() {
        out.push_str("\n\n=== Prompt ===\n");
        out.push_str(note);
    }

    out
}
