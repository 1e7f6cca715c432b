//! Overlay markup generation.
//!
//! The banner and dialog are regenerated wholesale from session state on
//! every change. There is no diffing: the host swaps the container contents
//! and rewires the `data-*` controls each time. Keep it that way; the
//! overlay is small and the page under it is the expensive part.

use markdown_weaver_escape::escape_html;

use crate::config::SnapConfig;
use crate::platform::OverlayMarkup;
use crate::types::{ElementSnapshot, Position};

/// Assumed dialog footprint for random placement.
pub const DIALOG_WIDTH: f64 = 480.0;
pub const DIALOG_HEIGHT: f64 = 500.0;
/// Minimum distance from the viewport edge for random placement.
pub const DIALOG_PADDING: f64 = 20.0;

const FONT_STACK: &str = "-apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif";
const MONO_STACK: &str = "ui-monospace, SFMono-Regular, Consolas, monospace";

/// Everything the banner shows.
#[derive(Debug, Clone, Copy)]
pub struct BannerState<'a> {
    pub config: &'a SnapConfig,
    pub count: usize,
    pub paused: bool,
}

/// Everything the dialog shows.
#[derive(Debug, Clone, Copy)]
pub struct DialogState<'a> {
    pub config: &'a SnapConfig,
    pub elements: &'a [ElementSnapshot],
    pub note: &'a str,
    pub position: Position,
    /// Picking is still running, so the header offers "Done".
    pub picking: bool,
}

fn push_escaped(out: &mut String, text: &str) {
    // Writing into a String cannot fail.
    let _ = escape_html(&mut *out, text);
}

fn escaped(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    push_escaped(&mut out, text);
    out
}

/// Banner markup. The container is fixed at the top center of the viewport
/// and ignores the pointer except for the pause toggle.
pub fn banner_markup(state: BannerState<'_>) -> OverlayMarkup {
    let BannerState {
        config,
        count,
        paused,
    } = state;

    let style = format!(
        "position: fixed; top: 16px; left: 50%; transform: translateX(-50%); \
         background-color: #000000; color: #ffffff; padding: 8px 16px; \
         border-radius: 9999px; border: 1px solid rgba(255,255,255,0.1); \
         box-shadow: 0 4px 16px rgba(0,0,0,0.4); backdrop-filter: blur(12px); \
         z-index: 10000; font-size: 13px; font-weight: 500; font-family: {FONT_STACK}; \
         pointer-events: none; text-align: center; letter-spacing: -0.01em; \
         display: flex; align-items: center;"
    );

    let mut html = String::new();
    html.push_str(
        "<button data-toggle-pause style=\"background: transparent; border: none; \
         cursor: pointer; padding: 0 8px 0 0; margin-right: 8px; \
         border-right: 1px solid rgba(255,255,255,0.2); color: white; font-size: 13px; \
         font-weight: 500; display: flex; align-items: center; gap: 6px; opacity: 0.7; \
         pointer-events: auto;\">",
    );
    html.push_str(if paused { "▶ Resume" } else { "⏸ Pause" });
    html.push_str("</button>");

    html.push_str("<div style=\"display: flex; align-items: center; gap: 6px;\">");
    html.push_str("<span style=\"opacity: 0.7\">");
    html.push_str(if paused { "Paused" } else { "Click to select" });
    html.push_str("</span> • <span style=\"color: ");
    push_escaped(&mut html, &config.selected_color);
    html.push_str("\">");
    html.push_str(&config.count_label(count));
    html.push_str("</span>");
    if !config.auto_open_dialog {
        html.push_str("<span style=\"opacity: 0.7\"> • Enter to finish</span>");
    }
    html.push_str(" • <span style=\"opacity: 0.7\">Esc to cancel</span></div>");

    OverlayMarkup {
        class: String::new(),
        style,
        html,
    }
}

/// Dialog markup: header with drag handle, element cards, note, actions.
pub fn dialog_markup(state: DialogState<'_>) -> OverlayMarkup {
    let DialogState {
        config,
        elements,
        note,
        position,
        picking,
    } = state;
    let count = elements.len();

    let class = if config.class_name.is_empty() {
        "selection-prompt-box".to_string()
    } else {
        format!("selection-prompt-box {}", escaped(&config.class_name))
    };
    let style = format!(
        "position: fixed; left: {}px; top: {}px; z-index: 9999; background-color: #ffffff; \
         border: 1px solid rgba(0,0,0,0.08); border-radius: 12px; padding: 0; \
         box-shadow: 0 8px 32px rgba(0,0,0,0.12); width: {DIALOG_WIDTH}px; max-height: 85vh; \
         overflow: hidden; font-family: {FONT_STACK}; display: flex; flex-direction: column;",
        position.x, position.y
    );

    let mut html = String::with_capacity(4096 + count * 2048);

    // Header
    html.push_str(
        "<div data-drag-handle style=\"padding: 16px 20px; border-bottom: 1px solid rgba(0,0,0,0.06); \
         display: flex; justify-content: space-between; align-items: center; flex-shrink: 0; \
         cursor: move; user-select: none;\"><div>\
         <h3 style=\"margin: 0; font-size: 14px; font-weight: 600; color: #000000; \
         letter-spacing: -0.01em;\">Selected Elements</h3>\
         <p style=\"margin: 2px 0 0 0; font-size: 12px; color: #666666; font-weight: 400;\">",
    );
    html.push_str(&config.count_label(count));
    html.push_str(if count == 1 { " element" } else { " elements" });
    html.push_str("</p></div><div style=\"display: flex; gap: 8px; align-items: center;\">");
    if picking {
        html.push_str(
            "<button data-finish-btn style=\"background: #000000; border: none; font-size: 12px; \
             cursor: pointer; color: white; padding: 6px 12px; border-radius: 6px; \
             font-weight: 500;\">Done</button>",
        );
    }
    html.push_str(
        "<button data-close-btn style=\"background: transparent; border: none; font-size: 18px; \
         cursor: pointer; color: #666666; padding: 4px; width: 28px; height: 28px; display: flex; \
         align-items: center; justify-content: center; border-radius: 6px;\">×</button></div></div>",
    );

    // Cards
    html.push_str(
        "<div data-elements-list style=\"padding: 12px; max-height: 320px; overflow: auto; flex-grow: 1;\">",
    );
    for (idx, element) in elements.iter().enumerate() {
        push_card(&mut html, idx, element);
    }
    html.push_str("</div>");

    // Note
    html.push_str(
        "<div style=\"padding: 12px 20px; border-top: 1px solid rgba(0,0,0,0.06); flex-shrink: 0;\">\
         <label for=\"prompt-textarea\" style=\"display: block; margin-bottom: 8px; font-size: 12px; \
         font-weight: 500; color: #000000;\">Additional Context</label>\
         <textarea id=\"prompt-textarea\" data-prompt-textarea placeholder=\"Add notes or context...\" \
         style=\"width: 100%; min-height: 64px; padding: 10px 12px; border: 1px solid rgba(0,0,0,0.1); \
         border-radius: 8px; font-size: 13px; font-family: inherit; resize: vertical; \
         box-sizing: border-box; background-color: #fafafa; color: #000000; outline: none;\">",
    );
    push_escaped(&mut html, note);
    html.push_str("</textarea></div>");

    // Footer
    html.push_str(
        "<div style=\"padding: 12px 20px 16px; border-top: 1px solid rgba(0,0,0,0.06); \
         display: flex; gap: 8px; flex-shrink: 0;\">",
    );
    if config.has_room(count) {
        html.push_str(
            "<button data-add-more-btn style=\"flex: 1; padding: 10px 16px; background-color: #fafafa; \
             color: #000000; border: 1px solid rgba(0,0,0,0.1); border-radius: 8px; font-size: 13px; \
             font-weight: 500; cursor: pointer;\">Add More</button>",
        );
    }
    html.push_str(
        "<button data-clear-all-btn style=\"flex: 1; padding: 10px 16px; background-color: #fafafa; \
         color: #ef4444; border: 1px solid rgba(0,0,0,0.1); border-radius: 8px; font-size: 13px; \
         font-weight: 500; cursor: pointer;\">Clear All</button>\
         <button data-copy-button style=\"flex: 2; padding: 10px 16px; background-color: #000000; \
         color: #ffffff; border: none; border-radius: 8px; font-size: 13px; font-weight: 500; \
         cursor: pointer;\">Copy to Clipboard</button></div>",
    );

    OverlayMarkup { class, style, html }
}

const LABEL_STYLE: &str = "color: #666666; font-size: 11px; font-weight: 500;";

fn push_field(html: &mut String, label: &str, value: &str, block: bool) {
    if block {
        html.push_str("<div style=\"margin-bottom: 6px;\"><span style=\"");
        html.push_str(LABEL_STYLE);
        html.push_str(" display: block; margin-bottom: 4px;\">");
    } else {
        html.push_str(
            "<div style=\"margin-bottom: 6px; display: flex; align-items: center; gap: 6px;\"><span style=\"",
        );
        html.push_str(LABEL_STYLE);
        html.push_str("\">");
    }
    html.push_str(label);
    html.push_str(":</span><code style=\"background-color: #ffffff; padding: 3px 8px; border-radius: 6px; font-family: ");
    html.push_str(MONO_STACK);
    html.push_str("; border: 1px solid rgba(0,0,0,0.06); font-weight: 500;");
    if block {
        html.push_str(" font-size: 10px; word-break: break-all; display: block;");
    } else {
        html.push_str(" font-size: 11px;");
    }
    html.push_str("\">");
    push_escaped(html, value);
    html.push_str("</code></div>");
}

fn push_card(html: &mut String, idx: usize, element: &ElementSnapshot) {
    html.push_str(
        "<div style=\"margin-bottom: 8px; padding: 12px; background-color: #fafafa; \
         border: 1px solid rgba(0,0,0,0.06); border-radius: 8px;\">\
         <div style=\"display: flex; justify-content: space-between; align-items: center; margin-bottom: 10px;\">\
         <div style=\"font-size: 11px; font-weight: 600; color: #666666; text-transform: uppercase; \
         letter-spacing: 0.05em;\">Element ",
    );
    html.push_str(&(idx + 1).to_string());
    html.push_str("</div><button data-remove-btn=\"");
    html.push_str(&idx.to_string());
    html.push_str(
        "\" style=\"background: transparent; border: 1px solid rgba(0,0,0,0.1); color: #666666; \
         padding: 4px 10px; border-radius: 6px; font-size: 11px; cursor: pointer; \
         font-weight: 500;\">Remove</button></div><div style=\"font-size: 12px; color: #000000;\">",
    );

    push_field(html, "URL", &element.url, true);
    push_field(html, "Tag", &element.tag, false);
    if !element.id.is_empty() {
        push_field(html, "ID", &element.id, false);
    }
    if !element.classes.is_empty() {
        html.push_str("<div style=\"margin-bottom: 6px;\"><span style=\"");
        html.push_str(LABEL_STYLE);
        html.push_str(
            " display: block; margin-bottom: 4px;\">Classes:</span>\
             <div style=\"display: flex; flex-wrap: wrap; gap: 4px;\">",
        );
        for class in &element.classes {
            html.push_str(
                "<code style=\"background-color: #ffffff; padding: 2px 6px; border-radius: 4px; \
                 font-size: 10px; border: 1px solid rgba(0,0,0,0.06); font-weight: 500; font-family: ",
            );
            html.push_str(MONO_STACK);
            html.push_str(";\">");
            push_escaped(html, class);
            html.push_str("</code>");
        }
        html.push_str("</div></div>");
    }
    if let Some(selector) = &element.selector {
        push_field(html, "Selector", selector, true);
    }

    html.push_str(
        "<div style=\"margin-top: 10px; padding: 10px; background-color: #ffffff; border-radius: 6px; \
         border: 1px solid rgba(0,0,0,0.06);\"><span style=\"color: #666666; font-size: 10px; \
         font-weight: 600; text-transform: uppercase; letter-spacing: 0.05em; display: block; \
         margin-bottom: 6px;\">HTML</span><pre style=\"margin: 0; white-space: pre-wrap; \
         word-break: break-word; font-size: 10px; line-height: 1.5; color: #000000; font-family: ",
    );
    html.push_str(MONO_STACK);
    html.push_str(";\">");
    push_escaped(html, &element.html);
    html.push_str("</pre></div></div></div>");
}

/// Random on-screen dialog position, at least [`DIALOG_PADDING`] from the
/// top-left edges and, viewport permitting, clear of the right and bottom.
pub fn random_position(viewport_width: f64, viewport_height: f64, rx: f64, ry: f64) -> Position {
    let span_x = (viewport_width - DIALOG_WIDTH - DIALOG_PADDING).max(0.0);
    let span_y = (viewport_height - DIALOG_HEIGHT - DIALOG_PADDING).max(0.0);
    Position::new(
        (rx * span_x).floor().max(DIALOG_PADDING),
        (ry * span_y).floor().max(DIALOG_PADDING),
    )
}
