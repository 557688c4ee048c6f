//! Barcode generation for book labels and client badges.
//!
//! EAN-13 for book ISBNs and Code 128 (set B) for client short codes, both
//! rendered as standalone SVG documents. Encoders produce a flat module
//! sequence (true = bar, false = space); rendering is shared.

pub mod code128;
pub mod ean13;

/// Width of one module in SVG user units
const MODULE_WIDTH: u32 = 2;
/// Quiet zone on each side, in modules
const QUIET_ZONE: u32 = 10;

/// Render a module sequence as `<rect>` elements at the given origin.
/// Consecutive bars are merged into a single rectangle.
pub fn modules_to_rects(modules: &[bool], x0: u32, y0: u32, height: u32) -> String {
    let mut out = String::new();
    let mut x = x0;
    let mut run = 0u32;
    for &bar in modules {
        if bar {
            run += 1;
        } else {
            if run > 0 {
                out.push_str(&format!(
                    "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"/>",
                    x - run * MODULE_WIDTH,
                    y0,
                    run * MODULE_WIDTH,
                    height
                ));
                run = 0;
            }
        }
        x += MODULE_WIDTH;
    }
    if run > 0 {
        out.push_str(&format!(
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"/>",
            x - run * MODULE_WIDTH,
            y0,
            run * MODULE_WIDTH,
            height
        ));
    }
    out
}

/// Wrap a module sequence in a complete SVG document with a quiet zone and
/// a human-readable caption under the bars.
pub fn render_svg(modules: &[bool], caption: &str) -> String {
    let bar_height = 120u32;
    let caption_height = 24u32;
    let width = (modules.len() as u32 + 2 * QUIET_ZONE) * MODULE_WIDTH;
    let height = bar_height + caption_height;

    let rects = modules_to_rects(modules, QUIET_ZONE * MODULE_WIDTH, 0, bar_height);

    format!(
        concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>",
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" ",
            "viewBox=\"0 0 {w} {h}\">",
            "<rect width=\"{w}\" height=\"{h}\" fill=\"white\"/>",
            "<g fill=\"black\">{rects}</g>",
            "<text x=\"{cx}\" y=\"{cy}\" text-anchor=\"middle\" ",
            "font-family=\"monospace\" font-size=\"16\">{caption}</text>",
            "</svg>"
        ),
        w = width,
        h = height,
        rects = rects,
        cx = width / 2,
        cy = bar_height + 18,
        caption = caption,
    )
}
