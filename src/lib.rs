pub mod accent;
pub mod bookmark;
pub mod catalog;
pub mod client;
pub mod config;
pub mod layout;
pub mod measure;
pub mod metre;
pub mod quiz;
pub mod reader;
pub mod sequencer;
pub mod similarity;
pub mod svg;
pub mod verse;

use std::collections::HashMap;
use wasm_bindgen::prelude::*;

use catalog::DEITIES;
use layout::{Item, LayoutEngine, Shape};
use svg::{NodeStyle, SvgRenderer};
use verse::{Verse, VerseRef};

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Deity wheel for the catalog, on a circle or a spiral.
pub fn render_deity_wheel(shape: Shape) -> String {
    let items: Vec<Item> = DEITIES
        .iter()
        .map(|d| Item::new(d.name, d.name).with_caption(d.epithet))
        .collect();
    let styles: HashMap<String, NodeStyle> = DEITIES
        .iter()
        .map(|d| {
            let style = NodeStyle {
                label: d.name.to_string(),
                caption: Some(d.epithet.to_string()),
                color: d.kind.style().color.to_string(),
            };
            (d.name.to_string(), style)
        })
        .collect();
    let layout = LayoutEngine::new(shape).layout(&items);
    SvgRenderer::default().render_wheel(&layout, &styles)
}

/// Render metrical notation ("LGGL<br />LLGG") as a syllable grid
#[wasm_bindgen(js_name = "metreToSvg")]
pub fn metre_to_svg(metrical_data: &str) -> Result<String, String> {
    let padas = metre::parse_metrical_data(metrical_data).map_err(|e| e.to_string())?;
    Ok(SvgRenderer::default().render_metre(&padas))
}

/// Parsed pādas as nested arrays of "L" / "G"
#[wasm_bindgen(js_name = "parseMetre")]
pub fn parse_metre(metrical_data: &str) -> Result<js_sys::Array, String> {
    let padas = metre::parse_metrical_data(metrical_data).map_err(|e| e.to_string())?;
    let rows = js_sys::Array::new();
    for pada in &padas {
        let row = js_sys::Array::new();
        for s in &pada.syllables {
            row.push(&JsValue::from_str(&s.symbol().to_string()));
        }
        rows.push(&row);
    }
    Ok(rows)
}

/// Accent classes (0 udātta, 1 anudātta, 2 svarita) for a verse
#[wasm_bindgen(js_name = "accentPattern")]
pub fn accent_pattern(mandala: i32, hymn: i32, verse: i32, len: usize) -> Result<Vec<u8>, String> {
    let r = VerseRef::new(mandala as i64, hymn as i64, verse as i64).map_err(|e| e.to_string())?;
    Ok(accent::accent_pattern(r, len)
        .into_iter()
        .map(|a| match a {
            accent::Accent::Udatta => 0,
            accent::Accent::Anudatta => 1,
            accent::Accent::Svarita => 2,
        })
        .collect())
}

#[wasm_bindgen(js_name = "accentsToSvg")]
pub fn accents_to_svg(mandala: i32, hymn: i32, verse: i32, len: usize) -> Result<String, String> {
    let r = VerseRef::new(mandala as i64, hymn as i64, verse as i64).map_err(|e| e.to_string())?;
    Ok(SvgRenderer::default().render_accents(&accent::accent_pattern(r, len)))
}

#[wasm_bindgen(js_name = "deityWheelSvg")]
pub fn deity_wheel_svg(spiral: bool) -> String {
    let shape = if spiral {
        Shape::galaxy()
    } else {
        Shape::circle(260.0)
    };
    render_deity_wheel(shape)
}

/// Similarity score (0-100) of two verses given as API JSON
#[wasm_bindgen(js_name = "similarityScore")]
pub fn similarity_score(a: &str, b: &str) -> Result<u8, String> {
    let a: Verse = serde_json::from_str(a).map_err(|e| e.to_string())?;
    let b: Verse = serde_json::from_str(b).map_err(|e| e.to_string())?;
    Ok(similarity::score(&a, &b).total())
}
