//! Text layout of a single layer, in layer-local pixels.
//!
//! Paragraphs are split on `\n` and greedily word-wrapped at the layer's width. A word that
//! doesn't fit on a line by itself is broken between graphemes. Lines that fall entirely past
//! the layer's height are dropped, but the first line always renders.

use captioner_core::{Align, TextLayer};
use rustybuzz::ttf_parser::GlyphId;
use unicode_segmentation::UnicodeSegmentation;

/// A glyph and the pen position of its origin, on the baseline.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlacedGlyph {
    pub glyph: GlyphId,
    pub origin: [f32; 2],
}

#[derive(Clone, Debug, Default)]
pub struct TextLayout {
    pub glyphs: Vec<PlacedGlyph>,
    /// Pixels per font unit.
    pub scale: f32,
    pub lines: usize,
}

struct Shaper<'face> {
    face: &'face rustybuzz::Face<'face>,
    scale: f32,
    letter_spacing: f32,
}
impl Shaper<'_> {
    fn shape(&self, text: &str) -> rustybuzz::GlyphBuffer {
        let mut buffer = rustybuzz::UnicodeBuffer::new();
        buffer.push_str(text);
        buffer.guess_segment_properties();
        rustybuzz::shape(self.face, &[], buffer)
    }
    #[allow(clippy::cast_precision_loss)]
    fn advance(&self, position: &rustybuzz::GlyphPosition) -> f32 {
        position.x_advance as f32 * self.scale + self.letter_spacing
    }
    fn width(&self, text: &str) -> f32 {
        self.shape(text)
            .glyph_positions()
            .iter()
            .map(|position| self.advance(position))
            .sum()
    }
}

/// Split a paragraph into lines no wider than `max_width`, as measured by `measure`.
pub fn wrap<'text>(
    paragraph: &'text str,
    max_width: f32,
    measure: impl Fn(&str) -> f32,
) -> Vec<&'text str> {
    let mut lines = Vec::new();
    // Byte range of the line being built.
    let mut start = 0;
    let mut end = 0;
    let mut width = 0.0;
    for (index, token) in paragraph.split_word_bound_indices() {
        let blank = token.trim().is_empty();
        if end == start && blank && !lines.is_empty() {
            // Whitespace at the start of a wrapped line.
            start = index + token.len();
            end = start;
            continue;
        }
        let token_width = measure(token);
        if end > start && !blank && width + token_width > max_width {
            lines.push(paragraph[start..end].trim_end());
            start = index;
            end = index;
            width = 0.0;
        }
        if end == start && !blank && token_width > max_width {
            for (offset, grapheme) in token.grapheme_indices(true) {
                let at = index + offset;
                let grapheme_width = measure(grapheme);
                if at > start && width + grapheme_width > max_width {
                    lines.push(&paragraph[start..at]);
                    start = at;
                    width = 0.0;
                }
                width += grapheme_width;
            }
        } else {
            width += token_width;
        }
        end = index + token.len();
    }
    lines.push(paragraph[start..end.max(start)].trim_end());
    lines
}

/// Shape and position all of a layer's text with `face`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn layout(face: &rustybuzz::Face, layer: &TextLayer) -> TextLayout {
    let scale = layer.font_size / face.units_per_em() as f32;
    let shaper = Shaper {
        face,
        scale,
        letter_spacing: layer.letter_spacing,
    };
    let line_advance = layer.font_size * layer.line_height;
    let ascender = f32::from(face.ascender()) * scale;
    let descender = f32::from(face.descender()) * scale;
    // Glyphs sit centered in their line box.
    let baseline_offset = (line_advance - (ascender - descender)) / 2.0 + ascender;

    let mut out = TextLayout {
        scale,
        ..TextLayout::default()
    };
    let lines = layer
        .text
        .split('\n')
        .flat_map(|paragraph| {
            wrap(paragraph.trim_end_matches('\r'), layer.width, |text| {
                shaper.width(text)
            })
        });
    for line in lines {
        let top = out.lines as f32 * line_advance;
        if out.lines > 0 && top + line_advance > layer.height {
            break;
        }
        let buffer = shaper.shape(line);
        let line_width: f32 = buffer
            .glyph_positions()
            .iter()
            .map(|position| shaper.advance(position))
            .sum();
        let mut pen = match layer.align {
            Align::Left => 0.0,
            Align::Center => (layer.width - line_width) / 2.0,
            Align::Right => layer.width - line_width,
        };
        let baseline = top + baseline_offset;
        for (info, position) in buffer.glyph_infos().iter().zip(buffer.glyph_positions()) {
            // rustybuzz glyph ids are u16 stored as u32.
            let glyph = GlyphId(u16::try_from(info.glyph_id).unwrap_or_default());
            out.glyphs.push(PlacedGlyph {
                glyph,
                origin: [
                    pen + position.x_offset as f32 * scale,
                    baseline - position.y_offset as f32 * scale,
                ],
            });
            pen += shaper.advance(position);
        }
        out.lines += 1;
    }
    out
}
