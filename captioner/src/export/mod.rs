//! # Export
//!
//! Flattens the background and every layer, back to front, into a PNG at canvas size.

pub mod layout;
pub mod raster;

use captioner_core::{state::transform::Matrix, Document, TextLayer};

use crate::fonts::FontBook;

pub const DEFAULT_FILE_NAME: &str = "edited-image.png";

#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("Upload an image before exporting.")]
    NoImage,
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// Draw one layer onto `target`. Returns false if no face could render it.
pub fn draw_layer(target: &mut image::RgbaImage, fonts: &FontBook, layer: &TextLayer) -> bool {
    let edges = fonts.with_face(&layer.font_family, layer.font_style, |face| {
        let text = layout::layout(face, layer);
        let mut builder = raster::EdgeBuilder::new(Matrix::for_layer(layer), text.scale);
        for glyph in &text.glyphs {
            builder.add_glyph(face, glyph.glyph, glyph.origin);
        }
        builder.finish()
    });
    let Some(edges) = edges else {
        log::warn!("skipping layer {}, no font available", layer.id);
        return false;
    };
    let coverage = raster::coverage(&edges, target.width(), target.height());
    raster::composite(target, &coverage, layer.fill, layer.opacity);
    true
}

/// Render the document over `background`, scaled to the canvas size if it differs.
#[must_use]
pub fn render(
    background: &image::RgbaImage,
    document: &Document,
    fonts: &FontBook,
) -> image::RgbaImage {
    let dims = document.canvas_dimensions;
    let mut canvas = if background.dimensions() == (dims.width, dims.height) {
        background.clone()
    } else {
        log::warn!(
            "background is {:?}, canvas is {dims:?}, resizing",
            background.dimensions()
        );
        image::imageops::resize(
            background,
            dims.width,
            dims.height,
            image::imageops::FilterType::Triangle,
        )
    };
    for layer in &document.layers {
        draw_layer(&mut canvas, fonts, layer);
    }
    canvas
}

/// Render and write a PNG to `path`. Refuses without a background image.
pub fn export(
    background: Option<&image::RgbaImage>,
    document: &Document,
    fonts: &FontBook,
    path: &std::path::Path,
) -> Result<(), ExportError> {
    let background = match background {
        Some(background) if document.has_image() => background,
        _ => return Err(ExportError::NoImage),
    };
    let canvas = render(background, document, fonts);
    canvas.save_with_format(path, image::ImageFormat::Png)?;
    log::info!("exported {} layers to {}", document.layers.len(), path.display());
    Ok(())
}
