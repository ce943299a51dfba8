//! # Text layers
//!
//! A [`TextLayer`] is a positioned, styled block of text drawn over the background image.
//! Layers are only ever changed through a [`LayerPatch`], a partial update naming the layer
//! by ID. Patch setters clamp values into their valid ranges as the patch is built, so
//! merging a patch into a layer never needs to reject anything.

use crate::{color::Rgba8, id::LayerID, util::FiniteF32};

/// Width and height may never shrink below this many pixels.
pub const MIN_SIZE: f32 = 20.0;
pub const MIN_FONT_SIZE: f32 = 1.0;
pub const LINE_HEIGHT_RANGE: std::ops::RangeInclusive<f32> = 0.5..=4.0;
pub const LETTER_SPACING_RANGE: std::ops::RangeInclusive<f32> = -5.0..=20.0;

#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Debug,
    Default,
    serde::Serialize,
    serde::Deserialize,
    strum::AsRefStr,
    strum::EnumString,
    strum::Display,
)]
pub enum FontStyle {
    #[default]
    #[serde(rename = "normal")]
    #[strum(serialize = "normal")]
    Normal,
    #[serde(rename = "bold")]
    #[strum(serialize = "bold")]
    Bold,
    #[serde(rename = "italic")]
    #[strum(serialize = "italic")]
    Italic,
    #[serde(rename = "bold italic", alias = "italic bold")]
    #[strum(to_string = "bold italic", serialize = "italic bold")]
    BoldItalic,
}
impl FontStyle {
    #[must_use]
    pub fn from_parts(bold: bool, italic: bool) -> Self {
        match (bold, italic) {
            (false, false) => Self::Normal,
            (true, false) => Self::Bold,
            (false, true) => Self::Italic,
            (true, true) => Self::BoldItalic,
        }
    }
    #[must_use]
    pub fn is_bold(self) -> bool {
        matches!(self, Self::Bold | Self::BoldItalic)
    }
    #[must_use]
    pub fn is_italic(self) -> bool {
        matches!(self, Self::Italic | Self::BoldItalic)
    }
    /// Flip boldness, keeping italics.
    #[must_use]
    pub fn toggle_bold(self) -> Self {
        Self::from_parts(!self.is_bold(), self.is_italic())
    }
    /// Flip italics, keeping boldness.
    #[must_use]
    pub fn toggle_italic(self) -> Self {
        Self::from_parts(self.is_bold(), !self.is_italic())
    }
}

#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Debug,
    Default,
    serde::Serialize,
    serde::Deserialize,
    strum::AsRefStr,
    strum::EnumString,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

fn default_line_height() -> f32 {
    1.0
}

#[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLayer {
    pub id: LayerID,
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub font_size: f32,
    pub font_family: String,
    pub fill: Rgba8,
    /// Degrees, clockwise, about `(x, y)`.
    pub rotation: f32,
    /// Bounding box in unrotated local space.
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub font_style: FontStyle,
    #[serde(default)]
    pub align: Align,
    pub opacity: f32,
    /// Locked layers can't be dragged or transformed.
    #[serde(default)]
    pub locked: bool,
    #[serde(default = "default_line_height")]
    pub line_height: f32,
    #[serde(default)]
    pub letter_spacing: f32,
}

impl TextLayer {
    /// A fresh layer at `(x, y)` with the default content and styling.
    #[must_use]
    pub fn new_at(id: LayerID, x: f32, y: f32) -> Self {
        Self {
            id,
            x,
            y,
            text: "Double-click to edit".to_owned(),
            font_size: 36.0,
            font_family: "Inter".to_owned(),
            fill: Rgba8::rgb(0x11, 0x18, 0x27),
            rotation: 0.0,
            width: 300.0,
            height: 60.0,
            font_style: FontStyle::Normal,
            align: Align::Left,
            opacity: 1.0,
            locked: false,
            line_height: default_line_height(),
            letter_spacing: 0.0,
        }
    }
    /// Pull every numeric field back into its valid range, as a patch would have.
    /// Non-finite values fall back to the defaults. Returns true if anything changed.
    pub fn sanitize(&mut self) -> bool {
        let template = Self::new_at(self.id, 60.0, 60.0);
        let before = self.clone();
        let fix = |value: f32, fallback: f32, min: f32, max: f32| {
            FiniteF32::or(value, fallback).clamp(min, max)
        };
        self.x = FiniteF32::or(self.x, template.x);
        self.y = FiniteF32::or(self.y, template.y);
        self.rotation = FiniteF32::or(self.rotation, template.rotation);
        self.font_size = fix(self.font_size, template.font_size, MIN_FONT_SIZE, f32::MAX);
        self.width = fix(self.width, template.width, MIN_SIZE, f32::MAX);
        self.height = fix(self.height, template.height, MIN_SIZE, f32::MAX);
        self.opacity = fix(self.opacity, template.opacity, 0.0, 1.0);
        self.line_height = fix(
            self.line_height,
            template.line_height,
            *LINE_HEIGHT_RANGE.start(),
            *LINE_HEIGHT_RANGE.end(),
        );
        self.letter_spacing = fix(
            self.letter_spacing,
            template.letter_spacing,
            *LETTER_SPACING_RANGE.start(),
            *LETTER_SPACING_RANGE.end(),
        );
        *self != before
    }
}

/// Create a layer with the default template, offset from the default origin by `offset`
/// on both axes.
#[must_use]
pub fn create_default_layer(id: LayerID, offset: f32) -> TextLayer {
    TextLayer::new_at(id, 60.0 + offset, 60.0 + offset)
}

/// Merge `patch` into the layer it names. Returns `false` (and changes nothing) if no layer
/// with that ID exists.
pub fn apply_patch(layers: &mut [TextLayer], patch: &LayerPatch) -> bool {
    match layers.iter_mut().find(|layer| layer.id == patch.id) {
        Some(layer) => {
            patch.apply_to(layer);
            true
        }
        None => false,
    }
}

/// A partial update of one layer. Absent fields are left untouched when applied.
#[derive(Clone, PartialEq, Debug)]
pub struct LayerPatch {
    id: LayerID,
    x: Option<f32>,
    y: Option<f32>,
    text: Option<String>,
    font_size: Option<f32>,
    font_family: Option<String>,
    fill: Option<Rgba8>,
    rotation: Option<f32>,
    width: Option<f32>,
    height: Option<f32>,
    font_style: Option<FontStyle>,
    align: Option<Align>,
    opacity: Option<f32>,
    locked: Option<bool>,
    line_height: Option<f32>,
    letter_spacing: Option<f32>,
}

/// Keep only finite values. Gesture math can hand us NaN when a scale collapses.
fn finite(val: f32) -> Option<f32> {
    let finite = FiniteF32::new(val).ok().map(FiniteF32::get);
    if finite.is_none() {
        log::warn!("ignoring non-finite layer value {val}");
    }
    finite
}

impl LayerPatch {
    #[must_use]
    pub fn new(id: LayerID) -> Self {
        Self {
            id,
            x: None,
            y: None,
            text: None,
            font_size: None,
            font_family: None,
            fill: None,
            rotation: None,
            width: None,
            height: None,
            font_style: None,
            align: None,
            opacity: None,
            locked: None,
            line_height: None,
            letter_spacing: None,
        }
    }
    #[must_use]
    pub fn id(&self) -> LayerID {
        self.id
    }
    /// True if applying this patch can't change anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::new(self.id)
    }
    #[must_use]
    pub fn position(mut self, x: f32, y: f32) -> Self {
        self.x = finite(x);
        self.y = finite(y);
        self
    }
    #[must_use]
    pub fn x(mut self, x: f32) -> Self {
        self.x = finite(x);
        self
    }
    #[must_use]
    pub fn y(mut self, y: f32) -> Self {
        self.y = finite(y);
        self
    }
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
    #[must_use]
    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = finite(size).map(|size| size.max(MIN_FONT_SIZE));
        self
    }
    #[must_use]
    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }
    #[must_use]
    pub fn fill(mut self, fill: Rgba8) -> Self {
        self.fill = Some(fill);
        self
    }
    #[must_use]
    pub fn rotation(mut self, degrees: f32) -> Self {
        self.rotation = finite(degrees);
        self
    }
    /// Set the bounding size, floored at [`MIN_SIZE`].
    #[must_use]
    pub fn size(self, width: f32, height: f32) -> Self {
        self.width(width).height(height)
    }
    #[must_use]
    pub fn width(mut self, width: f32) -> Self {
        self.width = finite(width).map(|w| w.max(MIN_SIZE));
        self
    }
    #[must_use]
    pub fn height(mut self, height: f32) -> Self {
        self.height = finite(height).map(|h| h.max(MIN_SIZE));
        self
    }
    #[must_use]
    pub fn font_style(mut self, style: FontStyle) -> Self {
        self.font_style = Some(style);
        self
    }
    #[must_use]
    pub fn align(mut self, align: Align) -> Self {
        self.align = Some(align);
        self
    }
    #[must_use]
    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = finite(opacity).map(|o| o.clamp(0.0, 1.0));
        self
    }
    #[must_use]
    pub fn locked(mut self, locked: bool) -> Self {
        self.locked = Some(locked);
        self
    }
    #[must_use]
    pub fn line_height(mut self, multiplier: f32) -> Self {
        self.line_height = finite(multiplier)
            .map(|m| m.clamp(*LINE_HEIGHT_RANGE.start(), *LINE_HEIGHT_RANGE.end()));
        self
    }
    #[must_use]
    pub fn letter_spacing(mut self, spacing: f32) -> Self {
        self.letter_spacing = finite(spacing)
            .map(|s| s.clamp(*LETTER_SPACING_RANGE.start(), *LETTER_SPACING_RANGE.end()));
        self
    }
    /// Set a field from its textual form, as a property panel or command line would.
    pub fn set(self, field: LayerField, value: &str) -> Result<Self, FieldError> {
        let number = || -> Result<f32, FieldError> {
            value
                .parse::<FiniteF32>()
                .map(FiniteF32::get)
                .map_err(|err| FieldError::Number(field, err))
        };
        Ok(match field {
            LayerField::X => self.x(number()?),
            LayerField::Y => self.y(number()?),
            LayerField::Text => self.text(value),
            LayerField::FontSize => self.font_size(number()?),
            LayerField::FontFamily => {
                let family = value.trim();
                if family.is_empty() {
                    return Err(FieldError::Empty(field));
                }
                self.font_family(family)
            }
            LayerField::Fill => self.fill(value.parse().map_err(FieldError::Color)?),
            LayerField::Rotation => self.rotation(number()?),
            LayerField::Width => self.width(number()?),
            LayerField::Height => self.height(number()?),
            LayerField::FontStyle => self.font_style(
                value
                    .trim()
                    .parse()
                    .map_err(|_| FieldError::Variant(field, value.to_owned()))?,
            ),
            LayerField::Align => self.align(
                value
                    .trim()
                    .parse()
                    .map_err(|_| FieldError::Variant(field, value.to_owned()))?,
            ),
            LayerField::Opacity => self.opacity(number()?),
            LayerField::Locked => self.locked(
                value
                    .trim()
                    .parse()
                    .map_err(|_| FieldError::Variant(field, value.to_owned()))?,
            ),
            LayerField::LineHeight => self.line_height(number()?),
            LayerField::LetterSpacing => self.letter_spacing(number()?),
        })
    }
    /// Overwrite every field present in the patch. The ID is never changed.
    pub fn apply_to(&self, layer: &mut TextLayer) {
        debug_assert_eq!(layer.id, self.id);
        fn merge<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(value) = value {
                target.clone_from(value);
            }
        }
        merge(&mut layer.x, &self.x);
        merge(&mut layer.y, &self.y);
        merge(&mut layer.text, &self.text);
        merge(&mut layer.font_size, &self.font_size);
        merge(&mut layer.font_family, &self.font_family);
        merge(&mut layer.fill, &self.fill);
        merge(&mut layer.rotation, &self.rotation);
        merge(&mut layer.width, &self.width);
        merge(&mut layer.height, &self.height);
        merge(&mut layer.font_style, &self.font_style);
        merge(&mut layer.align, &self.align);
        merge(&mut layer.opacity, &self.opacity);
        merge(&mut layer.locked, &self.locked);
        merge(&mut layer.line_height, &self.line_height);
        merge(&mut layer.letter_spacing, &self.letter_spacing);
    }
}

/// Names of the user-editable layer fields.
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Debug,
    strum::EnumString,
    strum::AsRefStr,
    strum::Display,
    strum::EnumIter,
)]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum LayerField {
    X,
    Y,
    Text,
    FontSize,
    FontFamily,
    Fill,
    Rotation,
    Width,
    Height,
    FontStyle,
    Align,
    Opacity,
    Locked,
    LineHeight,
    LetterSpacing,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("{0}: {1}")]
    Number(LayerField, crate::util::FiniteF32Error),
    #[error("fill: {0}")]
    Color(#[source] crate::color::ColorParseError),
    #[error("{0}: unknown value {1:?}")]
    Variant(LayerField, String),
    #[error("{0} may not be empty")]
    Empty(LayerField),
}
