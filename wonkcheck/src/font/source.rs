use std::collections::HashMap;

use skrifa::{
    instance::{Location, Size},
    outline::DrawSettings,
    GlyphId, MetadataProvider,
};
use wonkiness::{GlyphSource, InstantiationError, Outline};

use super::{GlyphEntry, Instance, SharedFontData};
use crate::OutlineRecorder;

/// Draws unhinted glyph outlines in font units at named instances.
pub struct SkrifaGlyphSource {
    data: SharedFontData,
    instances: HashMap<String, Location>,
    glyphs: HashMap<String, GlyphId>,
}

impl SkrifaGlyphSource {
    pub(super) fn new(data: SharedFontData, instances: &[Instance], glyphs: &[GlyphEntry]) -> Self {
        Self {
            data,
            instances: instances
                .iter()
                .map(|instance| (instance.name.clone(), instance.location.clone()))
                .collect(),
            glyphs: glyphs
                .iter()
                .map(|glyph| (glyph.name.clone(), glyph.id))
                .collect(),
        }
    }
}

impl GlyphSource for SkrifaGlyphSource {
    fn instantiate(&self, glyph: &str, instance: &str) -> Result<Outline, InstantiationError> {
        let location = self
            .instances
            .get(instance)
            .ok_or_else(|| InstantiationError::UnknownInstance(instance.to_owned()))?;
        let glyph_id = *self
            .glyphs
            .get(glyph)
            .ok_or_else(|| InstantiationError::UnknownGlyph(glyph.to_owned()))?;
        let font = self.data.font_ref().map_err(InstantiationError::Draw)?;
        let outline = font
            .outline_glyphs()
            .get(glyph_id)
            .ok_or_else(|| InstantiationError::UnknownGlyph(glyph.to_owned()))?;
        let mut recorder = OutlineRecorder::new();
        outline
            .draw(DrawSettings::unhinted(Size::unscaled(), location), &mut recorder)
            .map_err(|e| InstantiationError::Draw(e.to_string()))?;
        Ok(Outline::from_bez_path(&recorder.finish())?)
    }
}
