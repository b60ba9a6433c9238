use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use skrifa::{
    instance::Location,
    raw::{tables::glyf::Glyph, types::Tag, FontRef, TableProvider},
    GlyphId, GlyphNames, MetadataProvider,
};
use thiserror::Error;

mod source;

pub use source::SkrifaGlyphSource;

/// Name given to the single instance of a font without named instances.
pub const DEFAULT_INSTANCE: &str = "default";

/// Errors that prevent a font from being checked at all.
#[derive(Debug, Error)]
pub enum FontError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is not a font file: {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },
}

/// A named position in the design space of a font.
#[derive(Clone, Debug)]
pub struct Instance {
    name: String,
    location: Location,
    settings: Vec<(Tag, f32)>,
}

impl Instance {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// User space coordinates of the instance, one per axis.
    pub fn settings(&self) -> &[(Tag, f32)] {
        &self.settings
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.settings.is_empty() {
            write!(f, " (")?;
            for (i, (tag, value)) in self.settings.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{tag}={value}")?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// A glyph and whether it is built from components.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphEntry {
    pub name: String,
    pub id: GlyphId,
    pub is_composite: bool,
}

/// A memory mapped font file with its instances and glyph names resolved.
///
/// Only the first font of a collection is read.
pub struct Font {
    path: PathBuf,
    data: SharedFontData,
    instances: Vec<Instance>,
    glyphs: Vec<GlyphEntry>,
}

impl Font {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, FontError> {
        let path = path.as_ref().to_owned();
        let io_error = |source| FontError::Io {
            path: path.clone(),
            source,
        };
        let file = std::fs::File::open(&path).map_err(io_error)?;
        // The file must not be modified while it is mapped
        let map = unsafe { memmap2::Mmap::map(&file) }.map_err(io_error)?;
        let data = SharedFontData(Arc::new(map));
        let font = data.font_ref().map_err(|reason| FontError::Parse {
            path: path.clone(),
            reason,
        })?;
        let instances = resolve_instances(&font);
        let glyphs = resolve_glyphs(&font);
        log::info!(
            "{}: {} instances, {} glyphs",
            path.display(),
            instances.len(),
            glyphs.len()
        );
        Ok(Self {
            path,
            data,
            instances,
            glyphs,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    pub fn glyphs(&self) -> &[GlyphEntry] {
        &self.glyphs
    }

    /// Names of the glyphs drawn directly from contours.
    pub fn simple_glyphs(&self) -> impl Iterator<Item = &str> + '_ {
        self.glyphs
            .iter()
            .filter(|glyph| !glyph.is_composite)
            .map(|glyph| glyph.name.as_str())
    }

    /// Creates a glyph source that draws from this font.
    pub fn glyph_source(&self) -> SkrifaGlyphSource {
        SkrifaGlyphSource::new(self.data.clone(), &self.instances, &self.glyphs)
    }
}

#[derive(Clone)]
pub struct SharedFontData(Arc<memmap2::Mmap>);

impl SharedFontData {
    fn font_ref(&self) -> Result<FontRef<'_>, String> {
        FontRef::from_index(self.0.as_ref(), 0).map_err(|e| e.to_string())
    }
}

fn resolve_instances(font: &FontRef) -> Vec<Instance> {
    let named = font.named_instances();
    if named.is_empty() {
        return vec![Instance {
            name: DEFAULT_INSTANCE.to_owned(),
            location: Location::new(font.axes().len()),
            settings: Vec::new(),
        }];
    }
    let axes = font.axes();
    let mut instances: Vec<Instance> = Vec::with_capacity(named.len());
    for (i, instance) in named.iter().enumerate() {
        let mut name = font
            .localized_strings(instance.subfamily_name_id())
            .english_or_first()
            .map(|name| name.to_string())
            .unwrap_or_else(|| format!("instance{i}"));
        if instances.iter().any(|seen| seen.name == name) {
            log::warn!("instance {i} repeats the name '{name}'");
            name = format!("{name}#{i}");
        }
        instances.push(Instance {
            name,
            location: instance.location(),
            settings: axes
                .iter()
                .map(|axis| axis.tag())
                .zip(instance.user_coords())
                .collect(),
        });
    }
    instances
}

fn resolve_glyphs(font: &FontRef) -> Vec<GlyphEntry> {
    let glyf = font.loca(None).ok().zip(font.glyf().ok());
    GlyphNames::new(font)
        .iter()
        .map(|(id, name)| {
            let is_composite = glyf.as_ref().is_some_and(|(loca, glyf)| {
                matches!(loca.get_glyf(id, glyf), Ok(Some(Glyph::Composite(_))))
            });
            GlyphEntry {
                name: name.as_str().to_owned(),
                id,
                is_composite,
            }
        })
        .collect()
}
