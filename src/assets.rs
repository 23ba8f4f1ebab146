use anyhow::{Context, Result};
use emojify_vision::{Expression, OverlayCatalog};
use image::GenericImageView;
use std::path::{Path, PathBuf};

/// File name of the overlay for each concrete expression.
pub fn asset_file_name(expression: Expression) -> Option<&'static str> {
    match expression {
        Expression::Smiling => Some("smile.png"),
        Expression::Frowning => Some("frown.png"),
        Expression::LeftWink => Some("leftwink.png"),
        Expression::RightWink => Some("rightwink.png"),
        Expression::LeftWinkFrowning => Some("leftwinkfrown.png"),
        Expression::RightWinkFrowning => Some("rightwinkfrown.png"),
        Expression::ClosedEyeSmiling => Some("closed_smile.png"),
        Expression::ClosedEyeFrowning => Some("closed_frown.png"),
        Expression::Undetermined => None,
    }
}

pub fn asset_path(dir: &Path, expression: Expression) -> Option<PathBuf> {
    asset_file_name(expression).map(|name| dir.join(name))
}

/// Decode every overlay found in `dir`.
///
/// Missing or empty files leave their expression unmapped; the pipeline then
/// reports those faces instead of drawing them. Files that exist but fail to
/// decode are an error.
pub fn load_catalog(dir: &Path) -> Result<OverlayCatalog> {
    if !dir.is_dir() {
        anyhow::bail!("overlay directory {} does not exist", dir.display());
    }

    let mut catalog = OverlayCatalog::new();

    for expression in Expression::CONCRETE {
        let Some(path) = asset_path(dir, expression) else {
            continue;
        };
        if !path.exists() {
            log::warn!("no overlay for {} ({} missing)", expression, path.display());
            continue;
        }

        let img = image::open(&path)
            .with_context(|| format!("decoding overlay {}", path.display()))?;
        let (w, h) = img.dimensions();
        if w == 0 || h == 0 {
            log::warn!("skipping empty overlay {} ({}x{})", path.display(), w, h);
            continue;
        }

        log::debug!("loaded {} overlay {}x{}", expression, w, h);
        catalog.insert(expression, img);
    }

    Ok(catalog)
}
