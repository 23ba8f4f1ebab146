use image::DynamicImage;

use crate::expression::Expression;

/// Overlay image per concrete expression.
///
/// Built once and then only read; [`Expression::Undetermined`] never has an
/// entry.
#[derive(Debug, Clone, Default)]
pub struct OverlayCatalog {
    overlays: [Option<DynamicImage>; 8],
}

impl OverlayCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert. Returns the catalog unchanged for `Undetermined`.
    pub fn with(mut self, expression: Expression, overlay: DynamicImage) -> Self {
        self.insert(expression, overlay);
        self
    }

    /// Set the overlay for `expression`, returning the previous one.
    pub fn insert(
        &mut self,
        expression: Expression,
        overlay: DynamicImage,
    ) -> Option<DynamicImage> {
        match expression.index() {
            Some(slot) => self.overlays[slot].replace(overlay),
            None => {
                log::warn!("ignoring overlay for {}", expression);
                None
            }
        }
    }

    pub fn get(&self, expression: Expression) -> Option<&DynamicImage> {
        expression
            .index()
            .and_then(|slot| self.overlays[slot].as_ref())
    }

    pub fn contains(&self, expression: Expression) -> bool {
        self.get(expression).is_some()
    }

    /// Concrete expressions with no overlay.
    pub fn missing(&self) -> Vec<Expression> {
        Expression::CONCRETE
            .iter()
            .copied()
            .filter(|e| !self.contains(*e))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.overlays.iter().filter(|o| o.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
