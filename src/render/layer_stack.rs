use serde::{Deserialize, Serialize};

/// Drawing layers of a dashboard frame, bottom to top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanvasLayerKind {
    Background,
    Grid,
    Series,
    Markers,
    Annotation,
}

impl CanvasLayerKind {
    pub const CANONICAL_ORDER: [Self; 5] = [
        Self::Background,
        Self::Grid,
        Self::Series,
        Self::Markers,
        Self::Annotation,
    ];
}

#[cfg(test)]
mod tests {
    use super::CanvasLayerKind;

    #[test]
    fn canonical_order_draws_annotations_last() {
        assert_eq!(
            CanvasLayerKind::CANONICAL_ORDER.first(),
            Some(&CanvasLayerKind::Background)
        );
        assert_eq!(
            CanvasLayerKind::CANONICAL_ORDER.last(),
            Some(&CanvasLayerKind::Annotation)
        );
    }
}
