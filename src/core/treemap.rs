use crate::core::types::PlotArea;

/// One laid-out treemap tile, indexed back into the caller's input slice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreemapTile {
    pub index: usize,
    pub area: PlotArea,
}

/// Squarified treemap layout (Bruls, Huizing, van Wijk).
///
/// Non-positive and non-finite weights get no tile. Tiles are placed largest
/// first, and ties keep input order.
#[must_use]
pub fn squarify(weights: &[f64], bounds: PlotArea) -> Vec<TreemapTile> {
    let mut items: Vec<(usize, f64)> = weights
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, weight)| weight.is_finite() && *weight > 0.0)
        .collect();
    if items.is_empty() || bounds.area() <= 0.0 {
        return Vec::new();
    }
    items.sort_by(|a, b| b.1.total_cmp(&a.1));

    // Sorted descending, so the first weight is the peak; dividing by it keeps the sum finite.
    let peak = items[0].1;
    let total: f64 = items.iter().map(|(_, weight)| weight / peak).sum();
    let scale = bounds.area() / total;
    let scaled: Vec<(usize, f64)> = items
        .into_iter()
        .map(|(index, weight)| (index, weight / peak * scale))
        .collect();

    let mut tiles = Vec::with_capacity(scaled.len());
    let mut remaining = &scaled[..];
    let mut free = bounds;
    while !remaining.is_empty() {
        let mut take = 1;
        while take < remaining.len()
            && worst_ratio(&remaining[..take], free) >= worst_ratio(&remaining[..=take], free)
        {
            take += 1;
        }
        let (row, rest) = remaining.split_at(take);
        free = layout_row(row, free, &mut tiles);
        remaining = rest;
    }
    tiles
}

/// Places one row along the shorter side of `free`; returns the leftover area.
fn layout_row(row: &[(usize, f64)], free: PlotArea, tiles: &mut Vec<TreemapTile>) -> PlotArea {
    let row_area: f64 = row.iter().map(|(_, area)| area).sum();
    if free.width >= free.height {
        let column_width = if free.height > 0.0 { row_area / free.height } else { 0.0 };
        let mut y = free.top;
        for (index, area) in row {
            let height = if column_width > 0.0 { area / column_width } else { 0.0 };
            tiles.push(TreemapTile {
                index: *index,
                area: PlotArea::new(free.left, y, column_width, height),
            });
            y += height;
        }
        PlotArea::new(
            free.left + column_width,
            free.top,
            (free.width - column_width).max(0.0),
            free.height,
        )
    } else {
        let row_height = if free.width > 0.0 { row_area / free.width } else { 0.0 };
        let mut x = free.left;
        for (index, area) in row {
            let width = if row_height > 0.0 { area / row_height } else { 0.0 };
            tiles.push(TreemapTile {
                index: *index,
                area: PlotArea::new(x, free.top, width, row_height),
            });
            x += width;
        }
        PlotArea::new(
            free.left,
            free.top + row_height,
            free.width,
            (free.height - row_height).max(0.0),
        )
    }
}

fn worst_ratio(row: &[(usize, f64)], free: PlotArea) -> f64 {
    let side = free.width.min(free.height);
    let row_area: f64 = row.iter().map(|(_, area)| area).sum();
    if side <= 0.0 || row_area <= 0.0 {
        return f64::INFINITY;
    }
    let thickness = row_area / side;
    row.iter()
        .map(|(_, area)| {
            let length = area / thickness;
            (length / thickness).max(thickness / length)
        })
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::squarify;
    use crate::core::types::PlotArea;

    #[test]
    fn tiles_cover_bounds_proportionally() {
        let bounds = PlotArea::new(0.0, 0.0, 600.0, 400.0);
        let tiles = squarify(&[6.0, 6.0, 4.0, 3.0, 2.0, 2.0, 1.0], bounds);
        assert_eq!(tiles.len(), 7);

        let covered: f64 = tiles.iter().map(|tile| tile.area.area()).sum();
        assert!((covered - bounds.area()).abs() < 1e-6);

        let first = tiles.iter().find(|tile| tile.index == 0).expect("tile 0");
        assert!((first.area.area() - bounds.area() * 6.0 / 24.0).abs() < 1e-6);
    }

    #[test]
    fn non_positive_weights_get_no_tile() {
        let tiles = squarify(&[0.0, -4.0, 2.0], PlotArea::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[0].index, 2);
    }

    #[test]
    fn weights_near_f64_max_still_cover_bounds() {
        let bounds = PlotArea::new(0.0, 0.0, 300.0, 200.0);
        let tiles = squarify(&[f64::MAX, f64::MAX, 1.0], bounds);
        let covered: f64 = tiles.iter().map(|tile| tile.area.area()).sum();
        assert!(tiles.iter().all(|tile| tile.area.width.is_finite() && tile.area.height.is_finite()));
        assert!((covered - bounds.area()).abs() < 1e-6);
    }
}
