use crate::DetectError;
use crate::models::{BoundingBox, RegionStats};
use std::collections::BTreeMap;

/// Pick the component holding the largest share of all foreground pixels
///
/// Records are visited in ascending label order and a later record only
/// wins when its share is strictly larger, so ties go to the lowest label.
/// The shares all divide by the same total, so raw pixel counts are compared.
pub fn select_region_stats(
    regions: &BTreeMap<u32, RegionStats>,
) -> Result<RegionStats, DetectError> {
    let mut iter = regions.values();
    let Some(mut best) = iter.next() else {
        return Err(DetectError::NoRegionFound);
    };
    for candidate in iter {
        if best.pixel_count < candidate.pixel_count {
            best = candidate;
        }
    }

    let total: usize = regions.values().map(|r| r.pixel_count).sum();
    log::debug!(
        "selector: label {} holds {}/{} foreground pixels across {} regions",
        best.label,
        best.pixel_count,
        total,
        regions.len()
    );
    Ok(*best)
}

/// Bounding box of the dominant component
pub fn select_region(regions: &BTreeMap<u32, RegionStats>) -> Result<BoundingBox, DetectError> {
    select_region_stats(regions).map(|stats| stats.bounding_box())
}

/// Share of all foreground pixels held by `region`, 0 when there is no foreground
pub fn foreground_ratio(region: &RegionStats, regions: &BTreeMap<u32, RegionStats>) -> f64 {
    let total: usize = regions.values().map(|r| r.pixel_count).sum();
    if total == 0 {
        return 0.0;
    }
    region.pixel_count as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(label: u32, pixel_count: usize, row: usize) -> RegionStats {
        RegionStats {
            label,
            pixel_count,
            width_span: 4,
            height_span: 2,
            min_row: row,
            min_col: 1,
            max_row: row + 2,
            max_col: 5,
        }
    }

    fn map(records: &[RegionStats]) -> BTreeMap<u32, RegionStats> {
        records.iter().map(|r| (r.label, *r)).collect()
    }

    #[test]
    fn test_selects_largest_share() {
        let regions = map(&[region(1, 10, 1), region(2, 90, 20)]);
        let best = select_region_stats(&regions).unwrap();
        assert_eq!(best.label, 2);
        assert!((foreground_ratio(&best, &regions) - 0.9).abs() < 1e-12);
        assert_eq!(
            select_region(&regions).unwrap(),
            BoundingBox {
                min_row: 20,
                min_col: 1,
                max_row: 22,
                max_col: 5
            }
        );
    }

    #[test]
    fn test_tie_goes_to_lowest_label() {
        let regions = map(&[region(3, 50, 30), region(1, 50, 10), region(2, 20, 20)]);
        assert_eq!(select_region_stats(&regions).unwrap().label, 1);
    }

    #[test]
    fn test_single_region() {
        let regions = map(&[region(1, 7, 4)]);
        let best = select_region_stats(&regions).unwrap();
        assert_eq!(best.label, 1);
        assert_eq!(foreground_ratio(&best, &regions), 1.0);
    }

    #[test]
    fn test_no_regions_is_an_error() {
        let regions = BTreeMap::new();
        assert!(matches!(
            select_region(&regions),
            Err(DetectError::NoRegionFound)
        ));
    }

    #[test]
    fn test_count_comparison_matches_ratio_comparison() {
        // Large totals where float division could in principle blur the order
        let total_pixels = 4096 * 4096;
        let regions = map(&[
            region(1, total_pixels / 2 - 1, 1),
            region(2, total_pixels / 2, 2),
            region(3, 1, 3),
        ]);
        let total: usize = regions.values().map(|r| r.pixel_count).sum();
        let by_ratio = regions
            .values()
            .fold(None::<&RegionStats>, |best, r| match best {
                Some(b) if b.pixel_count as f64 / total as f64 >= r.pixel_count as f64 / total as f64 => {
                    Some(b)
                }
                _ => Some(r),
            })
            .unwrap();
        assert_eq!(select_region_stats(&regions).unwrap().label, by_ratio.label);
    }
}
