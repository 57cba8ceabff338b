use geo::{Area, BooleanOps, MultiPolygon, Relate};

use super::{area::AreaReporter, reference::ReferenceRegion};
use crate::{crs::crs_utils::project_multipolygon, geofile::feature::FeatureCollection};

/// Where the polygons of an area of interest lie relative to a reference region.
#[derive(Debug, Clone, PartialEq)]
pub enum Overlap {
    FullyInside,
    /// Holds the part of the area of interest that lies inside the reference region.
    PartiallyInside(MultiPolygon),
    FullyOutside,
}

/// [`Overlap`] with the measured area attached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Containment {
    FullyInside { area_ha: f64 },
    PartiallyInside { inside_area_ha: f64 },
    FullyOutside,
}

impl Containment {
    pub fn name(&self) -> &'static str {
        match self {
            Containment::FullyInside { .. } => "FullyInside",
            Containment::PartiallyInside { .. } => "PartiallyInside",
            Containment::FullyOutside => "FullyOutside",
        }
    }
}

/// Locate polygons relative to a reference region. Both must share a CRS.
///
/// Containment follows the DE-9IM "contains" predicate of `geo`, so a polygon touching the reference
/// boundary from the inside still counts as contained. Intersections without area count as no overlap.
pub fn locate(aoi: &[MultiPolygon], reference: &MultiPolygon) -> Overlap {
    if aoi
        .iter()
        .all(|polygons| reference.relate(polygons).is_contains())
    {
        return Overlap::FullyInside;
    }

    let aoi_union = aoi
        .iter()
        .fold(MultiPolygon::new(vec![]), |union, polygons| union.union(polygons));
    let mut inside = reference.intersection(&aoi_union);
    inside.0.retain(|polygon| polygon.unsigned_area() > 0.0);
    if inside.0.is_empty() {
        Overlap::FullyOutside
    } else {
        Overlap::PartiallyInside(inside)
    }
}

/// Classify the polygons of an area of interest against the reference region and measure the relevant area:
/// the whole area of interest when fully inside, the inner part when partially inside, nothing otherwise.
///
/// The area of interest is projected into the CRS of the reference region first when the two differ.
pub fn classify(
    aoi: &FeatureCollection,
    reference: &ReferenceRegion,
    area_reporter: &AreaReporter,
) -> anyhow::Result<Containment> {
    if aoi.epsg != reference.epsg {
        log::info!(
            "Projecting the area of interest from EPSG:{} to EPSG:{}",
            aoi.epsg,
            reference.epsg
        );
    }
    let polygons = aoi
        .polygons()
        .iter()
        .map(|polygons| project_multipolygon(polygons, aoi.epsg, reference.epsg))
        .collect::<anyhow::Result<Vec<MultiPolygon>>>()?;

    let containment = match locate(&polygons, &reference.geometry) {
        Overlap::FullyInside => Containment::FullyInside {
            area_ha: area_reporter.area_ha(&polygons, reference.epsg)?,
        },
        Overlap::PartiallyInside(inside) => Containment::PartiallyInside {
            inside_area_ha: area_reporter.area_ha(&[inside], reference.epsg)?,
        },
        Overlap::FullyOutside => Containment::FullyOutside,
    };
    log::debug!("Area of interest classified as {}", containment.name());
    Ok(containment)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use geo::{polygon, MultiPolygon};
    use rstest::rstest;

    use super::{classify, locate, Containment, Overlap};
    use crate::{
        aoi::{
            area::AreaReporter,
            report::{advisories, AcceptableRange, Advisory},
            reference::ReferenceRegion,
        },
        geofile::feature::{Feature, FeatureCollection},
    };

    const EPSG: u32 = 22195;

    fn rectangle(min_x: f64, min_y: f64, width: f64, height: f64) -> MultiPolygon {
        MultiPolygon::new(vec![polygon![
            (x: min_x, y: min_y),
            (x: min_x + width, y: min_y),
            (x: min_x + width, y: min_y + height),
            (x: min_x, y: min_y + height),
            (x: min_x, y: min_y),
        ]])
    }

    /// A 100 km by 100 km square standing in for the province.
    fn reference() -> ReferenceRegion {
        ReferenceRegion::new(rectangle(0.0, 0.0, 100_000.0, 100_000.0), EPSG)
    }

    fn aoi(polygons: Vec<MultiPolygon>) -> FeatureCollection {
        FeatureCollection::new(
            polygons
                .into_iter()
                .map(|polygons| Feature::from(geo::Geometry::MultiPolygon(polygons)))
                .collect(),
            EPSG,
        )
    }

    fn classify_with_advisories(polygons: Vec<MultiPolygon>) -> (Containment, Vec<Advisory>) {
        let containment = classify(&aoi(polygons), &reference(), &AreaReporter::new(EPSG)).unwrap();
        let found = advisories(&containment, &AcceptableRange::default());
        (containment, found)
    }

    #[rstest]
    fn test_inside_within_range_has_no_advisory() {
        // 1000 m x 1000.1 m = 100.01 ha
        let (containment, found) =
            classify_with_advisories(vec![rectangle(10_000.0, 10_000.0, 1000.0, 1000.1)]);
        match containment {
            Containment::FullyInside { area_ha } => assert_relative_eq!(area_ha, 100.01, epsilon = 1e-6),
            other => panic!("Expected fully inside, got {:?}", other),
        }
        assert!(found.is_empty());
    }

    #[rstest]
    fn test_small_inside_is_out_of_range() {
        // 500 m x 1000 m = 50 ha
        let (containment, found) =
            classify_with_advisories(vec![rectangle(10_000.0, 10_000.0, 500.0, 1000.0)]);
        assert!(matches!(containment, Containment::FullyInside { .. }));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].class(), "OutOfGeneralRange");
        assert!(found[0].to_string().contains("50.0"));
    }

    #[rstest]
    fn test_outside_is_completely_outside() {
        let (containment, found) =
            classify_with_advisories(vec![rectangle(200_000.0, 200_000.0, 1000.0, 1000.0)]);
        assert_eq!(containment, Containment::FullyOutside);
        assert_eq!(found, vec![Advisory::CompletelyOutside]);
    }

    #[rstest]
    fn test_straddling_is_significant_partial_overlap() {
        // 3000 m of the 5000 m wide rectangle lie inside, over a height of 10 km: 3000 ha.
        let (containment, found) =
            classify_with_advisories(vec![rectangle(97_000.0, 10_000.0, 5000.0, 10_000.0)]);
        match containment {
            Containment::PartiallyInside { inside_area_ha } => {
                assert_relative_eq!(inside_area_ha, 3000.0, epsilon = 1e-6)
            }
            other => panic!("Expected partially inside, got {:?}", other),
        }
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].class(), "SignificantPartialOverlap");
        assert!(found[0].to_string().contains("3000.0"));
    }

    #[rstest]
    fn test_one_feature_outside_makes_aoi_partial() {
        let (containment, found) = classify_with_advisories(vec![
            rectangle(10_000.0, 10_000.0, 100.0, 100.0),
            rectangle(200_000.0, 200_000.0, 1000.0, 1000.0),
        ]);
        match containment {
            Containment::PartiallyInside { inside_area_ha } => {
                assert_relative_eq!(inside_area_ha, 1.0, epsilon = 1e-6)
            }
            other => panic!("Expected partially inside, got {:?}", other),
        }
        assert_eq!(found[0].class(), "SmallPartialOverlap");
    }

    #[rstest]
    fn test_aoi_touching_boundary_from_inside_is_contained() {
        let reference = rectangle(0.0, 0.0, 100_000.0, 100_000.0);
        let on_edge = rectangle(0.0, 0.0, 1000.0, 1000.0);
        assert_eq!(locate(&[on_edge], &reference), Overlap::FullyInside);
    }

    #[rstest]
    fn test_aoi_touching_boundary_from_outside_is_outside() {
        let reference = rectangle(0.0, 0.0, 100_000.0, 100_000.0);
        let adjacent = rectangle(100_000.0, 0.0, 1000.0, 1000.0);
        assert_eq!(locate(&[adjacent], &reference), Overlap::FullyOutside);
    }
}
