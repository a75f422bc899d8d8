//! AABB-vs-AABB collision between all solid brushes of two maps, and
//! worldspawn-vs-world-cube boundary containment.

use map::Map;

/// True if any solid brush (worldspawn plus non-connector entity brushes) of
/// `a` strictly overlaps any solid brush of `b` on all three axes.
pub fn maps_intersect(a: &Map, b: &Map) -> bool {
    let a_brushes: Vec<_> = a.solid_brushes().map(|brush| brush.aabb()).collect();
    let b_brushes: Vec<_> = b.solid_brushes().map(|brush| brush.aabb()).collect();

    a_brushes
        .iter()
        .any(|a| b_brushes.iter().any(|b| a.intersects(b)))
}

/// True if every worldspawn brush point of `map` lies within
/// `[-limit, +limit]` on every axis.
pub fn within_world_boundary(map: &Map, limit: f64) -> bool {
    map.worldspawn
        .brushes
        .iter()
        .all(|brush| brush.aabb().within_bounds(limit))
}

#[cfg(test)]
mod test {
    use super::*;
    use glam::DVec3;
    use map::{Attributes, Brush, Entity, Face, CLASSNAME};

    fn cube_brush(center: DVec3, half: f64) -> Brush {
        let min = center - DVec3::splat(half);
        let max = center + DVec3::splat(half);
        Brush {
            faces: vec![Face {
                p1: min,
                p2: DVec3::new(max.x, min.y, min.z),
                p3: max,
                texture: "NULL".to_string(),
                u: glam::DVec4::ZERO,
                v: glam::DVec4::ZERO,
                degree: 0.,
                u_scale: 1.,
                v_scale: 1.,
            }],
        }
    }

    fn map_with_worldspawn_brush(brush: Brush) -> Map {
        let mut attrs = Attributes::new();
        attrs.insert(CLASSNAME.to_string(), "worldspawn".to_string());
        Map {
            tb_header: None,
            worldspawn: Entity {
                attributes: attrs,
                brushes: vec![brush],
            },
            entities: vec![],
        }
    }

    #[test]
    fn non_overlapping_cubes_do_not_collide() {
        let a = map_with_worldspawn_brush(cube_brush(DVec3::ZERO, 16.));
        let b = map_with_worldspawn_brush(cube_brush(DVec3::new(100., 0., 0.), 16.));
        assert!(!maps_intersect(&a, &b));
    }

    #[test]
    fn overlapping_cubes_collide() {
        let a = map_with_worldspawn_brush(cube_brush(DVec3::ZERO, 16.));
        let b = map_with_worldspawn_brush(cube_brush(DVec3::new(10., 0., 0.), 16.));
        assert!(maps_intersect(&a, &b));
    }

    #[test]
    fn touching_cubes_do_not_collide() {
        let a = map_with_worldspawn_brush(cube_brush(DVec3::ZERO, 16.));
        let b = map_with_worldspawn_brush(cube_brush(DVec3::new(32., 0., 0.), 16.));
        assert!(!maps_intersect(&a, &b));
    }

    #[test]
    fn connector_brushes_are_ignored_in_collision() {
        let mut attrs = Attributes::new();
        attrs.insert(CLASSNAME.to_string(), "info_connector".to_string());
        let connector = Entity {
            attributes: attrs,
            brushes: vec![cube_brush(DVec3::new(10., 0., 0.), 16.)],
        };

        let mut a = map_with_worldspawn_brush(cube_brush(DVec3::ZERO, 16.));
        let mut b = map_with_worldspawn_brush(cube_brush(DVec3::new(200., 0., 0.), 16.));
        b.entities.push(connector);
        a.entities.clear();

        assert!(!maps_intersect(&a, &b));
    }

    #[test]
    fn boundary_check() {
        let inside = map_with_worldspawn_brush(cube_brush(DVec3::ZERO, 100.));
        let outside = map_with_worldspawn_brush(cube_brush(DVec3::new(4000., 0., 0.), 100.));

        assert!(within_world_boundary(&inside, 4000.));
        assert!(!within_world_boundary(&outside, 4000.));
    }
}
