//! Discovery of `info_connector` marker entities inside a map.

use glam::DVec3;
use map::Map;

/// A located connector: its position in the owning map's entity list, its
/// anchor point, facing, and named type.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorRef {
    pub index: usize,
    pub name: String,
    pub yaw: f64,
    pub centroid: DVec3,
}

/// All `info_connector` entities in `map`, optionally filtered to those
/// whose `name` attribute equals `connector_type`.
pub fn connectors(map: &Map, connector_type: Option<&str>) -> Vec<ConnectorRef> {
    map.entities
        .iter()
        .enumerate()
        .filter_map(|(index, entity)| {
            if !entity.is_connector() {
                return None;
            }

            let name = entity.attributes.get("name")?.clone();
            if let Some(wanted) = connector_type {
                if name != wanted {
                    return None;
                }
            }

            let brush = entity.brushes.first()?;
            let (_, yaw, _) = entity.angles().unwrap_or((0.0, 0.0, 0.0));

            Some(ConnectorRef {
                index,
                name,
                yaw,
                centroid: brush.aabb().centroid(),
            })
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use map::{Attributes, Brush, Entity, Face, CLASSNAME};

    fn connector_entity(name: &str, yaw: f64, at: DVec3) -> Entity {
        let mut attrs = Attributes::new();
        attrs.insert(CLASSNAME.to_string(), "info_connector".to_string());
        attrs.insert("name".to_string(), name.to_string());
        attrs.insert("angles".to_string(), format!("0 {yaw} 0"));

        let brush = Brush {
            faces: vec![Face {
                p1: at - DVec3::splat(8.),
                p2: at + DVec3::new(8., -8., -8.),
                p3: at + DVec3::splat(8.),
                texture: "NULL".to_string(),
                u: glam::DVec4::ZERO,
                v: glam::DVec4::ZERO,
                degree: 0.,
                u_scale: 1.,
                v_scale: 1.,
            }],
        };

        Entity {
            attributes: attrs,
            brushes: vec![brush],
        }
    }

    fn worldspawn() -> Entity {
        let mut attrs = Attributes::new();
        attrs.insert(CLASSNAME.to_string(), "worldspawn".to_string());
        Entity {
            attributes: attrs,
            brushes: vec![],
        }
    }

    #[test]
    fn finds_and_filters_by_name() {
        let map = Map {
            tb_header: None,
            worldspawn: worldspawn(),
            entities: vec![
                connector_entity("door", 0., DVec3::ZERO),
                connector_entity("crates", 90., DVec3::new(64., 0., 0.)),
            ],
        };

        assert_eq!(connectors(&map, None).len(), 2);
        let doors = connectors(&map, Some("door"));
        assert_eq!(doors.len(), 1);
        assert_eq!(doors[0].index, 0);
        assert_eq!(doors[0].yaw, 0.);

        assert_eq!(connectors(&map, Some("nonexistent")).len(), 0);
    }
}
