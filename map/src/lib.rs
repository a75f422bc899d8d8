//! In-memory model, parser and serializer for the textual brush/entity map
//! format (worldspawn + entities + brushes + faces).
//!
//! The grammar and round-trip guarantees are intentionally narrow: this is
//! the format as written by an editor for axis-aligned tile geometry, not a
//! general-purpose parser for every map file a game engine might accept.

use std::{
    collections::HashSet,
    fs,
    path::Path,
};

use glam::{DVec3, DVec4};
use indexmap::IndexMap;
use nom::{
    bytes::complete::{tag, take_till},
    character::complete::{multispace0, space0},
    combinator::{all_consuming, map, opt, recognize},
    multi::{fold_many1, many0, many1, many_m_n},
    number::complete::double as _double,
    sequence::{delimited, preceded, terminated, tuple},
    Finish, IResult as _IResult,
};

pub mod error;
pub use error::MapError;

/// Ordered key/value bag for an entity. Insertion order is preserved (unlike
/// `HashMap`) so that re-serializing a map is deterministic across runs.
pub type Attributes = IndexMap<String, String>;

pub const WORLDSPAWN: &str = "worldspawn";
pub const CLASSNAME: &str = "classname";

/// One bounding plane of a brush, given as three defining points plus the
/// texture and its axis-aligned alignment parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub p1: DVec3,
    pub p2: DVec3,
    pub p3: DVec3,
    pub texture: String,
    /// `(Ux, Uy, Uz, offset_u)`.
    pub u: DVec4,
    /// `(Vx, Vy, Vz, offset_v)`.
    pub v: DVec4,
    /// Decorative; never interpreted by the engine.
    pub degree: f64,
    pub u_scale: f64,
    pub v_scale: f64,
}

impl Face {
    pub fn offset_u(&self) -> f64 {
        self.u.w
    }

    pub fn offset_v(&self) -> f64 {
        self.v.w
    }

    pub fn set_offset_u(&mut self, value: f64) {
        self.u.w = value;
    }

    pub fn set_offset_v(&mut self, value: f64) {
        self.v.w = value;
    }

    pub fn points(&self) -> [DVec3; 3] {
        [self.p1, self.p2, self.p3]
    }

    pub fn points_mut(&mut self) -> [&mut DVec3; 3] {
        [&mut self.p1, &mut self.p2, &mut self.p3]
    }
}

/// Axis-aligned bounding box, derived from the union of a brush's (or a set
/// of brushes') defining points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    pub fn from_points(points: impl IntoIterator<Item = DVec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut aabb = Aabb {
            min: first,
            max: first,
        };
        for p in iter {
            aabb.min = aabb.min.min(p);
            aabb.max = aabb.max.max(p);
        }
        Some(aabb)
    }

    pub fn union(self, other: Self) -> Self {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn centroid(&self) -> DVec3 {
        (self.min + self.max) / 2.0
    }

    /// Strict open-interval overlap on every axis; touching faces do not
    /// count as colliding.
    pub fn intersects(&self, other: &Self) -> bool {
        (0..3).all(|i| self.min[i] < other.max[i] && self.max[i] > other.min[i])
    }

    /// True if every coordinate of both corners lies within `[-limit, limit]`.
    pub fn within_bounds(&self, limit: f64) -> bool {
        (0..3).all(|i| {
            self.min[i] >= -limit
                && self.min[i] <= limit
                && self.max[i] >= -limit
                && self.max[i] <= limit
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Brush {
    pub faces: Vec<Face>,
}

impl Brush {
    /// Bounding box over every point that defines every face of this brush.
    pub fn aabb(&self) -> Aabb {
        Aabb::from_points(self.faces.iter().flat_map(|f| f.points()))
            .expect("a brush always has at least one face with three points")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub attributes: Attributes,
    pub brushes: Vec<Brush>,
}

impl Entity {
    pub fn classname(&self) -> &str {
        self.attributes
            .get(CLASSNAME)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn is_connector(&self) -> bool {
        self.classname() == "info_connector"
    }

    pub fn origin(&self) -> Option<DVec3> {
        let raw = self.attributes.get("origin")?;
        let mut parts = raw.split_whitespace();
        let x: f64 = parts.next()?.parse().ok()?;
        let y: f64 = parts.next()?.parse().ok()?;
        let z: f64 = parts.next()?.parse().ok()?;
        Some(DVec3::new(x, y, z))
    }

    pub fn set_origin(&mut self, origin: DVec3) {
        self.attributes.insert(
            "origin".to_string(),
            format!("{} {} {}", origin.x, origin.y, origin.z),
        );
    }

    /// `(pitch, yaw, roll)` from the `angles` key, if present.
    pub fn angles(&self) -> Option<(f64, f64, f64)> {
        let raw = self.attributes.get("angles")?;
        let mut parts = raw.split_whitespace();
        let pitch: f64 = parts.next()?.parse().ok()?;
        let yaw: f64 = parts.next()?.parse().ok()?;
        let roll: f64 = parts.next()?.parse().ok()?;
        Some((pitch, yaw, roll))
    }

    pub fn set_yaw(&mut self, yaw: f64) {
        if let Some((pitch, _, roll)) = self.angles() {
            self.attributes
                .insert("angles".to_string(), format!("{pitch} {yaw:.0} {roll}"));
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    pub tb_header: Option<Vec<String>>,
    pub worldspawn: Entity,
    pub entities: Vec<Entity>,
}

impl Map {
    /// Splits a flat, freshly-parsed entity list into `(worldspawn, rest)`,
    /// preserving the order of the non-worldspawn entities.
    pub fn from_entities(
        tb_header: Option<Vec<String>>,
        entities: Vec<Entity>,
    ) -> Result<Self, MapError> {
        let worldspawn_idx = entities
            .iter()
            .position(|e| e.classname() == WORLDSPAWN)
            .ok_or(MapError::MissingWorldspawn)?;

        if entities
            .iter()
            .flat_map(|e| e.brushes.iter())
            .any(|brush| brush.faces.len() < 4)
        {
            return Err(MapError::DegenerateBrush);
        }

        let mut entities = entities;
        let worldspawn = entities.remove(worldspawn_idx);

        Ok(Map {
            tb_header,
            worldspawn,
            entities,
        })
    }

    pub fn parse(input: &str) -> Result<Self, MapError> {
        let (_, (tb_header, entities)) =
            all_consuming(tuple((opt(take_tb_header), parse_entities)))(input)
                .finish()
                .map_err(|err: nom::error::Error<&str>| MapError::Parse {
                    message: err.to_string(),
                })?;

        Map::from_entities(tb_header, entities)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| MapError::Io {
            source,
            path: path.to_path_buf(),
        })?;
        Map::parse(&text)
    }

    /// All brushes belonging to worldspawn or a non-connector entity. This
    /// is the "all brushes of a map" used for collision and boundary checks
    /// Connector entities never contribute geometry.
    pub fn solid_brushes(&self) -> impl Iterator<Item = &Brush> {
        self.worldspawn.brushes.iter().chain(
            self.entities
                .iter()
                .filter(|e| !e.is_connector())
                .flat_map(|e| e.brushes.iter()),
        )
    }

    /// Merge `other` into `self`: worldspawn brushes are concatenated, and
    /// `other`'s entities are appended to the tail, preserving order.
    pub fn merge(&mut self, mut other: Map) {
        self.worldspawn.brushes.append(&mut other.worldspawn.brushes);
        self.entities.append(&mut other.entities);
    }

    pub fn serialize(&self) -> String {
        let mut out = String::new();

        if let Some(header) = &self.tb_header {
            for line in header {
                out.push_str("//");
                out.push_str(line);
                out.push_str("\r\n");
            }
        }

        write_entity(&mut out, &self.worldspawn);
        for entity in &self.entities {
            write_entity(&mut out, entity);
        }

        out
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), MapError> {
        let path = path.as_ref();
        fs::write(path, self.serialize()).map_err(|source| MapError::Io {
            source,
            path: path.to_path_buf(),
        })
    }

    /// Names that appear as a `targetname` anywhere in the map (used by
    /// counter backfill and by the uniqueness tests).
    pub fn targetnames(&self) -> HashSet<&str> {
        self.entities
            .iter()
            .filter_map(|e| e.attributes.get("targetname").map(String::as_str))
            .collect()
    }
}

fn fmt_num(n: f64) -> String {
    if n == n.trunc() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

fn write_entity(out: &mut String, entity: &Entity) {
    out.push_str("{\r\n");

    if let Some(classname) = entity.attributes.get(CLASSNAME) {
        out.push_str(&format!("\"{CLASSNAME}\" \"{classname}\"\r\n"));
    }
    for (key, value) in &entity.attributes {
        if key == CLASSNAME {
            continue;
        }
        out.push_str(&format!("\"{key}\" \"{value}\"\r\n"));
    }

    for brush in &entity.brushes {
        out.push_str("{\r\n");
        for face in &brush.faces {
            out.push_str(&format!(
                "( {} {} {} ) ( {} {} {} ) ( {} {} {} ) {} [ {} {} {} {} ] [ {} {} {} {} ] {} {} {}\r\n",
                fmt_num(face.p1.x), fmt_num(face.p1.y), fmt_num(face.p1.z),
                fmt_num(face.p2.x), fmt_num(face.p2.y), fmt_num(face.p2.z),
                fmt_num(face.p3.x), fmt_num(face.p3.y), fmt_num(face.p3.z),
                face.texture,
                fmt_num(face.u.x), fmt_num(face.u.y), fmt_num(face.u.z), fmt_num(face.u.w),
                fmt_num(face.v.x), fmt_num(face.v.y), fmt_num(face.v.z), fmt_num(face.v.w),
                fmt_num(face.degree), fmt_num(face.u_scale), fmt_num(face.v_scale),
            ));
        }
        out.push_str("}\r\n");
    }

    out.push_str("}\r\n");
}

type IResult<'a, T> = _IResult<&'a str, T>;

fn take_comment_line(i: &str) -> IResult<&str> {
    terminated(
        preceded(tuple((space0, tag("//"))), take_till(|c| c == '\n')),
        multispace0,
    )(i)
}

fn take_tb_header(i: &str) -> IResult<Vec<String>> {
    many_m_n(1, 2, map(take_comment_line, |i| i.to_string()))(i)
}

fn discard_comment_lines(i: &str) -> IResult<&str> {
    map(many0(take_comment_line), |_| "")(i)
}

fn signed_double(i: &str) -> IResult<f64> {
    map(recognize(preceded(opt(tag("-")), _double)), |what: &str| {
        what.parse().unwrap()
    })(i)
}

fn double(i: &str) -> IResult<f64> {
    preceded(space0, signed_double)(i)
}

fn between_line_bracket<'a, T>(
    f: impl FnMut(&'a str) -> IResult<T>,
) -> impl FnMut(&'a str) -> IResult<'a, T> {
    terminated(
        preceded(tuple((space0, tag("{"), multispace0)), f),
        tuple((space0, tag("}"), multispace0)),
    )
}

fn quoted_text(i: &str) -> IResult<&str> {
    terminated(preceded(tag("\""), take_till(|c| c == '"')), tag("\""))(i)
}

fn parse_plane_coordinate(i: &str) -> IResult<DVec3> {
    terminated(
        preceded(
            tuple((space0, tag("("), space0)),
            map(tuple((double, double, double)), |(x, y, z)| DVec3::new(x, y, z)),
        ),
        tuple((space0, tag(")"), space0)),
    )(i)
}

fn parse_plane_uv(i: &str) -> IResult<DVec4> {
    terminated(
        preceded(
            tuple((space0, tag("["), space0)),
            map(tuple((double, double, double, double)), |(x, y, z, offset)| {
                DVec4::new(x, y, z, offset)
            }),
        ),
        tuple((space0, tag("]"), space0)),
    )(i)
}

fn parse_face(i: &str) -> IResult<Face> {
    map(
        tuple((
            parse_plane_coordinate,
            parse_plane_coordinate,
            parse_plane_coordinate,
            map(terminated(take_till(|c| c == ' '), space0), |s: &str| s.to_string()),
            parse_plane_uv,
            parse_plane_uv,
            double,
            double,
            double,
        )),
        |(p1, p2, p3, texture, u, v, degree, u_scale, v_scale)| Face {
            p1,
            p2,
            p3,
            texture,
            u,
            v,
            degree,
            u_scale,
            v_scale,
        },
    )(i)
}

fn parse_brush(i: &str) -> IResult<Brush> {
    map(many1(terminated(parse_face, multispace0)), |faces| Brush { faces })(i)
}

fn parse_brushes(i: &str) -> IResult<Vec<Brush>> {
    many1(delimited(
        discard_comment_lines,
        between_line_bracket(parse_brush),
        discard_comment_lines,
    ))(i)
}

fn parse_attribute(i: &str) -> IResult<(&str, &str)> {
    tuple((quoted_text, preceded(space0, quoted_text)))(i)
}

fn parse_attributes(i: &str) -> IResult<Attributes> {
    fold_many1(
        terminated(parse_attribute, multispace0),
        Attributes::new,
        |mut acc: Attributes, (key, value)| {
            acc.insert(key.to_owned(), value.to_owned());
            acc
        },
    )(i)
}

fn parse_entity(i: &str) -> IResult<Entity> {
    map(
        tuple((parse_attributes, opt(parse_brushes))),
        |(attributes, brushes)| Entity {
            attributes,
            brushes: brushes.unwrap_or_default(),
        },
    )(i)
}

fn parse_entities(i: &str) -> IResult<Vec<Entity>> {
    many1(delimited(
        discard_comment_lines,
        between_line_bracket(parse_entity),
        discard_comment_lines,
    ))(i)
}
