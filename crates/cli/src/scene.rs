//! JSON scenes: named declarations evaluated in order, then queries.
//!
//! Values are strings: `"p/q"`, an integer, or `"sqrt(v)"` around either.
//! Declarations may refer to any earlier name. Free points are realized
//! against `assign` (frame coordinates) as soon as they are declared; a free
//! point left unresolved only fails when a construction needs its coordinates.

use anyhow::{anyhow, bail, Context, Result};
use geokernel::api::{
    collinear_with, concurrent_with, concyclic_with, intersect_with, on_circle_with, on_line_with,
    parallel_with, perpendicular_with, realize, Assignment, Carrier, Circle, CoordinateSystem,
    ErrorKind, ExactValue, GeomError, Line, Object, OracleCfg, Point, Ray, Segment,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub frame: Option<Frame>,
    #[serde(default)]
    pub assign: BTreeMap<String, [String; 2]>,
    #[serde(default)]
    pub objects: Vec<Decl>,
    #[serde(default)]
    pub queries: Vec<Query>,
}

/// World coordinates of the frame origin and axis end points.
#[derive(Debug, Deserialize)]
pub struct Frame {
    pub origin: [String; 2],
    pub x_axis: [String; 2],
    #[serde(default)]
    pub y_axis: Option<[String; 2]>,
}

#[derive(Debug, Deserialize)]
pub struct Decl {
    pub name: String,
    #[serde(flatten)]
    pub def: Def,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Def {
    Point { x: String, y: String },
    Free,
    PointOn {
        carrier: String,
        #[serde(default)]
        param: Option<String>,
    },
    LineThrough { p: String, q: String },
    LineEq { a: String, b: String, c: String },
    Circle { center: String, radius: String },
    CircleSq { center: String, radius_sq: String },
    CircleThrough { center: String, point: String },
    Circle3 { p: String, q: String, r: String },
    Segment { start: String, end: String },
    Ray { origin: String, through: String },
    /// The `index`-th point of `intersect(a, b)`.
    Meet {
        a: String,
        b: String,
        #[serde(default)]
        index: usize,
    },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Query {
    Intersect { a: String, b: String },
    Collinear { points: Vec<String> },
    Concyclic { points: Vec<String> },
    Concurrent { lines: Vec<String> },
    OnLine { point: String, line: String },
    OnCircle { point: String, circle: String },
    Parallel { a: String, b: String },
    Perpendicular { a: String, b: String },
}

impl Query {
    fn op(&self) -> &'static str {
        match self {
            Query::Intersect { .. } => "intersect",
            Query::Collinear { .. } => "collinear",
            Query::Concyclic { .. } => "concyclic",
            Query::Concurrent { .. } => "concurrent",
            Query::OnLine { .. } => "on_line",
            Query::OnCircle { .. } => "on_circle",
            Query::Parallel { .. } => "parallel",
            Query::Perpendicular { .. } => "perpendicular",
        }
    }
}

/// One query outcome; kernel errors are reported per query, not as a failed run.
#[derive(Debug, Serialize)]
pub struct Outcome {
    pub op: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Failure>,
}

#[derive(Debug, Serialize)]
pub struct Failure {
    pub kind: ErrorKind,
    pub message: String,
}

/// Parse `"p/q"`, an integer, or `"sqrt(...)"`.
pub fn parse_value(s: &str) -> Result<ExactValue> {
    let t = s.trim();
    if let Some(inner) = t.strip_prefix("sqrt(").and_then(|r| r.strip_suffix(')')) {
        return Ok(parse_value(inner)?.sqrt()?);
    }
    Ok(t.parse::<ExactValue>()?)
}

fn parse_pair(v: &[String; 2]) -> Result<Point> {
    Ok(Point::new(parse_value(&v[0])?, parse_value(&v[1])?))
}

struct Env<'a> {
    cfg: &'a OracleCfg,
    frame: CoordinateSystem,
    assignment: Assignment,
    objects: HashMap<String, Object>,
}

impl Env<'_> {
    fn get(&self, name: &str) -> Result<&Object> {
        self.objects
            .get(name)
            .ok_or_else(|| anyhow!("unknown object {name:?}"))
    }

    fn point(&self, name: &str) -> Result<&Point> {
        match self.get(name)? {
            Object::Point(p) => Ok(p),
            other => bail!("{name:?} is a {}, expected a point", other.kind()),
        }
    }

    fn line(&self, name: &str) -> Result<&Line> {
        match self.get(name)? {
            Object::Line(l) => Ok(l),
            other => bail!("{name:?} is a {}, expected a line", other.kind()),
        }
    }

    fn circle(&self, name: &str) -> Result<&Circle> {
        match self.get(name)? {
            Object::Circle(c) => Ok(c),
            other => bail!("{name:?} is a {}, expected a circle", other.kind()),
        }
    }

    fn carrier(&self, name: &str) -> Result<Carrier> {
        Ok(match self.get(name)? {
            Object::Line(l) => Carrier::Line(l.clone()),
            Object::Circle(c) => Carrier::Circle(c.clone()),
            other => bail!("{name:?} is a {}, expected a line or circle", other.kind()),
        })
    }

    fn points(&self, names: &[String]) -> Result<Vec<Point>> {
        names.iter().map(|n| self.point(n).cloned()).collect()
    }

    /// Realize a point now if its free names are bound; keep it symbolic otherwise.
    fn settle(&self, p: Point) -> Result<Object> {
        let obj = Object::Point(p);
        match realize(&obj, &self.frame, &self.assignment) {
            Ok(realized) => Ok(realized),
            Err(e) if e.kind() == ErrorKind::UnresolvedFreePoint => Ok(obj),
            Err(e) => Err(e.into()),
        }
    }

    fn declare(&self, decl: &Decl) -> Result<Object> {
        let cfg = self.cfg;
        Ok(match &decl.def {
            Def::Point { x, y } => Object::Point(Point::new(parse_value(x)?, parse_value(y)?)),
            Def::Free => self.settle(Point::free(decl.name.as_str()))?,
            Def::PointOn { carrier, param } => {
                let param = param.as_deref().map(parse_value).transpose()?;
                self.settle(Point::on(decl.name.as_str(), self.carrier(carrier)?, param))?
            }
            Def::LineThrough { p, q } => {
                Line::through_with(self.point(p)?, self.point(q)?, cfg)?.into()
            }
            Def::LineEq { a, b, c } => {
                Line::from_eq(parse_value(a)?, parse_value(b)?, parse_value(c)?)?.into()
            }
            Def::Circle { center, radius } => {
                Circle::new(self.point(center)?.clone(), parse_value(radius)?).into()
            }
            Def::CircleSq { center, radius_sq } => {
                Circle::from_radius_sq(self.point(center)?.clone(), parse_value(radius_sq)?)?
                    .into()
            }
            Def::CircleThrough { center, point } => {
                Circle::through(self.point(center)?.clone(), self.point(point)?)?.into()
            }
            Def::Circle3 { p, q, r } => {
                Circle::through3_with(self.point(p)?, self.point(q)?, self.point(r)?, cfg)?.into()
            }
            Def::Segment { start, end } => {
                Segment::new(self.point(start)?.clone(), self.point(end)?.clone())?.into()
            }
            Def::Ray { origin, through } => {
                Ray::new(self.point(origin)?.clone(), self.point(through)?.clone())?.into()
            }
            Def::Meet { a, b, index } => {
                let hits = intersect_with(self.get(a)?, self.get(b)?, cfg)?;
                match hits.points().get(*index) {
                    Some(p) => Object::Point(p.clone()),
                    None => bail!("{a:?} and {b:?} have no intersection point #{index}"),
                }
            }
        })
    }

    fn answer(&self, query: &Query) -> Result<std::result::Result<Value, GeomError>> {
        let cfg = self.cfg;
        let flag = |r: geokernel::Result<bool>| r.map(Value::Bool);
        Ok(match query {
            Query::Intersect { a, b } => match intersect_with(self.get(a)?, self.get(b)?, cfg) {
                Ok(r) => Ok(serde_json::to_value(r)?),
                Err(e) => Err(e),
            },
            Query::Collinear { points } => flag(collinear_with(&self.points(points)?, cfg)),
            Query::Concyclic { points } => flag(concyclic_with(&self.points(points)?, cfg)),
            Query::Concurrent { lines } => {
                let lines = lines
                    .iter()
                    .map(|n| self.line(n).cloned())
                    .collect::<Result<Vec<_>>>()?;
                flag(concurrent_with(&lines, cfg))
            }
            Query::OnLine { point, line } => {
                flag(on_line_with(self.point(point)?, self.line(line)?, cfg))
            }
            Query::OnCircle { point, circle } => {
                flag(on_circle_with(self.point(point)?, self.circle(circle)?, cfg))
            }
            Query::Parallel { a, b } => flag(parallel_with(self.line(a)?, self.line(b)?, cfg)),
            Query::Perpendicular { a, b } => {
                flag(perpendicular_with(self.line(a)?, self.line(b)?, cfg))
            }
        })
    }
}

/// Build every declaration, then answer every query in order.
pub fn evaluate(scene: &Scene, cfg: &OracleCfg) -> Result<Vec<Outcome>> {
    let frame = match &scene.frame {
        Some(f) => CoordinateSystem::new(
            parse_pair(&f.origin)?,
            parse_pair(&f.x_axis)?,
            f.y_axis.as_ref().map(parse_pair).transpose()?,
        )
        .context("building frame")?,
        None => CoordinateSystem::standard(),
    };
    let mut assignment = Assignment::new();
    for (name, uv) in &scene.assign {
        assignment.insert(
            name.clone(),
            parse_pair(uv).with_context(|| format!("assignment {name:?}"))?,
        );
    }
    let mut env = Env {
        cfg,
        frame,
        assignment,
        objects: HashMap::new(),
    };
    for decl in &scene.objects {
        let obj = env
            .declare(decl)
            .with_context(|| format!("declaring {:?}", decl.name))?;
        tracing::debug!(name = %decl.name, kind = obj.kind(), "declared");
        if env.objects.insert(decl.name.clone(), obj).is_some() {
            bail!("{:?} declared twice", decl.name);
        }
    }
    let mut out = Vec::with_capacity(scene.queries.len());
    for query in &scene.queries {
        let outcome = match env.answer(query).with_context(|| format!("query {}", query.op()))? {
            Ok(v) => Outcome {
                op: query.op(),
                result: Some(v),
                error: None,
            },
            Err(e) => {
                tracing::warn!(op = query.op(), error = %e, "query failed");
                Outcome {
                    op: query.op(),
                    result: None,
                    error: Some(Failure {
                        kind: e.kind(),
                        message: e.to_string(),
                    }),
                }
            }
        };
        out.push(outcome);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(scene: Value) -> Value {
        let scene: Scene = serde_json::from_value(scene).unwrap();
        serde_json::to_value(evaluate(&scene, &OracleCfg::default()).unwrap()).unwrap()
    }

    #[test]
    fn parses_sqrt_values() {
        assert_eq!(parse_value("sqrt(9/4)").unwrap().to_string(), "3/2");
        assert_eq!(parse_value(" 6 ").unwrap().to_string(), "6/1");
        assert_eq!(parse_value("sqrt(2)").unwrap().to_string(), "sqrt(2/1)");
        assert!(parse_value("sqrt(-1)").is_err());
        assert!(parse_value("x").is_err());
    }

    #[test]
    fn diagonals_meet_at_center() {
        let out = run(json!({
            "objects": [
                {"name": "A", "kind": "point", "x": "0", "y": "0"},
                {"name": "B", "kind": "point", "x": "1", "y": "1"},
                {"name": "C", "kind": "point", "x": "0", "y": "1"},
                {"name": "D", "kind": "point", "x": "1", "y": "0"},
                {"name": "AB", "kind": "line_through", "p": "A", "q": "B"},
                {"name": "CD", "kind": "line_through", "p": "C", "q": "D"},
                {"name": "M", "kind": "meet", "a": "AB", "b": "CD"}
            ],
            "queries": [
                {"op": "intersect", "a": "AB", "b": "CD"},
                {"op": "collinear", "points": ["A", "M", "B"]},
                {"op": "perpendicular", "a": "AB", "b": "CD"}
            ]
        }));
        assert_eq!(
            out[0]["result"]["points"][0],
            json!({"fixed": {"x": "1/2", "y": "1/2"}})
        );
        assert_eq!(out[1]["result"], json!(true));
        assert_eq!(out[2]["result"], json!(true));
    }

    #[test]
    fn free_points_resolve_through_assignment_and_frame() {
        let out = run(json!({
            "frame": {"origin": ["1", "0"], "x_axis": ["2", "0"]},
            "assign": {"P": ["1", "1"]},
            "objects": [
                {"name": "P", "kind": "free"},
                {"name": "Q", "kind": "free"},
                {"name": "O", "kind": "point", "x": "0", "y": "0"},
                {"name": "c", "kind": "circle_through", "center": "O", "point": "P"},
                {"name": "x", "kind": "line_eq", "a": "0", "b": "1", "c": "0"}
            ],
            "queries": [
                {"op": "on_circle", "point": "P", "circle": "c"},
                {"op": "on_line", "point": "Q", "line": "x"},
                {"op": "intersect", "a": "c", "b": "x"}
            ]
        }));
        // P = (1, 0) + 1·(1, 0) + 1·(0, 1)
        assert_eq!(out[0]["result"], json!(true));
        assert_eq!(out[1]["error"]["kind"], json!("unresolved_free_point"));
        let hits = &out[2]["result"]["points"];
        assert_eq!(hits.as_array().map(Vec::len), Some(2));
        assert_eq!(hits[1]["fixed"]["x"]["expr"], json!("sqrt(5/1)"));
    }

    #[test]
    fn coincident_and_indeterminate_outcomes() {
        let scene: Scene = serde_json::from_value(json!({
            "objects": [
                {"name": "O", "kind": "point", "x": "0", "y": "0"},
                {"name": "c1", "kind": "circle", "center": "O", "radius": "sqrt(2)"},
                {"name": "c2", "kind": "circle_sq", "center": "O", "radius_sq": "2"},
                {"name": "c3", "kind": "circle_sq", "center": "O", "radius_sq": "sqrt(2)"},
                {"name": "P", "kind": "point", "x": "0", "y": "sqrt(sqrt(4))"},
                {"name": "Q", "kind": "point", "x": "0", "y": "sqrt(sqrt(2))"}
            ],
            "queries": [
                {"op": "intersect", "a": "c1", "b": "c2"},
                {"op": "on_circle", "point": "P", "circle": "c2"},
                {"op": "on_circle", "point": "Q", "circle": "c3"}
            ]
        }))
        .unwrap();
        let cfg = OracleCfg {
            max_rounds: 3,
            ..OracleCfg::default()
        };
        let out = serde_json::to_value(evaluate(&scene, &cfg).unwrap()).unwrap();
        assert_eq!(out[0]["result"], json!("coincident"));
        assert_eq!(out[1]["result"], json!(true));
        assert_eq!(out[2]["error"]["kind"], json!("indeterminate_predicate"));
        assert!(out[2].get("result").is_none());
    }

    #[test]
    fn bad_references_fail_the_run() {
        let scene: Scene = serde_json::from_value(json!({
            "objects": [
                {"name": "A", "kind": "point", "x": "0", "y": "0"},
                {"name": "l", "kind": "line_through", "p": "A", "q": "B"}
            ]
        }))
        .unwrap();
        let err = evaluate(&scene, &OracleCfg::default()).unwrap_err();
        assert!(format!("{err:#}").contains("unknown object \"B\""));
    }
}
