//! Well-known text reader and writer.
//!
//! Supports the subset used for footprints and time axes: `POINT`,
//! `LINESTRING`, `MULTILINESTRING`, `POLYGON` and `MULTIPOLYGON`.
//! Coordinates are written as `lon lat`.

use std::fmt::Write;

use swath_common::{SwathError, SwathResult};

use crate::types::{Geometry, LineString, MultiPolygon, Point, Polygon};

/// Parse a WKT string into a geometry.
pub fn parse(wkt: &str) -> SwathResult<Geometry> {
    let mut parser = Parser::new(wkt);
    let geometry = parser.geometry()?;
    parser.skip_whitespace();
    if !parser.at_end() {
        return Err(parser.error("unexpected trailing characters"));
    }
    Ok(geometry)
}

/// Parse a WKT string that must hold a polygon.
pub fn parse_polygon(wkt: &str) -> SwathResult<Polygon> {
    match parse(wkt)? {
        Geometry::Polygon(polygon) => Ok(polygon),
        other => Err(SwathError::wkt_parse(format!("expected POLYGON, got {}", type_name(&other)))),
    }
}

/// Parse a WKT string that must hold a line string.
pub fn parse_line_string(wkt: &str) -> SwathResult<LineString> {
    match parse(wkt)? {
        Geometry::LineString(line) => Ok(line),
        other => Err(SwathError::wkt_parse(format!("expected LINESTRING, got {}", type_name(&other)))),
    }
}

/// Parse a WKT string that must hold a point.
pub fn parse_point(wkt: &str) -> SwathResult<Point> {
    match parse(wkt)? {
        Geometry::Point(point) => Ok(point),
        other => Err(SwathError::wkt_parse(format!("expected POINT, got {}", type_name(&other)))),
    }
}

/// Format a geometry as WKT.
pub fn format(geometry: &Geometry) -> String {
    let mut out = String::new();
    match geometry {
        Geometry::Point(p) => {
            out.push_str("POINT (");
            write_coord(&mut out, p);
            out.push(')');
        }
        Geometry::LineString(line) => {
            out.push_str("LINESTRING ");
            write_coord_list(&mut out, line.points());
        }
        Geometry::MultiLineString(lines) => {
            if lines.is_empty() {
                out.push_str("MULTILINESTRING EMPTY");
            } else {
                out.push_str("MULTILINESTRING (");
                for (i, line) in lines.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    write_coord_list(&mut out, line.points());
                }
                out.push(')');
            }
        }
        Geometry::Polygon(polygon) => {
            out.push_str("POLYGON ");
            write_polygon_body(&mut out, polygon);
        }
        Geometry::MultiPolygon(mp) => {
            if mp.is_empty() {
                out.push_str("MULTIPOLYGON EMPTY");
            } else {
                out.push_str("MULTIPOLYGON (");
                for (i, polygon) in mp.polygons().iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    write_polygon_body(&mut out, polygon);
                }
                out.push(')');
            }
        }
    }
    out
}

fn type_name(geometry: &Geometry) -> &'static str {
    match geometry {
        Geometry::Point(_) => "POINT",
        Geometry::LineString(_) => "LINESTRING",
        Geometry::MultiLineString(_) => "MULTILINESTRING",
        Geometry::Polygon(_) => "POLYGON",
        Geometry::MultiPolygon(_) => "MULTIPOLYGON",
    }
}

fn write_coord(out: &mut String, p: &Point) {
    let _ = write!(out, "{} {}", p.lon, p.lat);
}

fn write_coord_list(out: &mut String, points: &[Point]) {
    out.push('(');
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_coord(out, p);
    }
    out.push(')');
}

fn write_polygon_body(out: &mut String, polygon: &Polygon) {
    out.push('(');
    write_coord_list(out, polygon.exterior());
    for ring in polygon.interiors() {
        out.push_str(", ");
        write_coord_list(out, ring);
    }
    out.push(')');
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn error(&self, msg: &str) -> SwathError {
        SwathError::wkt_parse(format!("{} at offset {} in '{}'", msg, self.pos, self.input))
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn consume(&mut self, expected: char) -> bool {
        self.skip_whitespace();
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> SwathResult<()> {
        if self.consume(expected) {
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}'", expected)))
        }
    }

    fn keyword(&mut self) -> String {
        self.skip_whitespace();
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !c.is_ascii_alphabetic() {
                break;
            }
            self.pos += 1;
        }
        self.input[start..self.pos].to_ascii_uppercase()
    }

    fn is_empty_marker(&mut self) -> bool {
        let saved = self.pos;
        if self.keyword() == "EMPTY" {
            true
        } else {
            self.pos = saved;
            false
        }
    }

    fn number(&mut self) -> SwathResult<f64> {
        self.skip_whitespace();
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E') {
                self.pos += 1;
            } else {
                break;
            }
        }
        let text = &self.input[start..self.pos];
        text.parse::<f64>()
            .map_err(|_| self.error(&format!("invalid number '{}'", text)))
    }

    fn coord(&mut self) -> SwathResult<Point> {
        let lon = self.number()?;
        let lat = self.number()?;
        Point::try_new(lon, lat).map_err(|e| self.error(&e.to_string()))
    }

    fn coord_list(&mut self) -> SwathResult<Vec<Point>> {
        self.expect('(')?;
        let mut points = vec![self.coord()?];
        while self.consume(',') {
            points.push(self.coord()?);
        }
        self.expect(')')?;
        Ok(points)
    }

    fn polygon_body(&mut self) -> SwathResult<Polygon> {
        self.expect('(')?;
        let exterior = self.coord_list()?;
        let mut interiors = Vec::new();
        while self.consume(',') {
            interiors.push(self.coord_list()?);
        }
        self.expect(')')?;
        Polygon::with_interiors(exterior, interiors)
    }

    fn geometry(&mut self) -> SwathResult<Geometry> {
        let keyword = self.keyword();
        match keyword.as_str() {
            "POINT" => {
                self.expect('(')?;
                let point = self.coord()?;
                self.expect(')')?;
                Ok(Geometry::Point(point))
            }
            "LINESTRING" => Ok(Geometry::LineString(LineString::new(self.coord_list()?)?)),
            "MULTILINESTRING" => {
                if self.is_empty_marker() {
                    return Ok(Geometry::MultiLineString(Vec::new()));
                }
                self.expect('(')?;
                let mut lines = vec![LineString::new(self.coord_list()?)?];
                while self.consume(',') {
                    lines.push(LineString::new(self.coord_list()?)?);
                }
                self.expect(')')?;
                Ok(Geometry::MultiLineString(lines))
            }
            "POLYGON" => Ok(Geometry::Polygon(self.polygon_body()?)),
            "MULTIPOLYGON" => {
                if self.is_empty_marker() {
                    return Ok(Geometry::MultiPolygon(MultiPolygon::empty()));
                }
                self.expect('(')?;
                let mut polygons = vec![self.polygon_body()?];
                while self.consume(',') {
                    polygons.push(self.polygon_body()?);
                }
                self.expect(')')?;
                Ok(Geometry::MultiPolygon(MultiPolygon(polygons)))
            }
            "" => Err(self.error("missing geometry type")),
            other => Err(self.error(&format!("unsupported geometry type '{}'", other))),
        }
    }
}
