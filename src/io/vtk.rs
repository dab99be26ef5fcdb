//! Legacy VTK format support.
//!
//! Reads ASCII legacy `.vtk` files into a [`DatasetStore`]:
//!
//! - `points`: one `f64` row of three coordinates per point
//! - `elements`: the point indices of each cell
//! - `primitives`: the VTK cell type of each cell
//! - one dataset per `POINT_DATA`/`CELL_DATA`/`FIELD` array, under the
//!   array's own name
//!
//! `UNSTRUCTURED_GRID` and `POLYDATA` datasets are supported, with cells in
//! either the classic count-prefixed layout or the 5.x `OFFSETS` /
//! `CONNECTIVITY` layout. Polydata cells are ordered vertices, lines,
//! polygons, strips, and get the cell type their section and size imply.
//!
//! Binary files are rejected. Arrays of an unsupported data type such as
//! `string` are logged and skipped.
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use carpmesh::io::vtk;
//!
//! let text = "# vtk DataFile Version 3.0
//! fibre
//! ASCII
//! DATASET POLYDATA
//! POINTS 3 float
//! 0 0 0  1 0 0  2 0 0
//! LINES 1 4
//! 3 0 1 2
//! ";
//! let store = vtk::parse(text, Path::new("fibre.vtk")).unwrap();
//! assert_eq!(store.get("points").unwrap().count(), 3);
//! assert_eq!(store.get("elements").unwrap().get(0).unwrap(), &[0.0, 1.0, 2.0]);
//! ```

use std::path::Path;
use std::str::FromStr;

use crate::dataset::{self, Dataset, DatasetStore, ScalarType};
use crate::error::{ConvertError, Result};

/// VTK cell type ids used by the polydata sections and the `.elem` writer.
pub mod cell_type {
    /// `VTK_VERTEX`
    pub const VERTEX: u16 = 1;
    /// `VTK_POLY_VERTEX`
    pub const POLY_VERTEX: u16 = 2;
    /// `VTK_LINE`
    pub const LINE: u16 = 3;
    /// `VTK_POLY_LINE`
    pub const POLY_LINE: u16 = 4;
    /// `VTK_TRIANGLE`
    pub const TRIANGLE: u16 = 5;
    /// `VTK_TRIANGLE_STRIP`
    pub const TRIANGLE_STRIP: u16 = 6;
    /// `VTK_POLYGON`
    pub const POLYGON: u16 = 7;
    /// `VTK_QUAD`
    pub const QUAD: u16 = 9;
    /// `VTK_TETRA`
    pub const TETRA: u16 = 10;
    /// `VTK_HEXAHEDRON`
    pub const HEXAHEDRON: u16 = 12;
    /// `VTK_WEDGE`
    pub const WEDGE: u16 = 13;
    /// `VTK_PYRAMID`
    pub const PYRAMID: u16 = 14;
}

/// Upper bound on rows reserved up front from a count read out of the file.
const PREALLOC_LIMIT: usize = 1 << 16;

/// Load a legacy VTK file.
///
/// # Example
///
/// ```no_run
/// use carpmesh::io::vtk;
///
/// let store = vtk::load("heart.vtk").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<DatasetStore> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    // Binary files fail the header check.
    let text = String::from_utf8_lossy(&bytes);
    let store = parse(&text, path)?;
    log::info!(
        "loaded {}: {} datasets ({})",
        path.display(),
        store.len(),
        store.names().collect::<Vec<_>>().join(", ")
    );
    Ok(store)
}

/// Parse legacy VTK text. `path` is only used in error messages.
pub fn parse(text: &str, path: &Path) -> Result<DatasetStore> {
    let lines: Vec<&str> = text.lines().collect();
    check_header(&lines, path)?;

    let mut reader = Reader {
        lex: Lexer::new(path, lines, 3),
        kind: Kind::Unknown,
        points: Dataset::new(dataset::POINTS, ScalarType::F64),
        grid_cells: Vec::new(),
        grid_types: Vec::new(),
        poly_cells: Vec::new(),
        association: None,
        attributes: Vec::new(),
    };
    reader.read_body()?;
    reader.finish()
}

fn check_header(lines: &[&str], path: &Path) -> Result<()> {
    let version = lines.first().map(|l| l.trim()).unwrap_or("");
    if !version.to_ascii_lowercase().starts_with("# vtk datafile") {
        return Err(ConvertError::parse(path, "missing '# vtk DataFile' header"));
    }
    if lines.len() < 3 {
        return Err(ConvertError::parse(path, "truncated header"));
    }
    match lines[2].trim().to_ascii_uppercase().as_str() {
        "ASCII" => Ok(()),
        "BINARY" => Err(ConvertError::UnsupportedFormat(format!(
            "{}: binary VTK files are not supported",
            path.display()
        ))),
        other => Err(ConvertError::parse(
            path,
            format!("line 3: expected ASCII or BINARY, got '{}'", other),
        )),
    }
}

/// Whitespace tokens over a list of lines, tracking the line number.
struct Lexer<'a> {
    path: &'a Path,
    lines: Vec<&'a str>,
    /// Index of the next line to load; equals the 1-based number of the
    /// current line.
    line: usize,
    tokens: Vec<&'a str>,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(path: &'a Path, lines: Vec<&'a str>, start: usize) -> Self {
        Self {
            path,
            lines,
            line: start,
            tokens: Vec::new(),
            pos: 0,
        }
    }

    fn fill(&mut self) -> bool {
        while self.pos >= self.tokens.len() {
            if self.line >= self.lines.len() {
                return false;
            }
            self.tokens = self.lines[self.line].split_whitespace().collect();
            self.pos = 0;
            self.line += 1;
        }
        true
    }

    fn peek(&mut self) -> Option<&'a str> {
        if self.fill() {
            Some(self.tokens[self.pos])
        } else {
            None
        }
    }

    /// Next token, but only if it is on the current line.
    fn peek_same_line(&self) -> Option<&'a str> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<&'a str> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    fn expect(&mut self, what: &str) -> Result<&'a str> {
        self.next()
            .ok_or_else(|| self.error(format!("unexpected end of file, expected {}", what)))
    }

    fn parse<T: FromStr>(&mut self, what: &str) -> Result<T> {
        let token = self.expect(what)?;
        token
            .parse()
            .map_err(|_| self.error(format!("bad {}: '{}'", what, token)))
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<()> {
        let token = self.expect(keyword)?;
        if token.eq_ignore_ascii_case(keyword) {
            Ok(())
        } else {
            Err(self.error(format!("expected {}, got '{}'", keyword, token)))
        }
    }

    fn next_is_keyword(&mut self, keyword: &str) -> bool {
        self.peek().is_some_and(|t| t.eq_ignore_ascii_case(keyword))
    }

    /// Drop the rest of the current line and every line up to and including
    /// the next blank one.
    fn skip_metadata(&mut self) {
        self.pos = self.tokens.len();
        while self.line < self.lines.len() {
            let line = self.lines[self.line];
            self.line += 1;
            if line.trim().is_empty() {
                break;
            }
        }
    }

    /// `a * b` for two counts read from the file.
    fn product(&self, a: usize, b: usize, what: &str) -> Result<usize> {
        a.checked_mul(b)
            .ok_or_else(|| self.error(format!("{} {} x {} is too large", what, a, b)))
    }

    fn error(&self, message: String) -> ConvertError {
        ConvertError::parse(self.path, format!("line {}: {}", self.line, message))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Unknown,
    UnstructuredGrid,
    PolyData,
}

#[derive(Debug, Clone, Copy)]
enum Association {
    Point(usize),
    Cell(usize),
}

impl Association {
    fn tuples(self) -> usize {
        match self {
            Association::Point(n) | Association::Cell(n) => n,
        }
    }
}

/// Polydata section order, which is also the cell order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum PolySection {
    Vertices,
    Lines,
    Polygons,
    Strips,
}

impl PolySection {
    fn cell_type(self, size: usize) -> u16 {
        match (self, size) {
            (PolySection::Vertices, 1) => cell_type::VERTEX,
            (PolySection::Vertices, _) => cell_type::POLY_VERTEX,
            (PolySection::Lines, 2) => cell_type::LINE,
            (PolySection::Lines, _) => cell_type::POLY_LINE,
            (PolySection::Polygons, 3) => cell_type::TRIANGLE,
            (PolySection::Polygons, 4) => cell_type::QUAD,
            (PolySection::Polygons, _) => cell_type::POLYGON,
            (PolySection::Strips, _) => cell_type::TRIANGLE_STRIP,
        }
    }
}

struct Reader<'a> {
    lex: Lexer<'a>,
    kind: Kind,
    points: Dataset,
    grid_cells: Vec<Vec<u32>>,
    grid_types: Vec<u16>,
    poly_cells: Vec<(PolySection, Vec<Vec<u32>>)>,
    association: Option<Association>,
    attributes: Vec<Dataset>,
}

impl Reader<'_> {
    fn read_body(&mut self) -> Result<()> {
        self.lex.expect_keyword("DATASET")?;
        let kind = self.lex.expect("dataset type")?;
        self.kind = match kind.to_ascii_uppercase().as_str() {
            "UNSTRUCTURED_GRID" => Kind::UnstructuredGrid,
            "POLYDATA" => Kind::PolyData,
            other => {
                return Err(ConvertError::UnsupportedFormat(format!(
                    "{}: VTK dataset type {} is not supported",
                    self.lex.path.display(),
                    other
                )))
            }
        };

        while let Some(token) = self.lex.next() {
            match token.to_ascii_uppercase().as_str() {
                "POINTS" => self.read_points()?,
                "CELLS" => {
                    self.require(Kind::UnstructuredGrid, "CELLS")?;
                    self.grid_cells = self.read_cells("CELLS")?;
                }
                "CELL_TYPES" => {
                    self.require(Kind::UnstructuredGrid, "CELL_TYPES")?;
                    self.read_cell_types()?;
                }
                "VERTICES" => self.read_poly_section(PolySection::Vertices, "VERTICES")?,
                "LINES" => self.read_poly_section(PolySection::Lines, "LINES")?,
                "POLYGONS" => self.read_poly_section(PolySection::Polygons, "POLYGONS")?,
                "TRIANGLE_STRIPS" => {
                    self.read_poly_section(PolySection::Strips, "TRIANGLE_STRIPS")?
                }
                "POINT_DATA" => {
                    self.association = Some(Association::Point(self.lex.parse("tuple count")?))
                }
                "CELL_DATA" => {
                    self.association = Some(Association::Cell(self.lex.parse("tuple count")?))
                }
                "SCALARS" => self.read_scalars()?,
                "COLOR_SCALARS" => self.read_color_scalars()?,
                "LOOKUP_TABLE" => self.skip_lookup_table()?,
                "VECTORS" => self.read_fixed_array("VECTORS", 3)?,
                "NORMALS" => self.read_fixed_array("NORMALS", 3)?,
                "TENSORS" => self.read_fixed_array("TENSORS", 9)?,
                "TENSORS6" => self.read_fixed_array("TENSORS6", 6)?,
                "TEXTURE_COORDINATES" => self.read_texture_coordinates()?,
                "FIELD" => self.read_field()?,
                "METADATA" => self.lex.skip_metadata(),
                _ => return Err(self.lex.error(format!("unexpected keyword '{}'", token))),
            }
        }
        Ok(())
    }

    fn require(&self, kind: Kind, section: &str) -> Result<()> {
        if self.kind == kind {
            Ok(())
        } else {
            Err(self
                .lex
                .error(format!("{} section in a {:?} dataset", section, self.kind)))
        }
    }

    fn read_points(&mut self) -> Result<()> {
        let count: usize = self.lex.parse("point count")?;
        let _data_type = self.lex.expect("point data type")?;
        let mut points =
            Dataset::with_capacity(dataset::POINTS, ScalarType::F64, count.min(PREALLOC_LIMIT));
        let mut coords = [0.0; 3];
        for _ in 0..count {
            for c in coords.iter_mut() {
                *c = self.lex.parse("coordinate")?;
            }
            points.append(&coords);
        }
        self.points = points;
        Ok(())
    }

    fn point_index(&mut self) -> Result<u32> {
        let token = self.lex.expect("point index")?;
        match token.parse::<u64>() {
            Ok(index) => u32::try_from(index)
                .map_err(|_| self.lex.error(format!("point index {} is too large", index))),
            Err(_) => Err(self.lex.error(format!("bad point index: '{}'", token))),
        }
    }

    fn read_cells(&mut self, section: &str) -> Result<Vec<Vec<u32>>> {
        let count: usize = self.lex.parse("cell count")?;
        let size: usize = self.lex.parse("cell list size")?;

        if self.lex.next_is_keyword("OFFSETS") {
            self.lex.expect_keyword("OFFSETS")?;
            let _ = self.lex.expect("offset type")?;
            let offsets = (0..count)
                .map(|_| self.lex.parse::<usize>("offset"))
                .collect::<Result<Vec<_>>>()?;
            self.lex.expect_keyword("CONNECTIVITY")?;
            let _ = self.lex.expect("connectivity type")?;
            let connectivity = (0..size)
                .map(|_| self.point_index())
                .collect::<Result<Vec<_>>>()?;

            let mut cells = Vec::with_capacity(count.saturating_sub(1).min(PREALLOC_LIMIT));
            for w in offsets.windows(2) {
                let (begin, end) = (w[0], w[1]);
                if begin > end || end > connectivity.len() {
                    return Err(self
                        .lex
                        .error(format!("{} offsets {}..{} out of order", section, begin, end)));
                }
                cells.push(connectivity[begin..end].to_vec());
            }
            return Ok(cells);
        }

        let mut cells = Vec::with_capacity(count.min(PREALLOC_LIMIT));
        let mut read: usize = 0;
        for _ in 0..count {
            let n: usize = self.lex.parse("cell size")?;
            let cell = (0..n)
                .map(|_| self.point_index())
                .collect::<Result<Vec<_>>>()?;
            read = read.saturating_add(n).saturating_add(1);
            cells.push(cell);
        }
        if read != size {
            log::warn!(
                "{} declares {} values but its cells hold {}",
                section,
                size,
                read
            );
        }
        Ok(cells)
    }

    fn read_cell_types(&mut self) -> Result<()> {
        let count: usize = self.lex.parse("cell type count")?;
        self.grid_types = (0..count)
            .map(|_| self.lex.parse::<u16>("cell type"))
            .collect::<Result<Vec<_>>>()?;
        Ok(())
    }

    fn read_poly_section(&mut self, section: PolySection, name: &str) -> Result<()> {
        self.require(Kind::PolyData, name)?;
        let cells = self.read_cells(name)?;
        self.poly_cells.push((section, cells));
        Ok(())
    }

    fn tuples(&self, section: &str) -> Result<usize> {
        self.association
            .map(Association::tuples)
            .ok_or_else(|| self.lex.error(format!("{} outside POINT_DATA or CELL_DATA", section)))
    }

    fn read_scalars(&mut self) -> Result<()> {
        let tuples = self.tuples("SCALARS")?;
        let name = self.lex.expect("array name")?;
        let data_type = self.lex.expect("data type")?;
        let components = match self.lex.peek_same_line() {
            Some(_) => self.lex.parse("component count")?,
            None => 1,
        };
        if self.lex.next_is_keyword("LOOKUP_TABLE") {
            self.lex.expect_keyword("LOOKUP_TABLE")?;
            let _table = self.lex.expect("lookup table name")?;
        }
        self.read_array(name, data_type, tuples, components)
    }

    fn read_color_scalars(&mut self) -> Result<()> {
        let tuples = self.tuples("COLOR_SCALARS")?;
        let name = self.lex.expect("array name")?;
        let components: usize = self.lex.parse("component count")?;
        self.read_array(name, "float", tuples, components)
    }

    fn skip_lookup_table(&mut self) -> Result<()> {
        let _name = self.lex.expect("lookup table name")?;
        let size: usize = self.lex.parse("lookup table size")?;
        for _ in 0..self.lex.product(size, 4, "lookup table size")? {
            self.lex.expect("lookup table entry")?;
        }
        Ok(())
    }

    fn read_fixed_array(&mut self, section: &str, components: usize) -> Result<()> {
        let tuples = self.tuples(section)?;
        let name = self.lex.expect("array name")?;
        let data_type = self.lex.expect("data type")?;
        self.read_array(name, data_type, tuples, components)
    }

    fn read_texture_coordinates(&mut self) -> Result<()> {
        let tuples = self.tuples("TEXTURE_COORDINATES")?;
        let name = self.lex.expect("array name")?;
        let components: usize = self.lex.parse("dimension")?;
        let data_type = self.lex.expect("data type")?;
        self.read_array(name, data_type, tuples, components)
    }

    fn read_field(&mut self) -> Result<()> {
        let _field = self.lex.expect("field name")?;
        let arrays: usize = self.lex.parse("array count")?;
        for _ in 0..arrays {
            let name = self.lex.expect("array name")?;
            if name == "NULL_ARRAY" {
                continue;
            }
            let components: usize = self.lex.parse("component count")?;
            let tuples: usize = self.lex.parse("tuple count")?;
            let data_type = self.lex.expect("data type")?;
            self.read_array(name, data_type, tuples, components)?;
            if self.lex.next_is_keyword("METADATA") {
                self.lex.skip_metadata();
            }
        }
        Ok(())
    }

    fn read_array(
        &mut self,
        name: &str,
        data_type: &str,
        tuples: usize,
        components: usize,
    ) -> Result<()> {
        let values = self.lex.product(tuples, components, "array size")?;
        let Some(scalar) = ScalarType::from_vtk_name(data_type) else {
            log::warn!(
                "skipping array '{}': data type '{}' is not supported",
                name,
                data_type
            );
            for _ in 0..values {
                self.lex.expect("array value")?;
            }
            return Ok(());
        };

        let mut array = Dataset::with_capacity(name, scalar, tuples.min(PREALLOC_LIMIT));
        let mut tuple = Vec::with_capacity(components.min(PREALLOC_LIMIT));
        for _ in 0..tuples {
            tuple.clear();
            for _ in 0..components {
                tuple.push(self.lex.parse("array value")?);
            }
            array.append(&tuple);
        }
        self.attributes.push(array);
        Ok(())
    }

    fn finish(self) -> Result<DatasetStore> {
        let (cells, types) = match self.kind {
            Kind::PolyData => {
                let mut sections = self.poly_cells;
                sections.sort_by_key(|(section, _)| *section);
                let mut cells = Vec::new();
                let mut types = Vec::new();
                for (section, section_cells) in sections {
                    for cell in section_cells {
                        types.push(section.cell_type(cell.len()));
                        cells.push(cell);
                    }
                }
                (cells, types)
            }
            _ => {
                if self.grid_types.len() != self.grid_cells.len() {
                    return Err(ConvertError::parse(
                        self.lex.path,
                        format!(
                            "{} cells but {} cell types",
                            self.grid_cells.len(),
                            self.grid_types.len()
                        ),
                    ));
                }
                (self.grid_cells, self.grid_types)
            }
        };

        let mut elements = Dataset::with_capacity(dataset::ELEMENTS, ScalarType::U32, cells.len());
        let mut primitives =
            Dataset::with_capacity(dataset::PRIMITIVES, ScalarType::U16, types.len());
        for (cell, kind) in cells.iter().zip(&types) {
            let row: Vec<f64> = cell.iter().map(|&i| f64::from(i)).collect();
            elements.append(&row);
            primitives.append(&[f64::from(*kind)]);
        }

        let mut store = DatasetStore::new();
        store.insert(self.points);
        store.insert(elements);
        store.insert(primitives);
        for array in self.attributes {
            store.insert(array);
        }
        Ok(store)
    }
}
