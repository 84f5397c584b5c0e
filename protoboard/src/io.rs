//! JSON board and footprint documents.
//!
//! The loader validates document shape (required fields, arities, known
//! footprints, legal rotations) and fails on the first problem. Geometry is
//! left to the DRC. Unknown top-level keys of a board document survive a
//! load/save cycle.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::board::{Board, BoundingBox, ComponentInstance, Jumper, Trace};
use crate::color::{Color, ColorSource};
use crate::core::ProtoboardError;
use crate::footprint::{Footprint, FootprintLibrary, PinLine};
use crate::geometry::{Coord, Rotation};
use crate::grid::Grid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FootprintDef {
    #[serde(default)]
    pub lines: Vec<PinLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GridDef {
    width: i32,
    height: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ComponentRecord {
    #[serde(rename = "ref")]
    reference: String,
    footprint: String,
    x: i32,
    y: i32,
    #[serde(default)]
    rotation: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bbox: Option<Vec<i32>>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct JumperRecord {
    id: String,
    net: String,
    a: Coord,
    b: Coord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TraceRecord {
    id: String,
    net: String,
    points: Vec<Coord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BoardFile {
    grid: Option<GridDef>,
    #[serde(default)]
    components: Vec<ComponentRecord>,
    #[serde(default)]
    jumpers: Vec<JumperRecord>,
    #[serde(default)]
    traces: Vec<TraceRecord>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// A loaded board plus the raw document it came from.
#[derive(Debug, Clone)]
pub struct BoardDocument {
    pub board: Board,
    raw: BoardFile,
}

impl BoardDocument {
    /// Serialize the current board state. Uncolored jumpers get a color from
    /// `colors` first, and keep it from then on.
    pub fn to_json(&mut self, colors: &mut dyn ColorSource) -> Result<String, ProtoboardError> {
        self.board.assign_jumper_colors(colors);
        self.sync_raw();
        Ok(serde_json::to_string_pretty(&self.raw)?)
    }

    fn sync_raw(&mut self) {
        for record in self.raw.components.iter_mut() {
            if let Some(inst) = self.board.component(&record.reference) {
                apply_instance(record, inst);
            }
        }
        for inst in self.board.components() {
            if !self
                .raw
                .components
                .iter()
                .any(|r| r.reference == inst.reference())
            {
                let mut record = ComponentRecord {
                    reference: inst.reference().to_string(),
                    footprint: inst.footprint().name.clone(),
                    x: 0,
                    y: 0,
                    rotation: 0,
                    bbox: None,
                    extra: Map::new(),
                };
                apply_instance(&mut record, inst);
                self.raw.components.push(record);
            }
        }

        self.raw.jumpers = self
            .board
            .jumpers()
            .iter()
            .map(|j| JumperRecord {
                id: j.id.clone(),
                net: j.net.clone(),
                a: j.a,
                b: j.b,
                color: j.color.map(|c| c.to_string()),
            })
            .collect();

        self.raw.traces = self
            .board
            .traces()
            .iter()
            .map(|t| TraceRecord {
                id: t.id.clone(),
                net: t.net.clone(),
                points: t.points.clone(),
            })
            .collect();
    }
}

fn apply_instance(record: &mut ComponentRecord, inst: &ComponentInstance) {
    record.x = inst.origin.x;
    record.y = inst.origin.y;
    record.rotation = inst.rotation.degrees();
    record.bbox = inst.bbox.map(|b| b.to_array().to_vec());
}

pub fn parse_footprints(json: &str) -> Result<FootprintLibrary, ProtoboardError> {
    let defs: BTreeMap<String, FootprintDef> = serde_json::from_str(json)?;
    let mut library = FootprintLibrary::new();
    for (name, def) in defs {
        if def.lines.is_empty() {
            return Err(ProtoboardError::Parse(format!(
                "footprint '{}' has no lines",
                name
            )));
        }
        library.insert(Footprint::from_lines(name, &def.lines)?);
    }
    Ok(library)
}

pub fn load_footprints(path: &Path) -> Result<FootprintLibrary, ProtoboardError> {
    let content = std::fs::read_to_string(path)?;
    let library = parse_footprints(&content)?;
    tracing::info!("Loaded {} footprints from {}", library.len(), path.display());
    Ok(library)
}

pub fn parse_board(json: &str, library: &FootprintLibrary) -> Result<BoardDocument, ProtoboardError> {
    let raw: BoardFile = serde_json::from_str(json)?;

    let grid_def = raw
        .grid
        .as_ref()
        .ok_or_else(|| ProtoboardError::Parse("board file missing 'grid' section".to_string()))?;
    let mut board = Board::new(Grid::new(grid_def.width, grid_def.height)?);

    for record in &raw.components {
        board.add_component(build_component(record, library)?)?;
    }

    for record in &raw.jumpers {
        let mut jumper = Jumper::new(record.id.as_str(), record.net.as_str(), record.a, record.b)?;
        if let Some(color) = record.color.as_deref().filter(|c| !c.is_empty()) {
            jumper = jumper.with_color(color.parse::<Color>()?);
        }
        board.add_jumper(jumper)?;
    }

    for record in &raw.traces {
        if record.points.len() < 2 {
            return Err(ProtoboardError::Parse(format!(
                "trace '{}': points must be a list of 2+ coords",
                record.id
            )));
        }
        board.add_trace(Trace::new(
            record.id.as_str(),
            record.net.as_str(),
            record.points.clone(),
        ))?;
    }

    Ok(BoardDocument { board, raw })
}

fn build_component(
    record: &ComponentRecord,
    library: &FootprintLibrary,
) -> Result<ComponentInstance, ProtoboardError> {
    let footprint = library.get(&record.footprint)?;
    let rotation = Rotation::try_from(record.rotation).map_err(|_| {
        ProtoboardError::InvalidArgument(format!(
            "component '{}': rotation must be one of 0, 90, 180, 270 (got {})",
            record.reference, record.rotation
        ))
    })?;

    let mut inst = ComponentInstance::new(
        record.reference.as_str(),
        footprint,
        Coord::new(record.x, record.y),
    )
    .with_rotation(rotation);

    if let Some(values) = &record.bbox {
        let bbox: [i32; 4] = values.as_slice().try_into().map_err(|_| {
            ProtoboardError::Parse(format!(
                "component '{}': bbox must have 4 elements",
                record.reference
            ))
        })?;
        inst = inst.with_bbox(BoundingBox::from(bbox));
    }
    Ok(inst)
}

pub fn load_board(path: &Path, library: &FootprintLibrary) -> Result<BoardDocument, ProtoboardError> {
    let content = std::fs::read_to_string(path)?;
    let document = parse_board(&content, library)?;
    tracing::info!(
        "Loaded board {} ({} components, {} jumpers, {} traces)",
        path.display(),
        document.board.components().len(),
        document.board.jumpers().len(),
        document.board.traces().len()
    );
    Ok(document)
}

pub fn save_board(
    path: &Path,
    document: &mut BoardDocument,
    colors: &mut dyn ColorSource,
) -> Result<(), ProtoboardError> {
    let json = document.to_json(colors)?;
    std::fs::write(path, json + "\n")?;
    tracing::info!("Saved board to {}", path.display());
    Ok(())
}
