use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io::Cursor;

use calamine::{Reader, Xlsx};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::EcomapError;
use crate::model::{Dataset, Facility, LngLat, YearValue};

/// One declaration row of the consolidated SINADER workbook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SinaderRecord {
    /// 1-based spreadsheet row the declaration was read from.
    pub row: usize,
    pub id: String,
    pub year: i32,
    pub tonnes: f64,
    pub name: Option<String>,
    pub category: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub commune: Option<String>,
    pub region: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRow {
    /// 1-based spreadsheet row number.
    pub row: usize,
    pub reason: String,
}

/// Facilities built from a workbook, plus what was left out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinaderImport {
    pub dataset: Dataset,
    /// Years present in the kept rows, ascending.
    pub years: Vec<i32>,
    pub skipped_rows: Vec<SkippedRow>,
}

struct Columns {
    id: usize,
    year: usize,
    tonnes: usize,
    name: Option<usize>,
    category: Option<usize>,
    latitude: usize,
    longitude: usize,
    commune: Option<usize>,
    region: Option<usize>,
}

impl Columns {
    fn locate(header: &[calamine::Data]) -> Result<Columns, EcomapError> {
        let names: Vec<String> = header
            .iter()
            .map(|c| cell_as_string(c).unwrap_or_default().to_lowercase())
            .collect();
        let find = |aliases: &[&str]| names.iter().position(|n| aliases.contains(&n.as_str()));
        let require = |aliases: &[&str]| {
            find(aliases).ok_or_else(|| {
                EcomapError::Spreadsheet(format!("missing required column '{}'", aliases[0]))
            })
        };

        Ok(Columns {
            id: require(&["id_vu"])?,
            year: require(&["año", "ano", "anio", "year"])?,
            tonnes: require(&["cantidad_toneladas", "toneladas"])?,
            name: find(&["razon_social", "nombre"]),
            category: find(&["rubro"]),
            latitude: require(&["latitud", "lat"])?,
            longitude: require(&["longitud", "lng", "lon"])?,
            commune: find(&["comuna"]),
            region: find(&["region", "región"]),
        })
    }
}

/// Convert a consolidated SINADER workbook into a facility dataset.
pub fn parse_sinader_xlsx(bytes: &[u8]) -> Result<SinaderImport, EcomapError> {
    let (records, mut skipped_rows) = read_records(bytes)?;
    let mut import = build_dataset(&records);
    skipped_rows.append(&mut import.skipped_rows);
    skipped_rows.sort_by_key(|s| s.row);
    import.skipped_rows = skipped_rows;
    Ok(import)
}

/// Read declaration rows from the first worksheet, locating columns by header.
pub fn read_records(bytes: &[u8]) -> Result<(Vec<SinaderRecord>, Vec<SkippedRow>), EcomapError> {
    let cursor = Cursor::new(bytes);
    let mut workbook: Xlsx<_> = calamine::open_workbook_from_rs(cursor)
        .map_err(|e| EcomapError::Spreadsheet(format!("failed to open xlsx: {e}")))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| EcomapError::Spreadsheet("workbook has no sheets".into()))?;
    let sheet = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| EcomapError::Spreadsheet(format!("sheet '{sheet_name}' unreadable: {e}")))?;

    let mut rows = sheet.rows();
    let header = rows
        .next()
        .ok_or_else(|| EcomapError::Spreadsheet(format!("sheet '{sheet_name}' is empty")))?;
    let cols = Columns::locate(header)?;

    let mut records = Vec::new();
    let mut skipped = Vec::new();

    for (offset, row) in rows.enumerate() {
        // Header is row 1
        let row_number = offset + 2;
        let text = |col: Option<usize>| col.and_then(|c| row.get(c)).and_then(cell_as_string);

        let Some(id) = text(Some(cols.id)) else {
            if row.iter().any(|c| !matches!(c, calamine::Data::Empty)) {
                skipped.push(SkippedRow {
                    row: row_number,
                    reason: "missing id_vu".into(),
                });
            }
            continue;
        };
        let Some(year) = cell_as_f64(row.get(cols.year)).map(|y| y as i32) else {
            skipped.push(SkippedRow {
                row: row_number,
                reason: format!("establishment {id}: missing or non-numeric year"),
            });
            continue;
        };

        records.push(SinaderRecord {
            row: row_number,
            id,
            year,
            tonnes: cell_as_f64(row.get(cols.tonnes)).unwrap_or(0.0),
            name: text(cols.name),
            category: text(cols.category),
            latitude: cell_as_f64(row.get(cols.latitude)),
            longitude: cell_as_f64(row.get(cols.longitude)),
            commune: text(cols.commune),
            region: text(cols.region),
        });
    }

    Ok((records, skipped))
}

/// Group declarations into one facility per establishment.
///
/// Rows without coordinates, or with a zero latitude or longitude, are
/// dropped. Each facility gets one history entry per year present in the
/// kept rows (0 when it declared nothing that year), rounded to two
/// decimals. Name, category, commune and region take the first non-empty
/// value among the rows of the establishment's earliest year, and the
/// position comes from that year's first row. Facilities keep first-seen
/// order.
pub fn build_dataset(records: &[SinaderRecord]) -> SinaderImport {
    let mut skipped_rows = Vec::new();
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, BTreeMap<i32, YearGroup>> = HashMap::new();
    let mut years = BTreeSet::new();

    for rec in records {
        let located = matches!(
            (rec.latitude, rec.longitude),
            (Some(lat), Some(lng)) if lat != 0.0 && lng != 0.0 && lat.is_finite() && lng.is_finite()
        );
        if !located {
            skipped_rows.push(SkippedRow {
                row: rec.row,
                reason: format!("establishment {}: missing or zero coordinates", rec.id),
            });
            continue;
        }

        years.insert(rec.year);
        let by_year = groups.entry(rec.id.as_str()).or_insert_with(|| {
            order.push(rec.id.as_str());
            BTreeMap::new()
        });
        by_year
            .entry(rec.year)
            .and_modify(|group| group.absorb(rec))
            .or_insert_with(|| YearGroup::new(rec));
    }

    if !skipped_rows.is_empty() {
        warn!(
            skipped = skipped_rows.len(),
            "declarations without usable coordinates were dropped"
        );
    }

    let years: Vec<i32> = years.into_iter().collect();
    let facilities = order
        .iter()
        .filter_map(|id| {
            let by_year = groups.get(id)?;
            let earliest = by_year.values().next()?;
            let history = years
                .iter()
                .map(|&year| YearValue {
                    year,
                    value: by_year.get(&year).map(|g| round2(g.tonnes)).unwrap_or(0.0),
                })
                .collect();
            Some(Facility {
                id: id.to_string(),
                name: earliest.name.clone().unwrap_or_else(|| id.to_string()),
                category: earliest.category.clone(),
                residues: None,
                region: earliest.region.clone(),
                commune: earliest.commune.clone(),
                location: Some(earliest.location),
                history,
            })
        })
        .collect();

    SinaderImport {
        dataset: Dataset::new(facilities),
        years,
        skipped_rows,
    }
}

/// Declarations of one establishment in one year.
struct YearGroup {
    tonnes: f64,
    location: LngLat,
    name: Option<String>,
    category: Option<String>,
    commune: Option<String>,
    region: Option<String>,
}

impl YearGroup {
    /// Only called for rows that passed the coordinate check.
    fn new(rec: &SinaderRecord) -> Self {
        YearGroup {
            tonnes: rec.tonnes,
            location: LngLat::new(
                rec.longitude.unwrap_or_default(),
                rec.latitude.unwrap_or_default(),
            ),
            name: rec.name.clone(),
            category: rec.category.clone(),
            commune: rec.commune.clone(),
            region: rec.region.clone(),
        }
    }

    /// Add a later row: tonnes sum, empty attributes fill from it.
    fn absorb(&mut self, rec: &SinaderRecord) {
        self.tonnes += rec.tonnes;
        for (slot, value) in [
            (&mut self.name, &rec.name),
            (&mut self.category, &rec.category),
            (&mut self.commune, &rec.commune),
            (&mut self.region, &rec.region),
        ] {
            if slot.is_none() {
                slot.clone_from(value);
            }
        }
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn cell_as_string(cell: &calamine::Data) -> Option<String> {
    match cell {
        calamine::Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        calamine::Data::Float(f) => Some(f.to_string()),
        calamine::Data::Int(i) => Some(i.to_string()),
        calamine::Data::Empty => None,
        _ => Some(format!("{cell}")),
    }
}

/// Numeric cell value. Text cells are accepted with either decimal separator.
fn cell_as_f64(cell: Option<&calamine::Data>) -> Option<f64> {
    match cell? {
        calamine::Data::Float(f) => Some(*f),
        calamine::Data::Int(i) => Some(*i as f64),
        calamine::Data::String(s) => s.trim().replace(',', ".").parse().ok(),
        _ => None,
    }
}
