//! Page layout engine.
//!
//! Packs the selected departments into pages of at most
//! `max_columns_per_page` columns, each column holding at most
//! `max_rows_per_column` employees. A long roster is split across several
//! consecutive columns tagged with the same department name.
//!
//! Pages are only flushed *between* departments: when a department's
//! whole column count no longer fits on the current (non-empty) page, the
//! page is closed first. A single department that needs more columns than
//! a page holds is therefore laid out on one page that overflows the cap.
//! That overflow is deliberate and covered by tests; callers that care
//! should size `max_columns_per_page` for their largest department.

use crate::error::CoreError;
use crate::model::{AttendanceTally, DepartmentSnapshot, EmployeeRecord, Presence};

/// Names longer than this are replaced by the nickname or truncated.
pub const MAX_NAME_CHARS: usize = 7;

/// Text of an empty grid cell.
pub const PLACEHOLDER: &str = "-";

// ── Configuration ────────────────────────────────────────────────────

/// Fixed grid capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
    pub max_columns_per_page: usize,
    pub max_rows_per_column: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_columns_per_page: 10,
            max_rows_per_column: 20,
        }
    }
}

impl LayoutConfig {
    pub fn new(max_columns_per_page: usize, max_rows_per_column: usize) -> Result<Self, CoreError> {
        if max_columns_per_page == 0 {
            return Err(CoreError::ValidationFailed {
                message: "max_columns_per_page must be at least 1".into(),
            });
        }
        if max_rows_per_column == 0 {
            return Err(CoreError::ValidationFailed {
                message: "max_rows_per_column must be at least 1".into(),
            });
        }
        Ok(Self {
            max_columns_per_page,
            max_rows_per_column,
        })
    }
}

// ── Layout units ─────────────────────────────────────────────────────

/// A contiguous slice of one department's roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageColumn {
    pub source_department_name: String,
    /// Tally for the whole department, not just this slice.
    pub department_tally: AttendanceTally,
    pub rows: Vec<EmployeeRecord>,
}

/// One screenful of columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub columns: Vec<PageColumn>,
}

/// Header cell of a rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderCell {
    Department {
        name: String,
        tally: AttendanceTally,
    },
    Placeholder,
}

/// Body cell of a rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyCell {
    Employee { name: String, presence: Presence },
    Placeholder,
}

/// Render-ready matrix for one page: a header row plus exactly
/// `max_rows_per_column` body rows, all the same width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageGrid {
    pub header: Vec<HeaderCell>,
    pub rows: Vec<Vec<BodyCell>>,
}

impl PageGrid {
    pub fn width(&self) -> usize {
        self.header.len()
    }
}

impl Page {
    /// Dash columns appended to reach `max_columns_per_page`. Only the last
    /// page is ever padded.
    pub fn placeholder_columns(&self, is_last: bool, config: &LayoutConfig) -> usize {
        if is_last {
            config.max_columns_per_page.saturating_sub(self.columns.len())
        } else {
            0
        }
    }

    pub fn grid(&self, is_last: bool, config: &LayoutConfig) -> PageGrid {
        let padding = self.placeholder_columns(is_last, config);

        let header = self
            .columns
            .iter()
            .map(|c| HeaderCell::Department {
                name: c.source_department_name.clone(),
                tally: c.department_tally,
            })
            .chain(std::iter::repeat_n(HeaderCell::Placeholder, padding))
            .collect();

        let rows = (0..config.max_rows_per_column)
            .map(|r| {
                self.columns
                    .iter()
                    .map(|c| {
                        c.rows.get(r).map_or(BodyCell::Placeholder, |e| BodyCell::Employee {
                            name: e.display_name(),
                            presence: e.presence(),
                        })
                    })
                    .chain(std::iter::repeat_n(BodyCell::Placeholder, padding))
                    .collect()
            })
            .collect();

        PageGrid { header, rows }
    }
}

// ── Packing ──────────────────────────────────────────────────────────

/// Partition `departments` (already filtered, in snapshot order) into pages.
///
/// Empty rosters contribute no columns. An empty input yields no pages.
pub fn paginate<'a, I>(departments: I, config: &LayoutConfig) -> Vec<Page>
where
    I: IntoIterator<Item = &'a DepartmentSnapshot>,
{
    let rows_per_column = config.max_rows_per_column.max(1);

    let mut pages = Vec::new();
    let mut current: Vec<PageColumn> = Vec::new();

    for department in departments {
        if department.employees.is_empty() {
            continue;
        }

        let columns_needed = department.employees.len().div_ceil(rows_per_column);
        if current.len() + columns_needed > config.max_columns_per_page && !current.is_empty() {
            pages.push(Page {
                columns: std::mem::take(&mut current),
            });
        }

        let tally = department.tally();
        current.extend(
            department
                .employees
                .chunks(rows_per_column)
                .map(|chunk| PageColumn {
                    source_department_name: department.department_name.clone(),
                    department_tally: tally,
                    rows: chunk.to_vec(),
                }),
        );
    }

    if !current.is_empty() {
        pages.push(Page { columns: current });
    }

    pages
}

// ── Cell text ────────────────────────────────────────────────────────

/// Choose the text for a name cell.
///
/// No last name: the nickname, or nothing. A last name of at most
/// [`MAX_NAME_CHARS`] characters is shown as is; a longer one yields to
/// the nickname, or is truncated when there is none. Empty strings count
/// as absent.
pub fn format_name(last_name: Option<&str>, nick_name: Option<&str>) -> String {
    let nick = nick_name.filter(|s| !s.is_empty());
    match last_name.filter(|s| !s.is_empty()) {
        None => nick.unwrap_or_default().to_owned(),
        Some(last) if last.chars().count() <= MAX_NAME_CHARS => last.to_owned(),
        Some(last) => nick.map_or_else(
            || last.chars().take(MAX_NAME_CHARS).collect(),
            str::to_owned,
        ),
    }
}

// ── Tests ────────────────────────────────────────────────────────────
