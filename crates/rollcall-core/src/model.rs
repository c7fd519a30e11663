//! Canonical attendance domain types.
//!
//! Everything here is produced by the server and only ever replaced
//! wholesale by a newer snapshot; the client never patches records.

/// Today's attendance for one employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Presence {
    Present,
    Absent,
    /// No record yet. Rendered as a placeholder, not as absence.
    Unknown,
}

impl From<Option<bool>> for Presence {
    fn from(flag: Option<bool>) -> Self {
        match flag {
            Some(true) => Self::Present,
            Some(false) => Self::Absent,
            None => Self::Unknown,
        }
    }
}

/// One employee row on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeRecord {
    pub id: i64,
    /// Stable, human-assigned code.
    pub employee_code: String,
    pub department_id: i64,
    pub last_name: Option<String>,
    pub nick_name: Option<String>,
    /// `None` means the server has no attendance data for today.
    pub present: Option<bool>,
}

impl EmployeeRecord {
    pub fn presence(&self) -> Presence {
        Presence::from(self.present)
    }

    /// Name as shown in a board cell.
    pub fn display_name(&self) -> String {
        crate::layout::format_name(self.last_name.as_deref(), self.nick_name.as_deref())
    }
}

/// Attendance counts for a department.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttendanceTally {
    pub present: usize,
    pub absent: usize,
    pub unknown: usize,
}

impl AttendanceTally {
    pub fn total(&self) -> usize {
        self.present + self.absent + self.unknown
    }
}

/// One department and its roster, in server order.
///
/// `department_name` is unique within a snapshot and is the key used for
/// selection. `display_order` is carried for presentation only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentSnapshot {
    pub department_name: String,
    pub display_order: i64,
    pub employees: Vec<EmployeeRecord>,
}

impl DepartmentSnapshot {
    pub fn tally(&self) -> AttendanceTally {
        self.employees
            .iter()
            .fold(AttendanceTally::default(), |mut tally, e| {
                match e.presence() {
                    Presence::Present => tally.present += 1,
                    Presence::Absent => tally.absent += 1,
                    Presence::Unknown => tally.unknown += 1,
                }
                tally
            })
    }
}
