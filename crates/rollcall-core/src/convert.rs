// ── Wire → domain conversion ──
//
// Maps `rollcall-api` payloads into canonical model types. Server order
// is preserved everywhere; nothing is sorted here.

use rollcall_api::{DepartmentPayload, EmployeePayload};

use crate::model::{DepartmentSnapshot, EmployeeRecord};

impl From<EmployeePayload> for EmployeeRecord {
    fn from(p: EmployeePayload) -> Self {
        Self {
            id: p.id,
            employee_code: p.employee_id,
            department_id: p.department_id,
            last_name: p.last_name.filter(|s| !s.is_empty()),
            nick_name: p.nick_name.filter(|s| !s.is_empty()),
            present: p.status,
        }
    }
}

impl From<DepartmentPayload> for DepartmentSnapshot {
    fn from(p: DepartmentPayload) -> Self {
        Self {
            department_name: p.department_name,
            display_order: p.display_number,
            employees: p.result.into_iter().map(EmployeeRecord::from).collect(),
        }
    }
}

/// Convert a full snapshot frame, keeping server order.
pub fn departments_from_payload(payload: Vec<DepartmentPayload>) -> Vec<DepartmentSnapshot> {
    payload.into_iter().map(DepartmentSnapshot::from).collect()
}
