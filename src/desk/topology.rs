//! Desk→zone and employee→group lookups.

use super::{DeskIdx, EmployeeIdx, GroupIdx, ZoneIdx};

/// Read-only lookups derived once from an instance's zone and group
/// listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    desk_zone: Vec<Option<ZoneIdx>>,
    employee_group: Vec<Option<GroupIdx>>,
}

impl Topology {
    /// Builds the lookups.
    ///
    /// `zone_desks[z]` lists the desks of zone `z`; a desk listed by several
    /// zones maps to the last of them. `group_members[g]` lists the members
    /// of group `g`; an employee listed by several groups maps to the first
    /// of them. Indices must be in range (checked by
    /// [`Instance::new`](super::Instance::new)).
    pub fn new(
        n_desks: usize,
        zone_desks: &[Vec<DeskIdx>],
        n_employees: usize,
        group_members: &[Vec<EmployeeIdx>],
    ) -> Self {
        let mut desk_zone = vec![None; n_desks];
        for (zone, desks) in zone_desks.iter().enumerate() {
            for &desk in desks {
                desk_zone[desk] = Some(zone);
            }
        }

        let mut employee_group = vec![None; n_employees];
        for (group, members) in group_members.iter().enumerate() {
            for &employee in members {
                employee_group[employee].get_or_insert(group);
            }
        }

        Self {
            desk_zone,
            employee_group,
        }
    }

    /// Zone of `desk`, if it belongs to one.
    #[inline]
    pub fn zone_of(&self, desk: DeskIdx) -> Option<ZoneIdx> {
        self.desk_zone[desk]
    }

    /// Group of `employee`, if any.
    #[inline]
    pub fn group_of(&self, employee: EmployeeIdx) -> Option<GroupIdx> {
        self.employee_group[employee]
    }
}
