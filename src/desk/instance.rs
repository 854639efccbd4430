//! Problem instances.
//!
//! [`InstanceData`] is the raw, id-based description (and the JSON shape
//! when the `serde` feature is enabled). [`Instance`] is its validated form
//! with dense indices, built once and shared read-only by every operation.

use super::presence::{self, Calendar};
use super::topology::Topology;
use super::{DayIdx, DeskIdx, EmployeeIdx, GroupIdx, ZoneIdx};
use crate::error::InstanceError;
use std::collections::{BTreeMap, HashMap};

/// Named lists in declaration order.
pub type NamedLists = Vec<(String, Vec<String>)>;

/// Raw instance description keyed by string identifiers.
///
/// Groups and zones are enumerated in the order they are declared.
///
/// # Examples
///
/// ```
/// use desk_assign::desk::{Instance, InstanceData};
///
/// let data = InstanceData::new(["ana", "bo"], ["D1", "D2"], ["mon"])
///     .with_zone("north", ["D1", "D2"])
///     .with_preferences("ana", ["D2"])
///     .with_group("team", ["ana", "bo"]);
/// let instance = Instance::new(&data).unwrap();
/// assert_eq!(instance.n_employees(), 2);
/// assert!(instance.prefers(0, 1));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InstanceData {
    #[cfg_attr(feature = "serde", serde(rename = "Employees"))]
    pub employees: Vec<String>,

    #[cfg_attr(feature = "serde", serde(rename = "Desks"))]
    pub desks: Vec<String>,

    #[cfg_attr(feature = "serde", serde(rename = "Days", default))]
    pub days: Vec<String>,

    /// Employee → ordered preferred desks.
    #[cfg_attr(feature = "serde", serde(rename = "Desks_E", default))]
    pub preferences: BTreeMap<String, Vec<String>>,

    /// Group → members.
    #[cfg_attr(feature = "serde", serde(rename = "Employees_G", default, with = "document_order"))]
    pub groups: NamedLists,

    /// Employee → allowed days. Empty means everyone is present every day.
    #[cfg_attr(feature = "serde", serde(rename = "Days_E", default))]
    pub calendar: BTreeMap<String, Vec<String>>,

    /// Zone → desks.
    #[cfg_attr(feature = "serde", serde(rename = "Desks_Z", default, with = "document_order"))]
    pub zones: NamedLists,
}

/// JSON objects read into [`NamedLists`] without reordering the keys.
#[cfg(feature = "serde")]
mod document_order {
    use super::NamedLists;
    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(entries: &NamedLists, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (name, items) in entries {
            map.serialize_entry(name, items)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NamedLists, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = NamedLists;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping names to lists of ids")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<NamedLists, A::Error> {
                let mut entries = NamedLists::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, items)) = access.next_entry::<String, Vec<String>>()? {
                    super::upsert(&mut entries, name, items);
                }
                Ok(entries)
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// Replaces the list named `name` in place, or appends it.
fn upsert(entries: &mut NamedLists, name: String, items: Vec<String>) {
    match entries.iter_mut().find(|(n, _)| *n == name) {
        Some(entry) => entry.1 = items,
        None => entries.push((name, items)),
    }
}

fn strings<I>(items: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

impl InstanceData {
    /// Instance with the given employees, desks and days and no
    /// preferences, groups, calendar or zones.
    pub fn new<E, D, Y>(employees: E, desks: D, days: Y) -> Self
    where
        E: IntoIterator,
        E::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
        Y: IntoIterator,
        Y::Item: Into<String>,
    {
        Self {
            employees: strings(employees),
            desks: strings(desks),
            days: strings(days),
            ..Self::default()
        }
    }

    pub fn with_preferences<I>(mut self, employee: impl Into<String>, desks: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.preferences.insert(employee.into(), strings(desks));
        self
    }

    pub fn with_group<I>(mut self, group: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        upsert(&mut self.groups, group.into(), strings(members));
        self
    }

    pub fn with_calendar<I>(mut self, employee: impl Into<String>, days: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.calendar.insert(employee.into(), strings(days));
        self
    }

    pub fn with_zone<I>(mut self, zone: impl Into<String>, desks: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        upsert(&mut self.zones, zone.into(), strings(desks));
        self
    }
}

fn index_of(ids: &[String], duplicate: fn(String) -> InstanceError) -> Result<HashMap<String, usize>, InstanceError> {
    let mut index = HashMap::with_capacity(ids.len());
    for (i, id) in ids.iter().enumerate() {
        if index.insert(id.clone(), i).is_some() {
            return Err(duplicate(id.clone()));
        }
    }
    Ok(index)
}

fn resolve(
    index: &HashMap<String, usize>,
    id: &str,
    unknown: impl FnOnce(String) -> InstanceError,
) -> Result<usize, InstanceError> {
    index.get(id).copied().ok_or_else(|| unknown(id.to_string()))
}

/// A validated, indexed instance.
///
/// Employees, desks and days keep the order of the raw lists; zones and
/// groups are numbered in declaration order.
#[derive(Debug, Clone)]
pub struct Instance {
    employees: Vec<String>,
    desks: Vec<String>,
    days: Vec<String>,
    zones: Vec<String>,
    groups: Vec<String>,
    employee_index: HashMap<String, EmployeeIdx>,
    desk_index: HashMap<String, DeskIdx>,
    day_index: HashMap<String, DayIdx>,
    preferences: Vec<Vec<DeskIdx>>,
    group_members: Vec<Vec<EmployeeIdx>>,
    zone_desks: Vec<Vec<DeskIdx>>,
    calendar: Option<Calendar>,
    topology: Topology,
    everyone: Vec<EmployeeIdx>,
}

impl Instance {
    /// Validates `data` and builds the indexed instance.
    ///
    /// Fails on duplicate ids and on references to undeclared employees,
    /// desks or days. A member listed twice in one group is kept once.
    pub fn new(data: &InstanceData) -> Result<Self, InstanceError> {
        let employee_index = index_of(&data.employees, InstanceError::DuplicateEmployee)?;
        let desk_index = index_of(&data.desks, InstanceError::DuplicateDesk)?;
        let day_index = index_of(&data.days, InstanceError::DuplicateDay)?;

        let unknown_employee = |context: &str| {
            let context = context.to_string();
            move |id| InstanceError::UnknownEmployee { context, id }
        };
        let unknown_desk = |context: &str| {
            let context = context.to_string();
            move |id| InstanceError::UnknownDesk { context, id }
        };

        let mut preferences = vec![Vec::new(); data.employees.len()];
        for (employee, desks) in &data.preferences {
            let e = resolve(&employee_index, employee, unknown_employee("preferences"))?;
            preferences[e] = desks
                .iter()
                .map(|d| resolve(&desk_index, d, unknown_desk(&format!("preferences of `{employee}`"))))
                .collect::<Result<_, _>>()?;
        }

        let groups: Vec<String> = data.groups.iter().map(|(name, _)| name.clone()).collect();
        let mut group_members = Vec::with_capacity(groups.len());
        for (group, members) in &data.groups {
            let mut resolved = Vec::with_capacity(members.len());
            for member in members {
                let e = resolve(&employee_index, member, unknown_employee(&format!("group `{group}`")))?;
                if resolved.contains(&e) {
                    tracing::warn!(group = %group, employee = %member, "employee listed twice in one group");
                    continue;
                }
                resolved.push(e);
            }
            group_members.push(resolved);
        }

        let zones: Vec<String> = data.zones.iter().map(|(name, _)| name.clone()).collect();
        let zone_desks = data
            .zones
            .iter()
            .map(|(zone, desks)| {
                desks
                    .iter()
                    .map(|d| resolve(&desk_index, d, unknown_desk(&format!("zone `{zone}`"))))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let calendar = if data.calendar.is_empty() {
            None
        } else {
            let mut calendar = Calendar::new(data.employees.len(), data.days.len());
            for (employee, days) in &data.calendar {
                let e = resolve(&employee_index, employee, unknown_employee("calendar"))?;
                for day in days {
                    let d = resolve(&day_index, day, |id| InstanceError::UnknownDay {
                        context: format!("calendar of `{employee}`"),
                        id,
                    })?;
                    calendar.allow(e, d);
                }
            }
            Some(calendar)
        };

        let topology = Topology::new(data.desks.len(), &zone_desks, data.employees.len(), &group_members);

        for (g, members) in group_members.iter().enumerate() {
            for &e in members {
                if let Some(first) = topology.group_of(e).filter(|&first| first != g) {
                    tracing::warn!(
                        employee = %data.employees[e],
                        group = %groups[g],
                        resolved_to = %groups[first],
                        "employee listed in several groups; the first group wins"
                    );
                }
            }
        }
        for (z, desks) in zone_desks.iter().enumerate() {
            for &d in desks {
                if let Some(last) = topology.zone_of(d).filter(|&last| last != z) {
                    tracing::debug!(
                        desk = %data.desks[d],
                        zone = %zones[z],
                        resolved_to = %zones[last],
                        "desk listed in several zones; the last zone wins"
                    );
                }
            }
        }

        Ok(Self {
            everyone: (0..data.employees.len()).collect(),
            employees: data.employees.clone(),
            desks: data.desks.clone(),
            days: data.days.clone(),
            zones,
            groups,
            employee_index,
            desk_index,
            day_index,
            preferences,
            group_members,
            zone_desks,
            calendar,
            topology,
        })
    }

    pub fn n_employees(&self) -> usize {
        self.employees.len()
    }

    pub fn n_desks(&self) -> usize {
        self.desks.len()
    }

    pub fn n_days(&self) -> usize {
        self.days.len()
    }

    pub fn n_zones(&self) -> usize {
        self.zones.len()
    }

    pub fn n_groups(&self) -> usize {
        self.groups.len()
    }

    pub fn employees(&self) -> &[String] {
        &self.employees
    }

    pub fn desks(&self) -> &[String] {
        &self.desks
    }

    pub fn days(&self) -> &[String] {
        &self.days
    }

    pub fn zones(&self) -> &[String] {
        &self.zones
    }

    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    pub fn employee_index(&self, id: &str) -> Option<EmployeeIdx> {
        self.employee_index.get(id).copied()
    }

    pub fn desk_index(&self, id: &str) -> Option<DeskIdx> {
        self.desk_index.get(id).copied()
    }

    pub fn day_index(&self, id: &str) -> Option<DayIdx> {
        self.day_index.get(id).copied()
    }

    /// Ordered preferred desks of `employee`.
    pub fn preferences(&self, employee: EmployeeIdx) -> &[DeskIdx] {
        &self.preferences[employee]
    }

    /// Whether `desk` is on `employee`'s preference list.
    #[inline]
    pub fn prefers(&self, employee: EmployeeIdx, desk: DeskIdx) -> bool {
        self.preferences[employee].contains(&desk)
    }

    pub fn group_members(&self, group: GroupIdx) -> &[EmployeeIdx] {
        &self.group_members[group]
    }

    pub fn zone_desks(&self, zone: ZoneIdx) -> &[DeskIdx] {
        &self.zone_desks[zone]
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn calendar(&self) -> Option<&Calendar> {
        self.calendar.as_ref()
    }

    /// Employees present on `day`, in instance order.
    pub fn present(&self, day: DayIdx) -> Vec<EmployeeIdx> {
        presence::present(day, self.calendar.as_ref(), &self.everyone)
    }
}

impl TryFrom<&InstanceData> for Instance {
    type Error = InstanceError;

    fn try_from(data: &InstanceData) -> Result<Self, Self::Error> {
        Instance::new(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn office() -> InstanceData {
        InstanceData::new(["A", "B", "C"], ["D1", "D2", "D3"], ["mon", "tue"])
            .with_zone("z2", ["D3"])
            .with_zone("z1", ["D1", "D2"])
            .with_preferences("A", ["D2", "D1"])
            .with_group("g", ["A", "C"])
    }

    #[test]
    fn test_instance_indexes_everything() {
        let instance = Instance::new(&office()).unwrap();
        assert_eq!(instance.n_employees(), 3);
        assert_eq!(instance.n_desks(), 3);
        assert_eq!(instance.n_days(), 2);
        // zones keep their declaration order
        assert_eq!(instance.zones(), ["z2", "z1"]);
        assert_eq!(instance.zone_desks(0), [2]);
        assert_eq!(instance.topology().zone_of(2), Some(0));
        assert_eq!(instance.topology().zone_of(0), Some(1));
        assert_eq!(instance.preferences(0), [1, 0]);
        assert!(instance.prefers(0, 0));
        assert!(!instance.prefers(1, 0));
        assert_eq!(instance.group_members(0), [0, 2]);
        assert_eq!(instance.topology().group_of(1), None);
        assert_eq!(instance.employee_index("C"), Some(2));
        assert_eq!(instance.desk_index("nope"), None);
        assert_eq!(instance.day_index("tue"), Some(1));
    }

    #[test]
    fn test_no_calendar_means_all_present() {
        let instance = Instance::new(&office()).unwrap();
        assert!(instance.calendar().is_none());
        assert_eq!(instance.present(1), vec![0, 1, 2]);
    }

    #[test]
    fn test_calendar_presence() {
        let data = office().with_calendar("B", ["tue"]).with_calendar("A", ["mon", "tue"]);
        let instance = Instance::new(&data).unwrap();
        assert_eq!(instance.present(0), vec![0]);
        assert_eq!(instance.present(1), vec![0, 1]);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let data = InstanceData::new(["A", "A"], ["D1"], ["mon"]);
        assert_eq!(
            Instance::new(&data).unwrap_err(),
            InstanceError::DuplicateEmployee("A".into())
        );
        let data = InstanceData::new(["A"], ["D1", "D1"], ["mon"]);
        assert_eq!(
            Instance::new(&data).unwrap_err(),
            InstanceError::DuplicateDesk("D1".into())
        );
        let data = InstanceData::new(["A"], ["D1"], ["mon", "mon"]);
        assert_eq!(
            Instance::new(&data).unwrap_err(),
            InstanceError::DuplicateDay("mon".into())
        );
    }

    #[test]
    fn test_unknown_references_rejected() {
        let data = office().with_preferences("A", ["D9"]);
        assert!(matches!(
            Instance::new(&data),
            Err(InstanceError::UnknownDesk { id, .. }) if id == "D9"
        ));

        let data = office().with_group("h", ["Z"]);
        assert!(matches!(
            Instance::new(&data),
            Err(InstanceError::UnknownEmployee { id, .. }) if id == "Z"
        ));

        let data = office().with_calendar("A", ["sun"]);
        assert!(matches!(
            Instance::new(&data),
            Err(InstanceError::UnknownDay { id, .. }) if id == "sun"
        ));

        let data = office().with_zone("z3", ["D4"]);
        assert!(matches!(Instance::new(&data), Err(InstanceError::UnknownDesk { .. })));
    }

    #[test]
    fn test_duplicate_group_member_kept_once() {
        let data = office().with_group("g", ["A", "C", "A"]);
        let instance = Instance::new(&data).unwrap();
        assert_eq!(instance.group_members(0), [0, 2]);
        assert_eq!(instance.topology().group_of(0), Some(0));
    }

    #[test]
    fn test_overlapping_groups_first_declared_wins() {
        // "a-late" sorts before "g" but is declared after it
        let data = office().with_group("a-late", ["C", "B"]);
        let instance = Instance::new(&data).unwrap();
        assert_eq!(instance.groups(), ["g", "a-late"]);
        assert_eq!(instance.group_members(1), [2, 1]);
        assert_eq!(instance.topology().group_of(2), Some(0));
        assert_eq!(instance.topology().group_of(1), Some(1));
    }

    #[test]
    fn test_redeclared_zone_keeps_its_position() {
        let data = office().with_zone("z3", Vec::<&str>::new()).with_zone("z2", ["D1"]);
        assert_eq!(
            data.zones,
            vec![
                ("z2".to_string(), vec!["D1".to_string()]),
                ("z1".to_string(), vec!["D1".to_string(), "D2".to_string()]),
                ("z3".to_string(), Vec::new()),
            ]
        );
        let instance = Instance::new(&data).unwrap();
        assert_eq!(instance.zones(), ["z2", "z1", "z3"]);
        // D1 is claimed by z2 and z1; the later declaration wins
        assert_eq!(instance.topology().zone_of(0), Some(1));
        assert_eq!(instance.topology().zone_of(2), None);
    }

    #[test]
    fn test_empty_instance_is_valid() {
        let instance = Instance::new(&InstanceData::default()).unwrap();
        assert_eq!(instance.n_employees(), 0);
        assert_eq!(instance.n_days(), 0);
    }
}
