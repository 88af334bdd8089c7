//! Side menu entries and the role filter applied to them.

use crate::role::{Role, RoleSet};
use crate::Route;

#[derive(Clone, Debug, PartialEq)]
pub struct MenuEntry {
    pub label: &'static str,
    pub route: Route,
    /// `None`: shown to every logged-in user.
    pub roles: Option<RoleSet>,
}

const fn entry(label: &'static str, route: Route, roles: Option<RoleSet>) -> MenuEntry {
    MenuEntry { label, route, roles }
}

pub const MENU: [MenuEntry; 9] = [
    entry("Home", Route::Landing, None),
    entry("Dashboard", Route::Dashboard, Some(RoleSet::ADMIN)),
    entry("Inventory", Route::Inventory, Some(RoleSet::ANY)),
    entry("Maintenance", Route::Maintenance, Some(RoleSet::ANY)),
    entry("PM Admin", Route::PreventiveAdmin, Some(RoleSet::ADMIN)),
    entry("PM Schedule", Route::PreventiveUser, Some(RoleSet::ANY)),
    entry("Audit Logs", Route::AuditLogs, Some(RoleSet::ADMIN)),
    entry("Board Inventory", Route::Boards, Some(RoleSet::ADMIN)),
    entry("BOM Management", Route::BomManagement, Some(RoleSet::ADMIN)),
];

impl MenuEntry {
    pub fn visible_to(&self, role: Option<Role>) -> bool {
        match self.roles {
            None => true,
            Some(set) => set.admits(role),
        }
    }
}

/// Entries the role may see, in declaration order.
pub fn visible_entries(role: Option<Role>, entries: &[MenuEntry]) -> Vec<MenuEntry> {
    entries.iter().filter(|e| e.visible_to(role)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(entries: &[MenuEntry]) -> Vec<&'static str> {
        entries.iter().map(|e| e.label).collect()
    }

    #[test]
    fn admin_sees_everything_in_order() {
        let all = visible_entries(Some(Role::Admin), &MENU);
        assert_eq!(labels(&all), labels(&MENU));
    }

    #[test]
    fn user_sees_shared_pages_only() {
        let seen = visible_entries(Some(Role::User), &MENU);
        assert_eq!(
            labels(&seen),
            vec!["Home", "Inventory", "Maintenance", "PM Schedule"]
        );
    }

    #[test]
    fn unrestricted_entry_survives_without_role() {
        let entries = [
            entry("Secret", Route::Dashboard, Some(RoleSet::ADMIN)),
            entry("Open", Route::Landing, None),
        ];
        assert_eq!(labels(&visible_entries(Some(Role::User), &entries)), vec!["Open"]);
        assert_eq!(labels(&visible_entries(None, &entries)), vec!["Open"]);
    }

    #[test]
    fn empty_role_set_hides_entry() {
        let entries = [entry("Nobody", Route::Settings, Some(RoleSet::EMPTY))];
        assert!(visible_entries(Some(Role::Admin), &entries).is_empty());
    }
}
