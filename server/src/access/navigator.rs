//! Site navigator.
//!
//! Category → accessible services tree handed to the rendering layer.

use serde::Serialize;
use sg_types::{CategoryId, PermissionLevel, Principal, ServiceId};

use super::resolver::Resolver;
use super::snapshot::AccessSnapshot;

/// Link to one accessible service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub id: ServiceId,
    pub name: String,
    pub path: String,
    pub description: String,
    /// Level the principal holds, so templates can hide write/edit controls.
    pub permission: PermissionLevel,
}

/// One navigator section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavEntry {
    pub category_id: CategoryId,
    pub category: String,
    /// Landing path of the category (its first service, or `/`).
    pub path: String,
    pub services: Vec<NavLink>,
}

/// Navigator for one principal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Navigator {
    pub entries: Vec<NavEntry>,
}

impl Navigator {
    /// Build the navigator from every category shown in navigation.
    ///
    /// Hidden categories are skipped. Visible categories with no accessible
    /// services are kept with an empty list.
    pub fn build(snapshot: &AccessSnapshot, principal: &Principal) -> Self {
        let catalog = snapshot.catalog();
        let resolver = Resolver::new(snapshot.overrides()).for_principal(principal);

        let entries = catalog
            .list_by_category()
            .into_iter()
            .filter(|(category, _)| category.visible_in_navigation)
            .map(|(category, services)| NavEntry {
                category_id: category.id,
                category: category.name.clone(),
                path: catalog.category_path(category.id).to_string(),
                services: services
                    .iter()
                    .filter_map(|service| {
                        let permission = resolver.resolve(service);
                        permission
                            .satisfies(PermissionLevel::Access)
                            .then(|| NavLink {
                                id: service.id,
                                name: service.name.clone(),
                                path: service.path.clone(),
                                description: service.description.clone(),
                                permission,
                            })
                    })
                    .collect(),
            })
            .collect();

        Self { entries }
    }

    /// Number of service links across all sections.
    pub fn link_count(&self) -> usize {
        self.entries.iter().map(|e| e.services.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use sg_types::{Category, GroupId, GroupServicePermission, Service};

    use super::*;

    fn snapshot(staff: GroupId) -> AccessSnapshot {
        let board = Category::new("Board", 0);
        let mut hidden = Category::new("Internal", 1);
        hidden.visible_in_navigation = false;
        let empty = Category::new("Empty", 2);

        let notice = Service::new(board.id, "Notice", "/board/notice")
            .with_ceilings(PermissionLevel::Access, PermissionLevel::Read);
        let drafts = Service::new(board.id, "Drafts", "/board/drafts")
            .with_ceilings(PermissionLevel::None, PermissionLevel::None)
            .with_display_order(2);
        let ops = Service::new(hidden.id, "Ops", "/ops")
            .with_ceilings(PermissionLevel::Read, PermissionLevel::Read);

        AccessSnapshot::build(
            vec![board, hidden, empty],
            vec![notice, drafts.clone(), ops],
            vec![GroupServicePermission::new(staff, drafts.id, PermissionLevel::Edit)],
        )
        .unwrap()
    }

    #[test]
    fn test_hidden_categories_skipped() {
        let snap = snapshot(GroupId::new());
        let nav = Navigator::build(&snap, &Principal::superuser());

        let sections: Vec<_> = nav.entries.iter().map(|e| e.category.as_str()).collect();
        assert_eq!(sections, ["Board", "Empty"]);
    }

    #[test]
    fn test_links_carry_held_permission() {
        let staff = GroupId::new();
        let snap = snapshot(staff);
        let nav = Navigator::build(&snap, &Principal::authenticated([staff]));

        let board = &nav.entries[0];
        assert_eq!(board.path, "/board/notice");
        assert_eq!(board.services.len(), 2);
        assert_eq!(board.services[0].permission, PermissionLevel::Read);
        assert_eq!(board.services[1].name, "Drafts");
        assert_eq!(board.services[1].permission, PermissionLevel::Edit);
    }

    #[test]
    fn test_anonymous_navigator() {
        let snap = snapshot(GroupId::new());
        let nav = Navigator::build(&snap, &Principal::anonymous());

        assert_eq!(nav.link_count(), 1);
        assert_eq!(nav.entries[0].services[0].name, "Notice");
        assert!(nav.entries[1].services.is_empty());
        assert_eq!(nav.entries[1].path, "/");
    }

    #[test]
    fn test_serializes_for_templates() {
        let snap = snapshot(GroupId::new());
        let nav = Navigator::build(&snap, &Principal::anonymous());
        let json = serde_json::to_value(&nav).unwrap();

        assert_eq!(json["entries"][0]["category"], "Board");
        assert_eq!(json["entries"][0]["services"][0]["permission"], "access");
    }
}
