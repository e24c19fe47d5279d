//! Menu item visibility rules.
//!
//! [`is_visible`] is a pure function of the item, the user snapshot, the
//! item's default role names and the permission entries in scope. Evaluation
//! order:
//!
//! 1. disabled items are hidden;
//! 2. host-only items are hidden from everyone but super users;
//! 3. super users see everything else;
//! 4. VIEW entries for the item in the user's portal (or portal-less) that
//!    name the user, one of the user's roles or the all-users role are
//!    applicable; an applicable deny hides the item even when an allow also
//!    applies;
//! 5. an applicable allow shows the item;
//! 6. explicit entries that do not apply hide the item;
//! 7. with no entries the default roles decide, and an empty default role
//!    set shows the item.
use crate::menu::model::{MenuItem, MenuPermission, UserInfo};

/// How a visibility decision was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Disabled,
    HostOnly,
    SuperUser,
    ExplicitDeny,
    ExplicitAllow,
    NotGranted,
    DefaultRole,
    MissingDefaultRole,
    OpenByDefault,
}

impl Decision {
    pub fn is_visible(self) -> bool {
        matches!(
            self,
            Decision::SuperUser | Decision::ExplicitAllow | Decision::DefaultRole | Decision::OpenByDefault
        )
    }
}

fn applies_to(permission: &MenuPermission, user: &UserInfo) -> bool {
    let by_user = permission.user_id == Some(user.user_id);
    let by_role = permission.role_id.is_some_and(|role_id| user.has_role_id(role_id));
    by_user || by_role
}

pub fn evaluate(
    item: &MenuItem,
    user: &UserInfo,
    default_roles: &[String],
    permissions: &[MenuPermission],
) -> Decision {
    if !item.enabled {
        return Decision::Disabled;
    }
    if item.allow_host && !user.is_super_user {
        return Decision::HostOnly;
    }
    if user.is_super_user {
        return Decision::SuperUser;
    }

    let mut explicit = permissions
        .iter()
        .filter(|p| p.menu_id == item.menu_id && p.is_view())
        .filter(|p| p.portal_id.is_none_or(|portal_id| portal_id == user.portal_id))
        .peekable();

    if explicit.peek().is_some() {
        let mut allowed = false;
        for permission in explicit.filter(|p| applies_to(p, user)) {
            if !permission.allow_access {
                return Decision::ExplicitDeny;
            }
            allowed = true;
        }
        return if allowed {
            Decision::ExplicitAllow
        } else {
            Decision::NotGranted
        };
    }

    if default_roles.is_empty() {
        Decision::OpenByDefault
    } else if default_roles.iter().any(|role| user.has_role_name(role)) {
        Decision::DefaultRole
    } else {
        Decision::MissingDefaultRole
    }
}

pub fn is_visible(
    item: &MenuItem,
    user: &UserInfo,
    default_roles: &[String],
    permissions: &[MenuPermission],
) -> bool {
    evaluate(item, user, default_roles, permissions).is_visible()
}
