//! Name resolution over a topology tree.
//!
//! Lookups walk from a scope up to the root, innermost first. All paths returned
//! are fully joined scope paths.

use crate::meta::{App, Channel, ChannelType};
use crate::scope;

/// Finds the App at `scope`; the root is `""`.
pub(crate) fn find_app<'a>(root: &'a App, scope: &str) -> Option<&'a App> {
    scope::segments(scope).try_fold(root, |app, segment| app.spec.apps.get(segment))
}

pub(crate) fn find_app_mut<'a>(root: &'a mut App, scope: &str) -> Option<&'a mut App> {
    scope::segments(scope).try_fold(root, |app, segment| app.spec.apps.get_mut(segment))
}

/// Finds the Channel at a fully joined channel path.
pub(crate) fn find_channel<'a>(root: &'a App, path: &str) -> Option<&'a Channel> {
    let (parent, name) = scope::remove_last_part_in_scope(path).ok()?;
    find_app(root, &parent)?.spec.channels.get(&name)
}

pub(crate) fn find_channel_mut<'a>(root: &'a mut App, path: &str) -> Option<&'a mut Channel> {
    let (parent, name) = scope::remove_last_part_in_scope(path).ok()?;
    find_app_mut(root, &parent)?.spec.channels.get_mut(&name)
}

pub(crate) fn find_type_mut<'a>(root: &'a mut App, path: &str) -> Option<&'a mut ChannelType> {
    let (parent, name) = scope::remove_last_part_in_scope(path).ok()?;
    find_app_mut(root, &parent)?.spec.types.get_mut(&name)
}

/// Resolves a Type name visible from `scope`.
pub(crate) fn resolve_type(root: &App, scope: &str, name: &str) -> Option<String> {
    scope::ancestors_inclusive(scope).into_iter().find_map(|candidate| {
        find_app(root, &candidate)
            .filter(|app| app.spec.types.contains_key(name))
            .map(|_| scope::child_path(&candidate, name))
    })
}

/// Resolves a bare Channel name visible from `scope`.
pub(crate) fn resolve_channel(root: &App, scope: &str, name: &str) -> Option<String> {
    scope::ancestors_inclusive(scope).into_iter().find_map(|candidate| {
        find_app(root, &candidate)
            .filter(|app| app.spec.channels.contains_key(name))
            .map(|_| scope::child_path(&candidate, name))
    })
}

/// Resolves an alias target declared at `alias_scope` to a channel path.
///
/// Dotted targets are absolute channel paths; bare targets resolve upward like
/// any other channel name.
pub(crate) fn resolve_alias_target(root: &App, alias_scope: &str, target: &str) -> Option<String> {
    if target.contains(scope::SCOPE_SEPARATOR) {
        find_channel(root, target).map(|_| target.to_string())
    } else if scope::is_valid_name(target) {
        resolve_channel(root, alias_scope, target)
    } else {
        None
    }
}

/// Resolves a boundary name of the App at `app_scope` to a channel path.
///
/// At each scope a Channel of that name wins over an Alias of that name.
pub(crate) fn resolve_boundary_name(root: &App, app_scope: &str, name: &str) -> Option<String> {
    for candidate in scope::ancestors_inclusive(app_scope) {
        let Some(app) = find_app(root, &candidate) else {
            continue;
        };
        if app.spec.channels.contains_key(name) {
            return Some(scope::child_path(&candidate, name));
        }
        if let Some(alias) = app.spec.aliases.get(name) {
            return resolve_alias_target(root, &candidate, &alias.target);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::Alias;

    fn tree() -> App {
        App::named("")
            .with_type(ChannelType::new("Event", "{}"))
            .with_channel(Channel::new("audit", "Event"))
            .with_app(
                App::named("billing")
                    .with_type(ChannelType::new("Invoice", "{}"))
                    .with_channel(Channel::new("invoices", "Invoice"))
                    .with_alias(Alias::new("bills", "invoices"))
                    .with_alias(Alias::new("log", "audit"))
                    .with_app(App::named("printer").with_input("bills")),
            )
            .with_app(App::named("billing2").with_alias(Alias::new("remote", "billing.invoices")))
    }

    #[test]
    fn find_app_walks_segments() {
        let root = tree();
        assert_eq!(find_app(&root, "").map(|a| a.meta.name.as_str()), Some(""));
        assert!(find_app(&root, "billing.printer").is_some());
        assert!(find_app(&root, "billing.missing").is_none());
        assert!(find_channel(&root, "billing.invoices").is_some());
        assert!(find_channel(&root, "billing.printer").is_none());
    }

    #[test]
    fn types_resolve_in_scope_then_ancestors() {
        let root = tree();
        assert_eq!(
            resolve_type(&root, "billing", "Invoice").as_deref(),
            Some("billing.Invoice")
        );
        assert_eq!(resolve_type(&root, "billing.printer", "Event").as_deref(), Some("Event"));
        assert_eq!(resolve_type(&root, "billing2", "Invoice"), None);
    }

    #[test]
    fn boundary_names_follow_aliases_to_channels() {
        let root = tree();
        assert_eq!(
            resolve_boundary_name(&root, "billing.printer", "bills").as_deref(),
            Some("billing.invoices")
        );
        assert_eq!(
            resolve_boundary_name(&root, "billing.printer", "log").as_deref(),
            Some("audit")
        );
        assert_eq!(
            resolve_boundary_name(&root, "billing2", "remote").as_deref(),
            Some("billing.invoices")
        );
        assert_eq!(resolve_boundary_name(&root, "billing2", "invoices"), None);
    }

    #[test]
    fn alias_targets_reject_missing_channels() {
        let root = tree();
        assert_eq!(resolve_alias_target(&root, "billing", "billing.nope"), None);
        assert_eq!(resolve_alias_target(&root, "billing", "bad name"), None);
        assert_eq!(resolve_alias_target(&root, "", "invoices"), None);
    }
}
