//! Whole-tree invariant checks run on every staged candidate.
//!
//! Traversal is depth-first over name-sorted maps and stops at the first
//! violation, so the reported error is deterministic for a given tree.

use crate::error::{Result, TopologyError};
use crate::meta::{Alias, App, Channel, ChannelType};
use crate::routing::resolution;
use crate::scope;

/// Checks every invariant of the tree rooted at `root`.
pub(crate) fn validate_tree(root: &App) -> Result<()> {
    validate_app(root, root, "")
}

fn validate_app(root: &App, app: &App, path: &str) -> Result<()> {
    if !path.is_empty() {
        scope::validate_name(&app.meta.name)?;
    }

    if let Some(node) = &app.spec.node {
        if node.image.trim().is_empty() {
            return Err(TopologyError::InvalidApp(format!(
                "app '{path}' declares a node without an image"
            )));
        }
    }

    for (direction, name) in app.spec.boundary.entries() {
        if resolution::resolve_boundary_name(root, path, name).is_none() {
            return Err(TopologyError::InvalidApp(format!(
                "app '{path}': {direction} '{name}' does not resolve to a channel or alias"
            )));
        }
    }

    for (name, child) in &app.spec.apps {
        validate_app(root, child, &scope::child_path(path, name))?;
    }
    for (name, channel) in &app.spec.channels {
        validate_channel(root, path, name, channel)?;
    }
    for (name, channel_type) in &app.spec.types {
        validate_type(path, name, channel_type)?;
    }
    for (name, alias) in &app.spec.aliases {
        validate_alias(root, path, name, alias)?;
    }
    Ok(())
}

fn validate_channel(root: &App, scope_path: &str, name: &str, channel: &Channel) -> Result<()> {
    scope::validate_name(name)?;
    let path = scope::child_path(scope_path, name);
    let type_name = channel.spec.type_name.as_str();
    if type_name.is_empty() {
        return Err(TopologyError::InvalidChannel(format!(
            "channel '{path}' does not declare a type"
        )));
    }
    if resolution::resolve_type(root, scope_path, type_name).is_none() {
        return Err(TopologyError::InvalidChannel(format!(
            "channel '{path}': type '{type_name}' does not resolve"
        )));
    }
    Ok(())
}

fn validate_type(scope_path: &str, name: &str, channel_type: &ChannelType) -> Result<()> {
    scope::validate_name(name)?;
    if channel_type.schema.trim().is_empty() {
        return Err(TopologyError::InvalidType(format!(
            "type '{}' has an empty schema",
            scope::child_path(scope_path, name)
        )));
    }
    Ok(())
}

fn validate_alias(root: &App, scope_path: &str, name: &str, alias: &Alias) -> Result<()> {
    scope::validate_name(name)?;
    let path = scope::child_path(scope_path, name);
    if alias.target.is_empty() {
        return Err(TopologyError::InvalidAlias(format!(
            "alias '{path}' has no target"
        )));
    }
    if resolution::resolve_alias_target(root, scope_path, &alias.target).is_none() {
        return Err(TopologyError::InvalidAlias(format!(
            "alias '{path}': target '{}' does not resolve to a channel",
            alias.target
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::validate_tree;
    use crate::error::ErrorKind;
    use crate::meta::{Alias, App, Channel, ChannelType, Node};

    fn billing() -> App {
        App::named("billing")
            .with_type(ChannelType::new("Invoice", "{}"))
            .with_channel(Channel::new("invoices", "Invoice"))
    }

    fn kind_of(root: App) -> Option<ErrorKind> {
        validate_tree(&root).err().map(|err| err.kind())
    }

    #[test]
    fn valid_tree_passes() {
        let root = App::default().with_app(
            billing()
                .with_alias(Alias::new("bills", "invoices"))
                .with_app(App::named("printer").with_input("bills").with_node(Node::new("p:1", 1))),
        );
        assert_eq!(kind_of(root), None);
    }

    #[test]
    fn unresolved_channel_type_is_invalid_channel() {
        let root = App::default().with_app(billing().with_channel(Channel::new("x", "Unknown")));
        assert_eq!(kind_of(root), Some(ErrorKind::InvalidChannel));

        let root = App::default().with_app(billing().with_channel(Channel::new("x", "")));
        assert_eq!(kind_of(root), Some(ErrorKind::InvalidChannel));
    }

    #[test]
    fn unresolved_boundary_is_invalid_app() {
        let root = App::default().with_app(billing().with_app(App::named("p").with_output("nowhere")));
        assert_eq!(kind_of(root), Some(ErrorKind::InvalidApp));
    }

    #[test]
    fn bad_names_types_and_aliases_are_rejected() {
        let root = App::default().with_app(App::named("bad name"));
        assert_eq!(kind_of(root), Some(ErrorKind::InvalidName));

        let root = App::default().with_app(billing().with_type(ChannelType::new("Empty", " ")));
        assert_eq!(kind_of(root), Some(ErrorKind::InvalidType));

        let root = App::default().with_app(billing().with_alias(Alias::new("a", "other.missing")));
        assert_eq!(kind_of(root), Some(ErrorKind::InvalidAlias));
    }

    #[test]
    fn first_violation_in_traversal_order_wins() {
        // Child apps are visited before the parent's channels.
        let root = App::default().with_app(
            billing()
                .with_channel(Channel::new("a-channel", "Unknown"))
                .with_app(App::named("z-app").with_input("missing")),
        );
        assert_eq!(kind_of(root), Some(ErrorKind::InvalidApp));
    }
}
