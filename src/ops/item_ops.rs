use crate::model::item::{ItemId, ItemKind, ItemNode, join_link_path};
use crate::model::tree::TreeError;

use super::session::AppSession;

/// Error type for edits made through a session
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error("invalid position: {0}")]
    InvalidPosition(usize),
    #[error("item name cannot be empty")]
    EmptyName,
    #[error("{0} items cannot be checked")]
    NotCheckable(&'static str),
    #[error("nothing selected")]
    NothingSelected,
}

/// Direction for single-step moves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

fn item_at(session: &AppSession, position: usize) -> Result<ItemId, EditError> {
    session
        .tree
        .child_at(session.nav.current(), position)
        .ok_or(EditError::InvalidPosition(position))
}

fn check_name(kind: &ItemKind) -> Result<(), EditError> {
    match kind.name() {
        Some(name) if name.trim().is_empty() => Err(EditError::EmptyName),
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Adding and editing
// ---------------------------------------------------------------------------

/// Append a new item to the current level, or insert it at `position`
pub fn add_item(
    session: &mut AppSession,
    kind: ItemKind,
    position: Option<usize>,
) -> Result<ItemId, EditError> {
    check_name(&kind)?;
    let parent = session.nav.current();
    let id = match position {
        Some(index) => {
            if index > session.tree.size(parent) {
                return Err(EditError::InvalidPosition(index));
            }
            session.tree.insert_new(parent, index, kind)?
        }
        None => session.tree.add_new(parent, kind)?,
    };
    session.selection.cancel();
    session.mark_changed();
    Ok(id)
}

/// Rename the item at `position`. For links an empty name drops the alias.
pub fn rename_item(
    session: &mut AppSession,
    position: usize,
    new_name: &str,
) -> Result<(), EditError> {
    let id = item_at(session, position)?;
    let is_link = matches!(session.tree.kind(id), Some(ItemKind::Link { .. }));
    let new_name = new_name.trim();
    if new_name.is_empty() && !is_link {
        return Err(EditError::EmptyName);
    }
    session.tree.rename(id, new_name)?;
    session.mark_changed();
    Ok(())
}

/// Flip the state of the checkbox at `position`, returning the new state
pub fn toggle_checked(session: &mut AppSession, position: usize) -> Result<bool, EditError> {
    let id = item_at(session, position)?;
    let kind = session.tree.kind(id).ok_or(TreeError::NotFound)?;
    let ItemKind::Checkbox { name, checked } = kind else {
        return Err(EditError::NotCheckable(kind.type_name()));
    };
    let checked = !*checked;
    let kind = ItemKind::checkbox(name.clone(), checked);
    session.tree.set_kind(id, kind)?;
    session.mark_changed();
    Ok(checked)
}

/// Link to `target` placed at the current level. The link stores the
/// target's name path, so it survives reloads but breaks on renames that
/// change more than case and punctuation.
pub fn create_link(
    session: &mut AppSession,
    target: ItemId,
    alias: Option<String>,
) -> Result<ItemId, EditError> {
    if !session.tree.contains(target) {
        return Err(TreeError::NotFound.into());
    }
    let path = session.tree.path_of(target);
    let alias = alias.filter(|a| !a.trim().is_empty());
    add_item(session, ItemKind::link(join_link_path(&path), alias), None)
}

// ---------------------------------------------------------------------------
// Removal
// ---------------------------------------------------------------------------

pub fn remove_item(session: &mut AppSession, position: usize) -> Result<ItemNode, EditError> {
    let id = item_at(session, position)?;
    let removed = session.tree.remove(id)?;
    session.selection.cancel();
    session.mark_changed();
    Ok(removed)
}

/// Remove every selected item and leave select mode. Returns the removed
/// subtrees in their former order.
pub fn remove_selected(session: &mut AppSession) -> Result<Vec<ItemNode>, EditError> {
    let positions = session.selection.positions();
    if positions.is_empty() {
        return Err(EditError::NothingSelected);
    }
    let current = session.nav.current();
    let order: Vec<ItemId> = session
        .tree
        .children(current)
        .iter()
        .enumerate()
        .filter(|(i, _)| !session.selection.is_selected(*i))
        .map(|(_, id)| *id)
        .collect();
    let removed = session.tree.replace_children(current, order)?;
    session.selection.cancel();
    session.mark_changed();
    tracing::debug!(count = removed.len(), "removed selected items");
    Ok(removed)
}

// ---------------------------------------------------------------------------
// Moving
// ---------------------------------------------------------------------------

/// Swap the item at `position` with its neighbour. Returns the new position,
/// or `None` when the item is already at that end.
pub fn move_item(
    session: &mut AppSession,
    position: usize,
    direction: MoveDirection,
) -> Result<Option<usize>, EditError> {
    let id = item_at(session, position)?;
    let count = session.current_items().len();
    let target = match direction {
        MoveDirection::Up if position == 0 => return Ok(None),
        MoveDirection::Up => position - 1,
        MoveDirection::Down if position + 1 >= count => return Ok(None),
        MoveDirection::Down => position + 1,
    };
    let parent = session.nav.current();
    session.tree.reparent(id, parent, Some(target))?;
    session.mark_changed();
    Ok(Some(target))
}

/// Rearrange the current level's children. `order` lists current positions
/// in their new order; positions left out are removed.
pub fn reorder(session: &mut AppSession, order: &[usize]) -> Result<Vec<ItemNode>, EditError> {
    let current = session.nav.current();
    let children = session.tree.children(current);
    let ids = order
        .iter()
        .map(|&p| children.get(p).copied().ok_or(EditError::InvalidPosition(p)))
        .collect::<Result<Vec<_>, _>>()?;
    let removed = session.tree.replace_children(current, ids)?;
    session.selection.cancel();
    session.mark_changed();
    Ok(removed)
}

/// Move every selected item under the item at `destination`, keeping their
/// relative order. Nothing moves unless all of them can.
pub fn move_selected_into(
    session: &mut AppSession,
    destination: usize,
) -> Result<usize, EditError> {
    let target = item_at(session, destination)?;
    let positions = session.selection.positions();
    if positions.is_empty() {
        return Err(EditError::NothingSelected);
    }
    let current = session.nav.current();
    let mut moving = Vec::with_capacity(positions.len());
    for p in positions {
        let id = session
            .tree
            .child_at(current, p)
            .ok_or(EditError::InvalidPosition(p))?;
        if session.tree.is_ancestor_or_self(id, target) {
            return Err(TreeError::InvalidStructure(
                "cannot move an item into itself".to_string(),
            )
            .into());
        }
        moving.push(id);
    }
    let accepts_children = session
        .tree
        .kind(target)
        .is_some_and(|k| k.can_have_children());
    if !accepts_children {
        return Err(TreeError::InvalidStructure(format!(
            "{} items cannot have children",
            session.tree.kind(target).map_or("unknown", |k| k.type_name())
        ))
        .into());
    }
    for id in &moving {
        session.tree.reparent(*id, target, None)?;
    }
    session.selection.cancel();
    session.mark_changed();
    Ok(moving.len())
}
