use uuid::Uuid;

/// Entities that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Entities with a human-friendly name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Looks up an entity by id in a slice.
pub(crate) fn find_by_id<T: Identifiable>(items: &[T], id: Uuid) -> Option<&T> {
    items.iter().find(|item| item.id() == id)
}

/// Removes an entity by id, returning it when present.
pub(crate) fn take_by_id<T: Identifiable>(items: &mut Vec<T>, id: Uuid) -> Option<T> {
    let index = items.iter().position(|item| item.id() == id)?;
    Some(items.remove(index))
}
