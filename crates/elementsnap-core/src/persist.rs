//! Write-through persistence of the selection list.

use crate::platform::SelectionStore;
use crate::types::{ElementSnapshot, SelectedElement};

/// Name of the single store entry holding the persisted list.
pub const PERSIST_KEY: &str = "elementsnap:selection";

/// The serializable part of the selection, in order.
pub fn snapshots<H>(selection: &[SelectedElement<H>]) -> Vec<ElementSnapshot> {
    selection.iter().map(|entry| entry.snapshot.clone()).collect()
}

/// Mirror the selection into the store.
///
/// An empty selection removes the entry instead of writing an empty list,
/// so "entry present" always means "selection exists".
pub fn write_through<S, H>(store: &mut S, selection: &[SelectedElement<H>])
where
    S: SelectionStore + ?Sized,
{
    if selection.is_empty() {
        store.clear();
    } else {
        store.save(&snapshots(selection));
    }
}

/// Turn a loaded list back into selection entries. Restored entries carry
/// no live handle.
pub fn restore<H>(snapshots: Vec<ElementSnapshot>) -> Vec<SelectedElement<H>> {
    snapshots.into_iter().map(SelectedElement::restored).collect()
}
