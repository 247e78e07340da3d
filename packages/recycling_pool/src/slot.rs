/// One entry of a [`RecyclingPool`][crate::RecyclingPool]: a managed item and whether it is
/// currently available for acquisition.
///
/// The pool never swaps out the item after the slot is created. Only the free flag changes
/// over the lifetime of the slot.
#[derive(Debug)]
pub(crate) struct Slot<T> {
    item: T,
    free: bool,
}

impl<T> Slot<T> {
    pub(crate) fn new(item: T, free: bool) -> Self {
        Self { item, free }
    }

    pub(crate) fn item(&self) -> &T {
        &self.item
    }

    pub(crate) fn item_mut(&mut self) -> &mut T {
        &mut self.item
    }

    pub(crate) fn is_free(&self) -> bool {
        self.free
    }

    pub(crate) fn is_in_use(&self) -> bool {
        !self.free
    }

    pub(crate) fn set_free(&mut self, free: bool) {
        self.free = free;
    }
}
