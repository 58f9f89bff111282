use std::cell::RefCell;
use std::rc::Rc;

/// Identity of the builder tree a node currently belongs to.
///
/// Attaching one tree under another merges their identities, union-find
/// style, so "are these two nodes in the same tree" costs amortized O(1)
/// instead of a walk to the root. Nodes are never detached, so merges are
/// never undone.
#[derive(Debug, Default)]
pub(crate) struct TreeId {
    merged_into: RefCell<Option<Rc<TreeId>>>,
}

impl TreeId {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }
}

/// The representative identity of `id`'s tree, compressing the path to it.
pub(crate) fn find(id: &Rc<TreeId>) -> Rc<TreeId> {
    let mut root = Rc::clone(id);
    loop {
        let next = root.merged_into.borrow().clone();
        match next {
            Some(next) => root = next,
            None => break,
        }
    }

    let mut current = Rc::clone(id);
    while !Rc::ptr_eq(&current, &root) {
        match current.merged_into.replace(Some(Rc::clone(&root))) {
            Some(next) => current = next,
            None => break,
        }
    }
    root
}

pub(crate) fn same_tree(a: &Rc<TreeId>, b: &Rc<TreeId>) -> bool {
    Rc::ptr_eq(&find(a), &find(b))
}

/// Fold the tree of `child` into the tree of `parent`.
pub(crate) fn merge(child: &Rc<TreeId>, parent: &Rc<TreeId>) {
    let child = find(child);
    let parent = find(parent);
    if !Rc::ptr_eq(&child, &parent) {
        *child.merged_into.borrow_mut() = Some(parent);
    }
}

impl Drop for TreeId {
    // Unlinked one at a time; a long merge chain would otherwise drop recursively.
    fn drop(&mut self) {
        let mut next = self.merged_into.get_mut().take();
        while let Some(id) = next {
            next = match Rc::try_unwrap(id) {
                Ok(mut id) => id.merged_into.get_mut().take(),
                Err(_) => None,
            };
        }
    }
}
