//! # Renderer Dispatch
//!
//! A [`Processor`] walks a finalized tree and hands each node to the first
//! registered renderer whose checker accepts it. The model itself renders
//! nothing: renderers for a concrete surface (terminal, HTML, native views)
//! live with their consumers and plug in here.
//!
//! ## Dispatch
//!
//! Pairs are tried in registration order. A pair whose checker matches but
//! whose renderer returns `None` passes the node on to the next matching pair.
//! [`Processor::add_renderer_up_front`] puts a pair ahead of every existing one,
//! which is how a consumer overrides a default renderer.
//!
//! ## Context Callbacks
//!
//! The caller's [`Context`] is told:
//!
//! - the sibling index of each node that matched a checker, counted per
//!   container so every container's children start again at zero
//! - when a container (any non-leaf node) is entered and exited
//!
//! Renderers recurse by calling [`Processor::render`] or
//! [`Processor::render_children`] on the processor they are given.

use std::cell::RefCell;

use crate::model::{Node, NodeKind};

/// Caller state threaded through a render pass.
pub trait Context {
    fn on_container_entered(&mut self, _node: &Node) {}

    fn on_container_exited(&mut self, _node: &Node) {}

    fn on_sibling_encountered(&mut self, _node: &Node, _index: usize) {}
}

/// Decides whether the paired renderer applies to a node.
pub trait Checker<C> {
    fn check(&self, context: &C, node: &Node) -> bool;
}

impl<C, F> Checker<C> for F
where
    F: Fn(&C, &Node) -> bool,
{
    fn check(&self, context: &C, node: &Node) -> bool {
        self(context, node)
    }
}

/// Turns a node into a result, or declines with `None`.
pub trait Renderer<C, R> {
    fn render(&self, processor: &Processor<C, R>, context: &mut C, node: &Node) -> Option<R>;
}

impl<C, R, F> Renderer<C, R> for F
where
    F: Fn(&Processor<C, R>, &mut C, &Node) -> Option<R>,
{
    fn render(&self, processor: &Processor<C, R>, context: &mut C, node: &Node) -> Option<R> {
        self(processor, context, node)
    }
}

/// Checker matching every node of one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindChecker(pub NodeKind);

impl<C> Checker<C> for KindChecker {
    fn check(&self, _context: &C, node: &Node) -> bool {
        node.kind() == self.0
    }
}

struct CheckingRenderer<C, R> {
    checker: Box<dyn Checker<C>>,
    renderer: Box<dyn Renderer<C, R>>,
}

pub struct Processor<C, R> {
    renderers: Vec<CheckingRenderer<C, R>>,
    siblings_per_depth: RefCell<Vec<usize>>,
}

impl<C: Context, R> Processor<C, R> {
    pub fn new() -> Self {
        Self {
            renderers: Vec::new(),
            siblings_per_depth: RefCell::new(vec![0]),
        }
    }

    /// Register a pair after every existing one.
    pub fn add_renderer(
        &mut self,
        checker: impl Checker<C> + 'static,
        renderer: impl Renderer<C, R> + 'static,
    ) -> &mut Self {
        self.renderers.push(CheckingRenderer {
            checker: Box::new(checker),
            renderer: Box::new(renderer),
        });
        self
    }

    /// Register a pair ahead of every existing one.
    pub fn add_renderer_up_front(
        &mut self,
        checker: impl Checker<C> + 'static,
        renderer: impl Renderer<C, R> + 'static,
    ) -> &mut Self {
        self.renderers.insert(
            0,
            CheckingRenderer {
                checker: Box::new(checker),
                renderer: Box::new(renderer),
            },
        );
        self
    }

    /// Drop every registered pair.
    pub fn reset(&mut self) {
        self.renderers.clear();
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }

    /// Render `node` (and, through the renderers, its subtree).
    pub fn render(&self, context: &mut C, node: &Node) -> Option<R> {
        let container = !node.kind().is_leaf();
        let mut matched = false;
        let mut result = None;

        for pair in &self.renderers {
            if !pair.checker.check(context, node) {
                continue;
            }
            if !matched {
                matched = true;
                let index = self.next_sibling_index();
                context.on_sibling_encountered(node, index);
                if container {
                    context.on_container_entered(node);
                    self.siblings_per_depth.borrow_mut().push(0);
                }
            }

            result = pair.renderer.render(self, context, node);
            if result.is_some() {
                break;
            }
        }

        if matched && container {
            self.siblings_per_depth.borrow_mut().pop();
            context.on_container_exited(node);
        }
        result
    }

    /// Render each child of `node` in order, keeping the results that were produced.
    pub fn render_children(&self, context: &mut C, node: &Node) -> Vec<R> {
        node.children()
            .filter_map(|child| self.render(context, child))
            .collect()
    }

    fn next_sibling_index(&self) -> usize {
        let mut depths = self.siblings_per_depth.borrow_mut();
        match depths.last_mut() {
            Some(count) => {
                let index = *count;
                *count += 1;
                index
            }
            None => 0,
        }
    }
}

impl<C: Context, R> Default for Processor<C, R> {
    fn default() -> Self {
        Self::new()
    }
}
