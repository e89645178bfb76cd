//! Lexical frames.
//!
//! A [`MethodFrame`] is the runtime scope of one invocation: who is running
//! ([`InvocationContext`]) plus a stack of [`BlockFrame`]s, one per
//! statement block entered. The bottom block is the frame's root block and
//! is never popped.
//!
//! Lookup walks the blocks top-down so inner blocks shadow outer ones.
//! `put` updates a name in place wherever it already lives and only inserts
//! into the current block when no block owns it.

use std::rc::Rc;

use rustc_hash::FxHashSet;
use sable_ir::Name;
use sable_value::{Class, FrameId, FrameItem, FrameItems, Object};

/// Common capability of block and method frames.
pub trait Frame {
    /// Every bound name, in no particular order.
    fn names(&self) -> Vec<Name>;

    fn get(&self, name: Name) -> Option<&FrameItem>;

    /// Bind `name`, overwriting an existing binding or inserting a new one.
    fn put(&mut self, name: Name, item: FrameItem);

    /// Replace an existing binding. Hands `item` back if `name` is unbound.
    fn try_update(&mut self, name: Name, item: FrameItem) -> Result<(), FrameItem>;
}

/// A single block scope.
#[derive(Clone, Debug, Default)]
pub struct BlockFrame {
    items: FrameItems,
}

impl BlockFrame {
    pub fn new(items: FrameItems) -> Self {
        BlockFrame { items }
    }

    pub fn contains(&self, name: Name) -> bool {
        self.items.contains_key(&name)
    }

    pub fn items(&self) -> &FrameItems {
        &self.items
    }

    pub fn into_items(self) -> FrameItems {
        self.items
    }
}

impl Frame for BlockFrame {
    fn names(&self) -> Vec<Name> {
        self.items.keys().copied().collect()
    }

    fn get(&self, name: Name) -> Option<&FrameItem> {
        self.items.get(&name)
    }

    fn put(&mut self, name: Name, item: FrameItem) {
        self.items.insert(name, item);
    }

    fn try_update(&mut self, name: Name, item: FrameItem) -> Result<(), FrameItem> {
        match self.items.get_mut(&name) {
            Some(slot) => {
                *slot = item;
                Ok(())
            }
            None => Err(item),
        }
    }
}

/// Who an invocation runs on behalf of.
#[derive(Clone, Debug, Default)]
pub struct InvocationContext {
    /// Class declaring the running method.
    pub holder: Option<Rc<Class>>,
    /// Receiver (`this`), absent for static methods and plain functions.
    pub target: Option<Rc<Object>>,
    pub method: Option<Name>,
}

impl InvocationContext {
    pub fn function() -> Self {
        InvocationContext::default()
    }

    pub fn method(holder: Rc<Class>, target: Option<Rc<Object>>, method: Name) -> Self {
        InvocationContext {
            holder: Some(holder),
            target,
            method: Some(method),
        }
    }

    /// A closure body: keeps the class and receiver of the method it was
    /// created in, but is not itself a method.
    pub fn closure(holder: Option<Rc<Class>>, target: Option<Rc<Object>>) -> Self {
        InvocationContext {
            holder,
            target,
            method: None,
        }
    }

    /// True while a constructor of `class` is running.
    pub fn is_constructor_of(&self, class: &Class) -> bool {
        self.holder
            .as_deref()
            .is_some_and(|holder| std::ptr::eq(holder, class))
            && self.method == Some(class.name())
    }
}

/// Scope of one invocation: a context plus a non-empty block stack.
#[derive(Debug)]
pub struct MethodFrame {
    id: FrameId,
    context: InvocationContext,
    blocks: Vec<BlockFrame>,
}

impl MethodFrame {
    pub fn new(id: FrameId, context: InvocationContext) -> Self {
        Self::with_items(id, context, FrameItems::default())
    }

    /// A frame whose root block starts out holding `items`.
    pub fn with_items(id: FrameId, context: InvocationContext, items: FrameItems) -> Self {
        MethodFrame {
            id,
            context,
            blocks: vec![BlockFrame::new(items)],
        }
    }

    pub fn id(&self) -> FrameId {
        self.id
    }

    pub fn context(&self) -> &InvocationContext {
        &self.context
    }

    /// Number of blocks, the root block included.
    pub fn depth(&self) -> usize {
        self.blocks.len()
    }

    pub fn push_block(&mut self, items: FrameItems) {
        tracing::trace!(frame = self.id.raw(), depth = self.blocks.len() + 1, "push block");
        self.blocks.push(BlockFrame::new(items));
    }

    /// Pop the current block. The root block stays.
    pub fn pop_block(&mut self) -> Option<BlockFrame> {
        if self.blocks.len() == 1 {
            return None;
        }
        tracing::trace!(frame = self.id.raw(), depth = self.blocks.len() - 1, "pop block");
        self.blocks.pop()
    }

    pub fn root_block(&self) -> &BlockFrame {
        &self.blocks[0]
    }

    pub fn current_block(&self) -> &BlockFrame {
        let top = self.blocks.len() - 1;
        &self.blocks[top]
    }

    /// Bind `name` in the current block without looking at outer blocks.
    pub fn declare(&mut self, name: Name, item: FrameItem) {
        let top = self.blocks.len() - 1;
        self.blocks[top].put(name, item);
    }

    /// All visible bindings, inner blocks shadowing outer ones.
    pub fn snapshot(&self) -> FrameItems {
        Self::collect(&self.blocks)
    }

    /// Bindings of the blocks entered above the root block.
    pub fn inner_snapshot(&self) -> FrameItems {
        Self::collect(&self.blocks[1..])
    }

    fn collect(blocks: &[BlockFrame]) -> FrameItems {
        let mut items = FrameItems::default();
        for block in blocks {
            items.extend(block.items().iter().map(|(name, item)| (*name, item.clone())));
        }
        items
    }

    pub fn into_root_items(mut self) -> FrameItems {
        self.blocks.truncate(1);
        self.blocks
            .pop()
            .map(BlockFrame::into_items)
            .unwrap_or_default()
    }

    /// Re-apply a closure's final bindings to this frame.
    ///
    /// Only variables are re-synchronized, and only where this frame still
    /// binds the name. Names in `skip` (the closure's own parameters) are
    /// left alone.
    pub fn sync_items(&mut self, snapshot: &FrameItems, skip: &FxHashSet<Name>) {
        let mut synced = 0usize;
        for (name, item) in snapshot {
            if !item.is_variable() || skip.contains(name) {
                continue;
            }
            let owned = self.get(*name).is_some_and(FrameItem::is_variable);
            if owned && self.try_update(*name, item.clone()).is_ok() {
                synced += 1;
            }
        }
        tracing::debug!(frame = self.id.raw(), synced, "synced closure bindings");
    }
}

impl Frame for MethodFrame {
    fn names(&self) -> Vec<Name> {
        let mut seen = FxHashSet::default();
        self.blocks
            .iter()
            .rev()
            .flat_map(BlockFrame::names)
            .filter(|name| seen.insert(*name))
            .collect()
    }

    fn get(&self, name: Name) -> Option<&FrameItem> {
        self.blocks.iter().rev().find_map(|block| block.get(name))
    }

    fn put(&mut self, name: Name, item: FrameItem) {
        if let Err(item) = self.try_update(name, item) {
            self.declare(name, item);
        }
    }

    fn try_update(&mut self, name: Name, item: FrameItem) -> Result<(), FrameItem> {
        match self.blocks.iter_mut().rev().find(|block| block.contains(name)) {
            Some(block) => block.try_update(name, item),
            None => Err(item),
        }
    }
}
