// regparse_types.rs - Parser bookkeeping: term categories, the flag
// scope stack, the capture-group registry and lookbehind contexts.

use std::collections::HashMap;

use smallvec::SmallVec;

use crate::flags::RubyFlags;

// === Term Category ===
// What the most recently parsed term was; decides whether a quantifier
// may follow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TermCategory {
    None,
    Assertion,
    Atom,
    Quantifier,
}

// === Flag Stack ===
/// Modifier scopes. The bottom entry holds the global flags and is never
/// popped.
#[derive(Debug, Clone)]
pub struct FlagStack {
    stack: SmallVec<[RubyFlags; 8]>,
}

impl FlagStack {
    pub fn new(global: RubyFlags) -> Self {
        let mut stack = SmallVec::new();
        stack.push(global);
        FlagStack { stack }
    }

    #[inline]
    pub fn top(&self) -> RubyFlags {
        self.stack.last().copied().unwrap_or_else(RubyFlags::empty)
    }

    pub fn push(&mut self, flags: RubyFlags) {
        self.stack.push(flags);
    }

    pub fn pop(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    /// Change the flags of the current scope in place.
    pub fn replace_top(&mut self, flags: RubyFlags) {
        if let Some(top) = self.stack.last_mut() {
            *top = flags;
        }
    }
}

// === Group Registry ===
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Group {
    pub group_number: usize,
}

/// Capture-group ordinals, names and the currently open groups.
#[derive(Debug, Default)]
pub struct GroupRegistry {
    count: usize,
    names: Option<HashMap<String, usize>>,
    open: SmallVec<[Group; 8]>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        GroupRegistry::default()
    }

    /// Number of capturing groups opened so far.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Open the next capturing group and return its ordinal.
    pub fn open(&mut self) -> usize {
        self.count += 1;
        self.open.push(Group {
            group_number: self.count,
        });
        self.count
    }

    pub fn close(&mut self) {
        self.open.pop();
    }

    pub fn is_open(&self, group_number: usize) -> bool {
        self.open.iter().any(|g| g.group_number == group_number)
    }

    /// Bind `name` to `group_number`. Fails with the existing ordinal if
    /// the name is already taken.
    pub fn register_name(&mut self, name: &str, group_number: usize) -> Result<(), usize> {
        let names = self.names.get_or_insert_with(HashMap::new);
        if let Some(&existing) = names.get(name) {
            return Err(existing);
        }
        names.insert(name.to_string(), group_number);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<usize> {
        self.names.as_ref()?.get(name).copied()
    }

    pub fn names(&self) -> Option<&HashMap<String, usize>> {
        self.names.as_ref()
    }

    pub fn into_names(self) -> Option<HashMap<String, usize>> {
        self.names
    }
}

// === Lookbehind ===
/// An enclosing lookbehind. Groups numbered `contained_groups` or higher
/// were opened inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lookbehind {
    pub contained_groups: usize,
}

// === Bailout ===
/// First unsupported construct seen while translating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bailout {
    pub reason: String,
    pub position: usize,
}
