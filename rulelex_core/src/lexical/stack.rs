//! The per-run state stack
use super::error::StackError;
use super::rule::StateId;
use crate::config::compile_time::tokenizer::MAX_STACK_DEPTH;

/// LIFO of active states; never empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateStack {
    entries: Vec<StateId>,
    root: StateId,
    max_depth: usize,
}

impl StateStack {
    pub fn new(root: StateId) -> Self {
        Self {
            entries: vec![root],
            root,
            max_depth: 1,
        }
    }

    /// Active state
    pub fn top(&self) -> StateId {
        // entries is never empty: pop resets to root instead of draining
        self.entries.last().copied().unwrap_or(self.root)
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    /// Deepest the stack has been during this run
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Bottom-to-top view
    pub fn entries(&self) -> &[StateId] {
        &self.entries
    }

    pub fn push(&mut self, state: StateId) -> Result<(), StackError> {
        if self.entries.len() >= MAX_STACK_DEPTH {
            return Err(StackError::StackOverflow {
                limit: MAX_STACK_DEPTH,
            });
        }
        self.entries.push(state);
        self.max_depth = self.max_depth.max(self.entries.len());
        Ok(())
    }

    /// Remove `count` entries. Popping everything resets the stack to `[root]`.
    pub fn pop(&mut self, count: usize) -> Result<(), StackError> {
        let depth = self.entries.len();
        if count >= depth {
            self.reset();
            return Err(StackError::StackUnderflow {
                requested: count,
                depth,
            });
        }
        self.entries.truncate(depth - count);
        Ok(())
    }

    /// Swap the active state. On a single-entry stack the bottom entry is replaced.
    pub fn replace(&mut self, state: StateId) {
        match self.entries.last_mut() {
            Some(top) => *top = state,
            None => self.entries.push(state),
        }
    }

    pub fn reset(&mut self) {
        self.entries.clear();
        self.entries.push(self.root);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const ROOT: StateId = StateId(0);
    const KEY: StateId = StateId(1);
    const VALUE: StateId = StateId(2);

    #[test]
    fn test_starts_at_root() {
        let stack = StateStack::new(ROOT);
        assert_eq!(stack.top(), ROOT);
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_push_pop_restores_previous_contents() {
        let mut stack = StateStack::new(ROOT);
        stack.push(KEY).unwrap();
        let before = stack.entries().to_vec();

        stack.push(VALUE).unwrap();
        stack.push(KEY).unwrap();
        stack.pop(2).unwrap();

        assert_eq!(stack.entries(), before.as_slice());
        assert_eq!(stack.max_depth(), 4);
    }

    #[test]
    fn test_replace_is_pop_then_push() {
        let mut stack = StateStack::new(ROOT);
        stack.push(KEY).unwrap();
        stack.replace(VALUE);
        assert_eq!(stack.entries(), &[ROOT, VALUE]);
        assert_eq!(stack.depth(), 2);
    }

    #[test]
    fn test_replace_on_single_entry_replaces_bottom() {
        let mut stack = StateStack::new(ROOT);
        stack.replace(KEY);
        assert_eq!(stack.entries(), &[KEY]);
    }

    #[test]
    fn test_underflow_resets_to_root() {
        let mut stack = StateStack::new(ROOT);
        stack.replace(KEY);
        let result = stack.pop(1);

        assert_matches!(
            result,
            Err(StackError::StackUnderflow {
                requested: 1,
                depth: 1
            })
        );
        assert_eq!(stack.entries(), &[ROOT]);
    }

    #[test]
    fn test_multi_pop_underflow() {
        let mut stack = StateStack::new(ROOT);
        stack.push(KEY).unwrap();
        assert_matches!(stack.pop(5), Err(StackError::StackUnderflow { depth: 2, .. }));
        assert_eq!(stack.top(), ROOT);
    }

    #[test]
    fn test_overflow_drops_push() {
        let mut stack = StateStack::new(ROOT);
        for _ in 1..MAX_STACK_DEPTH {
            stack.push(KEY).unwrap();
        }
        assert_eq!(stack.depth(), MAX_STACK_DEPTH);

        assert_matches!(stack.push(VALUE), Err(StackError::StackOverflow { .. }));
        assert_eq!(stack.depth(), MAX_STACK_DEPTH);
        assert_eq!(stack.top(), KEY);
    }
}
