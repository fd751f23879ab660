//! Navigation seam used by protected regions, plus an in-memory history.

use crate::gate::RoutePath;
use tracing::debug;

/// Options for a single navigation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NavigateOptions {
    /// Overwrite the current history entry instead of pushing a new one.
    pub replace: bool,
}

impl NavigateOptions {
    pub const REPLACE: Self = Self { replace: true };
    pub const PUSH: Self = Self { replace: false };
}

/// Anything that can move the application to another route.
pub trait Navigator {
    fn navigate(&mut self, to: &RoutePath, options: NavigateOptions);
}

impl<N: Navigator + ?Sized> Navigator for &mut N {
    fn navigate(&mut self, to: &RoutePath, options: NavigateOptions) {
        (**self).navigate(to, options);
    }
}

/// Browser-like history kept in memory: pushes drop forward entries, replaces
/// overwrite the current entry, and `back` walks toward the first entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryHistory {
    entries: Vec<RoutePath>,
    index: usize,
}

impl MemoryHistory {
    pub fn new(initial: RoutePath) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
        }
    }

    pub fn current(&self) -> &RoutePath {
        &self.entries[self.index]
    }

    pub fn entries(&self) -> &[RoutePath] {
        &self.entries
    }

    pub fn push(&mut self, to: RoutePath) {
        self.entries.truncate(self.index + 1);
        self.entries.push(to);
        self.index += 1;
    }

    pub fn replace(&mut self, to: RoutePath) {
        self.entries[self.index] = to;
    }

    /// Moves one entry back, returning the new current entry, or `None` at the
    /// start of history.
    pub fn back(&mut self) -> Option<&RoutePath> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(&self.entries[self.index])
    }

    pub fn forward(&mut self) -> Option<&RoutePath> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(&self.entries[self.index])
    }
}

impl Navigator for MemoryHistory {
    fn navigate(&mut self, to: &RoutePath, options: NavigateOptions) {
        debug!(to = %to, replace = options.replace, "navigate");
        if options.replace {
            self.replace(to.clone());
        } else {
            self.push(to.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(raw: &str) -> RoutePath {
        match RoutePath::parse(raw) {
            Ok(path) => path,
            Err(err) => panic!("{err}"),
        }
    }

    #[test]
    fn push_then_back() {
        let mut history = MemoryHistory::new(path("/"));
        history.navigate(&path("/dashboard"), NavigateOptions::PUSH);

        assert_eq!(history.current(), &path("/dashboard"));
        assert_eq!(history.back(), Some(&path("/")));
        assert_eq!(history.back(), None);
        assert_eq!(history.forward(), Some(&path("/dashboard")));
    }

    #[test]
    fn replace_removes_entry_from_back_stack() {
        let mut history = MemoryHistory::new(path("/"));
        history.navigate(&path("/dashboard"), NavigateOptions::PUSH);
        history.navigate(&path("/auth"), NavigateOptions::REPLACE);

        assert_eq!(history.entries(), &[path("/"), path("/auth")]);
        assert_eq!(history.back(), Some(&path("/")));
        assert_eq!(history.forward(), Some(&path("/auth")));
    }

    #[test]
    fn push_discards_forward_entries() {
        let mut history = MemoryHistory::new(path("/"));
        history.push(path("/a"));
        history.push(path("/b"));
        history.back();
        history.push(path("/c"));

        assert_eq!(history.entries(), &[path("/"), path("/a"), path("/c")]);
        assert_eq!(history.forward(), None);
    }

    #[test]
    fn navigator_is_usable_through_a_mutable_reference() {
        fn go(mut nav: impl Navigator) {
            nav.navigate(&path("/x"), NavigateOptions::default());
        }

        let mut history = MemoryHistory::new(path("/"));
        go(&mut history);
        assert_eq!(history.current(), &path("/x"));
    }
}
