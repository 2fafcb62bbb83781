//! Interned names for modules, pins and nets.

use lasso::{Spur, ThreadedRodeo};

/// Handle to a name held by an [`Interner`].
///
/// Copyable and hashable, so the problem model keys its name tables on it
/// instead of on owned strings.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Ident(Spur);

/// Name table for one floorplan problem.
///
/// Interning takes `&self`, which lets the problem builder intern while it
/// holds other borrows of itself.
#[derive(Default)]
pub struct Interner {
    rodeo: ThreadedRodeo,
}

impl Interner {
    /// Creates an empty interner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `s`, reusing the existing handle for a repeated name.
    pub fn get_or_intern(&self, s: &str) -> Ident {
        Ident(self.rodeo.get_or_intern(s))
    }

    /// Handle of an already-interned name. Never grows the table.
    pub fn get(&self, s: &str) -> Option<Ident> {
        self.rodeo.get(s).map(Ident)
    }

    /// Resolves a handle created by this interner.
    ///
    /// # Panics
    ///
    /// Panics if `ident` came from a different interner.
    pub fn resolve(&self, ident: Ident) -> &str {
        self.rodeo.resolve(&ident.0)
    }

    /// Resolves a handle, or `None` if this interner never issued it.
    pub fn try_resolve(&self, ident: Ident) -> Option<&str> {
        self.rodeo.try_resolve(&ident.0)
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.rodeo.len()
    }

    /// Returns `true` if nothing has been interned yet.
    pub fn is_empty(&self) -> bool {
        self.rodeo.is_empty()
    }
}

impl std::fmt::Debug for Interner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interner").field("len", &self.len()).finish()
    }
}
