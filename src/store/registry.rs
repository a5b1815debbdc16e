use super::error::{NotFoundError, RegistryError};
use super::types::CalculatorDescriptor;
use crate::compute::Calculator;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Clone)]
struct Entry {
    descriptor: CalculatorDescriptor,
    unit: Arc<dyn Calculator>,
}

/// One immutable version of the catalog. Writers clone-and-swap, readers hold an `Arc`.
#[derive(Clone, Default)]
struct Catalog {
    // Insertion order is the listing order.
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

impl Catalog {
    fn rebuild_index(&mut self) {
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.descriptor.id.clone(), i))
            .collect();
    }
}

/// Directory of computation units keyed by calculator id.
///
/// Lifecycle: created empty, populated during the init phase, then `seal()`ed and read
/// concurrently for the rest of the process. Registration after sealing is rejected
/// unless late registration was enabled, in which case each write swaps in a complete
/// new catalog snapshot so readers never see a partially inserted entry.
pub struct Registry {
    catalog: RwLock<Arc<Catalog>>,
    sealed: AtomicBool,
    allow_late_registration: bool,
}

impl Default for Registry {
    fn default() -> Self { Self::new() }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("Registry")
            .field(
                "ids",
                &snapshot.entries.iter().map(|e| e.descriptor.id.as_str()).collect::<Vec<_>>(),
            )
            .field("sealed", &self.is_sealed())
            .field("allow_late_registration", &self.allow_late_registration)
            .finish()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            catalog: RwLock::new(Arc::new(Catalog::default())),
            sealed: AtomicBool::new(false),
            allow_late_registration: false,
        }
    }

    /// A registry that keeps accepting registrations after `seal()` (hot reload).
    pub fn with_late_registration() -> Self {
        Self { allow_late_registration: true, ..Self::new() }
    }

    pub fn allows_late_registration(&self) -> bool { self.allow_late_registration }

    /// Inserts a calculator. Duplicate ids are rejected and leave the registry unchanged.
    pub fn register<C>(
        &self,
        descriptor: CalculatorDescriptor,
        unit: C,
    ) -> Result<(), RegistryError>
    where
        C: Calculator + 'static,
    {
        self.register_shared(descriptor, Arc::new(unit))
    }

    pub fn register_shared(
        &self,
        descriptor: CalculatorDescriptor,
        unit: Arc<dyn Calculator>,
    ) -> Result<(), RegistryError> {
        let id = descriptor.id.clone();
        if id.is_empty() || id.chars().any(char::is_whitespace) {
            warn!(id = %id, "rejected calculator with invalid id");
            return Err(RegistryError::InvalidId(id));
        }

        // `seal()` flips the flag under this lock, so the check cannot race it.
        let mut guard = self.catalog.write();
        if self.is_sealed() && !self.allow_late_registration {
            warn!(id = %id, "rejected registration on sealed registry");
            return Err(RegistryError::Sealed(id));
        }
        if guard.index.contains_key(&id) {
            warn!(id = %id, "rejected duplicate calculator registration");
            return Err(RegistryError::DuplicateId(id));
        }

        let catalog = Arc::make_mut(&mut guard);
        catalog.index.insert(id.clone(), catalog.entries.len());
        catalog.entries.push(Entry { descriptor, unit });
        debug!(id = %id, total = catalog.entries.len(), "registered calculator");
        Ok(())
    }

    /// Removes an entry. Unknown ids are a no-op; returns whether anything was removed.
    pub fn unregister(&self, id: &str) -> bool {
        let mut guard = self.catalog.write();
        let Some(&pos) = guard.index.get(id) else {
            return false;
        };
        let catalog = Arc::make_mut(&mut guard);
        catalog.entries.remove(pos);
        catalog.rebuild_index();
        debug!(id = %id, "unregistered calculator");
        true
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, id: &str) -> Result<Arc<dyn Calculator>, NotFoundError> {
        let guard = self.catalog.read();
        guard
            .index
            .get(id)
            .map(|&i| Arc::clone(&guard.entries[i].unit))
            .ok_or_else(|| NotFoundError { id: id.to_string() })
    }

    pub fn descriptor(&self, id: &str) -> Result<CalculatorDescriptor, NotFoundError> {
        let guard = self.catalog.read();
        guard
            .index
            .get(id)
            .map(|&i| guard.entries[i].descriptor.clone())
            .ok_or_else(|| NotFoundError { id: id.to_string() })
    }

    pub fn contains(&self, id: &str) -> bool { self.catalog.read().index.contains_key(id) }
    pub fn len(&self) -> usize { self.catalog.read().entries.len() }
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Descriptors in registration order, optionally restricted to one category.
    pub fn list(&self, category: Option<&str>) -> Listing {
        Listing {
            snapshot: self.snapshot(),
            category: category.map(str::to_string),
        }
    }

    /// Distinct categories in order of first registration.
    pub fn categories(&self) -> Vec<String> {
        let snapshot = self.snapshot();
        let mut seen: Vec<String> = Vec::new();
        for e in &snapshot.entries {
            if !seen.contains(&e.descriptor.category) {
                seen.push(e.descriptor.category.clone());
            }
        }
        seen
    }

    /// Ends the init phase. Returns the number of calculators registered at that point.
    pub fn seal(&self) -> usize {
        let guard = self.catalog.write();
        let count = guard.entries.len();
        if !self.sealed.swap(true, Ordering::AcqRel) {
            info!(calculators = count, "calculator registry sealed");
        }
        count
    }

    pub fn is_sealed(&self) -> bool { self.sealed.load(Ordering::Acquire) }

    fn snapshot(&self) -> Arc<Catalog> { Arc::clone(&self.catalog.read()) }
}

/// A point-in-time view of the registry's descriptors.
///
/// Filtering is lazy and the view can be iterated any number of times; later
/// registrations do not affect an existing `Listing`.
#[derive(Clone)]
pub struct Listing {
    snapshot: Arc<Catalog>,
    category: Option<String>,
}

impl Listing {
    pub fn iter(&self) -> impl Iterator<Item = &CalculatorDescriptor> + '_ {
        self.snapshot
            .entries
            .iter()
            .map(|e| &e.descriptor)
            .filter(move |d| self.category.as_deref().map_or(true, |c| d.category == c))
    }

    pub fn len(&self) -> usize { self.iter().count() }
    pub fn is_empty(&self) -> bool { self.iter().next().is_none() }

    pub fn ids(&self) -> Vec<&str> { self.iter().map(|d| d.id.as_str()).collect() }
    pub fn to_vec(&self) -> Vec<CalculatorDescriptor> { self.iter().cloned().collect() }
}

impl fmt::Debug for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter().map(|d| &d.id)).finish()
    }
}

impl<'a> IntoIterator for &'a Listing {
    type Item = &'a CalculatorDescriptor;
    type IntoIter = Box<dyn Iterator<Item = &'a CalculatorDescriptor> + 'a>;

    fn into_iter(self) -> Self::IntoIter { Box::new(self.iter()) }
}
