use crate::types::Descriptor;
use std::collections::hash_map::Entry;

/// Last descriptor forwarded for each registration.
///
/// Entries are never evicted; the table grows with the number of distinct
/// registrations seen during the process lifetime.
#[derive(Debug, Default)]
pub struct DescriptorCache {
    descriptors: std::sync::Mutex<std::collections::HashMap<String, Descriptor>>,
}

impl DescriptorCache {
    #[must_use]
    pub fn new() -> Self {
        DescriptorCache::default()
    }

    /// Returns `true` when `descriptor` is new or differs from the one last
    /// recorded for its registration, recording it in that case.
    pub fn should_send(&self, descriptor: &Descriptor) -> bool {
        let mut descriptors = self.lock();
        match descriptors.entry(descriptor.registration.clone()) {
            Entry::Vacant(entry) => {
                entry.insert(descriptor.clone());
                true
            }
            Entry::Occupied(entry) if entry.get() == descriptor => false,
            Entry::Occupied(mut entry) => {
                entry.insert(descriptor.clone());
                true
            }
        }
    }

    #[must_use]
    pub fn get(&self, registration: &str) -> Option<Descriptor> {
        self.lock().get(registration).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // No critical section leaves the map half-updated.
    fn lock(&self) -> std::sync::MutexGuard<'_, std::collections::HashMap<String, Descriptor>> {
        self.descriptors
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
