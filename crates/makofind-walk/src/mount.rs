//! Mount-boundary check.

/// Whether an entry lives on the same device as the root it was reached from.
///
/// Entries for which this is false are neither visited nor descended into.
#[inline]
pub fn same_device(root_device: u64, entry_device: u64) -> bool {
    root_device == entry_device
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_device() {
        assert!(same_device(1, 1));
        assert!(!same_device(1, 2));
    }
}
