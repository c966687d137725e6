// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership enforcement for stored resources.
//!
//! Every ownership-scoped repository operation evaluates its predicate
//! through this trait, inside the same transaction as the lookup.

/// Trait for resources that have an owner.
pub trait OwnedResource {
    /// Get the owner's identity name.
    fn owner_username(&self) -> &str;

    /// Whether this resource belongs to the given identity.
    fn owned_by(&self, username: &str) -> bool {
        self.owner_username() == username
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestResource {
        owner: String,
    }

    impl OwnedResource for TestResource {
        fn owner_username(&self) -> &str {
            &self.owner
        }
    }

    #[test]
    fn owned_by_matches_exact_owner() {
        let resource = TestResource {
            owner: "a@x.com".to_string(),
        };
        assert!(resource.owned_by("a@x.com"));
        assert!(!resource.owned_by("b@x.com"));
    }

    #[test]
    fn owned_by_is_case_sensitive() {
        let resource = TestResource {
            owner: "a@x.com".to_string(),
        };
        // Owner keys are canonical identity names; no case folding here.
        assert!(!resource.owned_by("A@X.COM"));
    }
}
