use crate::error::FlowError;
use serenity::all::UserId;
use std::collections::{HashMap, HashSet};

/// An opaque license code, handed to exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LicenseCode(String);

impl LicenseCode {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LicenseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mapping from issued codes to the user each was issued to.
///
/// The owner check lives in the controller; a store will issue to anyone it is asked to.
pub trait LicenseStore: Send + Sync {
    /// Bind a fresh code to `user`.
    fn issue(&mut self, user: UserId) -> LicenseCode;

    /// Consume `code` on behalf of `user`.  Succeeds only if the code is outstanding and bound to
    /// `user`; otherwise nothing changes.
    fn redeem(&mut self, code: &str, user: UserId) -> Result<(), FlowError>;

    /// Withdraw an outstanding code, e.g. one that never reached its user.  Returns whether the
    /// code was outstanding.
    fn revoke(&mut self, code: &LicenseCode) -> bool;

    /// Whether `user` has redeemed a code during this session.
    fn is_licensed(&self, user: UserId) -> bool;
}

#[derive(Default)]
pub struct MemoryLicenseStore {
    outstanding: HashMap<String, UserId>,
    licensed: HashSet<UserId>,
}

impl MemoryLicenseStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LicenseStore for MemoryLicenseStore {
    fn issue(&mut self, user: UserId) -> LicenseCode {
        let code = LicenseCode::generate();
        self.outstanding.insert(code.as_str().to_owned(), user);
        code
    }

    fn redeem(&mut self, code: &str, user: UserId) -> Result<(), FlowError> {
        // Unknown and foreign codes are deliberately the same error.
        match self.outstanding.get(code) {
            Some(bound) if *bound == user => {
                self.outstanding.remove(code);
                self.licensed.insert(user);
                Ok(())
            }
            _ => Err(FlowError::InvalidLicense),
        }
    }

    fn revoke(&mut self, code: &LicenseCode) -> bool {
        self.outstanding.remove(code.as_str()).is_some()
    }

    fn is_licensed(&self, user: UserId) -> bool {
        self.licensed.contains(&user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_codes_are_unique() {
        let mut store = MemoryLicenseStore::new();
        let a = store.issue(UserId::new(1));
        let b = store.issue(UserId::new(1));
        assert_ne!(a, b);
    }

    #[test]
    fn redeem_is_single_use() {
        let mut store = MemoryLicenseStore::new();
        let user = UserId::new(42);
        let code = store.issue(user);

        assert!(!store.is_licensed(user));
        assert_eq!(store.redeem(code.as_str(), user), Ok(()));
        assert!(store.is_licensed(user));
        assert_eq!(
            store.redeem(code.as_str(), user),
            Err(FlowError::InvalidLicense)
        );
    }

    #[test]
    fn foreign_redeem_leaves_code_outstanding() {
        let mut store = MemoryLicenseStore::new();
        let owner = UserId::new(42);
        let intruder = UserId::new(7);
        let code = store.issue(owner);

        assert_eq!(
            store.redeem(code.as_str(), intruder),
            Err(FlowError::InvalidLicense)
        );
        assert!(!store.is_licensed(intruder));
        assert_eq!(store.redeem(code.as_str(), owner), Ok(()));
    }

    #[test]
    fn revoked_code_cannot_be_redeemed() {
        let mut store = MemoryLicenseStore::new();
        let user = UserId::new(42);
        let code = store.issue(user);

        assert!(store.revoke(&code));
        assert!(!store.revoke(&code));
        assert_eq!(
            store.redeem(code.as_str(), user),
            Err(FlowError::InvalidLicense)
        );
        assert!(!store.is_licensed(user));
    }

    #[test]
    fn unknown_code_is_rejected() {
        let mut store = MemoryLicenseStore::new();
        assert_eq!(
            store.redeem("not-a-code", UserId::new(1)),
            Err(FlowError::InvalidLicense)
        );
    }
}
