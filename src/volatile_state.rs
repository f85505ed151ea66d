use crate::{
    license::{LicenseStore, MemoryLicenseStore},
    mode::{MemoryModeStore, ModeStore},
};

/// State which is lost across sessions
pub struct VolatileState {
    pub licenses: Box<dyn LicenseStore>,
    pub modes: Box<dyn ModeStore>,
}

impl VolatileState {
    pub fn new() -> Self {
        Self::with_stores(
            Box::new(MemoryLicenseStore::new()),
            Box::new(MemoryModeStore::new()),
        )
    }

    pub fn with_stores(licenses: Box<dyn LicenseStore>, modes: Box<dyn ModeStore>) -> Self {
        Self { licenses, modes }
    }
}
