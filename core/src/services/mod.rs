//! Business services containing domain logic and use cases.

pub mod clock;
pub mod verification;

// Re-export commonly used types
pub use clock::{SimulatedTimeProvider, SystemTimeProvider, TimeProvider};
pub use verification::{
    CodeIssued, CodeStore, EmailMessage, ExpiredRecordSweeper, Notifier, RecordStore,
    StoredRecord, SweepResult, VerificationService, VerificationServiceConfig,
};
