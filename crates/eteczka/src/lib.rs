pub mod assign;
pub mod codes;
pub mod commit;
pub mod config;
pub mod document;
pub mod employee;
pub mod error;
pub mod intake;
pub mod logging;
pub mod partition;
pub mod review;
pub mod sanitize;
pub mod suggest;
pub mod workflow;

pub use assign::{Progress, RangeUpdate};
pub use codes::{DocumentType, LegalSection, RetentionPeriod};
pub use commit::{ArchiveSink, CommitPayload, DirectorySink, SimulatedSink};
pub use config::{load_config, Config};
pub use document::{DocumentRange, FileId, Page, PageRef, RangeId, UploadedFile};
pub use employee::{Employee, EmployeeDirectory};
pub use error::{
    CommitError, ConfigError, DirectoryError, EteczkaError, ExtractError, GuardViolation,
    PartitionError, Result, WorkflowError,
};
pub use intake::{IncomingFile, IntakeReport, PageExtractor, RejectReason, Rejection};
pub use logging::init_logging;
pub use review::{AttestationKind, Attestations, CommitReceipt, CommitStatus, Summary};
pub use workflow::{UploadWorkflow, WorkflowAction, WorkflowEvent, WorkflowSnapshot, WorkflowStep};
