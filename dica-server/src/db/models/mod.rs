//! Modelos de banco de dados

// Helpers de serde
pub mod serde_helpers;

// Contas e mão de obra
pub mod employee;
pub mod user;

// Postos e atividades
pub mod service_activity;
pub mod service_post;

// Alocação diária
pub mod allocation;

// Execuções e anexos
pub mod activity_execution;
pub mod attachment;

// Afastamentos, ocorrências e documentos
pub mod document;
pub mod ferias_licencas;
pub mod occurrence;

// Re-exports
pub use activity_execution::{
    ActivityExecution, ActivityExecutionCreate, ActivityExecutionId, ActivityExecutionUpdate,
};
pub use allocation::{
    Allocation, AllocationBatch, AllocationBatchResult, AllocationEntry, AllocationId,
    AllocationStatus, CopyMonthRequest, CopyMonthResult, CsvImportResult, CsvRowError,
};
pub use attachment::{Attachment, AttachmentId};
pub use document::{Document, DocumentCreate, DocumentId, DocumentUpdate};
pub use employee::{
    Employee, EmployeeCreate, EmployeeId, EmployeeStatus, EmployeeUpdate, normalize_cpf,
    validate_cpf,
};
pub use ferias_licencas::{
    FeriasLicencas, FeriasLicencasCreate, FeriasLicencasId, FeriasLicencasUpdate, LeaveKind,
    LeaveStatus,
};
pub use occurrence::{Occurrence, OccurrenceCreate, OccurrenceId, OccurrenceUpdate, Severity};
pub use service_activity::{
    ActivityFrequency, ServiceActivity, ServiceActivityCreate, ServiceActivityId,
    ServiceActivityUpdate,
};
pub use service_post::{ServicePost, ServicePostCreate, ServicePostId, ServicePostUpdate};
pub use user::{User, UserCreate, UserId, UserUpdate};
