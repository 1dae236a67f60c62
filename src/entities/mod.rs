//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod agency;
pub mod allocation;
pub mod district;
pub mod notification;
pub mod proposal;
pub mod proposal_history;
pub mod release;
pub mod state;
pub mod system_state;
pub mod utilization_certificate;

// Re-export specific types to avoid conflicts
pub use agency::{Column as AgencyColumn, Entity as Agency, Model as AgencyModel};
pub use allocation::{Column as AllocationColumn, Entity as Allocation, Model as AllocationModel};
pub use district::{Column as DistrictColumn, Entity as District, Model as DistrictModel};
pub use notification::{
    Column as NotificationColumn, Entity as Notification, Model as NotificationModel,
};
pub use proposal::{Column as ProposalColumn, Entity as Proposal, Model as ProposalModel};
pub use proposal_history::{
    Column as ProposalHistoryColumn, Entity as ProposalHistory, Model as ProposalHistoryModel,
};
pub use release::{Column as ReleaseColumn, Entity as Release, Model as ReleaseModel};
pub use state::{Column as StateColumn, Entity as State, Model as StateModel};
pub use system_state::{
    Column as SystemStateColumn, Entity as SystemState, Model as SystemStateModel,
};
pub use utilization_certificate::{
    Column as UtilizationCertificateColumn, Entity as UtilizationCertificate,
    Model as UtilizationCertificateModel,
};
