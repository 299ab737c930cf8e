//! Parties domain module (clients and suppliers).
//!
//! Business rules for the people and companies the back-office trades with,
//! implemented as deterministic domain logic (no IO, no storage).

pub mod party;
pub mod tax_id;

pub use party::{
    ContactInfo, DisableParty, EnableParty, Party, PartyCommand, PartyDisabled, PartyEnabled,
    PartyEvent, PartyId, PartyRegistered, PartyRole, PartyStatus, PartyUpdated, RegisterParty,
    UpdateDetails,
};
pub use tax_id::TaxId;
