use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use backoffice_core::{Aggregate, AggregateRoot, DomainError, typed_id};
use backoffice_events::Event;

use crate::tax_id::TaxId;

typed_id!(
    /// Party identifier.
    PartyId
);

/// Which side(s) of a trade the party is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyRole {
    Client,
    Supplier,
    Both,
}

impl PartyRole {
    pub fn is_client(self) -> bool {
        matches!(self, PartyRole::Client | PartyRole::Both)
    }

    pub fn is_supplier(self) -> bool {
        matches!(self, PartyRole::Supplier | PartyRole::Both)
    }
}

/// Party status lifecycle.
///
/// Parties are never deleted; disabling hides them from active listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyStatus {
    Active,
    Disabled,
}

/// Contact information for a party.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub secondary_email: Option<String>,
    pub phone: Option<String>,
    pub secondary_phone: Option<String>,
    pub address: Option<String>,
}

impl ContactInfo {
    fn validate(&self) -> Result<(), DomainError> {
        for email in [&self.email, &self.secondary_email].into_iter().flatten() {
            let well_formed = email
                .split_once('@')
                .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
            if !well_formed {
                return Err(DomainError::validation(format!("invalid email: {email:?}")));
            }
        }
        Ok(())
    }
}

/// Aggregate root: Party (client, supplier or both).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    id: PartyId,
    tax_id: Option<TaxId>,
    name: String,
    #[serde(default)]
    alias: Option<String>,
    #[serde(default)]
    contact: ContactInfo,
    role: PartyRole,
    status: PartyStatus,
    #[serde(default)]
    version: u64,
    #[serde(skip_serializing, default = "snapshot_is_registered")]
    created: bool,
}

// Snapshots loaded from storage describe parties that already exist.
fn snapshot_is_registered() -> bool {
    true
}

impl Party {
    /// Create an empty, not-yet-registered aggregate instance for rehydration.
    pub fn empty(id: PartyId) -> Self {
        Self {
            id,
            tax_id: None,
            name: String::new(),
            alias: None,
            contact: ContactInfo::default(),
            role: PartyRole::Client,
            status: PartyStatus::Active,
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> PartyId {
        self.id
    }

    pub fn tax_id(&self) -> Option<&TaxId> {
        self.tax_id.as_ref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    pub fn role(&self) -> PartyRole {
        self.role
    }

    pub fn status(&self) -> PartyStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == PartyStatus::Active
    }

    /// Active parties acting as clients can be assigned to projects.
    pub fn can_own_projects(&self) -> bool {
        self.is_active() && self.role.is_client()
    }
}

impl AggregateRoot for Party {
    type Id = PartyId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: RegisterParty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterParty {
    pub party_id: PartyId,
    pub tax_id: TaxId,
    pub role: PartyRole,
    pub name: String,
    pub alias: Option<String>,
    pub contact: Option<ContactInfo>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateDetails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateDetails {
    pub party_id: PartyId,
    /// Optional new name (if None, keep existing).
    pub name: Option<String>,
    pub alias: Option<String>,
    pub role: Option<PartyRole>,
    /// Optional new contact info (if None, keep existing).
    pub contact: Option<ContactInfo>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: DisableParty (soft delete).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisableParty {
    pub party_id: PartyId,
    pub reason: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: EnableParty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnableParty {
    pub party_id: PartyId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartyCommand {
    RegisterParty(RegisterParty),
    UpdateDetails(UpdateDetails),
    DisableParty(DisableParty),
    EnableParty(EnableParty),
}

/// Event: PartyRegistered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyRegistered {
    pub party_id: PartyId,
    pub tax_id: TaxId,
    pub role: PartyRole,
    pub name: String,
    pub alias: Option<String>,
    pub contact: ContactInfo,
    pub occurred_at: DateTime<Utc>,
}

/// Event: PartyUpdated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyUpdated {
    pub party_id: PartyId,
    pub name: String,
    pub alias: Option<String>,
    pub role: PartyRole,
    pub contact: ContactInfo,
    pub occurred_at: DateTime<Utc>,
}

/// Event: PartyDisabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyDisabled {
    pub party_id: PartyId,
    pub reason: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: PartyEnabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyEnabled {
    pub party_id: PartyId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartyEvent {
    PartyRegistered(PartyRegistered),
    PartyUpdated(PartyUpdated),
    PartyDisabled(PartyDisabled),
    PartyEnabled(PartyEnabled),
}

impl Event for PartyEvent {
    fn event_type(&self) -> &'static str {
        match self {
            PartyEvent::PartyRegistered(_) => "parties.party.registered",
            PartyEvent::PartyUpdated(_) => "parties.party.updated",
            PartyEvent::PartyDisabled(_) => "parties.party.disabled",
            PartyEvent::PartyEnabled(_) => "parties.party.enabled",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            PartyEvent::PartyRegistered(e) => e.occurred_at,
            PartyEvent::PartyUpdated(e) => e.occurred_at,
            PartyEvent::PartyDisabled(e) => e.occurred_at,
            PartyEvent::PartyEnabled(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Party {
    type Command = PartyCommand;
    type Event = PartyEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            PartyEvent::PartyRegistered(e) => {
                self.id = e.party_id;
                self.tax_id = Some(e.tax_id.clone());
                self.role = e.role;
                self.name = e.name.clone();
                self.alias = e.alias.clone();
                self.contact = e.contact.clone();
                self.status = PartyStatus::Active;
                self.created = true;
            }
            PartyEvent::PartyUpdated(e) => {
                self.name = e.name.clone();
                self.alias = e.alias.clone();
                self.role = e.role;
                self.contact = e.contact.clone();
            }
            PartyEvent::PartyDisabled(_) => {
                self.status = PartyStatus::Disabled;
            }
            PartyEvent::PartyEnabled(_) => {
                self.status = PartyStatus::Active;
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            PartyCommand::RegisterParty(cmd) => self.handle_register(cmd),
            PartyCommand::UpdateDetails(cmd) => self.handle_update(cmd),
            PartyCommand::DisableParty(cmd) => self.handle_disable(cmd),
            PartyCommand::EnableParty(cmd) => self.handle_enable(cmd),
        }
    }
}

impl Party {
    fn ensure_party_id(&self, party_id: PartyId) -> Result<(), DomainError> {
        if self.id != party_id {
            return Err(DomainError::invariant("party_id mismatch"));
        }
        Ok(())
    }

    fn ensure_created(&self, party_id: PartyId) -> Result<(), DomainError> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        self.ensure_party_id(party_id)
    }

    fn handle_register(&self, cmd: &RegisterParty) -> Result<Vec<PartyEvent>, DomainError> {
        if self.created {
            return Err(DomainError::conflict("party already exists"));
        }

        if cmd.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        let contact = cmd.contact.clone().unwrap_or_default();
        contact.validate()?;

        Ok(vec![PartyEvent::PartyRegistered(PartyRegistered {
            party_id: cmd.party_id,
            tax_id: cmd.tax_id.clone(),
            role: cmd.role,
            name: cmd.name.trim().to_string(),
            alias: non_blank(&cmd.alias),
            contact,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_update(&self, cmd: &UpdateDetails) -> Result<Vec<PartyEvent>, DomainError> {
        self.ensure_created(cmd.party_id)?;

        let new_name = cmd.name.clone().unwrap_or_else(|| self.name.clone());
        if new_name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        let new_contact = cmd.contact.clone().unwrap_or_else(|| self.contact.clone());
        new_contact.validate()?;

        let new_alias = match &cmd.alias {
            Some(_) => non_blank(&cmd.alias),
            None => self.alias.clone(),
        };

        Ok(vec![PartyEvent::PartyUpdated(PartyUpdated {
            party_id: cmd.party_id,
            name: new_name.trim().to_string(),
            alias: new_alias,
            role: cmd.role.unwrap_or(self.role),
            contact: new_contact,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_disable(&self, cmd: &DisableParty) -> Result<Vec<PartyEvent>, DomainError> {
        self.ensure_created(cmd.party_id)?;

        if self.status == PartyStatus::Disabled {
            return Err(DomainError::conflict("party is already disabled"));
        }

        Ok(vec![PartyEvent::PartyDisabled(PartyDisabled {
            party_id: cmd.party_id,
            reason: cmd.reason.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_enable(&self, cmd: &EnableParty) -> Result<Vec<PartyEvent>, DomainError> {
        self.ensure_created(cmd.party_id)?;

        if self.status == PartyStatus::Active {
            return Err(DomainError::conflict("party is already active"));
        }

        Ok(vec![PartyEvent::PartyEnabled(PartyEnabled {
            party_id: cmd.party_id,
            occurred_at: cmd.occurred_at,
        })])
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_party_id() -> PartyId {
        PartyId::generate()
    }

    fn test_tax_id() -> TaxId {
        TaxId::parse("12.345.678-5").unwrap()
    }

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn registered(role: PartyRole) -> (Party, PartyId) {
        let party_id = test_party_id();
        let mut party = Party::empty(party_id);
        let cmd = RegisterParty {
            party_id,
            tax_id: test_tax_id(),
            role,
            name: "Comercial Andes SpA".to_string(),
            alias: None,
            contact: None,
            occurred_at: test_time(),
        };
        party.execute(&PartyCommand::RegisterParty(cmd)).unwrap();
        (party, party_id)
    }

    #[test]
    fn register_party_emits_party_registered_event() {
        let party_id = test_party_id();
        let party = Party::empty(party_id);
        let contact = ContactInfo {
            email: Some("pagos@andes.cl".to_string()),
            phone: Some("+56 9 1234 5678".to_string()),
            ..ContactInfo::default()
        };
        let cmd = RegisterParty {
            party_id,
            tax_id: test_tax_id(),
            role: PartyRole::Client,
            name: "  Comercial Andes SpA ".to_string(),
            alias: Some("   ".to_string()),
            contact: Some(contact.clone()),
            occurred_at: test_time(),
        };

        let events = party.handle(&PartyCommand::RegisterParty(cmd)).unwrap();
        assert_eq!(events.len(), 1);

        match &events[0] {
            PartyEvent::PartyRegistered(e) => {
                assert_eq!(e.party_id, party_id);
                assert_eq!(e.role, PartyRole::Client);
                assert_eq!(e.name, "Comercial Andes SpA");
                assert_eq!(e.alias, None);
                assert_eq!(e.contact, contact);
            }
            _ => panic!("Expected PartyRegistered event"),
        }
    }

    #[test]
    fn register_party_rejects_empty_name() {
        let party = Party::empty(test_party_id());
        let cmd = RegisterParty {
            party_id: test_party_id(),
            tax_id: test_tax_id(),
            role: PartyRole::Supplier,
            name: "   ".to_string(),
            alias: None,
            contact: None,
            occurred_at: test_time(),
        };

        let err = party.handle(&PartyCommand::RegisterParty(cmd)).unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error for empty name"),
        }
    }

    #[test]
    fn register_party_rejects_malformed_email() {
        let party = Party::empty(test_party_id());
        let cmd = RegisterParty {
            party_id: test_party_id(),
            tax_id: test_tax_id(),
            role: PartyRole::Client,
            name: "Comercial Andes SpA".to_string(),
            alias: None,
            contact: Some(ContactInfo {
                email: Some("pagos-at-andes".to_string()),
                ..ContactInfo::default()
            }),
            occurred_at: test_time(),
        };

        let err = party.handle(&PartyCommand::RegisterParty(cmd)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("invalid email")));
    }

    #[test]
    fn register_party_rejects_duplicate_creation() {
        let (party, party_id) = registered(PartyRole::Client);
        let cmd = RegisterParty {
            party_id,
            tax_id: test_tax_id(),
            role: PartyRole::Client,
            name: "Again".to_string(),
            alias: None,
            contact: None,
            occurred_at: test_time(),
        };

        let err = party.handle(&PartyCommand::RegisterParty(cmd)).unwrap_err();
        match err {
            DomainError::Conflict(_) => {}
            _ => panic!("Expected Conflict error for duplicate creation"),
        }
    }

    #[test]
    fn update_details_keeps_unspecified_fields() {
        let (mut party, party_id) = registered(PartyRole::Client);

        let cmd = UpdateDetails {
            party_id,
            name: None,
            alias: Some("Andes".to_string()),
            role: Some(PartyRole::Both),
            contact: None,
            occurred_at: test_time(),
        };
        party.execute(&PartyCommand::UpdateDetails(cmd)).unwrap();

        assert_eq!(party.name(), "Comercial Andes SpA");
        assert_eq!(party.alias(), Some("Andes"));
        assert_eq!(party.role(), PartyRole::Both);
        assert!(party.role().is_supplier());
        assert_eq!(party.version(), 2);
    }

    #[test]
    fn disable_then_enable_round_trips_status() {
        let (mut party, party_id) = registered(PartyRole::Client);
        assert!(party.can_own_projects());

        let events = party
            .execute(&PartyCommand::DisableParty(DisableParty {
                party_id,
                reason: Some("duplicate record".to_string()),
                occurred_at: test_time(),
            }))
            .unwrap();
        assert_eq!(events[0].event_type(), "parties.party.disabled");
        assert_eq!(party.status(), PartyStatus::Disabled);
        assert!(!party.can_own_projects());

        party
            .execute(&PartyCommand::EnableParty(EnableParty {
                party_id,
                occurred_at: test_time(),
            }))
            .unwrap();
        assert!(party.is_active());
        assert_eq!(party.version(), 3);
    }

    #[test]
    fn disable_rejects_already_disabled() {
        let (mut party, party_id) = registered(PartyRole::Supplier);
        let cmd = PartyCommand::DisableParty(DisableParty {
            party_id,
            reason: None,
            occurred_at: test_time(),
        });
        party.execute(&cmd).unwrap();

        let err = party.handle(&cmd).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(msg) if msg.contains("already disabled")));
    }

    #[test]
    fn enable_rejects_active_party() {
        let (party, party_id) = registered(PartyRole::Client);
        let err = party
            .handle(&PartyCommand::EnableParty(EnableParty {
                party_id,
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn commands_on_unregistered_party_are_not_found() {
        let party_id = test_party_id();
        let party = Party::empty(party_id);
        let err = party
            .handle(&PartyCommand::EnableParty(EnableParty {
                party_id,
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert_eq!(err, DomainError::NotFound);
    }

    #[test]
    fn supplier_cannot_own_projects() {
        let (party, _) = registered(PartyRole::Supplier);
        assert!(!party.can_own_projects());
    }
}
