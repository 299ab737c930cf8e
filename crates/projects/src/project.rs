use core::fmt;
use core::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use backoffice_core::{DomainError, DomainResult, Entity, typed_id};
use backoffice_parties::{Party, PartyId};

typed_id!(
    /// Project identifier.
    ProjectId
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ProjectStatus {
    Pending,
    InProgress,
    Finished,
    Cancelled,
}

impl ProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Pending => "PENDING",
            ProjectStatus::InProgress => "IN_PROGRESS",
            ProjectStatus::Finished => "FINISHED",
            ProjectStatus::Cancelled => "CANCELLED",
        }
    }

    /// Pending or in progress.
    pub fn is_open(self) -> bool {
        matches!(self, ProjectStatus::Pending | ProjectStatus::InProgress)
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "PENDING" | "PENDIENTE" => Ok(ProjectStatus::Pending),
            "IN_PROGRESS" | "EN_PROGRESO" => Ok(ProjectStatus::InProgress),
            "FINISHED" | "TERMINADO" | "FINALIZADO" => Ok(ProjectStatus::Finished),
            "CANCELLED" | "CANCELADO" => Ok(ProjectStatus::Cancelled),
            _ => Err(DomainError::validation(format!(
                "unknown project status: {s:?}"
            ))),
        }
    }
}

impl TryFrom<String> for ProjectStatus {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ProjectStatus> for String {
    fn from(value: ProjectStatus) -> Self {
        value.as_str().to_string()
    }
}

/// A budgeted job. `cost` is the amount agreed with the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    code: String,
    description: String,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    cost: Option<Decimal>,
    started_on: NaiveDate,
    #[serde(default)]
    finished_on: Option<NaiveDate>,
    status: ProjectStatus,
    #[serde(default)]
    client_id: Option<PartyId>,
}

impl Project {
    pub fn new(
        id: ProjectId,
        code: impl Into<String>,
        description: impl Into<String>,
        cost: Option<Decimal>,
        started_on: NaiveDate,
    ) -> DomainResult<Self> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(DomainError::validation("project description cannot be empty"));
        }
        if cost.is_some_and(|c| c.is_sign_negative()) {
            return Err(DomainError::validation("project cost cannot be negative"));
        }

        Ok(Self {
            id,
            code: code.into().trim().to_string(),
            description,
            notes: None,
            cost,
            started_on,
            finished_on: None,
            status: ProjectStatus::Pending,
            client_id: None,
        })
    }

    pub fn id_typed(&self) -> ProjectId {
        self.id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn cost(&self) -> Option<Decimal> {
        self.cost
    }

    /// Budget with a missing cost read as zero.
    pub fn cost_or_zero(&self) -> Decimal {
        self.cost.unwrap_or_default()
    }

    pub fn started_on(&self) -> NaiveDate {
        self.started_on
    }

    pub fn finished_on(&self) -> Option<NaiveDate> {
        self.finished_on
    }

    pub fn status(&self) -> ProjectStatus {
        self.status
    }

    pub fn client_id(&self) -> Option<PartyId> {
        self.client_id
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        let notes = notes.into();
        self.notes = (!notes.trim().is_empty()).then_some(notes);
        self
    }

    pub fn set_status(&mut self, status: ProjectStatus) {
        self.status = status;
    }

    /// Close the project on `date`, which may not precede the start date.
    pub fn finish(&mut self, date: NaiveDate) -> DomainResult<()> {
        if date < self.started_on {
            return Err(DomainError::validation(format!(
                "finish date {date} precedes start date {}",
                self.started_on
            )));
        }
        self.finished_on = Some(date);
        self.status = ProjectStatus::Finished;
        Ok(())
    }

    /// Only active parties acting as clients may own a project.
    pub fn assign_client(&mut self, party: &Party) -> DomainResult<()> {
        if !party.can_own_projects() {
            return Err(DomainError::validation(format!(
                "party {} is not an active client",
                party.id_typed()
            )));
        }
        self.client_id = Some(party.id_typed());
        Ok(())
    }
}

impl Entity for Project {
    type Id = ProjectId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
