//! Client appointment record model.
//!
//! A [`ClientRecord`] is one visit: who came in, when, for which service, and
//! whether the follow-up reminder has gone out. Inbound adapters build a
//! [`RecordForm`] from raw input and parse it into a validated
//! [`RecordDraft`] before any store is touched.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::follow_up::parse_service_date;

/// Validation failures raised while building record values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordValidationError {
    /// The record id was blank.
    #[error("record id must not be empty")]
    EmptyId,
    /// The client name was blank.
    #[error("name required")]
    EmptyName,
    /// The service date was neither `dd/mm/yyyy` nor ISO.
    #[error("invalid date")]
    InvalidServiceDate,
    /// No service was given.
    #[error("service required")]
    MissingService,
    /// The service label is not on the salon's list.
    #[error("unknown service: {value}")]
    UnknownService {
        /// Label as submitted, trimmed.
        value: String,
    },
    /// The follow-up override was present but unparseable.
    #[error("invalid follow-up date")]
    InvalidFollowUpDate,
}

impl RecordValidationError {
    /// Wire name of the input field that failed validation.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyId => "id",
            Self::EmptyName => "name",
            Self::InvalidServiceDate => "serviceDate",
            Self::MissingService | Self::UnknownService { .. } => "serviceType",
            Self::InvalidFollowUpDate => "followUpDate",
        }
    }

    /// Stable machine-readable code for the failure.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EmptyId => "empty_id",
            Self::EmptyName => "name_required",
            Self::InvalidServiceDate => "invalid_date",
            Self::MissingService => "service_required",
            Self::UnknownService { .. } => "unknown_service",
            Self::InvalidFollowUpDate => "invalid_follow_up_date",
        }
    }
}

/// Opaque, immutable record identifier.
///
/// New records receive a UUID v4. Identifiers loaded from older data files are
/// kept verbatim, so the only requirement is a non-blank value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(String);

impl RecordId {
    /// Validate and construct an identifier.
    pub fn new(id: impl AsRef<str>) -> Result<Self, RecordValidationError> {
        let trimmed = id.as_ref().trim();
        if trimmed.is_empty() {
            return Err(RecordValidationError::EmptyId);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Generate a fresh identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Client name; non-empty once trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientName(String);

impl ClientName {
    /// Validate and construct a client name, trimming surrounding whitespace.
    pub fn new(name: impl AsRef<str>) -> Result<Self, RecordValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(RecordValidationError::EmptyName);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for ClientName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ClientName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Services offered by the salon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceType {
    /// `CEJAS`.
    Eyebrows,
    /// `DELINEADO DE OJOS`.
    Eyeliner,
    /// `LABIOS`.
    Lips,
    /// `ACIDO HIALURONICO`.
    HyaluronicAcid,
    /// `BIOESTIMULADORES`.
    Biostimulators,
    /// `RETOQUE`, the touch-up visit; carries its own follow-up offset.
    Retouch,
}

impl ServiceType {
    /// Every service, in the order the salon lists them.
    pub const ALL: [Self; 6] = [
        Self::Eyebrows,
        Self::Eyeliner,
        Self::Lips,
        Self::HyaluronicAcid,
        Self::Biostimulators,
        Self::Retouch,
    ];

    /// Canonical label as stored and exported.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Eyebrows => "CEJAS",
            Self::Eyeliner => "DELINEADO DE OJOS",
            Self::Lips => "LABIOS",
            Self::HyaluronicAcid => "ACIDO HIALURONICO",
            Self::Biostimulators => "BIOESTIMULADORES",
            Self::Retouch => "RETOQUE",
        }
    }

    /// Whether this is the follow-up ("retoque") service.
    #[must_use]
    pub const fn is_retouch(self) -> bool {
        matches!(self, Self::Retouch)
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ServiceType {
    type Err = RecordValidationError;

    /// Case-insensitive match on the label; inner whitespace runs collapse.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalised = value
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_uppercase();
        if normalised.is_empty() {
            return Err(RecordValidationError::MissingService);
        }
        Self::ALL
            .into_iter()
            .find(|service| service.label() == normalised)
            .ok_or_else(|| RecordValidationError::UnknownService {
                value: value.trim().to_owned(),
            })
    }
}

/// Raw, unvalidated save input as submitted by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordForm {
    /// Id of the record being edited; blank or absent creates a new one.
    pub id: Option<String>,
    /// Client name.
    pub name: String,
    /// Contact phone, free text.
    pub phone: Option<String>,
    /// Visit date, `dd/mm/yyyy` or `yyyy-mm-dd`.
    pub service_date: String,
    /// Service label, matched case-insensitively.
    pub service_type: String,
    /// Manual follow-up date in either date format.
    pub follow_up_date: Option<String>,
    /// Free-text note.
    pub comment: Option<String>,
}

/// Validated content of a save request.
///
/// Carries no reminder flag or creation time; those belong to the stored
/// record and survive content edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDraft {
    /// Record to overwrite, if any.
    pub id: Option<RecordId>,
    /// Trimmed client name.
    pub name: ClientName,
    /// Phone, `None` when blank.
    pub phone: Option<String>,
    /// Visit date.
    pub service_date: NaiveDate,
    /// Service performed.
    pub service_type: ServiceType,
    /// Manual follow-up date replacing the derived one.
    pub follow_up_override: Option<NaiveDate>,
    /// Note, `None` when blank.
    pub comment: Option<String>,
}

impl RecordDraft {
    /// Validate a form. Checks run in the order name, date, service.
    ///
    /// # Examples
    /// ```
    /// use salon_crm::domain::{RecordDraft, RecordForm, RecordValidationError};
    ///
    /// let form = RecordForm {
    ///     name: "Romina".to_owned(),
    ///     service_date: "10/01/2025".to_owned(),
    ///     service_type: "cejas".to_owned(),
    ///     ..RecordForm::default()
    /// };
    /// let draft = RecordDraft::parse(form).expect("valid form");
    /// assert_eq!(draft.service_type.label(), "CEJAS");
    ///
    /// let missing = RecordDraft::parse(RecordForm::default());
    /// assert_eq!(missing, Err(RecordValidationError::EmptyName));
    /// ```
    pub fn parse(form: RecordForm) -> Result<Self, RecordValidationError> {
        let RecordForm {
            id: raw_id,
            name: raw_name,
            phone,
            service_date: raw_date,
            service_type: raw_service,
            follow_up_date,
            comment,
        } = form;

        let name = ClientName::new(raw_name)?;
        let service_date =
            parse_service_date(&raw_date).ok_or(RecordValidationError::InvalidServiceDate)?;
        let service_type = raw_service.parse::<ServiceType>()?;
        let follow_up_override = non_blank(follow_up_date)
            .map(|raw| parse_service_date(&raw).ok_or(RecordValidationError::InvalidFollowUpDate))
            .transpose()?;
        let id = non_blank(raw_id).map(RecordId::new).transpose()?;

        Ok(Self {
            id,
            name,
            phone: non_blank(phone),
            service_date,
            service_type,
            follow_up_override,
            comment: non_blank(comment),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|trimmed| !trimmed.is_empty())
}

/// A stored client visit.
///
/// ## Invariants
/// - `id` identifies at most one live record.
/// - `service_type` is one of [`ServiceType::ALL`].
/// - `created_at` is `None` only for rows imported from older data files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientRecord {
    /// Stable identifier.
    pub id: RecordId,
    /// Client name.
    pub name: ClientName,
    /// Contact phone.
    pub phone: Option<String>,
    /// Visit date.
    pub service_date: NaiveDate,
    /// Service performed.
    pub service_type: ServiceType,
    /// Manual follow-up date; wins over the derived one.
    pub follow_up_override: Option<NaiveDate>,
    /// Free-text note.
    pub comment: Option<String>,
    /// Whether the follow-up reminder has been sent.
    pub reminder_sent: bool,
    /// First save time; orders listings newest first.
    pub created_at: Option<DateTime<Utc>>,
}

impl ClientRecord {
    /// Build a new record from a draft. The reminder flag starts cleared.
    #[must_use]
    pub fn from_draft(draft: RecordDraft, id: RecordId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            phone: draft.phone,
            service_date: draft.service_date,
            service_type: draft.service_type,
            follow_up_override: draft.follow_up_override,
            comment: draft.comment,
            reminder_sent: false,
            created_at: Some(created_at),
        }
    }

    /// Overwrite the editable content, keeping id, reminder flag and creation
    /// time.
    pub fn apply_draft(&mut self, draft: RecordDraft) {
        self.name = draft.name;
        self.phone = draft.phone;
        self.service_date = draft.service_date;
        self.service_type = draft.service_type;
        self.follow_up_override = draft.follow_up_override;
        self.comment = draft.comment;
    }
}
