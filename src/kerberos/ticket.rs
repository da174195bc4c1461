use std::time::Duration;
use thiserror::Error;
use crate::kerberos::principal::{Principal, ServiceName};
use crate::time::{InvalidTimestamp, Timestamp};

/// Separates the fields of an encoded ticket. [`Principal`] and [`ServiceName`] refuse to
/// hold it, which keeps the encoding unambiguous.
pub const FIELD_DELIMITER: char = '|';

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("ticket is not valid utf8")]
    Utf8,
    #[error("expected 4 ticket fields, found {0}")]
    FieldCount(usize),
    #[error("ticket field is empty")]
    EmptyField,
    #[error("ticket field {0:?} contains the field delimiter")]
    ForbiddenDelimiter(String),
    #[error(transparent)]
    Timestamp(#[from] InvalidTimestamp),
    #[error("ticket expires at {expires_at} which is not after its issue time {issued_at}")]
    InvertedValidity {
        issued_at: Timestamp,
        expires_at: Timestamp,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TicketKind {
    Granting,
    Service,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ticket {
    subject: Principal,
    audience: ServiceName,
    issued_at: Timestamp,
    expires_at: Timestamp,
}

impl Ticket {
    fn new(subject: Principal, audience: ServiceName, issued_at: Timestamp, lifetime: Duration) -> Self {
        Self {
            subject,
            audience,
            issued_at,
            expires_at: issued_at.saturating_add(lifetime),
        }
    }

    pub(crate) fn granting(subject: Principal, now: Timestamp, lifetime: Duration) -> Self {
        Self::new(subject, ServiceName::ticket_granting(), now, lifetime)
    }

    pub(crate) fn service(subject: Principal, service: ServiceName, now: Timestamp, lifetime: Duration) -> Self {
        Self::new(subject, service, now, lifetime)
    }

    #[inline]
    pub fn subject(&self) -> &Principal {
        &self.subject
    }

    #[inline]
    pub fn audience(&self) -> &ServiceName {
        &self.audience
    }

    #[inline]
    pub fn issued_at(&self) -> Timestamp {
        self.issued_at
    }

    #[inline]
    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    pub fn kind(&self) -> TicketKind {
        if self.audience.is_ticket_granting() {
            TicketKind::Granting
        } else {
            TicketKind::Service
        }
    }

    #[inline]
    pub fn is_valid_at(&self, now: Timestamp) -> bool {
        now <= self.expires_at
    }

    /// Canonical form: `subject|issued_at|expires_at|audience`, times in milliseconds.
    pub fn encode(&self) -> Vec<u8> {
        format!(
            "{subject}{d}{issued}{d}{expires}{d}{audience}",
            subject = self.subject,
            issued = self.issued_at.as_millis(),
            expires = self.expires_at.as_millis(),
            audience = self.audience,
            d = FIELD_DELIMITER,
        )
        .into_bytes()
    }

    pub fn decode(data: &[u8]) -> Result<Self, FormatError> {
        let text = std::str::from_utf8(data).map_err(|_| FormatError::Utf8)?;

        let fields: Vec<&str> = text.split(FIELD_DELIMITER).collect();

        let [subject, issued_at, expires_at, audience] = fields[..] else {
            return Err(FormatError::FieldCount(fields.len()));
        };

        let subject = Principal::new(subject)?;
        let issued_at: Timestamp = issued_at.parse()?;
        let expires_at: Timestamp = expires_at.parse()?;
        let audience = ServiceName::new(audience)?;

        if issued_at >= expires_at {
            return Err(FormatError::InvertedValidity { issued_at, expires_at });
        }

        Ok(Self {
            subject,
            audience,
            issued_at,
            expires_at,
        })
    }
}
