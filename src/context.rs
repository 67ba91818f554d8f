//! Transition Context
//!
//! The supplementary fields a user fills in when changing a prop's status:
//! recipient, notes, dates, maker, delivery venue, damage photos and the
//! storage destination for check-in.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::prop::AssignmentKind;

/// Context bundle submitted alongside a proposed status
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionContext {
    /// Checkout recipient
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_back_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maker_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_venue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub who_has_backup: Option<String>,
    /// Uploaded photo URIs documenting damage
    #[serde(default, rename = "damagePhoto", skip_serializing_if = "Vec::is_empty")]
    pub damage_photos: Vec<String>,
    /// Where the prop goes on check-in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<Destination>,
}

/// Storage target chosen on check-in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    #[serde(rename = "type")]
    pub kind: AssignmentKind,
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Context fields that status rules can require
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContextField {
    To,
    Notes,
    DueBackDate,
    MakerName,
    DeliveryDate,
    DeliveryVenue,
    WhoHasBackup,
    DamagePhoto,
}

impl ContextField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextField::To => "to",
            ContextField::Notes => "notes",
            ContextField::DueBackDate => "dueBackDate",
            ContextField::MakerName => "makerName",
            ContextField::DeliveryDate => "deliveryDate",
            ContextField::DeliveryVenue => "deliveryVenue",
            ContextField::WhoHasBackup => "whoHasBackup",
            ContextField::DamagePhoto => "damagePhoto",
        }
    }

    /// Wording used in user-facing messages
    pub fn describe(&self) -> &'static str {
        match self {
            ContextField::To => "who the prop is checked out to",
            ContextField::Notes => "notes",
            ContextField::DueBackDate => "a due back date",
            ContextField::MakerName => "the maker's name",
            ContextField::DeliveryDate => "a delivery date",
            ContextField::DeliveryVenue => "a delivery venue",
            ContextField::WhoHasBackup => "who has the backup",
            ContextField::DamagePhoto => "at least one damage photo",
        }
    }
}

impl fmt::Display for ContextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TransitionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to(mut self, recipient: impl Into<String>) -> Self {
        self.to = Some(recipient.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn due_back(mut self, date: NaiveDate) -> Self {
        self.due_back_date = Some(date);
        self
    }

    pub fn maker(mut self, name: impl Into<String>) -> Self {
        self.maker_name = Some(name.into());
        self
    }

    pub fn delivery(mut self, date: NaiveDate, venue: impl Into<String>) -> Self {
        self.delivery_date = Some(date);
        self.delivery_venue = Some(venue.into());
        self
    }

    pub fn backup_holder(mut self, who: impl Into<String>) -> Self {
        self.who_has_backup = Some(who.into());
        self
    }

    pub fn damage_photo(mut self, uri: impl Into<String>) -> Self {
        self.damage_photos.push(uri.into());
        self
    }

    pub fn destination(
        mut self,
        kind: AssignmentKind,
        id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        self.destination = Some(Destination {
            kind,
            id: id.into(),
            name: name.into(),
        });
        self
    }

    /// Trim every string and drop the ones left empty
    pub fn normalized(&self) -> Self {
        Self {
            to: clean(&self.to),
            notes: clean(&self.notes),
            due_back_date: self.due_back_date,
            maker_name: clean(&self.maker_name),
            delivery_date: self.delivery_date,
            delivery_venue: clean(&self.delivery_venue),
            who_has_backup: clean(&self.who_has_backup),
            damage_photos: self
                .damage_photos
                .iter()
                .map(|uri| uri.trim())
                .filter(|uri| !uri.is_empty())
                .map(str::to_string)
                .collect(),
            destination: self
                .destination
                .as_ref()
                .filter(|d| !d.id.trim().is_empty())
                .map(|d| Destination {
                    kind: d.kind,
                    id: d.id.trim().to_string(),
                    name: d.name.trim().to_string(),
                }),
        }
    }

    /// Whether a field carries a usable value; expects a normalized context
    pub fn has(&self, field: ContextField) -> bool {
        match field {
            ContextField::To => self.to.is_some(),
            ContextField::Notes => self.notes.is_some(),
            ContextField::DueBackDate => self.due_back_date.is_some(),
            ContextField::MakerName => self.maker_name.is_some(),
            ContextField::DeliveryDate => self.delivery_date.is_some(),
            ContextField::DeliveryVenue => self.delivery_venue.is_some(),
            ContextField::WhoHasBackup => self.who_has_backup.is_some(),
            ContextField::DamagePhoto => !self.damage_photos.is_empty(),
        }
    }
}

fn clean(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
