use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::time::shift_instants;

/// Identifiant fort pour Worker
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WorkerId(String);

impl WorkerId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifiant fort pour Post (stable, défini par le catalogue)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PostId(String);

impl PostId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifiant fort pour ShiftAssignment
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShiftId(String);

impl ShiftId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Période d'une vacation : indexe aussi les préférences de disponibilité.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Morning,
    Afternoon,
    Night,
}

impl Period {
    /// Index dans `DayAvailability::statuses` (matin=0, après-midi=1, nuit=2).
    pub fn index(self) -> usize {
        match self {
            Period::Morning => 0,
            Period::Afternoon => 1,
            Period::Night => 2,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Period::Morning => "morning",
            Period::Afternoon => "afternoon",
            Period::Night => "night",
        };
        f.write_str(s)
    }
}

/// Qualification requise par un poste, portée par les gardes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    ShiftManager,
    ShiftLeader,
    Guard,
    Custom(String),
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::ShiftManager => f.write_str("shift_manager"),
            Role::ShiftLeader => f.write_str("shift_leader"),
            Role::Guard => f.write_str("guard"),
            Role::Custom(s) => f.write_str(s),
        }
    }
}

/// Poste de garde : créneau horaire par défaut et qualification requise.
///
/// Le rôle requis et la période sont des champs explicites ; rien n'est
/// déduit de l'identifiant ni d'un taux horaire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    #[serde(default)]
    pub required_role: Option<Role>,
    pub period: Period,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Le poste n'existe que vendredi et samedi.
    #[serde(default)]
    pub weekend_only: bool,
    /// Poste de semaine que cette variante week-end remplace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadows: Option<PostId>,
    /// Vacation double : exemptée de l'exclusivité un-poste-par-jour.
    #[serde(default)]
    pub double_shift: bool,
}

/// Préférences d'un garde pour une date donnée.
///
/// `statuses[i]` suit `Period::index()` : `Some(true)` = demande à
/// travailler, `Some(false)` = indisponible, `None` = ouvert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayAvailability {
    pub date: NaiveDate,
    #[serde(default)]
    pub statuses: Vec<Option<bool>>,
}

/// Garde (membre de l'équipe)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worker {
    pub id: WorkerId,
    pub handle: String,
    pub display_name: String,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub availability: Vec<DayAvailability>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shifts: Vec<ShiftAssignment>,
}

impl Worker {
    pub fn new<H: Into<String>, D: Into<String>>(handle: H, display_name: D) -> Self {
        Self {
            id: WorkerId::random(),
            handle: handle.into(),
            display_name: display_name.into(),
            roles: Vec::new(),
            availability: Vec::new(),
            shifts: Vec::new(),
        }
    }

    pub fn with_roles(mut self, roles: Vec<Role>) -> Self {
        self.roles = roles;
        self
    }

    /// Le garde possède-t-il la qualification requise par le poste ?
    /// Un poste sans rôle requis est ouvert à tous.
    pub fn qualifies_for(&self, post: &Post) -> bool {
        post.required_role
            .as_ref()
            .map_or(true, |role| self.roles.contains(role))
    }

    /// Préférences déposées pour cette date exacte, s'il y en a.
    pub fn availability_on(&self, date: NaiveDate) -> Option<&DayAvailability> {
        self.availability.iter().find(|a| a.date == date)
    }
}

/// Vacation affectée : créée par le moteur, jamais modifiée ensuite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftAssignment {
    pub id: ShiftId,
    pub post_id: PostId,
    pub date: NaiveDate,
    pub period: Period,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

impl ShiftAssignment {
    /// Crée une vacation sur le créneau par défaut du poste.
    pub fn new(post: &Post, date: NaiveDate) -> Self {
        Self {
            id: ShiftId::random(),
            post_id: post.id.clone(),
            date,
            period: post.period,
            start_time: post.start_time,
            end_time: post.end_time,
            remark: None,
        }
    }

    /// Instants de début et de fin, fin reportée au lendemain si elle
    /// précède numériquement le début.
    pub fn instants(&self) -> (NaiveDateTime, NaiveDateTime) {
        shift_instants(self.date, self.start_time, self.end_time)
    }
}
