//! Catalogue de postes : validation, chargement et export JSON.

use crate::model::{Period, Post, PostId, Role};
use anyhow::{Context, Result};
use chrono::NaiveTime;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("catalog must contain at least one post")]
    Empty,
    #[error("post id cannot be empty")]
    EmptyId,
    #[error("post {0}: title cannot be empty")]
    EmptyTitle(String),
    #[error("duplicate post id: {0}")]
    DuplicateId(String),
    #[error("post {0}: start_time and end_time cannot be equal")]
    ZeroLength(String),
    #[error("post {0}: only weekend posts may shadow a weekday post")]
    ShadowOnWeekday(String),
    #[error("post {0} shadows unknown post {1}")]
    UnknownShadow(String, String),
    #[error("post {0} may not shadow weekend post {1}")]
    ShadowTargetWeekend(String, String),
}

/// Catalogue validé : la construction garantit des postes cohérents.
#[derive(Debug, Clone)]
pub struct Catalog {
    posts: Vec<Post>,
}

impl Catalog {
    pub fn new(posts: Vec<Post>) -> Result<Self, CatalogError> {
        validate(&posts)?;
        Ok(Self { posts })
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Catalogue d'exemple : familles gatehouse / security-lead /
    /// shift-manager, avec une variante week-end.
    pub fn sample() -> Self {
        let posts = vec![
            post(
                "shift-manager-morning",
                "Shift manager (morning)",
                Some(Role::ShiftManager),
                Period::Morning,
                (6, 0),
                (14, 0),
            ),
            post(
                "shift-manager-afternoon",
                "Shift manager (afternoon)",
                Some(Role::ShiftManager),
                Period::Afternoon,
                (13, 30),
                (22, 0),
            ),
            post(
                "shift-manager-night",
                "Shift manager (night)",
                Some(Role::ShiftManager),
                Period::Night,
                (21, 30),
                (6, 30),
            ),
            post(
                "security-lead-morning",
                "Security lead (morning)",
                Some(Role::ShiftLeader),
                Period::Morning,
                (6, 0),
                (14, 0),
            ),
            post(
                "security-lead-afternoon",
                "Security lead (afternoon)",
                Some(Role::ShiftLeader),
                Period::Afternoon,
                (13, 30),
                (22, 0),
            ),
            post(
                "security-lead-night",
                "Security lead (night)",
                Some(Role::ShiftLeader),
                Period::Night,
                (21, 30),
                (6, 30),
            ),
            post(
                "gatehouse-morning",
                "Gatehouse (morning)",
                Some(Role::Guard),
                Period::Morning,
                (6, 30),
                (15, 0),
            ),
            post(
                "gatehouse-afternoon",
                "Gatehouse (afternoon)",
                Some(Role::Guard),
                Period::Afternoon,
                (14, 45),
                (22, 0),
            ),
            post(
                "gatehouse-night",
                "Gatehouse (night)",
                Some(Role::Guard),
                Period::Night,
                (21, 45),
                (7, 0),
            ),
            Post {
                shadows: Some(PostId::new("gatehouse-morning")),
                weekend_only: true,
                ..post(
                    "gatehouse-morning-weekend",
                    "Gatehouse (weekend morning)",
                    Some(Role::Guard),
                    Period::Morning,
                    (7, 30),
                    (15, 0),
                )
            },
        ];
        Self { posts }
    }
}

fn post(
    id: &str,
    title: &str,
    required_role: Option<Role>,
    period: Period,
    start: (u32, u32),
    end: (u32, u32),
) -> Post {
    Post {
        id: PostId::new(id),
        title: title.to_owned(),
        required_role,
        period,
        start_time: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
        weekend_only: false,
        shadows: None,
        double_shift: false,
    }
}

fn validate(posts: &[Post]) -> Result<(), CatalogError> {
    if posts.is_empty() {
        return Err(CatalogError::Empty);
    }
    let mut seen = BTreeSet::new();
    for p in posts {
        if p.id.as_str().trim().is_empty() {
            return Err(CatalogError::EmptyId);
        }
        if p.title.trim().is_empty() {
            return Err(CatalogError::EmptyTitle(p.id.as_str().to_owned()));
        }
        if !seen.insert(p.id.clone()) {
            return Err(CatalogError::DuplicateId(p.id.as_str().to_owned()));
        }
        if p.start_time == p.end_time {
            return Err(CatalogError::ZeroLength(p.id.as_str().to_owned()));
        }
    }
    for p in posts {
        if let Some(target) = &p.shadows {
            if !p.weekend_only {
                return Err(CatalogError::ShadowOnWeekday(p.id.as_str().to_owned()));
            }
            match posts.iter().find(|o| &o.id == target) {
                None => {
                    return Err(CatalogError::UnknownShadow(
                        p.id.as_str().to_owned(),
                        target.as_str().to_owned(),
                    ))
                }
                Some(o) if o.weekend_only => {
                    return Err(CatalogError::ShadowTargetWeekend(
                        p.id.as_str().to_owned(),
                        target.as_str().to_owned(),
                    ))
                }
                Some(_) => {}
            }
        }
    }
    Ok(())
}

/// Charge et valide un catalogue depuis un fichier JSON.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let data = fs::read(&path)
        .with_context(|| format!("reading catalog {}", path.as_ref().display()))?;
    let posts: Vec<Post> = serde_json::from_slice(&data)
        .with_context(|| format!("parsing catalog {}", path.as_ref().display()))?;
    let catalog = Catalog::new(posts)?;
    Ok(catalog)
}

/// Exporte un catalogue en JSON (mise en forme lisible).
pub fn save_catalog<P: AsRef<Path>>(path: P, catalog: &Catalog) -> Result<()> {
    let json = serde_json::to_string_pretty(catalog.posts())?;
    fs::write(&path, json)
        .with_context(|| format!("writing catalog {}", path.as_ref().display()))?;
    Ok(())
}
