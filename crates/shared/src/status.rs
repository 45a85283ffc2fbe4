//! Pipeline stages a client moves through, from intake to resolution.
//!
//! The table is static configuration. Lookups never fail: a tag the table does
//! not know maps to a neutral entry labelled with the raw tag.

use std::borrow::Cow;

use crate::domain::StatusTag;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage {
    pub tag: &'static str,
    pub label: &'static str,
    pub locked: bool,
    pub color: &'static str,
}

pub static STAGES: [Stage; 5] = [
    Stage {
        tag: "EM_ATENDIMENTO",
        label: "Em Atendimento",
        locked: true,
        color: "info",
    },
    Stage {
        tag: "CONSULTORIA_AGENDADA",
        label: "Consultoria Agendada",
        locked: false,
        color: "warning",
    },
    Stage {
        tag: "PROPOSTA_CUSTOMIZADA",
        label: "Proposta Customizada",
        locked: false,
        color: "primary",
    },
    Stage {
        tag: "FINALIZADO",
        label: "Finalizado",
        locked: false,
        color: "success",
    },
    Stage {
        tag: "AGUARDANDO",
        label: "Aguardando",
        locked: false,
        color: "accent",
    },
];

pub const FALLBACK_COLOR: &str = "muted";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry<'a> {
    pub tag: Cow<'a, str>,
    pub label: Cow<'a, str>,
    pub locked: bool,
    pub color: &'static str,
    pub known: bool,
}

impl From<&Stage> for StatusEntry<'static> {
    fn from(stage: &Stage) -> Self {
        Self {
            tag: Cow::Borrowed(stage.tag),
            label: Cow::Borrowed(stage.label),
            locked: stage.locked,
            color: stage.color,
            known: true,
        }
    }
}

pub fn stage(tag: &str) -> Option<&'static Stage> {
    STAGES.iter().find(|stage| stage.tag == tag)
}

pub fn lookup(tag: &str) -> StatusEntry<'_> {
    match stage(tag) {
        Some(stage) => stage.into(),
        None => StatusEntry {
            tag: Cow::Borrowed(tag),
            label: Cow::Borrowed(tag),
            locked: false,
            color: FALLBACK_COLOR,
            known: false,
        },
    }
}

pub fn is_known(tag: &str) -> bool {
    stage(tag).is_some()
}

pub fn locked_tag() -> &'static str {
    STAGES
        .iter()
        .find(|stage| stage.locked)
        .map(|stage| stage.tag)
        .unwrap_or(STAGES[0].tag)
}

/// Intake stage tag assigned to clients created without an explicit status.
pub fn intake_tag() -> StatusTag {
    StatusTag::new(STAGES[0].tag)
}

pub fn permits_process_management(tag: &str) -> bool {
    !lookup(tag).locked
}
