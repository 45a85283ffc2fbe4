//! Legal case ("processo") records attached to a client.
//!
//! A process is a tagged variant: fields both jurisdictions share live in
//! [`CommonFields`], and the jurisdiction-only fields live in
//! [`JurisdictionFields`]. Field access by name goes through [`ProcessField`],
//! which knows each field's kind and which jurisdiction it belongs to.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{ClientId, Jurisdiction, ProcessId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Number,
    Flag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldScope {
    Common,
    Only(Jurisdiction),
}

impl FieldScope {
    pub fn applies_to(self, jurisdiction: Jurisdiction) -> bool {
        match self {
            FieldScope::Common => true,
            FieldScope::Only(only) => only == jurisdiction,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Coerces raw form input into a value of `kind`.
    ///
    /// Unparseable numbers become `0.0`; flags accept the usual yes/no spellings
    /// and anything else is `false`.
    pub fn coerce(kind: FieldKind, raw: &str) -> Self {
        let raw = raw.trim();
        match kind {
            FieldKind::Text => FieldValue::Text(raw.to_string()),
            FieldKind::Number => FieldValue::Number(parse_number(raw)),
            FieldKind::Flag => FieldValue::Flag(parse_flag(raw)),
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Flag(_) => FieldKind::Flag,
            FieldValue::Number(_) => FieldKind::Number,
            FieldValue::Text(_) => FieldKind::Text,
        }
    }

    fn into_kind(self, kind: FieldKind) -> Self {
        if self.kind() == kind {
            return self;
        }
        let raw = match self {
            FieldValue::Flag(v) => v.to_string(),
            FieldValue::Number(v) => v.to_string(),
            FieldValue::Text(v) => v,
        };
        Self::coerce(kind, &raw)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Flag(v) => write!(f, "{}", if *v { "sim" } else { "não" }),
            FieldValue::Number(v) => write!(f, "{v}"),
            FieldValue::Text(v) => f.write_str(v),
        }
    }
}

fn parse_number(raw: &str) -> f64 {
    // The right-most of '.' and ',' is the decimal separator; the other one
    // groups thousands. "1.234,56", "1,234.56" and "12,5" all parse.
    let normalized = match (raw.rfind('.'), raw.rfind(',')) {
        (Some(dot), Some(comma)) if comma > dot => raw.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => raw.replace(',', ""),
        (None, Some(_)) => raw.replace(',', "."),
        _ => raw.to_string(),
    };
    finite_or_zero(normalized.parse::<f64>().unwrap_or(0.0))
}

/// Stored numbers are always finite: NaN and infinities have no JSON form.
fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "y" | "sim" | "s" | "on"
    )
}

trait FromFieldValue {
    fn from_field_value(value: FieldValue) -> Self;
}

impl FromFieldValue for String {
    fn from_field_value(value: FieldValue) -> Self {
        match value.into_kind(FieldKind::Text) {
            FieldValue::Text(v) => v,
            _ => String::new(),
        }
    }
}

impl FromFieldValue for f64 {
    fn from_field_value(value: FieldValue) -> Self {
        match value.into_kind(FieldKind::Number) {
            FieldValue::Number(v) => finite_or_zero(v),
            _ => 0.0,
        }
    }
}

impl FromFieldValue for bool {
    fn from_field_value(value: FieldValue) -> Self {
        match value.into_kind(FieldKind::Flag) {
            FieldValue::Flag(v) => v,
            _ => false,
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

macro_rules! field_ty {
    (Text) => {
        String
    };
    (Number) => {
        f64
    };
    (Flag) => {
        bool
    };
}

macro_rules! process_fields {
    (
        common { $($c_variant:ident => $c_field:ident : $c_kind:ident,)* }
        brazil { $($b_variant:ident => $b_field:ident : $b_kind:ident,)* }
        portugal { $($p_variant:ident => $p_field:ident : $p_kind:ident,)* }
    ) => {
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        pub struct CommonFields {
            $(#[serde(default)] pub $c_field: field_ty!($c_kind),)*
        }

        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        pub struct BrazilFields {
            $(#[serde(default)] pub $b_field: field_ty!($b_kind),)*
        }

        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        pub struct PortugalFields {
            $(#[serde(default)] pub $p_field: field_ty!($p_kind),)*
        }

        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ProcessField {
            $($c_variant,)*
            $($b_variant,)*
            $($p_variant,)*
        }

        impl ProcessField {
            pub const ALL: &'static [ProcessField] = &[
                $(ProcessField::$c_variant,)*
                $(ProcessField::$b_variant,)*
                $(ProcessField::$p_variant,)*
            ];

            pub fn key(self) -> &'static str {
                match self {
                    $(ProcessField::$c_variant => stringify!($c_field),)*
                    $(ProcessField::$b_variant => stringify!($b_field),)*
                    $(ProcessField::$p_variant => stringify!($p_field),)*
                }
            }

            pub fn kind(self) -> FieldKind {
                match self {
                    $(ProcessField::$c_variant => FieldKind::$c_kind,)*
                    $(ProcessField::$b_variant => FieldKind::$b_kind,)*
                    $(ProcessField::$p_variant => FieldKind::$p_kind,)*
                }
            }

            pub fn scope(self) -> FieldScope {
                match self {
                    $(ProcessField::$c_variant => FieldScope::Common,)*
                    $(ProcessField::$b_variant => FieldScope::Only(Jurisdiction::Brazil),)*
                    $(ProcessField::$p_variant => FieldScope::Only(Jurisdiction::Portugal),)*
                }
            }
        }

        impl ProcessDraft {
            /// Current value of `field`, or `None` when the field belongs to the
            /// other jurisdiction.
            pub fn field(&self, field: ProcessField) -> Option<FieldValue> {
                match field {
                    $(ProcessField::$c_variant => Some(self.common.$c_field.clone().into()),)*
                    $(ProcessField::$b_variant => match &self.specific {
                        JurisdictionFields::Brazil(fields) => Some(fields.$b_field.clone().into()),
                        JurisdictionFields::Portugal(_) => None,
                    },)*
                    $(ProcessField::$p_variant => match &self.specific {
                        JurisdictionFields::Portugal(fields) => Some(fields.$p_field.clone().into()),
                        JurisdictionFields::Brazil(_) => None,
                    },)*
                }
            }

            fn write(&mut self, field: ProcessField, value: FieldValue) -> bool {
                match field {
                    $(ProcessField::$c_variant => {
                        self.common.$c_field = FromFieldValue::from_field_value(value);
                        true
                    })*
                    $(ProcessField::$b_variant => match &mut self.specific {
                        JurisdictionFields::Brazil(fields) => {
                            fields.$b_field = FromFieldValue::from_field_value(value);
                            true
                        }
                        JurisdictionFields::Portugal(_) => false,
                    },)*
                    $(ProcessField::$p_variant => match &mut self.specific {
                        JurisdictionFields::Portugal(fields) => {
                            fields.$p_field = FromFieldValue::from_field_value(value);
                            true
                        }
                        JurisdictionFields::Brazil(_) => false,
                    },)*
                }
            }
        }
    };
}

process_fields! {
    common {
        InternalNumber => internal_number: Text,
        MainSubject => main_subject: Text,
        CaseType => case_type: Text,
        Court => court: Text,
        District => district: Text,
        Judge => judge: Text,
        Instance => instance: Text,
        Registry => registry: Text,
        ElectronicSystem => electronic_system: Text,
        ClientRole => client_role: Text,
        OpposingParty => opposing_party: Text,
        LegalRepresentatives => legal_representatives: Text,
        ThirdParties => third_parties: Text,
        PublicProsecutor => public_prosecutor: Flag,
        ClaimValue => claim_value: Number,
        ContractualFees => contractual_fees: Number,
        SuccessFees => success_fees: Number,
        CostsPaid => costs_paid: Number,
        CostsOutstanding => costs_outstanding: Number,
        JudicialDeposits => judicial_deposits: Number,
        FilingDate => filing_date: Text,
        StartDate => start_date: Text,
        LastDeadline => last_deadline: Text,
        DeadlineLimit => deadline_limit: Text,
        NextHearing => next_hearing: Text,
        JudgmentDate => judgment_date: Text,
        AppealDeadline => appeal_deadline: Text,
        LimitationDate => limitation_date: Text,
        ExpectedCompletion => expected_completion: Text,
        ProceduralPhase => procedural_phase: Text,
        LastMovement => last_movement: Text,
        CaseStatus => case_status: Text,
        PendingAppeals => pending_appeals: Text,
        Enforcement => enforcement: Text,
        InitialPetition => initial_petition: Flag,
        KeyDocuments => key_documents: Text,
        PhysicalLocation => physical_location: Text,
        DigitizedDocuments => digitized_documents: Flag,
        ValidPowersOfAttorney => valid_powers_of_attorney: Flag,
        RequiredDocuments => required_documents: Text,
        PracticeArea => practice_area: Text,
        SubArea => sub_area: Text,
        Complexity => complexity: Text,
        Strategy => strategy: Text,
        LeadLawyer => lead_lawyer: Text,
        AssistantLawyer => assistant_lawyer: Text,
        Paralegal => paralegal: Text,
        LocalCorrespondent => local_correspondent: Text,
        Summary => summary: Text,
        Observations => observations: Text,
        SpecialAlerts => special_alerts: Text,
        DecisionHistory => decision_history: Text,
        ProcessingTime => processing_time: Number,
        ExpectedSuccessRate => expected_success_rate: Number,
        ProceduralRisk => procedural_risk: Text,
        SuccessProbability => success_probability: Number,
        Urgency => urgency: Text,
    }
    brazil {
        CnjNumber => cnj_number: Text,
        ProceduralClass => procedural_class: Text,
        CnjSubjectCode => cnj_subject_code: Text,
        SecrecyLevel => secrecy_level: Text,
        FederalSpecialCourt => federal_special_court: Flag,
        FreeJustice => free_justice: Flag,
    }
    portugal {
        CourtCaseNumber => court_case_number: Text,
        ProcedureType => procedure_type: Text,
        ProcessForm => process_form: Text,
        CostsRegime => costs_regime: Text,
        LegalAid => legal_aid: Text,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown process field '{0}'")]
pub struct UnknownField(pub String);

impl FromStr for ProcessField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        ProcessField::ALL
            .iter()
            .copied()
            .find(|field| field.key() == key)
            .ok_or_else(|| UnknownField(key.to_string()))
    }
}

impl fmt::Display for ProcessField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "jurisdiction", content = "fields", rename_all = "snake_case")]
pub enum JurisdictionFields {
    Brazil(BrazilFields),
    Portugal(PortugalFields),
}

impl JurisdictionFields {
    pub fn empty(jurisdiction: Jurisdiction) -> Self {
        match jurisdiction {
            Jurisdiction::Brazil => JurisdictionFields::Brazil(BrazilFields::default()),
            Jurisdiction::Portugal => JurisdictionFields::Portugal(PortugalFields::default()),
        }
    }

    pub fn jurisdiction(&self) -> Jurisdiction {
        match self {
            JurisdictionFields::Brazil(_) => Jurisdiction::Brazil,
            JurisdictionFields::Portugal(_) => Jurisdiction::Portugal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Process {
    pub id: ProcessId,
    pub client_id: ClientId,
    pub common: CommonFields,
    pub specific: JurisdictionFields,
    pub created_at: DateTime<Utc>,
}

impl Process {
    pub fn jurisdiction(&self) -> Jurisdiction {
        self.specific.jurisdiction()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("field '{field}' does not apply to {jurisdiction} processes")]
    WrongJurisdiction {
        field: ProcessField,
        jurisdiction: Jurisdiction,
    },
}

/// Working copy of a process inside an edit session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProcessId>,
    pub client_id: ClientId,
    pub common: CommonFields,
    pub specific: JurisdictionFields,
}

impl ProcessDraft {
    pub fn new(client_id: ClientId, jurisdiction: Jurisdiction) -> Self {
        Self {
            id: None,
            client_id,
            common: CommonFields::default(),
            specific: JurisdictionFields::empty(jurisdiction),
        }
    }

    pub fn from_process(process: &Process) -> Self {
        Self {
            id: Some(process.id),
            client_id: process.client_id,
            common: process.common.clone(),
            specific: process.specific.clone(),
        }
    }

    pub fn jurisdiction(&self) -> Jurisdiction {
        self.specific.jurisdiction()
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Moves the draft to another jurisdiction. Common fields survive; the
    /// previous jurisdiction's own fields are dropped.
    pub fn switch_jurisdiction(&mut self, jurisdiction: Jurisdiction) {
        if self.jurisdiction() != jurisdiction {
            self.specific = JurisdictionFields::empty(jurisdiction);
        }
    }

    pub fn set_field(
        &mut self,
        field: ProcessField,
        value: impl Into<FieldValue>,
    ) -> Result<(), DraftError> {
        if self.write(field, value.into()) {
            Ok(())
        } else {
            Err(DraftError::WrongJurisdiction {
                field,
                jurisdiction: self.jurisdiction(),
            })
        }
    }

    /// Sets a field from raw form text, coercing it to the field's kind.
    pub fn set_raw(&mut self, field: ProcessField, raw: &str) -> Result<(), DraftError> {
        self.set_field(field, FieldValue::coerce(field.kind(), raw))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormTab {
    Identification,
    Court,
    Parties,
    Financial,
    Deadlines,
    Other,
}

impl FormTab {
    pub fn label(self) -> &'static str {
        match self {
            FormTab::Identification => "Identificação",
            FormTab::Court => "Tribunal",
            FormTab::Parties => "Partes",
            FormTab::Financial => "Financeiro",
            FormTab::Deadlines => "Prazos",
            FormTab::Other => "Outros",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
}

const fn choice(value: &'static str, label: &'static str) -> Choice {
    Choice { value, label }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub field: ProcessField,
    pub label: &'static str,
    pub choices: &'static [Choice],
}

const fn spec(field: ProcessField, label: &'static str) -> FieldSpec {
    FieldSpec {
        field,
        label,
        choices: &[],
    }
}

const fn select(field: ProcessField, label: &'static str, choices: &'static [Choice]) -> FieldSpec {
    FieldSpec {
        field,
        label,
        choices,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabSpec {
    pub tab: FormTab,
    pub fields: &'static [FieldSpec],
}

pub const BRAZIL_PROCEDURAL_CLASSES: &[Choice] = &[
    choice("46 - Ação de Alimentos", "Ação de Alimentos"),
    choice("29 - Ação de Cobrança", "Ação de Cobrança"),
    choice("107 - Cobrança (Aluguel, IPTU etc.)", "Cobrança (Aluguel, IPTU etc.)"),
    choice("72 - Divórcio Litigioso", "Divórcio Litigioso"),
    choice("73 - Divórcio Consensual", "Divórcio Consensual"),
    choice("102 - Despejo", "Despejo"),
    choice("353 - Execução de Título Extrajudicial", "Execução de Título Extrajudicial"),
    choice("1040 - Extinção de Condomínio", "Extinção de Condomínio"),
    choice("10162 - Falência", "Falência"),
    choice("54 - Guarda", "Guarda"),
    choice("392 - Interdição", "Interdição"),
    choice("252 - Investigação de Paternidade", "Investigação de Paternidade"),
    choice("844 - Manutenção de Posse", "Manutenção de Posse"),
    choice("1123 - Ação Monitória", "Ação Monitória"),
    choice("998 - Nunciação de Obra Nova", "Nunciação de Obra Nova"),
    choice("324 - Regulamentação de Visitas", "Regulamentação de Visitas"),
    choice("843 - Reintegração de Posse", "Reintegração de Posse"),
    choice("875 - Rescisão Contratual", "Rescisão Contratual"),
    choice("10161 - Recuperação Judicial", "Recuperação Judicial"),
    choice("47 - Revisão de Alimentos", "Revisão de Alimentos"),
    choice("801 - Usucapião", "Usucapião"),
    choice("233 - Alvará Judicial", "Alvará Judicial"),
];

pub const BRAZIL_SUBJECT_CODES: &[Choice] = &[
    choice("1010", "Direito Civil - Geral"),
    choice("1210", "Cobrança"),
    choice("1020", "Direito Penal"),
    choice("1030", "Direito do Trabalho"),
    choice("1040", "Direito Tributário"),
    choice("1050", "Direito Administrativo"),
    choice("1021", "Crimes contra a Pessoa"),
    choice("1031", "Relações de Trabalho"),
    choice("1211", "Cobrança de Aluguéis"),
    choice("1230", "Contratos"),
];

const BRAZIL_SECRECY_LEVELS: &[Choice] = &[
    choice("publico", "Público"),
    choice("segredo_justica", "Segredo de Justiça"),
    choice("tramitacao_reservada", "Tramitação Reservada"),
];

const BRAZIL_INSTANCES: &[Choice] = &[
    choice("1_grau", "1º Grau"),
    choice("2_grau", "2º Grau"),
    choice("stj", "STJ"),
    choice("stf", "STF"),
];

const BRAZIL_SYSTEMS: &[Choice] = &[
    choice("pje", "PJe"),
    choice("projudi", "PROJUDI"),
    choice("fisico", "Físico"),
    choice("esaj", "ESAJ"),
];

const BRAZIL_CLIENT_ROLES: &[Choice] = &[
    choice("autor", "Autor"),
    choice("reu", "Réu"),
    choice("requerente", "Requerente"),
    choice("requerido", "Requerido"),
];

const PORTUGAL_PROCEDURE_TYPES: &[Choice] = &[
    choice("declarativo", "Declarativo"),
    choice("executivo", "Executivo"),
    choice("cautelar", "Cautelar"),
    choice("especial", "Especial"),
];

const PORTUGAL_PROCESS_FORMS: &[Choice] = &[
    choice("ordinario", "Ordinário"),
    choice("sumario", "Sumário"),
    choice("sumarissimo", "Sumaríssimo"),
    choice("urgente", "Urgente"),
];

const PORTUGAL_PRACTICE_AREAS: &[Choice] = &[
    choice("civil", "Direito Civil"),
    choice("comercial", "Direito Comercial"),
    choice("trabalho", "Direito do Trabalho"),
    choice("familia", "Direito da Família"),
    choice("penal", "Direito Penal"),
    choice("administrativo", "Direito Administrativo"),
    choice("imigracao", "Direito Imigratório"),
];

const PORTUGAL_INSTANCES: &[Choice] = &[
    choice("1_instancia", "1ª Instância"),
    choice("relacao", "Relação"),
    choice("supremo", "Supremo"),
];

const PORTUGAL_COSTS_REGIMES: &[Choice] = &[
    choice("normal", "Normal"),
    choice("isento", "Isento"),
    choice("reduzido", "Reduzido"),
];

const PORTUGAL_SYSTEMS: &[Choice] = &[
    choice("citius", "CITIUS"),
    choice("fisico", "Físico"),
    choice("eletronico", "Electrónico"),
];

const PORTUGAL_CLIENT_ROLES: &[Choice] = &[
    choice("requerente", "Requerente"),
    choice("requerido", "Requerido"),
    choice("demandante", "Demandante"),
    choice("demandado", "Demandado"),
];

const PORTUGAL_LEGAL_AID: &[Choice] = &[
    choice("nao", "Não Concedido"),
    choice("sim", "Total"),
    choice("parcial", "Parcial"),
];

const BRAZIL_FORM: &[TabSpec] = &[
    TabSpec {
        tab: FormTab::Identification,
        fields: &[
            spec(
                ProcessField::CnjNumber,
                "Número CNJ (formato: 0000000-00.0000.0.00.0000)",
            ),
            spec(ProcessField::InternalNumber, "Número Interno"),
            select(
                ProcessField::ProceduralClass,
                "Classe Processual",
                BRAZIL_PROCEDURAL_CLASSES,
            ),
            select(
                ProcessField::CnjSubjectCode,
                "Código do Assunto CNJ",
                BRAZIL_SUBJECT_CODES,
            ),
            select(ProcessField::SecrecyLevel, "Grau de Sigilo", BRAZIL_SECRECY_LEVELS),
            select(ProcessField::Instance, "Instância", BRAZIL_INSTANCES),
            spec(
                ProcessField::FederalSpecialCourt,
                "JEF (Juizado Especial Federal)",
            ),
        ],
    },
    TabSpec {
        tab: FormTab::Court,
        fields: &[
            spec(ProcessField::Court, "Vara/Tribunal"),
            spec(ProcessField::District, "Comarca"),
            spec(ProcessField::Judge, "Juiz(a) Responsável"),
            spec(ProcessField::Registry, "Cartório/Secretaria"),
            select(ProcessField::ElectronicSystem, "Sistema Processual", BRAZIL_SYSTEMS),
        ],
    },
    TabSpec {
        tab: FormTab::Parties,
        fields: &[
            spec(ProcessField::OpposingParty, "Parte Contrária"),
            select(ProcessField::ClientRole, "Tipo do Cliente", BRAZIL_CLIENT_ROLES),
            spec(ProcessField::LegalRepresentatives, "Representantes Legais"),
            spec(ProcessField::PublicProsecutor, "Ministério Público"),
        ],
    },
    TabSpec {
        tab: FormTab::Financial,
        fields: &[
            spec(ProcessField::ClaimValue, "Valor da Causa (R$)"),
            spec(ProcessField::ContractualFees, "Honorários Contratuais (R$)"),
            spec(ProcessField::CostsPaid, "Custas Pagas (R$)"),
            spec(ProcessField::FreeJustice, "Justiça Gratuita"),
        ],
    },
    TabSpec {
        tab: FormTab::Deadlines,
        fields: &[
            spec(ProcessField::FilingDate, "Data Distribuição"),
            spec(ProcessField::DeadlineLimit, "Data Limite para Prazo"),
            spec(ProcessField::NextHearing, "Próxima Audiência"),
        ],
    },
    TabSpec {
        tab: FormTab::Other,
        fields: &[
            spec(ProcessField::Summary, "Resumo do Caso"),
            spec(ProcessField::Observations, "Observações"),
            spec(ProcessField::Strategy, "Estratégia Processual"),
        ],
    },
];

const PORTUGAL_FORM: &[TabSpec] = &[
    TabSpec {
        tab: FormTab::Identification,
        fields: &[
            spec(ProcessField::CourtCaseNumber, "Número do Processo no Tribunal"),
            spec(ProcessField::InternalNumber, "Número Interno"),
            select(
                ProcessField::ProcedureType,
                "Tipo de Ação/Procedimento",
                PORTUGAL_PROCEDURE_TYPES,
            ),
            select(ProcessField::ProcessForm, "Forma do Processo", PORTUGAL_PROCESS_FORMS),
            select(
                ProcessField::PracticeArea,
                "Área de Competência",
                PORTUGAL_PRACTICE_AREAS,
            ),
            select(ProcessField::Instance, "Instância", PORTUGAL_INSTANCES),
            select(ProcessField::CostsRegime, "Regime de Custas", PORTUGAL_COSTS_REGIMES),
        ],
    },
    TabSpec {
        tab: FormTab::Court,
        fields: &[
            spec(ProcessField::Court, "Tribunal/Juízo"),
            spec(ProcessField::District, "Circunscrição Judicial"),
            spec(ProcessField::Judge, "Juiz de Direito"),
            spec(ProcessField::Registry, "Secretaria Judicial"),
            select(ProcessField::ElectronicSystem, "Plataforma", PORTUGAL_SYSTEMS),
        ],
    },
    TabSpec {
        tab: FormTab::Parties,
        fields: &[
            spec(ProcessField::OpposingParty, "Parte Contrária"),
            select(ProcessField::ClientRole, "Tipo do Cliente", PORTUGAL_CLIENT_ROLES),
            spec(ProcessField::LegalRepresentatives, "Representantes Legais"),
            spec(ProcessField::ThirdParties, "Terceiros Intervenientes"),
        ],
    },
    TabSpec {
        tab: FormTab::Financial,
        fields: &[
            spec(ProcessField::ClaimValue, "Valor da Ação (€)"),
            spec(ProcessField::ContractualFees, "Honorários Contratuais (€)"),
            spec(ProcessField::CostsPaid, "Custas Pagas (€)"),
            select(ProcessField::LegalAid, "Apoio Judiciário", PORTUGAL_LEGAL_AID),
        ],
    },
    TabSpec {
        tab: FormTab::Deadlines,
        fields: &[
            spec(ProcessField::FilingDate, "Data de Entrada/Distribuição"),
            spec(ProcessField::DeadlineLimit, "Data Limite para Recursos"),
            spec(ProcessField::NextHearing, "Próxima Audiência"),
        ],
    },
    TabSpec {
        tab: FormTab::Other,
        fields: &[
            spec(ProcessField::Summary, "Resumo do Caso"),
            spec(ProcessField::Observations, "Observações"),
            spec(ProcessField::Strategy, "Estratégia Processual"),
        ],
    },
];

/// Tabs, fields and choice lists of the edit form for `jurisdiction`.
pub fn form_schema(jurisdiction: Jurisdiction) -> &'static [TabSpec] {
    match jurisdiction {
        Jurisdiction::Brazil => BRAZIL_FORM,
        Jurisdiction::Portugal => PORTUGAL_FORM,
    }
}

pub fn field_spec(jurisdiction: Jurisdiction, field: ProcessField) -> Option<&'static FieldSpec> {
    form_schema(jurisdiction)
        .iter()
        .flat_map(|tab| tab.fields.iter())
        .find(|spec| spec.field == field)
}

#[cfg(test)]
#[path = "tests/process_tests.rs"]
mod tests;
