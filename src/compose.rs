//! Turns an [`InspectionRecord`] into a language-resolved section list.
//!
//! Everything downstream of this module works with final display strings:
//! labels are translated, dates formatted, the description parsed into
//! styled runs. Layout decisions (wrapping, page breaks) happen later in
//! the pdf module; this stage only decides WHAT each section contains and
//! whether it may split across pages.

use chrono::NaiveDate;

use crate::i18n::t;
use crate::model::{Branding, InspectionRecord, Language};
use crate::richtext::{self, StyledRun};

#[derive(Clone, Debug)]
pub struct LabeledValue {
    pub label: String,
    pub value: String,
}

#[derive(Clone, Debug)]
pub struct CheckOption {
    pub label: String,
    pub checked: bool,
}

/// One base-document section. All variants render inside keep-together
/// blocks except `DescriptionOutcome`, which may split at line boundaries.
#[derive(Clone, Debug)]
pub enum SectionBody {
    /// Bordered. Gray heading band plus one row: inspection date, serial
    /// number and the active oversight role.
    ProjectInfo {
        heading: String,
        date: LabeledValue,
        serial: LabeledValue,
        roles: Vec<String>,
    },
    /// Bordered. Fixed label/value rows separated by light rules.
    WorkItems { rows: Vec<LabeledValue> },
    /// Unbordered checkbox strip.
    MethodChecklist {
        title: String,
        options: Vec<CheckOption>,
    },
    /// Bordered, splittable. Description runs, then the outcome checkboxes
    /// and the prescriptive-observation note.
    DescriptionOutcome {
        description_title: String,
        description: Vec<StyledRun>,
        outcome_title: String,
        options: Vec<CheckOption>,
        note: String,
    },
    /// Bordered signature table: four headed columns, the last holding the
    /// signature image.
    SignatureBlock {
        headers: [String; 4],
        date: String,
        inspector: String,
        on_behalf_of: String,
    },
}

impl SectionBody {
    /// Atomic sections move to the next page whole when they do not fit.
    pub fn is_atomic(&self) -> bool {
        !matches!(self, SectionBody::DescriptionOutcome { .. })
    }
}

/// The fully resolved base document, ready for layout.
#[derive(Clone, Debug)]
pub struct ComposedDocument {
    pub language: Language,
    pub branding: Branding,
    pub title: String,
    pub subtitle: String,
    pub sections: Vec<SectionBody>,
}

/// dd/MM/yyyy, the format both language variants use. Missing dates print
/// as blank rather than a placeholder.
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_default()
}

pub fn compose(
    record: &InspectionRecord,
    language: Language,
    branding: Branding,
) -> ComposedDocument {
    let l = language;

    let project_info = SectionBody::ProjectInfo {
        heading: format!(
            "{}: {} - {}",
            t("progetto", l),
            record.order_number,
            record.project_name
        ),
        date: LabeledValue {
            label: t("data_ispezione", l).into(),
            value: format_date(record.inspection_date),
        },
        serial: LabeledValue {
            label: t("n_progressivo", l).into(),
            value: record.serial.clone(),
        },
        roles: record
            .role
            .map(|r| vec![t(r.label_key(), l).to_string()])
            .unwrap_or_default(),
    };

    let work_items = SectionBody::WorkItems {
        rows: vec![
            LabeledValue {
                label: t("lavorazione_verificata", l).into(),
                value: record.works_inspected.clone(),
            },
            LabeledValue {
                label: t("verifica_materiale", l).into(),
                value: record.material_check.clone(),
            },
            LabeledValue {
                label: t("riferimento_progetto", l).into(),
                value: record.drawing_reference.clone(),
            },
            LabeledValue {
                label: t("ubicazione", l).into(),
                value: record.location.clone(),
            },
            LabeledValue {
                label: t("scheda_controllo", l).into(),
                value: record.checklist_reference.clone(),
            },
        ],
    };

    let methods = SectionBody::MethodChecklist {
        title: t("metodo_verifica", l).into(),
        options: vec![
            CheckOption {
                label: t("method_visual", l).into(),
                checked: record.methods.visual,
            },
            CheckOption {
                label: t("method_survey", l).into(),
                checked: record.methods.survey,
            },
            CheckOption {
                label: t("method_test", l).into(),
                checked: record.methods.test,
            },
            CheckOption {
                label: t("method_other", l).into(),
                checked: record.methods.other,
            },
        ],
    };

    let note = if record.footnote.trim().is_empty() {
        t("nota_osservazione", l).to_string()
    } else {
        record.footnote.clone()
    };
    let description_outcome = SectionBody::DescriptionOutcome {
        description_title: t("oggetto_sopralluogo", l).into(),
        description: richtext::parse(&record.description),
        outcome_title: t("esito_controllo", l).into(),
        options: vec![
            CheckOption {
                label: t("outcome_conformant", l).into(),
                checked: record.outcome.conformant,
            },
            CheckOption {
                label: t("outcome_non_conformant", l).into(),
                checked: record.outcome.non_conformant,
            },
            CheckOption {
                label: t("outcome_observation", l).into(),
                checked: record.outcome.observation,
            },
        ],
        note,
    };

    let signature = SectionBody::SignatureBlock {
        headers: [
            t("data_verbale", l).into(),
            t("ispettore", l).into(),
            t("per_conto_di", l).into(),
            t("firma", l).into(),
        ],
        date: format_date(record.report_date),
        inspector: record.inspector.clone(),
        on_behalf_of: branding.on_behalf_of().into(),
    };

    ComposedDocument {
        language,
        branding,
        title: t("scheda_verifica", l).into(),
        subtitle: t("posa_installazione", l).into(),
        sections: vec![
            project_info,
            work_items,
            methods,
            description_outcome,
            signature,
        ],
    }
}
