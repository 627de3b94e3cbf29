//! Bilingual label table. Both languages ship with every document build;
//! the record's language picks the column. An unknown key falls back to the
//! key itself so a typo shows up in the output instead of panicking.

use crate::model::Language;

static LABELS: &[(&str, &str, &str)] = &[
    // key, it, en
    ("scheda_verifica", "SCHEDA DI VERIFICA", "INSPECTION REPORT"),
    ("posa_installazione", "Posa/Installazione/Lavoro", "Installation/Work"),
    ("progetto", "PROGETTO", "PROJECT"),
    ("metodo_verifica", "METODO DI VERIFICA", "CHECKING METHODS"),
    ("oggetto_sopralluogo", "OGGETTO DEL SOPRALLUOGO", "DESCRIPTION"),
    ("esito_controllo", "ESITO CONTROLLO", "CHECK RESULT"),
    ("data_ispezione", "Data ispezione", "Inspection date"),
    ("n_progressivo", "N. progressivo", "Number"),
    ("lavorazione_verificata", "Lavorazione Verificata", "Inspected works"),
    ("verifica_materiale", "Verifica materiale previsto", "Material check"),
    (
        "riferimento_progetto",
        "Riferimento Progetto (ESE/COSTR)",
        "Shop drawings reference",
    ),
    ("ubicazione", "Ubicazione - Localizzazione", "Location"),
    ("scheda_controllo", "Scheda controllo lavorazione", "Checklist"),
    (
        "nota_osservazione",
        "* Tale osservazione è da considerarsi prescrittiva - da ottemperare",
        "* Please consider this observation as a prescription, it must be followed",
    ),
    ("data_verbale", "Data verbale", "Report date"),
    ("ispettore", "Ispettore", "Inspector"),
    ("per_conto_di", "Per conto di", "On behalf of"),
    ("firma", "Firma", "Signature"),
    ("di", "di", "of"),
    ("figura", "Figura", "Figure"),
    ("pagina", "Pagina", "Page"),
    // inspection methods
    ("method_visual", "Visivo", "Visual"),
    ("method_survey", "Rilievo/Verifica misure", "Survey/Measurements"),
    ("method_test", "Test/Collaudo", "Test/Commissioning"),
    ("method_other", "Altro", "Other"),
    // check results
    ("outcome_conformant", "Conforme/Positivo", "Conformant/Positive"),
    ("outcome_non_conformant", "Non conforme", "Non-conformant"),
    ("outcome_observation", "Osservazione*", "Observation*"),
    // oversight roles
    ("role_dlg", "DLG", "Gen. COW"),
    ("role_dls", "DLS", "Struct. COW"),
    ("role_collaudatore", "Collaudatore", "Static Tester"),
    ("role_dl_facciate", "DL Facciate", "Facades COW"),
    ("role_dl_elettrici", "DLI Ele.", "Elec. COW"),
    ("role_dl_meccanici", "DLI Mec.", "Mech. COW"),
];

/// Look up `key` in the label table for `lang`. Unknown keys return the key.
pub fn t(key: &str, lang: Language) -> &str {
    for &(k, it, en) in LABELS {
        if k == key {
            return match lang {
                Language::It => it,
                Language::En => en,
            };
        }
    }
    key
}

/// Footer line for page `page` of `total`, e.g.
/// `Redesco Progetti srl - Scheda di Verifica | Pagina 2 di 5`.
pub fn footer_line(company: &str, lang: Language, page: u32, total: u32) -> String {
    match lang {
        Language::It => format!("{company} - Scheda di Verifica | Pagina {page} di {total}"),
        Language::En => format!("{company} - Inspection Report | Page {page} of {total}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_languages_resolve() {
        assert_eq!(t("scheda_verifica", Language::It), "SCHEDA DI VERIFICA");
        assert_eq!(t("scheda_verifica", Language::En), "INSPECTION REPORT");
        assert_eq!(t("role_collaudatore", Language::En), "Static Tester");
    }

    #[test]
    fn unknown_key_falls_back_to_key() {
        assert_eq!(t("no_such_key", Language::It), "no_such_key");
    }

    #[test]
    fn footer_line_shows_page_of_total() {
        let line = footer_line("Redesco Progetti srl", Language::It, 2, 5);
        assert_eq!(line, "Redesco Progetti srl - Scheda di Verifica | Pagina 2 di 5");
        let line = footer_line("Maestrale Srl", Language::En, 1, 1);
        assert_eq!(line, "Maestrale Srl - Inspection Report | Page 1 of 1");
    }
}
