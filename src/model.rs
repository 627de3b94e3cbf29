use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The two report languages. Affects labels, footer templates, date locale
/// strings and the document title used in filenames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    It,
    En,
}

/// Branding variant: one selector drives the header logo sizing, the company
/// name and the footer contact line together, so a document can never mix
/// identities.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Branding {
    #[default]
    Redesco,
    Maestrale,
}

impl Branding {
    pub fn company_name(self) -> &'static str {
        match self {
            Branding::Redesco => "Redesco Progetti srl",
            Branding::Maestrale => "Maestrale Srl",
        }
    }

    /// Company name as shown next to the header logo. Redesco's logo already
    /// carries the wordmark, so its header text is blank.
    pub fn header_company_name(self) -> &'static str {
        match self {
            Branding::Redesco => "",
            Branding::Maestrale => "Maestrale Srl",
        }
    }

    pub fn contact_line(self) -> &'static str {
        match self {
            Branding::Redesco => "www.redesco.it - redesco@redesco.it",
            Branding::Maestrale => "amministrazione@maestrale.mi.it",
        }
    }

    /// Header logo display width in points, aspect preserved at draw time.
    pub fn logo_width(self) -> f32 {
        match self {
            Branding::Redesco => 100.0,
            Branding::Maestrale => 70.0,
        }
    }

    /// Name printed in the "on behalf of" signature column.
    pub fn on_behalf_of(self) -> &'static str {
        match self {
            Branding::Redesco => "Mauro Eugenio Giuliani",
            Branding::Maestrale => "Maestrale Srl",
        }
    }
}

/// Photo rotation, quarter turns only. Closed under all rotation ops.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    #[serde(rename = "0")]
    R0,
    #[serde(rename = "90")]
    R90,
    #[serde(rename = "180")]
    R180,
    #[serde(rename = "270")]
    R270,
}

impl Rotation {
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 90,
            Rotation::R180 => 180,
            Rotation::R270 => 270,
        }
    }

    pub fn from_degrees(deg: u16) -> Self {
        match deg % 360 {
            90 => Rotation::R90,
            180 => Rotation::R180,
            270 => Rotation::R270,
            _ => Rotation::R0,
        }
    }

    pub fn cw(self) -> Self {
        Rotation::from_degrees(self.degrees() + 90)
    }

    pub fn ccw(self) -> Self {
        Rotation::from_degrees(self.degrees() + 270)
    }

    /// True for 90°/270°, where the drawn bounding box swaps width and height.
    pub fn swaps_axes(self) -> bool {
        matches!(self, Rotation::R90 | Rotation::R270)
    }
}

/// A user photo attached to the record. The list position is the ordering;
/// the appendix figure number is the 1-based index in the record's list.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Photo {
    pub id: String,
    /// Raw image bytes (JPEG or PNG), owned exclusively by the photo.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bytes: Vec<u8>,
    /// Source path, used by the CLI to load `bytes`; the library ignores it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub rotation: Rotation,
}

impl Photo {
    pub fn new(id: impl Into<String>, bytes: Vec<u8>) -> Self {
        Photo {
            id: id.into(),
            bytes,
            path: None,
            caption: String::new(),
            rotation: Rotation::R0,
        }
    }

    pub fn rotate_cw(&mut self) {
        self.rotation = self.rotation.cw();
    }

    pub fn rotate_ccw(&mut self) {
        self.rotation = self.rotation.ccw();
    }
}

/// Inspection-method checkboxes. Independent flags; any combination is valid.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MethodFlags {
    pub visual: bool,
    pub survey: bool,
    pub test: bool,
    pub other: bool,
}

impl MethodFlags {
    pub fn selected_count(self) -> usize {
        [self.visual, self.survey, self.test, self.other]
            .iter()
            .filter(|&&v| v)
            .count()
    }
}

/// Check-result checkboxes. Independent flags; any combination is valid.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutcomeFlags {
    pub conformant: bool,
    pub non_conformant: bool,
    pub observation: bool,
}

impl OutcomeFlags {
    pub fn selected_count(self) -> usize {
        [self.conformant, self.non_conformant, self.observation]
            .iter()
            .filter(|&&v| v)
            .count()
    }
}

/// Construction-oversight roles. At most one may be active; the record
/// enforces this on every toggle, not the type itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OversightRole {
    #[serde(rename = "DLG")]
    Dlg,
    #[serde(rename = "DLS")]
    Dls,
    #[serde(rename = "COLLAUDATORE")]
    Collaudatore,
    #[serde(rename = "DL_FACCIATE")]
    DlFacciate,
    #[serde(rename = "DL_ELETTRICI")]
    DlElettrici,
    #[serde(rename = "DL_MECCANICI")]
    DlMeccanici,
}

impl OversightRole {
    pub const ALL: [OversightRole; 6] = [
        OversightRole::Dlg,
        OversightRole::Dls,
        OversightRole::Collaudatore,
        OversightRole::DlFacciate,
        OversightRole::DlElettrici,
        OversightRole::DlMeccanici,
    ];

    /// Short code used in suggested filenames.
    pub fn code(self) -> &'static str {
        match self {
            OversightRole::Dlg => "DLG",
            OversightRole::Dls => "DLS",
            OversightRole::Collaudatore => "COLL",
            OversightRole::DlFacciate => "DLF",
            OversightRole::DlElettrici => "DLE",
            OversightRole::DlMeccanici => "DLM",
        }
    }

    /// Lookup key into the translation table.
    pub fn label_key(self) -> &'static str {
        match self {
            OversightRole::Dlg => "role_dlg",
            OversightRole::Dls => "role_dls",
            OversightRole::Collaudatore => "role_collaudatore",
            OversightRole::DlFacciate => "role_dl_facciate",
            OversightRole::DlElettrici => "role_dl_elettrici",
            OversightRole::DlMeccanici => "role_dl_meccanici",
        }
    }
}

/// Lenient date field: absent, null, or malformed strings all deserialize to
/// `None` so a stale draft can never block generation.
mod lenient_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match v {
            Some(d) => s.serialize_str(&d.format("%Y-%m-%d").to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        Ok(raw.and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()))
    }
}

/// The root record: everything the report document is generated from.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectionRecord {
    /// Progressive report number, e.g. "001".
    pub serial: String,
    /// Order/commission number shown in the project heading.
    pub order_number: String,
    pub project_name: String,
    #[serde(with = "lenient_date")]
    pub inspection_date: Option<NaiveDate>,
    #[serde(with = "lenient_date")]
    pub report_date: Option<NaiveDate>,
    pub works_inspected: String,
    pub material_check: String,
    pub drawing_reference: String,
    pub location: String,
    pub checklist_reference: String,
    pub inspector: String,
    /// Site-visit description; may contain `<b>`, `<i>`, `<u>` inline markup.
    pub description: String,
    /// Footnote printed under the outcome checklist; empty uses the default
    /// localized observation note.
    pub footnote: String,
    pub methods: MethodFlags,
    pub outcome: OutcomeFlags,
    /// Single active oversight role, if any. Use [`InspectionRecord::set_role`]
    /// to toggle — it keeps the at-most-one invariant.
    pub role: Option<OversightRole>,
    pub photos: Vec<Photo>,
}

impl InspectionRecord {
    /// Activate `role`, clearing any other. Selecting is always exclusive;
    /// turning the active role off goes through `clear_role`.
    pub fn set_role(&mut self, role: OversightRole) {
        self.role = Some(role);
    }

    pub fn clear_role(&mut self) {
        self.role = None;
    }

    pub fn role_active(&self, role: OversightRole) -> bool {
        self.role == Some(role)
    }

    /// Move the photo at `index` one slot toward the front. Figure numbers
    /// follow list order, so this renumbers every photo in between.
    pub fn move_photo_up(&mut self, index: usize) {
        if index > 0 && index < self.photos.len() {
            self.photos.swap(index - 1, index);
        }
    }

    pub fn move_photo_down(&mut self, index: usize) {
        if index + 1 < self.photos.len() {
            self.photos.swap(index, index + 1);
        }
    }

    pub fn remove_photo(&mut self, id: &str) {
        self.photos.retain(|p| p.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_is_closed_under_quarter_turns() {
        for start in [Rotation::R0, Rotation::R90, Rotation::R180, Rotation::R270] {
            assert_eq!(start.cw().cw().cw().cw(), start);
            assert_eq!(start.ccw().ccw().ccw().ccw(), start);
            assert_eq!(start.cw().ccw(), start);
            // two half turns are identity
            let half = Rotation::from_degrees(start.degrees() + 180);
            assert_eq!(Rotation::from_degrees(half.degrees() + 180), start);
        }
    }

    #[test]
    fn bounding_box_swap_only_for_odd_quarters() {
        assert!(!Rotation::R0.swaps_axes());
        assert!(Rotation::R90.swaps_axes());
        assert!(!Rotation::R180.swaps_axes());
        assert!(Rotation::R270.swaps_axes());
    }

    #[test]
    fn role_selection_is_exclusive() {
        let mut rec = InspectionRecord::default();
        rec.set_role(OversightRole::Dls);
        assert!(rec.role_active(OversightRole::Dls));
        rec.set_role(OversightRole::DlFacciate);
        assert!(rec.role_active(OversightRole::DlFacciate));
        for role in OversightRole::ALL {
            if role != OversightRole::DlFacciate {
                assert!(!rec.role_active(role), "{role:?} should be inactive");
            }
        }
    }

    #[test]
    fn photo_reorder_keeps_caption_with_photo() {
        let mut rec = InspectionRecord::default();
        for (id, caption) in [("a", "first"), ("b", "second"), ("c", "third")] {
            let mut p = Photo::new(id, vec![]);
            p.caption = caption.to_string();
            rec.photos.push(p);
        }
        rec.move_photo_up(2);
        rec.move_photo_up(1);
        // "c" is now first; its caption travelled with it
        assert_eq!(rec.photos[0].id, "c");
        assert_eq!(rec.photos[0].caption, "third");
        assert_eq!(rec.photos[1].id, "a");
        assert_eq!(rec.photos[2].id, "b");
    }

    #[test]
    fn move_at_boundaries_is_a_no_op() {
        let mut rec = InspectionRecord::default();
        rec.photos.push(Photo::new("only", vec![]));
        rec.move_photo_up(0);
        rec.move_photo_down(0);
        assert_eq!(rec.photos.len(), 1);
        assert_eq!(rec.photos[0].id, "only");
    }

    #[test]
    fn malformed_dates_deserialize_to_none() {
        let json = r#"{"serial":"001","inspection_date":"not-a-date","report_date":"2024-03-07"}"#;
        let rec: InspectionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.inspection_date, None);
        assert_eq!(rec.report_date, NaiveDate::from_ymd_opt(2024, 3, 7));
    }
}
