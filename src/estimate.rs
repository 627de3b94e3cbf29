//! Up-front page-count heuristic for the base document.
//!
//! Runs before any layout happens, so the first page can say "Page 1 of T"
//! without a second pass over the base sections. The costs are calibrated
//! constants, not measurements; the real layout may disagree and the
//! estimate is never reconciled against it. Appendix pages are exact
//! (two photos per page) and are added on top by the caller.

use crate::model::InspectionRecord;

const USABLE_HEIGHT: f32 = 841.0 - 200.0;

const TITLE_COST: f32 = 35.0;
const PROJECT_COST: f32 = 45.0;
const WORK_ITEMS_COST: f32 = 125.0;
const SIGNATURE_COST: f32 = 35.0;

/// Estimated height of the inspection-methods checklist: the selected rows
/// wrap four to a band, plus the section chrome.
fn methods_cost(selected: usize) -> f32 {
    (selected as f32 / 4.0).ceil() * 15.0 + 25.0
}

/// Estimated height of the description body. Characters are assumed to wrap
/// at ninety per line; markup tags count as characters, which biases the
/// estimate slightly tall for heavily formatted text.
fn description_cost(chars: usize) -> f32 {
    if chars == 0 {
        45.0
    } else {
        (chars as f32 / 90.0).ceil() * 12.0 + 35.0
    }
}

/// Estimated height of the outcome checklist, three rows to a band.
fn outcome_cost(selected: usize) -> f32 {
    (selected as f32 / 3.0).ceil() * 15.0 + 45.0
}

/// Estimate how many pages the base document (everything before the photo
/// appendix) will occupy. Always at least one.
pub fn base_pages(record: &InspectionRecord) -> u32 {
    let total = TITLE_COST
        + PROJECT_COST
        + WORK_ITEMS_COST
        + methods_cost(record.methods.selected_count())
        + description_cost(record.description.chars().count())
        + outcome_cost(record.outcome.selected_count())
        + SIGNATURE_COST;
    ((total / USABLE_HEIGHT).ceil() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MethodFlags;

    #[test]
    fn empty_record_is_one_page() {
        let rec = InspectionRecord::default();
        assert_eq!(base_pages(&rec), 1);
    }

    #[test]
    fn typical_record_stays_on_one_page() {
        let mut rec = InspectionRecord::default();
        rec.methods = MethodFlags {
            visual: true,
            survey: true,
            ..Default::default()
        };
        rec.outcome.conformant = true;
        rec.description = "Surface inspection of the north facade anchors.".into();
        assert_eq!(base_pages(&rec), 1);
    }

    #[test]
    fn long_description_spills_to_more_pages() {
        let mut rec = InspectionRecord::default();
        // 5400 chars -> 60 estimated lines -> 755pt of description alone
        rec.description = "x".repeat(5400);
        assert!(base_pages(&rec) >= 2);
    }

    #[test]
    fn estimate_is_monotone_in_description_length() {
        let mut short = InspectionRecord::default();
        let mut long = InspectionRecord::default();
        short.description = "x".repeat(100);
        long.description = "x".repeat(20_000);
        assert!(base_pages(&long) >= base_pages(&short));
    }
}
