mod compose;
mod error;
mod estimate;
mod fonts;
mod i18n;
mod images;
mod model;
mod pdf;
mod richtext;

pub use error::Error;
pub use images::CompressionConfig;
pub use model::{
    Branding, InspectionRecord, Language, MethodFlags, OutcomeFlags, OversightRole, Photo,
    Rotation,
};

use std::path::Path;
use std::time::Instant;

/// Optional branding images, supplied as raw bytes. The logo goes in the
/// page header, the signature in the last column of the signature table.
#[derive(Clone, Debug, Default)]
pub struct ReportAssets {
    pub logo: Option<Vec<u8>>,
    pub signature: Option<Vec<u8>>,
}

#[derive(Clone, Debug, Default)]
pub struct ReportOptions {
    pub language: Language,
    pub branding: Branding,
    pub compression: CompressionConfig,
    pub assets: ReportAssets,
}

/// Generate the full report PDF: base document followed by the photo
/// appendix, with the page header and footer stamped on every page.
pub fn generate_report(record: &InspectionRecord, opts: &ReportOptions) -> Result<Vec<u8>, Error> {
    let t0 = Instant::now();

    let doc = compose::compose(record, opts.language, opts.branding);
    let t_compose = t0.elapsed();

    let photos = images::prepare_photos(&record.photos, &opts.compression);
    let t_photos = t0.elapsed();

    let signature_dims = opts.assets.signature.as_deref().and_then(|data| {
        match image::load_from_memory(data) {
            Ok(img) => {
                use image::GenericImageView;
                Some(img.dimensions())
            }
            Err(e) => {
                log::warn!("Signature image unreadable, omitting: {e}");
                None
            }
        }
    });

    let base = pdf::render_base(&doc, signature_dims);
    let appendix = pdf::render_appendix(&photos, opts.language);
    let t_layout = t0.elapsed();

    let estimated = estimate::base_pages(record);
    if estimated as usize != base.len() {
        log::debug!(
            "Base page estimate diverged: estimated {estimated}, laid out {}",
            base.len()
        );
    }

    let signature = if signature_dims.is_some() {
        opts.assets.signature.as_deref()
    } else {
        None
    };
    let bytes = pdf::assemble(
        base,
        appendix,
        &photos,
        opts.language,
        opts.branding,
        opts.assets.logo.as_deref(),
        signature,
    )?;
    let t_total = t0.elapsed();

    log::info!(
        "Report phases: compose={:.1}ms, photos={:.1}ms, layout={:.1}ms, assemble={:.1}ms ({} photos, {} bytes)",
        t_compose.as_secs_f64() * 1000.0,
        (t_photos - t_compose).as_secs_f64() * 1000.0,
        (t_layout - t_photos).as_secs_f64() * 1000.0,
        (t_total - t_layout).as_secs_f64() * 1000.0,
        photos.iter().flatten().count(),
        bytes.len(),
    );

    Ok(bytes)
}

pub fn generate_report_to_file(
    record: &InspectionRecord,
    opts: &ReportOptions,
    output: &Path,
) -> Result<(), Error> {
    let bytes = generate_report(record, opts)?;
    std::fs::write(output, &bytes).map_err(Error::Io)?;
    Ok(())
}

/// Suggested output filename: `YYMMDD_<serial>_<TITLE>_<role>.pdf`.
/// The date is the inspection date, falling back to today when unset;
/// no selected role reads as DLG.
pub fn suggested_filename(record: &InspectionRecord, language: Language) -> String {
    let date = record
        .inspection_date
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let role = record.role.map(|r| r.code()).unwrap_or("DLG");
    format!(
        "{}_{}_{}_{}.pdf",
        date.format("%y%m%d"),
        record.serial,
        i18n::t("scheda_verifica", language),
        role,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn filename_uses_inspection_date_serial_and_role() {
        let mut rec = InspectionRecord::default();
        rec.serial = "012".into();
        rec.inspection_date = NaiveDate::from_ymd_opt(2024, 3, 7);
        // a later report date must not leak into the name
        rec.report_date = NaiveDate::from_ymd_opt(2024, 3, 9);
        rec.set_role(OversightRole::Collaudatore);
        assert_eq!(
            suggested_filename(&rec, Language::It),
            "240307_012_SCHEDA DI VERIFICA_COLL.pdf"
        );
        assert_eq!(
            suggested_filename(&rec, Language::En),
            "240307_012_INSPECTION REPORT_COLL.pdf"
        );
    }

    #[test]
    fn filename_defaults_role_and_date() {
        let mut rec = InspectionRecord::default();
        rec.serial = "001".into();
        let name = suggested_filename(&rec, Language::It);
        assert!(name.ends_with("_DLG.pdf"), "{name}");
        // fallback date is today, six digits
        assert_eq!(name.split('_').next().unwrap().len(), 6);
    }
}
