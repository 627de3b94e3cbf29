use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use verbale_pdf::{
    Branding, Error, InspectionRecord, Language, ReportAssets, ReportOptions, generate_report_to_file,
    suggested_filename,
};

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum LanguageArg {
    #[default]
    It,
    En,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum BrandingArg {
    #[default]
    Redesco,
    Maestrale,
}

#[derive(Parser)]
#[command(name = "verbale-pdf", version, about = "Generate construction inspection report PDFs")]
struct Args {
    /// Inspection record (JSON)
    record: PathBuf,

    /// Output PDF path (defaults to the suggested filename next to the record)
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LanguageArg::It)]
    language: LanguageArg,

    #[arg(long, value_enum, default_value_t = BrandingArg::Redesco)]
    branding: BrandingArg,

    /// Header logo image (PNG or JPEG)
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Signature image for the signature table
    #[arg(long)]
    signature: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), Error> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let json = std::fs::read_to_string(&args.record)?;
    let mut record: InspectionRecord = serde_json::from_str(&json)?;

    // record JSON references photo files by path; pull the bytes in
    for photo in &mut record.photos {
        if photo.bytes.is_empty() {
            let Some(path) = photo.path.clone() else {
                log::warn!("Photo {} has no data and no path, skipping", photo.id);
                continue;
            };
            match std::fs::read(&path) {
                Ok(bytes) => photo.bytes = bytes,
                Err(e) => log::warn!("Cannot read photo {} from {path}: {e}", photo.id),
            }
        }
    }
    record.photos.retain(|p| !p.bytes.is_empty());

    let language = match args.language {
        LanguageArg::It => Language::It,
        LanguageArg::En => Language::En,
    };
    let branding = match args.branding {
        BrandingArg::Redesco => Branding::Redesco,
        BrandingArg::Maestrale => Branding::Maestrale,
    };

    let mut assets = ReportAssets::default();
    if let Some(path) = &args.logo {
        assets.logo = Some(std::fs::read(path)?);
    }
    if let Some(path) = &args.signature {
        assets.signature = Some(std::fs::read(path)?);
    }

    let opts = ReportOptions {
        language,
        branding,
        assets,
        ..Default::default()
    };

    let output = args.output.unwrap_or_else(|| {
        let name = suggested_filename(&record, language);
        args.record
            .parent()
            .map(|dir| dir.join(&name))
            .unwrap_or_else(|| PathBuf::from(name))
    });

    generate_report_to_file(&record, &opts, &output)?;
    println!("{}", output.display());
    Ok(())
}
