use clap::Args;
use guarantor_intake::config::AppConfig;
use guarantor_intake::error::AppError;
use guarantor_intake::form::{FileDraftStore, GuarantorForm, FORM_STEPS};
use guarantor_intake::guarantors::{
    AttachmentView, Dashboard, GuarantorDetail, GuarantorFilters, GuarantorRow, GuarantorService,
    GuarantorStatus, PageRequest, UploadFile,
};
use std::path::PathBuf;
use std::sync::Arc;

use crate::infra::{seed_demo_data, InMemoryGuarantorRepository};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Files to attach to the record created by the demo
    #[arg(long = "attachment")]
    pub(crate) attachments: Vec<PathBuf>,
    /// Directory for the intake draft (defaults to the configured draft dir)
    #[arg(long)]
    pub(crate) draft_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// Restrict the export to one record status
    #[arg(long, value_parser = parse_status)]
    pub(crate) status: Option<GuarantorStatus>,
    /// Restrict the export to records matching a search term
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Write the CSV here instead of stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

fn parse_status(raw: &str) -> Result<GuarantorStatus, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "pending_verification" | "pending" => Ok(GuarantorStatus::PendingVerification),
        "verified" => Ok(GuarantorStatus::Verified),
        "rejected" => Ok(GuarantorStatus::Rejected),
        other => Err(format!(
            "unknown status '{other}', expected pending_verification, verified, or rejected"
        )),
    }
}

fn demo_service() -> Result<GuarantorService<InMemoryGuarantorRepository>, AppError> {
    let repository = Arc::new(InMemoryGuarantorRepository::default());
    seed_demo_data(&repository).map_err(|err| AppError::Service(err.into()))?;
    Ok(GuarantorService::new(repository, "DemoUser"))
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let ExportArgs {
        status,
        search,
        output,
    } = args;

    let service = demo_service()?;
    let filters = GuarantorFilters {
        status,
        search,
        ..GuarantorFilters::default()
    };
    let csv = service.export_csv(&filters)?;

    match output {
        Some(path) => {
            std::fs::write(&path, &csv)?;
            println!("wrote {} bytes to {}", csv.len(), path.display());
        }
        None => print!("{csv}"),
    }

    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        attachments,
        draft_dir,
    } = args;

    let service = demo_service()?;

    println!("Guarantor intake demo");
    println!("\nIntake form walkthrough");
    for step in FORM_STEPS {
        println!(
            "  {}. {} - {}",
            step.index() + 1,
            step.title(),
            step.description()
        );
    }

    let draft_dir = match draft_dir {
        Some(dir) => dir,
        None => AppConfig::load()?.intake.draft_dir,
    };
    let drafts = Arc::new(FileDraftStore::new(draft_dir));
    let mut form = GuarantorForm::new_create(drafts);

    // an empty first step shows the validation gate in action
    let outcome = form.advance();
    println!(
        "\nAdvancing an empty {} step is rejected:",
        outcome.step.title()
    );
    for error in &outcome.report.errors {
        println!("  {}: {}", error.field, error.message);
    }

    form.apply(|data| {
        data.guarantor_name = "Daniel Ortega".to_string();
        data.relationship_to_borrower = "Managing partner of the borrowing entity".to_string();
        data.address.street = "88 Camelback Road".to_string();
        data.address.city = "Phoenix".to_string();
        data.address.state = "AZ".to_string();
        data.address.zip = "85016".to_string();
        data.date_of_birth = "1979-06-02".to_string();
    });
    form.advance();
    form.apply(|data| {
        data.phone = "+1-602-555-0177".to_string();
        data.email = "daniel.ortega@example.com".to_string();
    });
    form.advance();
    form.apply(|data| {
        data.occupation = "Restaurant Owner".to_string();
        data.employer_or_business = "Ortega Hospitality Group".to_string();
    });
    form.add_association("Arizona Restaurant Association");
    form.advance();
    form.apply(|data| {
        data.comments = "Walked through the intake demo end to end.".to_string();
    });
    form.save_draft();

    println!(
        "\nForm completed ({}% of steps validated), submitting...",
        form.progress()
    );
    let record = form.submit(&service).await.map_err(AppError::Service)?;
    println!("Created {} for {}", record.id, record.data.guarantor_name);

    if !attachments.is_empty() {
        let mut uploads = Vec::with_capacity(attachments.len());
        for path in &attachments {
            let content = std::fs::read(path)?;
            let filename = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "attachment".to_string());
            let content_type = mime_guess::from_path(path)
                .first_or_octet_stream()
                .to_string();
            uploads.push(UploadFile {
                filename,
                content_type,
                content,
            });
        }

        match service.upload_attachments(&record.id, uploads) {
            Ok(stored) => {
                println!("\nUploaded {} attachment(s):", stored.len());
                for meta in &stored {
                    let view = AttachmentView::from_attachment(meta);
                    println!("  {} {} ({})", view.icon, view.filename, view.size_label);
                }
            }
            Err(err) => println!("\nAttachment upload rejected: {err}"),
        }
    }

    let stats = service.stats()?;
    let recent = service.recent(5)?;
    let dashboard = Dashboard::new(stats, &recent);
    println!("\nDashboard");
    println!(
        "  {} total / {} pending / {} verified / {} rejected",
        dashboard.stats.total,
        dashboard.stats.pending_verification,
        dashboard.stats.verified,
        dashboard.stats.rejected
    );
    println!("  Recent submissions:");
    for row in &dashboard.recent {
        println!(
            "    {} | {} | {} | {}",
            row.guarantor_name, row.location, row.status_label, row.submitted
        );
    }

    let (records, pagination) = service.list(&GuarantorFilters::default(), PageRequest::default())?;
    println!(
        "\nGuarantor list (page {} of {}, {} total)",
        pagination.page, pagination.total_pages, pagination.total
    );
    for row in records.iter().map(GuarantorRow::from_record) {
        println!(
            "  {} | {} | {} | {}",
            row.id, row.guarantor_name, row.relationship_to_borrower, row.status_label
        );
    }

    let attachments = service.attachments(&record.id)?;
    let detail = GuarantorDetail::from_record(service.get(&record.id)?, &attachments);
    println!("\nDetail for {}", detail.record.id);
    println!("  Occupation: {}", detail.record.data.occupation);
    println!("  Submitted by: {}", detail.record.submitted_by);
    println!("  Status: {}", detail.status_label);
    for view in &detail.attachment_views {
        println!("  Attachment: {} ({})", view.filename, view.size_label);
    }

    let csv = service.export_csv(&GuarantorFilters::default())?;
    println!("\nCSV export preview");
    for line in csv.lines().take(3) {
        println!("  {line}");
    }

    Ok(())
}
