use crate::infra::{parse_date, seeded_backend};
use admissions_review::error::AppError;
use admissions_review::review::{
    ApplicantId, EnglishEvidence, EnglishProficiency, EnglishStatus, EnglishTest, HistoryView,
    PrerequisiteNotes, PrerequisiteUpdate, ReviewStatus, ReviewWorkflowService, Role,
    StatusProposal, SurfaceId, WorkflowError,
};
use chrono::{Local, NaiveDate};
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Applicant to open (defaults to the seeded demo record)
    #[arg(long)]
    pub(crate) applicant: Option<String>,
    /// Status to propose and commit (operator label, e.g. "Reviewed by PPA")
    #[arg(long, value_parser = parse_status)]
    pub(crate) target_status: Option<ReviewStatus>,
    /// Anchor date for the English-evidence checks (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
}

fn parse_status(raw: &str) -> Result<ReviewStatus, String> {
    ReviewStatus::from_label(raw).ok_or_else(|| format!("unknown review status '{raw}'"))
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        applicant,
        target_status,
        as_of,
    } = args;

    let applicant = ApplicantId(applicant.unwrap_or_else(|| "GR-2026-0117".to_string()));
    let target_status = target_status.unwrap_or(ReviewStatus::ReviewedByPpa);
    let today = as_of.unwrap_or_else(|| Local::now().date_naive());

    println!("Admissions review workflow demo");

    let backend = Arc::new(seeded_backend("Morgan Wells", Role::FullControl));
    let service = Arc::new(ReviewWorkflowService::connect(backend, 5)?);
    println!(
        "- Session resolved: {} ({:?})",
        service.identity().name,
        service.role()
    );

    let surface = service.open_review(applicant.clone())?;
    println!(
        "- Opened {} -> status {}",
        surface.applicant_id.0,
        surface.fields.status.label()
    );
    println!(
        "  Highest credential: {} in {} (GPA {})",
        surface
            .credential_summary
            .highest_degree
            .as_deref()
            .unwrap_or("none"),
        surface
            .credential_summary
            .degree_area
            .as_deref()
            .unwrap_or("n/a"),
        surface.credential_summary.gpa.as_deref().unwrap_or("n/a")
    );
    println!("  Field access for this role:");
    for entry in &surface.permissions {
        println!(
            "    - {:?}: visible={} editable={}",
            entry.field, entry.access.visible, entry.access.editable
        );
    }

    for name in ["status-tab", "status-badge", "selector-detail"] {
        service.register_panel(SurfaceId(name.to_string()), &applicant)?;
    }
    println!("- Mounted 3 status surfaces (tab, badge, selector)");

    match service.propose_status(&applicant, target_status)? {
        StatusProposal::NoOp => {
            println!(
                "- Proposing {} is a no-op; nothing to commit",
                target_status.label()
            );
            return Ok(());
        }
        StatusProposal::Staged(preview) => {
            println!(
                "- Preview staged: {} -> {}",
                preview.from.label(),
                preview.to.label()
            );
        }
    }

    let receipt = service.commit_status(&applicant)?;
    println!(
        "- Commit accepted: {} -> {} (badge {})",
        receipt.previous.label(),
        receipt.committed.label(),
        receipt.badge_color
    );
    println!("  Panels rewritten without a re-fetch: {}", receipt.panels_updated);
    for name in ["status-tab", "status-badge", "selector-detail"] {
        let shown = service
            .panel_status(&SurfaceId(name.to_string()))
            .map(|status| status.label())
            .unwrap_or("unmounted");
        println!("    - {name}: {shown}");
    }

    match receipt.history {
        HistoryView::Entries { events } => {
            println!("  Recent history ({} entries):", events.len());
            for event in events {
                println!(
                    "    - {} changed {} -> {} at {}",
                    event.actor_name,
                    event.old_value.label(),
                    event.new_value.label(),
                    event.created_at.format("%Y-%m-%d %H:%M:%S")
                );
            }
        }
        HistoryView::NotAvailable { message } => println!("  {message}"),
    }

    println!("- Client-side validation samples:");
    let rejected = PrerequisiteUpdate {
        notes: PrerequisiteNotes::default(),
        rating: Some(7.25),
    };
    match service.save_prerequisites(&applicant, rejected) {
        Err(WorkflowError::Validation(err)) => println!("    rating 7.25 rejected: {err}"),
        other => println!("    unexpected outcome for rating 7.25: {other:?}"),
    }
    let accepted = PrerequisiteUpdate {
        notes: PrerequisiteNotes {
            comments: Some("Strong quantitative background".to_string()),
            ..PrerequisiteNotes::default()
        },
        rating: Some(7.3),
    };
    service.save_prerequisites(&applicant, accepted)?;
    println!("    rating 7.3 accepted and saved");

    let english = EnglishProficiency {
        status: EnglishStatus::Satisfied,
        evidence: Some(EnglishEvidence {
            test: EnglishTest::Duolingo { score: 160 },
            taken_on: today - chrono::Duration::days(90),
        }),
    };
    service.save_english(&applicant, english, today)?;
    println!("    Duolingo 160 accepted; English status satisfied");

    Ok(())
}
