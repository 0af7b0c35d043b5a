use crate::infra::{
    FixtureVenueDirectory, InMemoryPostingStore, InMemoryVenueStore, RecordingAuditLog,
    RecordingMessageGateway, StaticMemberDirectory, DEMO_OWNER, LOUNGE_CHANNEL,
    PERM_JOBS_CHANNEL, TEMP_JOBS_CHANNEL, VENUE_POST_CHANNEL,
};
use chrono::{Duration, Utc};
use clap::Args;
use staffdesk::error::AppError;
use staffdesk::workflows::identity::UserId;
use staffdesk::workflows::jobs::{
    JobPostingRegistry, PayRate, PostingChannels, PostingKind, RateFrequency,
};
use staffdesk::workflows::venues::{ReportBucket, VenueRegistry};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the job posting portion of the demo
    #[arg(long)]
    pub(crate) skip_jobs: bool,
    /// Print the catalog report at the end of the demo
    #[arg(long)]
    pub(crate) report: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct VenueReportArgs {
    /// Seed additional generated venues to exercise pagination
    #[arg(long, default_value_t = 0)]
    pub(crate) extra: usize,
    /// Include each venue's authorized users in the output
    #[arg(long)]
    pub(crate) list_users: bool,
}

pub(crate) fn run_venue_report(args: VenueReportArgs) -> Result<(), AppError> {
    let VenueReportArgs { extra, list_users } = args;

    let mut venues = sample_registry()?;
    for index in 0..extra {
        venues.create(&format!("Pop-Up Stage {index}"), UserId(900 + index as u64))?;
    }

    println!("Catalog report for a sample community");
    render_catalog_report(&venues.build_report(), list_users);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { skip_jobs, report } = args;

    let gateway = Arc::new(RecordingMessageGateway::default());
    let audit = Arc::new(RecordingAuditLog::default());
    let directory = FixtureVenueDirectory::default();
    let mut venues = VenueRegistry::new(
        Arc::new(InMemoryVenueStore::default()),
        Arc::new(StaticMemberDirectory),
        gateway.clone(),
        audit.clone(),
    );

    println!("Venue staffdesk demo");
    match venues.set_post_channel(LOUNGE_CHANNEL) {
        Err(err) => println!("Voice channel refused for the catalog: {err}"),
        Ok(()) => println!("Unexpectedly accepted a voice channel"),
    }
    venues.set_post_channel(VENUE_POST_CHANNEL)?;
    println!("Shared venue channel set to {VENUE_POST_CHANNEL}");

    println!("\nSelf-service signup");
    let submitted = venues.self_service_signup(
        "The Gilded Lily",
        DEMO_OWNER,
        [Some(UserId(402)), None, None],
        true,
    )?;
    println!(
        "- Received '{}' with {} authorized users -> awaiting approval",
        submitted.name,
        submitted.authorized_users.len()
    );

    match venues.post_venue("The Gilded Lily", DEMO_OWNER) {
        Err(err) => println!("- Posting before approval is refused: {err}"),
        Ok(outcome) => println!("- Unexpected post outcome: {}", outcome.label()),
    }

    venues.approve("The Gilded Lily")?;
    let outcome = venues.post_venue("The Gilded Lily", DEMO_OWNER)?;
    println!("- Approved and {} to the shared channel", outcome.label());

    println!("\nDirectory import");
    let imported = venues.import_from_external("Neon Lotus", DEMO_OWNER, &directory)?;
    println!(
        "- Imported '{}' ({} authorized users, hiring: {})",
        imported.name,
        imported.authorized_users.len(),
        imported.hiring
    );
    let outcome = venues.post_venue("Neon Lotus", DEMO_OWNER)?;
    println!("- Profile card {}", outcome.label());

    if !skip_jobs {
        println!("\nJob posting walkthrough");
        let mut jobs =
            JobPostingRegistry::new(Arc::new(InMemoryPostingStore::default()), gateway.clone());
        let channels = PostingChannels {
            temporary: Some(TEMP_JOBS_CHANNEL),
            permanent: Some(PERM_JOBS_CHANNEL),
        };

        let draft = jobs.create(imported.id.clone(), DEMO_OWNER)?;
        println!("- Drafted posting {} (complete: {})", draft.id, draft.complete);

        match jobs.publish(&draft.id, &imported.name, channels) {
            Err(err) => println!("- Publishing the bare draft is refused: {err}"),
            Ok(outcome) => println!("- Unexpected publish outcome: {}", outcome.label()),
        }

        jobs.set_position(&draft.id, "Bartender".to_string())?;
        jobs.set_kind(&draft.id, PostingKind::Temporary)?;
        jobs.set_pay_rate(
            &draft.id,
            PayRate {
                amount: Some(120_000),
                frequency: Some(RateFrequency::PerShift),
                details: Some("Tips shared at close".to_string()),
            },
        )?;
        jobs.set_description(&draft.id, "Mix drinks for the weekend crowd.".to_string())?;
        jobs.set_start(&draft.id, Some(Utc::now() + Duration::days(3)))?;

        let outcome = jobs.publish(&draft.id, &imported.name, channels)?;
        println!(
            "- Completed and {} to the {} listings channel",
            outcome.label(),
            PostingKind::Temporary.label()
        );

        if let Some(posting) = jobs.get(&draft.id) {
            match serde_json::to_string_pretty(&posting.to_view()) {
                Ok(json) => println!("  Posting payload:\n{json}"),
                Err(err) => println!("  Posting payload unavailable: {err}"),
            }
        }

        jobs.set_description(
            &draft.id,
            "Mix drinks for the weekend crowd; cocktail menu experience preferred.".to_string(),
        )?;
        let outcome = jobs.publish(&draft.id, &imported.name, channels)?;
        println!("- Amended description {} in place", outcome.label());

        jobs.delete(&draft.id)?;
        println!("- Posting deleted and its listing retracted");
    }

    if report {
        println!("\nCatalog report");
        render_catalog_report(&venues.build_report(), false);
    }

    println!(
        "\nDelivered messages: {} sent, {} edited, {} deleted",
        gateway.sent().len(),
        gateway.edits(),
        gateway.deletions()
    );
    println!("Audit trail:");
    for event in audit.events() {
        println!("  - {} ({})", event.label(), event.venue());
    }

    Ok(())
}

fn sample_registry() -> Result<VenueRegistry, AppError> {
    let mut venues = VenueRegistry::new(
        Arc::new(InMemoryVenueStore::default()),
        Arc::new(StaticMemberDirectory),
        Arc::new(RecordingMessageGateway::default()),
        Arc::new(RecordingAuditLog::default()),
    );

    venues.create("The Gilded Lily", UserId(401))?;
    venues.create("Aurora Hall", UserId(402))?;
    venues.create("Blue Harbor", UserId(403))?;
    venues.create("Xanadu", UserId(404))?;
    venues.create("Yeti's Den", UserId(405))?;
    venues.create("Zebra Club", UserId(406))?;
    venues.authorize("Aurora Hall", UserId(407), UserId(402), false)?;
    venues.self_service_signup("Quiet Corner", UserId(408), [Some(UserId(409)), None, None], true)?;

    Ok(venues)
}

fn render_catalog_report(buckets: &[ReportBucket], list_users: bool) {
    if buckets.is_empty() {
        println!("No venues registered");
        return;
    }

    for bucket in buckets {
        println!("\n[{}]", bucket.label);
        for (number, page) in bucket.pages.iter().enumerate() {
            if bucket.pages.len() > 1 {
                println!("  Page {}/{}", number + 1, bucket.pages.len());
            }
            for entry in &page.entries {
                let annotation = if entry.pending {
                    " (pending approval)"
                } else {
                    ""
                };
                println!("  - {}{}", entry.name, annotation);
                if list_users {
                    let users: Vec<String> = entry
                        .authorized_users
                        .iter()
                        .map(|user| user.to_string())
                        .collect();
                    println!("    authorized: {}", users.join(", "));
                }
            }
        }
    }
}
