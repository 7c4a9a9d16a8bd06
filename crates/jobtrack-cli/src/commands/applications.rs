use anyhow::{bail, Result};
use clap::{Args, ValueEnum};
use jobtrack_core::application::{ApplicationPatch, ApplicationStatus, NewApplication, Priority};
use jobtrack_core::insights::ApplicationFilter;

use super::{parse_priority, parse_status, print_json, Runtime};

#[derive(Args)]
pub struct ListArgs {
    #[arg(long, value_parser = parse_status)]
    status: Option<ApplicationStatus>,
    #[arg(long, value_parser = parse_priority)]
    priority: Option<Priority>,
    /// Case-insensitive match on company, position, location and tags
    #[arg(long)]
    search: Option<String>,
}

/// Optional application fields shared by `add` and `update`.
#[derive(Args, Default)]
pub struct ApplicationFields {
    #[arg(long, value_parser = parse_priority)]
    priority: Option<Priority>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    url: Option<String>,
    /// Date applied (YYYY-MM-DD)
    #[arg(long)]
    applied: Option<String>,
    /// Resume id
    #[arg(long)]
    resume: Option<String>,
    /// Cover letter id
    #[arg(long)]
    cover_letter: Option<String>,
    #[arg(long)]
    notes: Option<String>,
    #[arg(long)]
    salary: Option<String>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    contact_person: Option<String>,
    #[arg(long)]
    contact_email: Option<String>,
    /// Interview date and time (YYYY-MM-DDTHH:MM)
    #[arg(long)]
    interview: Option<String>,
    /// Follow-up date (YYYY-MM-DD)
    #[arg(long)]
    follow_up: Option<String>,
    /// Tag, repeatable
    #[arg(long = "tag")]
    tags: Vec<String>,
}

#[derive(Args)]
pub struct AddArgs {
    company: String,
    position: String,
    #[arg(long, value_parser = parse_status, default_value = "interested")]
    status: ApplicationStatus,
    #[command(flatten)]
    fields: ApplicationFields,
}

/// Fields `update --clear` can reset.
#[derive(Clone, Copy, ValueEnum)]
pub enum ClearableField {
    Url,
    Applied,
    Resume,
    CoverLetter,
    Salary,
    Location,
    ContactPerson,
    ContactEmail,
    Interview,
    FollowUp,
    Tags,
}

#[derive(Args)]
pub struct UpdateArgs {
    id: String,
    #[arg(long)]
    company: Option<String>,
    #[arg(long)]
    position: Option<String>,
    #[arg(long, value_parser = parse_status)]
    status: Option<ApplicationStatus>,
    #[command(flatten)]
    fields: ApplicationFields,
    /// Reset a field, repeatable
    #[arg(long, value_enum)]
    clear: Vec<ClearableField>,
}

pub async fn list(runtime: &Runtime, args: ListArgs) -> Result<()> {
    let filter = ApplicationFilter {
        search: args.search,
        status: args.status,
        priority: args.priority,
    };
    let applications = runtime.store.applications().await;
    print_json(&filter.apply(&applications))
}

pub async fn add(runtime: &Runtime, args: AddArgs) -> Result<()> {
    let fields = args.fields;
    let mut input = NewApplication::new(args.company, args.position, args.status);
    input.priority = fields.priority.unwrap_or_default();
    input.job_description = fields.description.unwrap_or_default();
    input.notes = fields.notes.unwrap_or_default();
    input.job_url = fields.url;
    input.date_applied = fields.applied;
    input.resume_used = fields.resume;
    input.cover_letter_used = fields.cover_letter;
    input.salary = fields.salary;
    input.location = fields.location;
    input.contact_person = fields.contact_person;
    input.contact_email = fields.contact_email;
    input.interview_date = fields.interview;
    input.follow_up_date = fields.follow_up;
    input.tags = fields.tags;

    let application = runtime.store.add_application(input).await;
    print_json(&application)
}

pub async fn set_status(runtime: &Runtime, id: &str, status: ApplicationStatus) -> Result<()> {
    match runtime
        .store
        .update_application(id, ApplicationPatch::status(status))
        .await
    {
        Some(application) => print_json(&application),
        None => bail!("No application with id {}", id),
    }
}

pub async fn update(runtime: &Runtime, args: UpdateArgs) -> Result<()> {
    let patch = build_patch(&args);
    if patch.is_empty() {
        bail!("Nothing to update");
    }
    match runtime.store.update_application(&args.id, patch).await {
        Some(application) => print_json(&application),
        None => bail!("No application with id {}", args.id),
    }
}

pub async fn delete(runtime: &Runtime, id: &str) -> Result<()> {
    if !runtime.store.delete_application(id).await {
        bail!("No application with id {}", id);
    }
    println!("Deleted {}", id);
    Ok(())
}

fn build_patch(args: &UpdateArgs) -> ApplicationPatch {
    let fields = &args.fields;
    let mut patch = ApplicationPatch {
        company_name: args.company.clone(),
        position: args.position.clone(),
        status: args.status,
        priority: fields.priority,
        job_description: fields.description.clone(),
        notes: fields.notes.clone(),
        job_url: fields.url.clone().map(Some),
        date_applied: fields.applied.clone().map(Some),
        resume_used: fields.resume.clone().map(Some),
        cover_letter_used: fields.cover_letter.clone().map(Some),
        salary: fields.salary.clone().map(Some),
        location: fields.location.clone().map(Some),
        contact_person: fields.contact_person.clone().map(Some),
        contact_email: fields.contact_email.clone().map(Some),
        interview_date: fields.interview.clone().map(Some),
        follow_up_date: fields.follow_up.clone().map(Some),
        tags: (!fields.tags.is_empty()).then(|| fields.tags.clone()),
    };

    for field in &args.clear {
        match field {
            ClearableField::Url => patch.job_url = Some(None),
            ClearableField::Applied => patch.date_applied = Some(None),
            ClearableField::Resume => patch.resume_used = Some(None),
            ClearableField::CoverLetter => patch.cover_letter_used = Some(None),
            ClearableField::Salary => patch.salary = Some(None),
            ClearableField::Location => patch.location = Some(None),
            ClearableField::ContactPerson => patch.contact_person = Some(None),
            ClearableField::ContactEmail => patch.contact_email = Some(None),
            ClearableField::Interview => patch.interview_date = Some(None),
            ClearableField::FollowUp => patch.follow_up_date = Some(None),
            ClearableField::Tags => patch.tags = Some(Vec::new()),
        }
    }
    patch
}
