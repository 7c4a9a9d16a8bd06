use anyhow::Result;
use clap::Args;
use jobtrack_core::document::{NewCoverLetter, NewResume};

use super::{print_json, Runtime};

#[derive(Args)]
pub struct DocumentArgs {
    name: String,
    /// Name of the underlying file
    #[arg(long, default_value = "")]
    file: String,
    /// Tag, repeatable
    #[arg(long = "tag")]
    tags: Vec<String>,
    /// Mark a resume as the default one (ignored for cover letters)
    #[arg(long)]
    default: bool,
}

pub async fn add_resume(runtime: &Runtime, args: DocumentArgs) -> Result<()> {
    let mut input = NewResume::new(args.name);
    input.file_name = args.file;
    input.tags = args.tags;
    input.is_default = args.default;
    let resume = runtime.store.add_resume(input).await;
    print_json(&resume)
}

pub async fn list_resumes(runtime: &Runtime) -> Result<()> {
    print_json(&runtime.store.resumes().await)
}

pub async fn add_cover_letter(runtime: &Runtime, args: DocumentArgs) -> Result<()> {
    let mut input = NewCoverLetter::new(args.name);
    input.file_name = args.file;
    input.tags = args.tags;
    let cover_letter = runtime.store.add_cover_letter(input).await;
    print_json(&cover_letter)
}

pub async fn list_cover_letters(runtime: &Runtime) -> Result<()> {
    print_json(&runtime.store.cover_letters().await)
}
