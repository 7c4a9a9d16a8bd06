use anyhow::Result;

use super::Runtime;

pub async fn login(runtime: &Runtime, email: &str, password: &str) -> Result<()> {
    let auth = runtime.rest_auth()?;
    let handled = runtime.monitor.status().events_handled;
    let user = auth.sign_in_with_password(email, password).await?;
    runtime.monitor.wait_for_events(handled + 1).await?;

    let state = runtime.store.snapshot().await;
    println!(
        "✅ Signed in as {} ({} applications, {} resumes, {} cover letters)",
        user.email.as_deref().unwrap_or(&user.user_id),
        state.applications.len(),
        state.resumes.len(),
        state.cover_letters.len()
    );
    Ok(())
}

pub async fn logout(runtime: &Runtime) -> Result<()> {
    let auth = runtime.rest_auth()?;
    let handled = runtime.monitor.status().events_handled;
    auth.sign_out().await?;
    runtime.monitor.wait_for_events(handled + 1).await?;
    println!("Signed out, using local data");
    Ok(())
}
