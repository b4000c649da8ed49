/// Skip a test if gcloud is not authenticated or no test project is set.
#[macro_export]
macro_rules! skip_without_gcp {
    () => {
        if std::process::Command::new("gcloud")
            .args(["auth", "print-access-token"])
            .output()
            .map(|o| !o.status.success())
            .unwrap_or(true)
        {
            eprintln!("SKIPPED: gcloud not authenticated");
            return;
        }
        if std::env::var("KLOAK_TEST_GCP_PROJECT").is_err() {
            eprintln!("SKIPPED: KLOAK_TEST_GCP_PROJECT not set (set to a project with Secret Manager enabled)");
            return;
        }
    };
}
