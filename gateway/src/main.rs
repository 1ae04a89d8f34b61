#[tokio::main]
async fn main() -> std::process::ExitCode {
    match lostfound_gateway::run_with_config().await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "lostfound exited with an error");
            std::process::ExitCode::FAILURE
        }
    }
}
