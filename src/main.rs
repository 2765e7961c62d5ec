/*
 * Responsibility
 * - tokio runtime 起動
 * - app::run() の呼び出しと exit code への変換 (ロジックは置かない)
 */
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match forward_auth::app::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(reason = %err, "failed to start");
            ExitCode::from(err.exit_code())
        }
    }
}
