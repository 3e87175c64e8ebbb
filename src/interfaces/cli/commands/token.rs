//! Token command - issue an admin bearer token

use colored::Colorize;

use crate::api::jwt::JwtService;
use crate::interfaces::cli::CliError;

/// Print an admin JWT signed with `auth.jwt_secret`
pub fn print_token() -> Result<(), CliError> {
    let config = crate::config::get_config();
    let secret = config.auth.jwt_secret.trim();
    if secret.is_empty() {
        return Err(CliError::CommandError(
            "auth.jwt_secret is not configured (set it in config.toml or TL__AUTH__JWT_SECRET)"
                .to_string(),
        ));
    }

    let service = JwtService::new(secret, config.auth.token_minutes);
    let token = service
        .generate_admin_token()
        .map_err(|e| CliError::CommandError(format!("Failed to sign token: {}", e)))?;

    eprintln!(
        "{} {}",
        "Admin token valid for".green(),
        format!("{} minutes", service.token_minutes()).cyan()
    );
    println!("{}", token);
    Ok(())
}
