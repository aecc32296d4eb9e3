use std::{env, env::VarError};

/// There's no real CLI for the server, so just do quick 'n dirty
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        // We don't expect any CLI args, so always print the help
        display_readme();
        display_envs();
    }
    has_cli_args
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    // EATS_JWT_SECRET and the Stripe keys are deliberately left out
    const DISPLAY_ENVS: [&str; 12] = [
        "RUST_LOG",
        "EATS_HOST",
        "EATS_PORT",
        "EATS_DATABASE_URL",
        "EATS_JWT_EXPIRY_HOURS",
        "EATS_ADMIN_EMAILS",
        "EATS_CORS_ORIGIN",
        "EATS_SECURE_COOKIES",
        "EATS_FRONTEND_URL",
        "EATS_CURRENCY",
        "EATS_STRIPE_API_URL",
        "EATS_STRIPE_ALLOWED_COUNTRIES",
    ];

    println!("Current environment values (EXCLUDING variables that contain secrets):");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
