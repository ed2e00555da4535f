use clap::{Arg, Command}; // Import necessary modules from clap for command-line argument parsing

use techstore_reset::account::password::Password;
use techstore_reset::account::user::User;
use techstore_reset::notify::smtp::{SecureEmailManager, SmtpSender};
use techstore_reset::notify::NotificationSender;
use techstore_reset::reset::resetter::{PasswordResetter, ResendPolicy, ResetError};
use techstore_reset::reset::tokens::generate_reset_token;
use techstore_reset::utils::io::{prompt_with_confirmation, read_line};
use techstore_reset::utils::logging::initialize_logging;
use techstore_reset::utils::time::{format_duration, format_timestamp};

/// Interactive setup of SMTP credentials, stored in the system keyring
fn setup_email_credentials() -> Result<(), String> {
    println!("=== Email Configuration Setup ===");

    // Get and validate SMTP server
    let host = loop {
        println!("Enter SMTP server address (e.g., smtp.gmail.com):");
        let input = read_line().map_err(|e| format!("Failed to read input: {}", e))?;
        let input = input.trim();

        if input.is_empty() {
            println!("SMTP server cannot be empty. Please try again.");
            continue;
        }

        // Basic domain validation
        if !input.contains('.') || input.contains(' ') {
            println!("Invalid SMTP server format. Please enter a valid domain.");
            continue;
        }

        break input.to_string();
    };

    // Get and validate SMTP port
    let port = loop {
        println!("Enter SMTP port (default: 587):");
        let input = read_line().map_err(|e| format!("Failed to read input: {}", e))?;
        let input = input.trim();

        if input.is_empty() {
            break 587; // Default port
        }

        match input.parse::<u16>() {
            Ok(p) if p > 0 => break p,
            _ => println!("Invalid port number. Please enter a value between 1 and 65535."),
        }
    };

    println!("Enter SMTP username (email address):");
    let username = read_line().map_err(|e| format!("Failed to read input: {}", e))?;

    println!("Enter SMTP password (input hidden):");
    let password = rpassword::read_password().map_err(|e| format!("Failed to read password: {}", e))?;

    let manager = SecureEmailManager::new()?;
    manager.store_credentials(&username, &password, &host, port)?;
    println!("Email credentials stored securely.");

    // Offer a test delivery to confirm the configuration works
    if prompt_with_confirmation(
        "Credentials saved.",
        "Send a test email to verify the configuration?",
    )
    .map_err(|e| format!("Failed to read input: {}", e))?
    {
        let sender = SmtpSender::new("TechStore - Test Email");
        sender.send(
            &username,
            "This is a test email confirming your SMTP configuration works.",
        )?;
        println!("Test email sent to {}.", username);
    }

    Ok(())
}

/// Dispatch a reset email for the given user details
fn send_reset(id: u64, email: &str, telephone: &str) -> Result<(), String> {
    // The reset flow never needs the account's current credential; an
    // unguessable placeholder satisfies the entity without prompting
    // for a secret
    let placeholder = Password::new(&generate_reset_token());
    let user = User::new(id, email, telephone, placeholder)
        .map_err(|e| format!("Invalid user details: {:?}", e))?;

    // Each invocation runs a fresh process with no outstanding-token
    // state, so reissuing is the only policy that makes sense here
    let sender = SmtpSender::new("TechStore - Password Reset");
    let mut resetter = PasswordResetter::new(&sender, ResendPolicy::ReissueAlways);

    match resetter.reset(&user) {
        Ok(token) => {
            println!(
                "Reset email sent to {} (token expires at {}).",
                user.email(),
                format_timestamp(token.expires_at)
            );
            Ok(())
        }
        Err(ResetError::RateLimited(retry_after)) => Err(format!(
            "Too many reset requests for this address. Try again in {}.",
            format_duration(retry_after)
        )),
        Err(ResetError::Delivery(reason)) => Err(format!("Delivery failed: {}", reason)),
        Err(other) => Err(format!("Reset failed: {:?}", other)),
    }
}

fn main() {
    // Set up logging before anything else so all events are captured
    if let Err(e) = initialize_logging() {
        eprintln!("Warning: failed to initialize logging: {}", e);
    }

    // Define the command-line interface using clap
    let matches = Command::new("techstore-reset")
        .about("Password reset flow for TechStore accounts")
        .subcommand(Command::new("setup-email").about("Configure SMTP credentials for reset emails"))
        .subcommand(
            Command::new("send-reset")
                .about("Send a password reset email to a user")
                .arg(Arg::new("id").help("The user's numeric id").required(true))
                .arg(
                    Arg::new("email")
                        .help("The user's email address")
                        .required(true),
                )
                .arg(
                    Arg::new("telephone")
                        .help("The user's telephone number")
                        .required(true),
                ),
        )
        .get_matches();

    // Handle the "setup-email" subcommand
    if matches.subcommand_matches("setup-email").is_some() {
        if let Err(e) = setup_email_credentials() {
            eprintln!("Email setup failed: {}", e);
            std::process::exit(1);
        }
    }

    // Handle the "send-reset" subcommand
    if let Some(sub_matches) = matches.subcommand_matches("send-reset") {
        let id = match sub_matches.get_one::<String>("id").unwrap().parse::<u64>() {
            Ok(id) => id,
            Err(_) => {
                eprintln!("Invalid user id: must be a number");
                std::process::exit(1);
            }
        };
        let email = sub_matches.get_one::<String>("email").unwrap();
        let telephone = sub_matches.get_one::<String>("telephone").unwrap();

        if let Err(e) = send_reset(id, email, telephone) {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
