use std::sync::Arc;

use bsky_session::config::{load_config, print_schema};
use bsky_session::routes::wait_for_callback;
use bsky_session::startup;
use bsky_session::utils::logger::init_logging;
use tracing::error;

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|arg| arg == "--schema") {
        print_schema();
        return;
    }

    let config = Arc::new(load_config());
    init_logging(&config.logging);

    let state = startup::run(config).await;

    if let Some(agent) = state.sessions.agent().await {
        println!("Signed in as {}", agent.did().as_str());
        return;
    }

    let Some(handle) = args.first() else {
        println!("Signed out. Pass an account handle to start the sign-in flow.");
        return;
    };

    match state.sessions.generate_sign_in_url(handle).await {
        Ok(Some(url)) => {
            println!("Open this URL in your browser to sign in:");
            println!("{}", url);
            if let Err(e) = wait_for_callback(state.clone()).await {
                error!("Sign-in did not complete: {}", e);
                std::process::exit(1);
            }
            match state.sessions.agent().await {
                Some(agent) => println!("Signed in as {}", agent.did().as_str()),
                None => error!("Callback completed but no session was installed"),
            }
        }
        Ok(None) => {
            error!("The OAuth client is not ready; see the startup logs.");
            std::process::exit(1);
        }
        Err(e) => {
            error!("Failed to generate a sign-in URL: {}", e);
            std::process::exit(1);
        }
    }
}
