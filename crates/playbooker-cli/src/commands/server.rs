//! `playbooker server` — Start the Playbooker HTTP backend server.

use playbooker_core::config::AgentEndpoints;

pub async fn run(host: String, port: u16, endpoints: AgentEndpoints) -> Result<(), String> {
    let config = playbooker_server::ServerConfig {
        host: host.clone(),
        port,
        endpoints,
    };

    println!("Starting Playbooker server on {}:{}...", host, port);

    let addr = playbooker_server::start_server(config).await?;
    println!("Playbooker server listening on http://{}", addr);

    // Keep the process running until interrupted
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| format!("Failed to listen for Ctrl+C: {}", e))?;

    println!("\nShutting down...");
    Ok(())
}
