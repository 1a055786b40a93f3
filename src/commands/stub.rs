use anyhow::{Context, Result};
use clap::Args;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::stub;

#[derive(Args)]
pub struct StubCommand {
    /// Address to bind (defaults to stub.host)
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (defaults to stub.port)
    #[arg(short, long)]
    port: Option<u16>,
}

impl StubCommand {
    pub async fn execute(self, config: Config) -> Result<()> {
        let mut stub_config = config.stub;
        if let Some(host) = self.host {
            stub_config.host = host;
        }
        if let Some(port) = self.port {
            stub_config.port = port;
        }

        let addr = format!("{}:{}", stub_config.host, stub_config.port);
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;

        println!("Point the harness at it with --base-url http://{}", addr);

        stub::serve(listener, &stub_config).await
    }
}
