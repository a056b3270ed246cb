use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    _child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick unused ports for isolation; nothing listens on the database port,
        // so the server runs degraded and every request that needs storage fails
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let dead_db_port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_budget-planner"));
        cmd.arg("serve")
            .env("APP_ENV", "development")
            .env("MBP_HOST", "127.0.0.1")
            .env("MBP_PORT", port.to_string())
            .env("JWT_SECRET", "integration-test-secret")
            .env_remove("DATABASE_URL")
            .env("MBP_PG_HOST", "127.0.0.1")
            .env("MBP_PG_PORT", dead_db_port.to_string())
            .env("MBP_PG_CONNECT_TIMEOUT", "1")
            .env("MBP_PG_QUERY_TIMEOUT", "2")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self {
            port,
            base_url,
            _child: child,
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

pub fn url(server: &TestServer, path: &str) -> String {
    format!("{}{}", server.base_url, path)
}
