use crate::config::{
    self, Settings, DEFAULT_LISTEN, DEFAULT_NAMESPACE, DEFAULT_PROBE_URL,
    DEFAULT_PROVIDER_ADDRESS,
};
use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "gitops-harness")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "HTTP test harness that installs and removes Flux resources on demand", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, env = "HARNESS_LISTEN", default_value = DEFAULT_LISTEN, help = "Address the HTTP server binds to")]
    pub listen: SocketAddr,

    #[arg(long, env = "HARNESS_NAMESPACE", default_value = DEFAULT_NAMESPACE, help = "Namespace the test resources live in")]
    pub namespace: String,

    #[arg(long, env = "HARNESS_PROBE_URL", default_value = DEFAULT_PROBE_URL, help = "Peer URL hit by /test")]
    pub probe_url: String,

    #[arg(long, env = "HARNESS_PROVIDER_ADDRESS", default_value = DEFAULT_PROVIDER_ADDRESS, help = "Webhook address of the notification provider")]
    pub provider_address: String,

    #[arg(long, env = "HARNESS_KUBE_TIMEOUT", default_value = "60s", value_parser = config::parse_duration, help = "Deadline for each Kubernetes operation (e.g. 30s, 1m)")]
    pub kube_timeout: Duration,

    #[arg(long, env = "HARNESS_PROBE_TIMEOUT", default_value = "10s", value_parser = config::parse_duration, help = "Timeout for the /test peer probe")]
    pub probe_timeout: Duration,
}

impl From<Cli> for Settings {
    fn from(cli: Cli) -> Self {
        Self {
            listen: cli.listen,
            namespace: cli.namespace,
            probe_url: cli.probe_url,
            provider_address: cli.provider_address,
            kube_timeout: cli.kube_timeout,
            probe_timeout: cli.probe_timeout,
        }
    }
}
