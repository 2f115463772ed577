use clap::Args;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Settings for the HTTP server; every flag can also come from the environment
#[derive(Args, Debug, Clone)]
pub struct ServeConfig {
    /// CSV dataset loaded at startup
    #[arg(long = "data", env = "DATA_FILE_PATH", default_value = "data/zomato.csv")]
    pub data_path: PathBuf,

    /// Address to listen on
    #[arg(long = "bind", env = "BIND_ADDR", default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,

    /// How long aggregation results stay cached
    #[arg(long = "cache-ttl-secs", env = "CACHE_TTL_SECS", default_value_t = 300)]
    pub cache_ttl_secs: u64,
}

impl ServeConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        config: ServeConfig,
    }

    #[test]
    fn test_flags_override_defaults() {
        let harness = Harness::parse_from([
            "serve",
            "--data",
            "test/restaurants.csv",
            "--bind",
            "0.0.0.0:8080",
            "--cache-ttl-secs",
            "5",
        ]);
        assert_eq!(harness.config.data_path, PathBuf::from("test/restaurants.csv"));
        assert_eq!(harness.config.bind.port(), 8080);
        assert_eq!(harness.config.cache_ttl(), Duration::from_secs(5));
    }

    #[test]
    fn test_rejects_bad_bind_address() {
        assert!(Harness::try_parse_from(["serve", "--bind", "not-an-address"]).is_err());
    }
}
