use clap::Parser;

/// Serve the folders of a MiniDLNA (UPnP ContentDirectory) server as a web page
#[derive(Parser, Debug)]
#[command(name = "webdlna", author, version, about, long_about = None)]
pub struct Args {
    /// Address to listen on (e.g. 127.0.0.1:8080); defaults to the configured one
    #[arg(value_name = "LISTEN_ADDR")]
    pub listen_addr: Option<String>,

    /// MiniDLNA server address
    #[arg(long = "minidlna", value_name = "URL")]
    pub minidlna: Option<String>,

    /// Configuration directory (config.yaml)
    #[arg(long = "config", value_name = "DIR")]
    pub config_dir: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_listen_addr() {
        let args = Args::parse_from(["webdlna", "--minidlna", "http://nas:8200", "0.0.0.0:9000"]);
        assert_eq!(args.listen_addr.as_deref(), Some("0.0.0.0:9000"));
        assert_eq!(args.minidlna.as_deref(), Some("http://nas:8200"));
        assert!(args.config_dir.is_none());
    }

    #[test]
    fn test_everything_optional() {
        let args = Args::parse_from(["webdlna"]);
        assert!(args.listen_addr.is_none());
        assert!(args.minidlna.is_none());
    }
}
