use super::*;

impl Default for ChargerConfig {
    fn default() -> Self {
        Self {
            host: "192.168.1.100".to_string(),
            username: "admin".to_string(),
            password: String::new(),
            scheme: "https".to_string(),
            socket: 1,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 10_000,
            pool_idle_timeout_ms: 30_000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            file: "/tmp/alfen-bridge.log".to_string(),
            backup_count: 5,
            console_output: true,
            json_format: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            charger: ChargerConfig::default(),
            http: HttpConfig::default(),
            poll_interval_secs: 30,
            logging: LoggingConfig::default(),
        }
    }
}
