/// Connection details for one obs-websocket endpoint
#[derive(Debug, Clone)]
pub struct ObsEndpoint {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
}

impl Default for ObsEndpoint {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 4455,
            password: None,
        }
    }
}
