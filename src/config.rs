#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub generation_url: String,
    pub archive_url: String,
    pub sheets_api_base: String,
    pub spreadsheet_id: String,
    pub sheets_api_key: String,
    pub settings_worksheet: String,
    pub submissions_worksheet: String,
    pub upstream_timeout_secs: u64,
    pub static_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        dotenvy::dotenv().ok();

        let spreadsheet_id = std::env::var("SHEETS_SPREADSHEET_ID")
            .map_err(|_| "SHEETS_SPREADSHEET_ID must be set")?;
        let sheets_api_key =
            std::env::var("SHEETS_API_KEY").map_err(|_| "SHEETS_API_KEY must be set")?;

        let generation_url = std::env::var("GENERATION_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:5000/generate-letter".to_string());
        let archive_url = std::env::var("ARCHIVE_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:5000/archive-letter".to_string());
        let sheets_api_base = std::env::var("SHEETS_API_BASE")
            .unwrap_or_else(|_| "https://sheets.googleapis.com".to_string());

        let settings_worksheet =
            std::env::var("SETTINGS_WORKSHEET").unwrap_or_else(|_| "Settings".to_string());
        let submissions_worksheet =
            std::env::var("SUBMISSIONS_WORKSHEET").unwrap_or_else(|_| "Submissions".to_string());

        let upstream_timeout_secs: u64 = std::env::var("UPSTREAM_TIMEOUT_SECS")
            .unwrap_or_else(|_| "120".to_string())
            .parse()
            .unwrap_or(120);

        let static_dir = std::env::var("STATIC_DIR")
            .unwrap_or_else(|_| concat!(env!("CARGO_MANIFEST_DIR"), "/static").to_string());

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .unwrap_or(3000);

        Ok(Self {
            host,
            port,
            generation_url,
            archive_url,
            sheets_api_base,
            spreadsheet_id,
            sheets_api_key,
            settings_worksheet,
            submissions_worksheet,
            upstream_timeout_secs,
            static_dir,
        })
    }
}
