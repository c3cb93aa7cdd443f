use crate::config::Config;
use crate::ids::ArchiveIds;
use crate::sheets::SheetsClient;
use crate::upstream::LetterService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sheets: SheetsClient,
    pub letters: LetterService,
    pub archive_ids: Arc<ArchiveIds>,
}

impl AppState {
    pub fn new(config: Arc<Config>) -> Result<Self, reqwest::Error> {
        let client = crate::upstream::http_client(&config)?;
        Ok(Self {
            sheets: SheetsClient::new(client.clone(), &config),
            letters: LetterService::new(client, &config),
            archive_ids: Arc::new(ArchiveIds::new()),
            config,
        })
    }
}
