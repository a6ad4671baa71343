use crate::config::Config;
use crate::database::Repositories;
use crate::services::address_lookup::AddressLookupService;
use crate::services::summarizer::SummarizerService;

#[derive(Clone)]
pub struct AppState {
    pub repos: Repositories,
    pub config: Config,
    pub summarizer: SummarizerService,
    pub address_lookup: AddressLookupService,
}

impl AppState {
    pub fn new(config: Config, repos: Repositories) -> Self {
        let summarizer = SummarizerService::new(config.summarizer_url.clone());
        let address_lookup = AddressLookupService::new(config.effective_address_api_url());
        Self {
            repos,
            config,
            summarizer,
            address_lookup,
        }
    }
}
