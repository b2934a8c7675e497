use crate::client::TranslationClient;

pub struct ServiceState {
    pub client: TranslationClient,
    pub default_dest: String,
    pub default_src: String,
}
