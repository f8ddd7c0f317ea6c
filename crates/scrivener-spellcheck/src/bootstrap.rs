//! Fetching dictionary resources.

use futures_util::future::try_join;
use reqwest::Url;

use crate::config::SpellCheckConfig;
use crate::dictionary::DictionaryData;
use crate::error::SpellCheckError;

/// Fetch the affix and word-list resources named in `config`.
///
/// Relative locations are resolved against `base` (the page origin on the
/// web). Both requests run concurrently; either failing fails the whole
/// bootstrap, and the caller leaves the checker uninitialized.
pub async fn fetch_dictionary(
    client: &reqwest::Client,
    base: &Url,
    config: &SpellCheckConfig,
) -> Result<DictionaryData, SpellCheckError> {
    let aff_url = resolve(base, &config.affix_url)?;
    let dic_url = resolve(base, &config.dictionary_url)?;
    tracing::debug!(target: "scrivener::spellcheck", %aff_url, %dic_url, "fetching dictionary");

    let (aff, dic) = try_join(fetch_text(client, aff_url), fetch_text(client, dic_url)).await?;
    Ok(DictionaryData::new(aff, dic))
}

fn resolve(base: &Url, location: &str) -> Result<Url, SpellCheckError> {
    base.join(location).map_err(|e| SpellCheckError::Fetch {
        url: location.to_string(),
        message: e.to_string(),
    })
}

async fn fetch_text(client: &reqwest::Client, url: Url) -> Result<String, SpellCheckError> {
    let fetch_err = |e: reqwest::Error| SpellCheckError::Fetch {
        url: url.to_string(),
        message: e.to_string(),
    };
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(fetch_err)?
        .error_for_status()
        .map_err(fetch_err)?;
    response.text().await.map_err(fetch_err)
}
