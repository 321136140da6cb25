//! Resolution of the `preprocessed_image` reference returned by the service.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use shared::error::PredictError;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewSource {
    Inline(Vec<u8>),
    Remote(Url),
}

/// Turns a reference into bytes to decode or a URL to fetch. Relative
/// references resolve under the path of `api_base`.
pub fn resolve_preview_reference(
    api_base: &Url,
    reference: &str,
) -> Result<PreviewSource, PredictError> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err(PredictError::decode("empty preprocessed image reference"));
    }

    if reference
        .get(..5)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
    {
        return decode_data_uri(reference).map(PreviewSource::Inline);
    }

    let url = match Url::parse(reference) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => under_api_base(api_base, reference)?,
        Err(err) => {
            return Err(PredictError::decode(format!(
                "invalid preprocessed image reference '{reference}': {err}"
            )));
        }
    };
    if !matches!(url.scheme(), "http" | "https") {
        return Err(PredictError::decode(format!(
            "unsupported preprocessed image scheme '{}'",
            url.scheme()
        )));
    }
    Ok(PreviewSource::Remote(url))
}

/// Relative references live under the base path, the same way the predict
/// endpoint is `{api_base}{predict_path}`.
fn under_api_base(api_base: &Url, reference: &str) -> Result<Url, PredictError> {
    let mut base = api_base.clone();
    if !base.path().ends_with('/') {
        let dir = format!("{}/", base.path());
        base.set_path(&dir);
    }
    base.join(reference.trim_start_matches('/')).map_err(|err| {
        PredictError::decode(format!(
            "invalid preprocessed image reference '{reference}': {err}"
        ))
    })
}

fn decode_data_uri(uri: &str) -> Result<Vec<u8>, PredictError> {
    let (header, payload) = uri[5..]
        .split_once(',')
        .ok_or_else(|| PredictError::decode("malformed data URI: missing ','"))?;
    if !header.to_ascii_lowercase().ends_with(";base64") {
        return Err(PredictError::decode(
            "unsupported data URI: only base64 payloads are accepted",
        ));
    }
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD
        .decode(compact)
        .map_err(|err| PredictError::decode(format!("invalid base64 in data URI: {err}")))
}
