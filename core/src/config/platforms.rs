use crate::lti::PlatformSpec;

/// Parses `name,url,clientId,authEndpoint,tokenEndpoint,jwksKey;...`.
///
/// Empty items between semicolons are dropped. Short tuples are kept with the
/// trailing fields blank so the registry can report and skip them.
pub fn parse_platforms(raw: &str) -> Vec<PlatformSpec> {
    raw.split(';')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(parse_tuple)
        .collect()
}

fn parse_tuple(item: &str) -> PlatformSpec {
    let mut fields = item.split(',').map(|f| f.trim().to_string());
    let mut next = || fields.next().unwrap_or_default();
    PlatformSpec {
        name: next(),
        url: next(),
        client_id: next(),
        authentication_endpoint: next(),
        access_token_endpoint: next(),
        jwks_key: next(),
    }
}
