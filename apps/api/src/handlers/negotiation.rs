use axum::http::HeaderMap;
use axum::http::header::ACCEPT;

/// Returns whether the `Accept` header ranks XML above JSON.
///
/// JSON wins ties and is the default when no header is sent.
pub fn prefers_xml(headers: &HeaderMap) -> bool {
    let mut xml_quality: Option<f32> = None;
    let mut json_quality: Option<f32> = None;
    let mut wildcard_quality: Option<f32> = None;

    for value in headers.get_all(ACCEPT).iter() {
        let Ok(value) = value.to_str() else {
            continue;
        };

        for entry in value.split(',') {
            let mut parameters = entry.split(';');
            let media_type = parameters
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase();
            let quality = parameters
                .find_map(|parameter| parameter.trim().strip_prefix("q="))
                .and_then(|quality| quality.trim().parse::<f32>().ok())
                .unwrap_or(1.0);

            let slot = match media_type.as_str() {
                "application/xml" | "text/xml" => &mut xml_quality,
                "application/json" => &mut json_quality,
                "*/*" | "application/*" => &mut wildcard_quality,
                _ => continue,
            };
            *slot = Some(slot.map_or(quality, |current| current.max(quality)));
        }
    }

    let xml = xml_quality.unwrap_or(0.0);
    let json = json_quality.or(wildcard_quality).unwrap_or(0.0);
    xml > 0.0 && xml > json
}
