//! `Accept-Language` parsing.

/// Language ranges from an `Accept-Language` value, most preferred first.
///
/// Tags are lowercased. Entries with `q=0`, an unparsable q-value, or the
/// `*` wildcard are dropped; equal weights keep header order.
pub fn parse_accept_language(header: &str) -> Vec<String> {
    let mut ranges: Vec<(String, f32)> = header
        .split(',')
        .filter_map(|part| {
            let mut params = part.split(';');
            let tag = params.next()?.trim();
            if tag.is_empty() || tag == "*" {
                return None;
            }

            let mut q = 1.0_f32;
            for param in params {
                let param = param.trim();
                if let Some(value) = param.strip_prefix("q=").or_else(|| param.strip_prefix("Q=")) {
                    q = value.trim().parse().ok().filter(|q: &f32| (0.0..=1.0).contains(q))?;
                }
            }

            (q > 0.0).then(|| (tag.to_ascii_lowercase(), q))
        })
        .collect();

    // stable: equal q keeps header order
    ranges.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranges.into_iter().map(|(tag, _)| tag).collect()
}

/// Primary subtag, e.g. `de` for `de-ch`.
pub fn primary_subtag(tag: &str) -> &str {
    tag.split(['-', '_']).next().unwrap_or(tag)
}
